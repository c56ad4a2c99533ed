use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use pinboard_domain::pagination::{Page, PageRequest};

use crate::auth::{ApiUser, MaybeApiUser};
use crate::error::PinboardError;
use crate::handlers::{PinResponse, list_url};
use crate::state::AppState;
use crate::usecase::pin::{DeletePinUseCase, GetPinUseCase, ListPinsUseCase};

// ── GET /api/my_pins ─────────────────────────────────────────────────────────

pub async fn list_my_pins(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PinResponse>>, PinboardError> {
    let usecase = ListPinsUseCase {
        pins: state.pin_repo(),
    };
    let pins = usecase.by_owner(user.id).await?;
    Ok(Json(pins.into_iter().map(PinResponse::from).collect()))
}

// ── GET /api/my_pins/{id} ────────────────────────────────────────────────────

pub async fn get_my_pin(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PinResponse>, PinboardError> {
    let usecase = GetPinUseCase {
        pins: state.pin_repo(),
    };
    let pin = usecase.owned(user.id, id).await?;
    Ok(Json(pin.into()))
}

// ── DELETE /api/my_pins/{id} ─────────────────────────────────────────────────

pub async fn delete_my_pin(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, PinboardError> {
    // Other users' pins are outside this collection and read as missing.
    GetPinUseCase {
        pins: state.pin_repo(),
    }
    .owned(user.id, id)
    .await?;
    let usecase = DeletePinUseCase {
        pins: state.pin_repo(),
    };
    usecase.execute(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /api/pins ────────────────────────────────────────────────────────────

pub async fn list_pins(
    _viewer: MaybeApiUser,
    State(state): State<AppState>,
    Query(req): Query<PageRequest>,
) -> Result<Json<Page<PinResponse>>, PinboardError> {
    let per_page = state.config.page_size;
    let usecase = ListPinsUseCase {
        pins: state.pin_repo(),
    };
    let (pins, count) = usecase.execute(req.index(), u64::from(per_page)).await?;
    let page = Page::new(&list_url(&state, "/api/pins"), req, per_page, count, pins)?;
    Ok(Json(page.map(PinResponse::from)))
}

// ── GET /api/pins/{id} ───────────────────────────────────────────────────────

pub async fn get_pin(
    _viewer: MaybeApiUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PinResponse>, PinboardError> {
    let usecase = GetPinUseCase {
        pins: state.pin_repo(),
    };
    let pin = usecase.execute(id).await?;
    Ok(Json(pin.into()))
}
