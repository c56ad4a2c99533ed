use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use pinboard_domain::pagination::{Page, PageRequest};

use crate::auth::{ApiUser, MaybeApiUser};
use crate::domain::types::{BoardChanges, NewBoard};
use crate::error::PinboardError;
use crate::handlers::{BoardResponse, MessageResponse, PinResponse, list_url};
use crate::state::AppState;
use crate::usecase::board::{
    AddPinOutcome, AddPinToBoardUseCase, BoardLookup, CreateBoardUseCase, DeleteBoardUseCase,
    GetBoardUseCase, ListBoardsUseCase, RemovePinFromBoardUseCase, RemovePinOutcome,
    UpdateBoardUseCase,
};

// ── GET /api/boards ──────────────────────────────────────────────────────────

pub async fn list_boards(
    viewer: MaybeApiUser,
    State(state): State<AppState>,
    Query(req): Query<PageRequest>,
) -> Result<Json<Page<BoardResponse>>, PinboardError> {
    let per_page = state.config.page_size;
    let viewer_id = viewer.0.map(|u| u.id);
    let usecase = ListBoardsUseCase {
        boards: state.board_repo(),
    };
    let (boards, count) = usecase.execute(viewer_id, req.index(), u64::from(per_page)).await?;
    let page = Page::new(&list_url(&state, "/api/boards"), req, per_page, count, boards)?;
    Ok(Json(page.map(BoardResponse::from)))
}

// ── POST /api/boards ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateBoardRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_private: bool,
}

pub async fn create_board(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
    Json(body): Json<CreateBoardRequest>,
) -> Result<(StatusCode, Json<BoardResponse>), PinboardError> {
    let usecase = CreateBoardUseCase {
        boards: state.board_repo(),
    };
    let board = usecase
        .execute(NewBoard {
            user_id: user.id,
            title: body.title,
            description: body.description,
            is_private: body.is_private,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(board.into())))
}

// ── GET /api/boards/{id} ─────────────────────────────────────────────────────

pub async fn get_board(
    viewer: MaybeApiUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BoardResponse>, PinboardError> {
    let viewer_id = viewer.0.map(|u| u.id);
    let usecase = GetBoardUseCase {
        boards: state.board_repo(),
    };
    let board = usecase.execute(BoardLookup::Id(id), viewer_id).await?;
    Ok(Json(board.into()))
}

// ── PATCH /api/boards/{id} ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateBoardRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_private: Option<bool>,
}

pub async fn update_board(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateBoardRequest>,
) -> Result<Json<BoardResponse>, PinboardError> {
    let usecase = UpdateBoardUseCase {
        boards: state.board_repo(),
    };
    let board = usecase
        .execute(
            user.id,
            id,
            BoardChanges {
                title: body.title,
                description: body.description,
                is_private: body.is_private,
                cover: None,
            },
        )
        .await?;
    Ok(Json(board.into()))
}

// ── DELETE /api/boards/{id} ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BoardRemovedResponse {
    pub title: String,
    pub message: &'static str,
}

pub async fn delete_board(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BoardRemovedResponse>, PinboardError> {
    let usecase = DeleteBoardUseCase {
        boards: state.board_repo(),
    };
    let board = usecase.execute(user.id, id).await?;
    Ok(Json(BoardRemovedResponse {
        title: board.title,
        message: "Board successfully removed.",
    }))
}

// ── GET|DELETE /api/pin_in_board/{pin_id}/{board_title} ──────────────────────

#[derive(Serialize)]
#[serde(untagged)]
pub enum PinInBoardResponse {
    Changed {
        pin: PinResponse,
        board_title: String,
        message: &'static str,
    },
    Unchanged(MessageResponse),
}

pub async fn add_pin_to_board(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
    Path((pin_id, board_title)): Path<(i32, String)>,
) -> Result<Json<PinInBoardResponse>, PinboardError> {
    let usecase = AddPinToBoardUseCase {
        boards: state.board_repo(),
        pins: state.pin_repo(),
    };
    let (outcome, pin, board) = usecase.execute(user.id, pin_id, &board_title).await?;
    let body = match outcome {
        AddPinOutcome::Added => PinInBoardResponse::Changed {
            pin: pin.into(),
            board_title: board.title,
            message: "Pin successfully added to the board.",
        },
        AddPinOutcome::AlreadyInBoard => {
            PinInBoardResponse::Unchanged(MessageResponse::new("Already in board."))
        }
    };
    Ok(Json(body))
}

pub async fn remove_pin_from_board(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
    Path((pin_id, board_title)): Path<(i32, String)>,
) -> Result<Json<PinInBoardResponse>, PinboardError> {
    let usecase = RemovePinFromBoardUseCase {
        boards: state.board_repo(),
        pins: state.pin_repo(),
    };
    let (outcome, pin, board) = usecase.execute(user.id, pin_id, &board_title).await?;
    let body = match outcome {
        RemovePinOutcome::Removed => PinInBoardResponse::Changed {
            pin: pin.into(),
            board_title: board.title,
            message: "Pin successfully removed from the board.",
        },
        RemovePinOutcome::NotInBoard => {
            PinInBoardResponse::Unchanged(MessageResponse::new("Pin is not found in given board."))
        }
    };
    Ok(Json(body))
}
