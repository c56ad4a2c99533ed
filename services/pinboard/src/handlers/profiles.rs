use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use pinboard_domain::pagination::{Page, PageRequest};
use pinboard_domain::sex::Sex;

use crate::auth::ApiUser;
use crate::domain::types::ProfileChanges;
use crate::error::PinboardError;
use crate::handlers::{ProfileResponse, list_url};
use crate::state::AppState;
use crate::usecase::profile::{GetProfileUseCase, ListProfilesUseCase, UpdateProfileUseCase};

// ── GET /api/profile ─────────────────────────────────────────────────────────

pub async fn list_profiles(
    _user: ApiUser,
    State(state): State<AppState>,
    Query(req): Query<PageRequest>,
) -> Result<Json<Page<ProfileResponse>>, PinboardError> {
    let per_page = state.config.page_size;
    let usecase = ListProfilesUseCase {
        profiles: state.profile_repo(),
    };
    let (profiles, count) = usecase.execute(req.index(), u64::from(per_page)).await?;
    let page = Page::new(
        &list_url(&state, "/api/profile"),
        req,
        per_page,
        count,
        profiles,
    )?;
    Ok(Json(page.map(ProfileResponse::from)))
}

// ── GET /api/profile/{id} ────────────────────────────────────────────────────

pub async fn get_profile(
    _user: ApiUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProfileResponse>, PinboardError> {
    let usecase = GetProfileUseCase {
        profiles: state.profile_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── PATCH /api/profile/{id} ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub description: Option<String>,
    pub profile_status: Option<String>,
    pub sex: Option<String>,
}

impl UpdateProfileRequest {
    fn into_changes(self) -> Result<ProfileChanges, PinboardError> {
        let sex = self
            .sex
            .map(|code| {
                code.parse::<Sex>().map_err(|_| {
                    PinboardError::Validation(format!("\"{code}\" is not a valid choice."))
                })
            })
            .transpose()?;
        Ok(ProfileChanges {
            first_name: self.first_name,
            last_name: self.last_name,
            description: self.description,
            profile_status: self.profile_status,
            sex,
            photo: None,
        })
    }
}

#[derive(Serialize)]
pub struct UpdatedProfileResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub message: &'static str,
}

pub async fn update_profile(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UpdatedProfileResponse>, PinboardError> {
    let usecase = UpdateProfileUseCase {
        profiles: state.profile_repo(),
    };
    let profile = usecase.execute(user.id, id, body.into_changes()?).await?;
    Ok(Json(UpdatedProfileResponse {
        profile: profile.into(),
        message: "Profile successfully updated!",
    }))
}
