use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::auth::ApiUser;
use crate::error::PinboardError;
use crate::state::AppState;
use crate::usecase::follow::{FollowOutcome, FollowUseCase, UnfollowOutcome, UnfollowUseCase};

const ALREADY_SATISFIED: &str = "Condition already satisfied.";

#[derive(Deserialize)]
pub struct FollowRequest {
    pub username: String,
}

#[derive(Serialize)]
pub struct FollowResponse {
    pub user: String,
    pub new_follower: String,
    pub message: String,
}

// ── POST /api/follow ─────────────────────────────────────────────────────────

pub async fn follow(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
    Json(body): Json<FollowRequest>,
) -> Result<(StatusCode, Json<FollowResponse>), PinboardError> {
    let usecase = FollowUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    let (followed, outcome) = usecase.execute(user.id, &body.username).await?;
    let (status, message) = match outcome {
        FollowOutcome::Followed => (
            StatusCode::CREATED,
            format!("Now you are following {}.", followed.username),
        ),
        FollowOutcome::AlreadyFollowing => (StatusCode::OK, ALREADY_SATISFIED.to_owned()),
    };
    Ok((
        status,
        Json(FollowResponse {
            user: followed.username,
            new_follower: user.username,
            message,
        }),
    ))
}

// ── DELETE /api/follow ───────────────────────────────────────────────────────

pub async fn unfollow(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
    Json(body): Json<FollowRequest>,
) -> Result<Response, PinboardError> {
    let usecase = UnfollowUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    let (followed, outcome) = usecase.execute(user.id, &body.username).await?;
    match outcome {
        UnfollowOutcome::Unfollowed => Ok(StatusCode::NO_CONTENT.into_response()),
        UnfollowOutcome::NotFollowing => Ok((
            StatusCode::OK,
            Json(FollowResponse {
                user: followed.username,
                new_follower: user.username,
                message: ALREADY_SATISFIED.to_owned(),
            }),
        )
            .into_response()),
    }
}
