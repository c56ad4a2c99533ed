use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::PinboardError;
use crate::state::AppState;
use crate::usecase::api_token::SignInUseCase;

// ── POST /api/auth/signin ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SignedInUser {
    pub username: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub user: SignedInUser,
    /// Seconds until the token expires.
    pub expires_in: i64,
    pub token: String,
}

pub async fn signin(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, PinboardError> {
    let usecase = SignInUseCase {
        users: state.user_repo(),
        tokens: state.api_token_repo(),
        ttl_secs: state.config.token_expired_after_secs,
    };
    let signed_in = usecase.execute(&body.username, &body.password).await?;
    Ok(Json(SignInResponse {
        user: SignedInUser {
            username: signed_in.user.username,
            email: signed_in.user.email,
        },
        expires_in: signed_in.expires_in,
        token: signed_in.token.key,
    }))
}
