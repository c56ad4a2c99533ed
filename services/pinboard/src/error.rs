use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use pinboard_domain::pagination::PageOutOfRange;

/// Pinboard error variants shared by use cases, the REST API and the web views.
#[derive(Debug, thiserror::Error)]
pub enum PinboardError {
    #[error("user not found")]
    UserNotFound,
    #[error("Username query didn't give any results.")]
    UsernameNotFound,
    #[error("profile not found")]
    ProfileNotFound,
    #[error("board not found")]
    BoardNotFound,
    #[error("Pin with id={0} was not found.")]
    PinNotFound(i32),
    #[error("Comment with id={0} was not found.")]
    CommentNotFound(i32),
    #[error("Invalid page.")]
    InvalidPage(#[from] PageOutOfRange),
    #[error("A user with that username already exists.")]
    UsernameTaken,
    #[error("A user with that email already exists.")]
    EmailTaken,
    #[error("board with this title already exists.")]
    BoardTitleTaken,
    #[error("{0}")]
    Validation(String),
    #[error("Please enter a correct username and password.")]
    InvalidCredentials,
    #[error("Authentication credentials were not provided.")]
    NotAuthenticated,
    #[error("Invalid Token")]
    InvalidToken,
    #[error("The Token is expired")]
    TokenExpired,
    #[error("User is not active")]
    InactiveUser,
    #[error("activation link is invalid or has expired")]
    InvalidActivationLink,
    #[error("reset code is invalid or has expired")]
    InvalidResetCode,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl PinboardError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::UsernameNotFound => "USERNAME_NOT_FOUND",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::BoardNotFound => "BOARD_NOT_FOUND",
            Self::PinNotFound(_) => "PIN_NOT_FOUND",
            Self::CommentNotFound(_) => "COMMENT_NOT_FOUND",
            Self::InvalidPage(_) => "INVALID_PAGE",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::BoardTitleTaken => "BOARD_TITLE_TAKEN",
            Self::Validation(_) => "VALIDATION",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InactiveUser => "INACTIVE_USER",
            Self::InvalidActivationLink => "INVALID_ACTIVATION_LINK",
            Self::InvalidResetCode => "INVALID_RESET_CODE",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::UserNotFound
            | Self::UsernameNotFound
            | Self::ProfileNotFound
            | Self::BoardNotFound
            | Self::PinNotFound(_)
            | Self::CommentNotFound(_)
            | Self::InvalidPage(_)
            | Self::InvalidCredentials => StatusCode::NOT_FOUND,
            Self::UsernameTaken | Self::EmailTaken | Self::BoardTitleTaken => StatusCode::CONFLICT,
            Self::Validation(_) | Self::InvalidActivationLink | Self::InvalidResetCode => {
                StatusCode::BAD_REQUEST
            }
            Self::NotAuthenticated | Self::InvalidToken | Self::TokenExpired | Self::InactiveUser => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PinboardError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
