//! REST API handlers (`/api/...`).

pub mod auth;
pub mod boards;
pub mod comments;
pub mod follow;
pub mod pins;
pub mod profiles;

use serde::Serialize;

use crate::domain::types::{Board, Comment, Pin, Profile};
use crate::infra::media::media_url;
use crate::state::AppState;

/// Absolute URL of an API list, used for pagination links.
pub(crate) fn list_url(state: &AppState, path: &str) -> String {
    format!("{}{path}", state.config.default_domain)
}

#[derive(Debug, Serialize)]
pub struct PinResponse {
    pub id: i32,
    pub user: String,
    pub title: String,
    pub description: String,
    pub file: String,
    pub media_type: &'static str,
    #[serde(serialize_with = "pinboard_core::serde::to_rfc3339_ms")]
    pub date_created: chrono::DateTime<chrono::Utc>,
}

impl From<Pin> for PinResponse {
    fn from(pin: Pin) -> Self {
        let media_type = pin.media_type().as_str();
        Self {
            id: pin.id,
            user: pin.owner,
            title: pin.title,
            description: pin.description,
            file: media_url(&pin.file),
            media_type,
            date_created: pin.date_created,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub id: i32,
    pub user: String,
    pub title: String,
    pub cover: String,
    pub is_private: bool,
    pub description: String,
}

impl From<Board> for BoardResponse {
    fn from(board: Board) -> Self {
        Self {
            id: board.id,
            user: board.owner,
            title: board.title,
            cover: media_url(&board.cover),
            is_private: board.is_private,
            description: board.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: i32,
    pub user: String,
    pub first_name: String,
    pub last_name: String,
    pub sex: &'static str,
    pub description: String,
    pub profile_status: String,
    pub photo: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            user: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
            sex: profile.sex.code(),
            description: profile.description,
            profile_status: profile.profile_status,
            photo: media_url(&profile.photo),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i32,
    pub user: String,
    pub pin: i32,
    pub text: String,
    #[serde(serialize_with = "pinboard_core::serde::to_rfc3339_ms")]
    pub date_created: chrono::DateTime<chrono::Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            user: comment.author,
            pin: comment.pin_id,
            text: comment.text,
            date_created: comment.date_created,
        }
    }
}

/// `{"message": ...}` body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
