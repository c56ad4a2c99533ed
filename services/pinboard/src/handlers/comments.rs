use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::auth::ApiUser;
use crate::error::PinboardError;
use crate::handlers::CommentResponse;
use crate::state::AppState;
use crate::usecase::comment::{AddCommentUseCase, ListCommentsUseCase, OwnCommentUseCase};

// ── GET /api/comments ────────────────────────────────────────────────────────

pub async fn list_my_comments(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CommentResponse>>, PinboardError> {
    let usecase = ListCommentsUseCase {
        pins: state.pin_repo(),
        comments: state.comment_repo(),
    };
    let comments = usecase.by_user(user.id).await?;
    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

// ── GET /api/comments/{id} ───────────────────────────────────────────────────

pub async fn get_my_comment(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CommentResponse>, PinboardError> {
    let usecase = OwnCommentUseCase {
        comments: state.comment_repo(),
    };
    Ok(Json(usecase.get(user.id, id).await?.into()))
}

// ── PATCH /api/comments/{id} ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct EditCommentRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct EditedCommentResponse {
    pub id: i32,
    pub text: String,
    pub user: String,
    pub message: &'static str,
}

pub async fn edit_my_comment(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<EditCommentRequest>,
) -> Result<Json<EditedCommentResponse>, PinboardError> {
    let usecase = OwnCommentUseCase {
        comments: state.comment_repo(),
    };
    let comment = usecase.edit(user.id, id, &body.text).await?;
    Ok(Json(EditedCommentResponse {
        id: comment.id,
        text: comment.text,
        user: comment.author,
        message: "Comment was successfully edited.",
    }))
}

// ── DELETE /api/comments/{id} ────────────────────────────────────────────────

pub async fn delete_my_comment(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, PinboardError> {
    let usecase = OwnCommentUseCase {
        comments: state.comment_repo(),
    };
    usecase.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /api/pins/{id}/comments ──────────────────────────────────────────────

pub async fn list_pin_comments(
    _user: ApiUser,
    State(state): State<AppState>,
    Path(pin_id): Path<i32>,
) -> Result<Json<Vec<CommentResponse>>, PinboardError> {
    let usecase = ListCommentsUseCase {
        pins: state.pin_repo(),
        comments: state.comment_repo(),
    };
    let comments = usecase.for_pin(pin_id).await?;
    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

// ── POST /api/pins/{id}/comments ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
    /// Whether the body carried a `user` key at all, `null` included.
    /// Authorship comes from the token, so any such key is refused.
    #[serde(default, rename = "user", deserialize_with = "key_present")]
    pub user_supplied: bool,
}

fn key_present<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    IgnoredAny::deserialize(deserializer).map(|_| true)
}

impl CreateCommentRequest {
    fn check_authorship(&self) -> Result<(), PinboardError> {
        if self.user_supplied {
            return Err(PinboardError::Forbidden(
                "You should not provide any info about user.",
            ));
        }
        Ok(())
    }
}

pub async fn create_pin_comment(
    ApiUser(user): ApiUser,
    State(state): State<AppState>,
    Path(pin_id): Path<i32>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), PinboardError> {
    body.check_authorship()?;
    let usecase = AddCommentUseCase {
        pins: state.pin_repo(),
        comments: state.comment_repo(),
    };
    let comment = usecase.execute(user.id, pin_id, &body.text).await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}
