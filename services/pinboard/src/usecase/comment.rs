use crate::domain::repository::{CommentRepository, PinRepository};
use crate::domain::types::Comment;
use crate::error::PinboardError;
use crate::usecase::check_not_blank;

async fn own_comment<C: CommentRepository>(
    comments: &C,
    user_id: i32,
    id: i32,
) -> Result<Comment, PinboardError> {
    comments
        .find_by_id(id)
        .await?
        .filter(|c| c.user_id == user_id)
        .ok_or(PinboardError::CommentNotFound(id))
}

pub struct AddCommentUseCase<P, C>
where
    P: PinRepository,
    C: CommentRepository,
{
    pub pins: P,
    pub comments: C,
}

impl<P, C> AddCommentUseCase<P, C>
where
    P: PinRepository,
    C: CommentRepository,
{
    pub async fn execute(
        &self,
        user_id: i32,
        pin_id: i32,
        text: &str,
    ) -> Result<Comment, PinboardError> {
        if self.pins.find_by_id(pin_id).await?.is_none() {
            return Err(PinboardError::PinNotFound(pin_id));
        }
        check_not_blank("text", text)?;
        let comment = self.comments.create(user_id, pin_id, text.trim()).await?;
        tracing::info!(user_id, pin_id, comment_id = comment.id, "comment added");
        Ok(comment)
    }
}

pub struct ListCommentsUseCase<P, C>
where
    P: PinRepository,
    C: CommentRepository,
{
    pub pins: P,
    pub comments: C,
}

impl<P, C> ListCommentsUseCase<P, C>
where
    P: PinRepository,
    C: CommentRepository,
{
    pub async fn for_pin(&self, pin_id: i32) -> Result<Vec<Comment>, PinboardError> {
        if self.pins.find_by_id(pin_id).await?.is_none() {
            return Err(PinboardError::PinNotFound(pin_id));
        }
        self.comments.list_by_pin(pin_id).await
    }

    pub async fn by_user(&self, user_id: i32) -> Result<Vec<Comment>, PinboardError> {
        self.comments.list_by_user(user_id).await
    }
}

/// Reads and edits restricted to the author; others' comments read as missing.
pub struct OwnCommentUseCase<C: CommentRepository> {
    pub comments: C,
}

impl<C: CommentRepository> OwnCommentUseCase<C> {
    pub async fn get(&self, user_id: i32, id: i32) -> Result<Comment, PinboardError> {
        own_comment(&self.comments, user_id, id).await
    }

    pub async fn edit(&self, user_id: i32, id: i32, text: &str) -> Result<Comment, PinboardError> {
        own_comment(&self.comments, user_id, id).await?;
        check_not_blank("text", text)?;
        let comment = self.comments.update_text(id, text.trim()).await?;
        tracing::info!(user_id, comment_id = id, "comment edited");
        Ok(comment)
    }

    pub async fn delete(&self, user_id: i32, id: i32) -> Result<Comment, PinboardError> {
        let comment = own_comment(&self.comments, user_id, id).await?;
        self.comments.delete(id).await?;
        tracing::info!(user_id, comment_id = id, "comment deleted");
        Ok(comment)
    }
}

/// Web removal: unlike the API, a foreign comment is forbidden rather than missing.
pub struct RemoveCommentUseCase<C: CommentRepository> {
    pub comments: C,
}

impl<C: CommentRepository> RemoveCommentUseCase<C> {
    pub async fn execute(&self, user_id: i32, id: i32) -> Result<Comment, PinboardError> {
        let comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or(PinboardError::CommentNotFound(id))?;
        if comment.user_id != user_id {
            return Err(PinboardError::Forbidden(
                "You are not allowed to remove this comment.",
            ));
        }
        self.comments.delete(id).await?;
        tracing::info!(user_id, comment_id = id, "comment removed");
        Ok(comment)
    }
}
