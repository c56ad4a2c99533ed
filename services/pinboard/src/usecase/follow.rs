use crate::domain::repository::{FollowRepository, UserRepository};
use crate::domain::types::User;
use crate::error::PinboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Followed,
    AlreadyFollowing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfollowOutcome {
    Unfollowed,
    NotFollowing,
}

async fn target<U: UserRepository>(users: &U, username: &str) -> Result<User, PinboardError> {
    users
        .find_by_username(username)
        .await?
        .ok_or(PinboardError::UsernameNotFound)
}

/// Check-then-insert; concurrent requests may still store a duplicate edge.
pub struct FollowUseCase<U, F>
where
    U: UserRepository,
    F: FollowRepository,
{
    pub users: U,
    pub follows: F,
}

impl<U, F> FollowUseCase<U, F>
where
    U: UserRepository,
    F: FollowRepository,
{
    pub async fn execute(
        &self,
        follower_id: i32,
        username: &str,
    ) -> Result<(User, FollowOutcome), PinboardError> {
        let user = target(&self.users, username).await?;
        if self.follows.exists(follower_id, user.id).await? {
            return Ok((user, FollowOutcome::AlreadyFollowing));
        }
        self.follows.create(follower_id, user.id).await?;
        tracing::info!(follower_id, following_id = user.id, "follow created");
        Ok((user, FollowOutcome::Followed))
    }
}

pub struct UnfollowUseCase<U, F>
where
    U: UserRepository,
    F: FollowRepository,
{
    pub users: U,
    pub follows: F,
}

impl<U, F> UnfollowUseCase<U, F>
where
    U: UserRepository,
    F: FollowRepository,
{
    pub async fn execute(
        &self,
        follower_id: i32,
        username: &str,
    ) -> Result<(User, UnfollowOutcome), PinboardError> {
        let user = target(&self.users, username).await?;
        if !self.follows.exists(follower_id, user.id).await? {
            return Ok((user, UnfollowOutcome::NotFollowing));
        }
        self.follows.delete(follower_id, user.id).await?;
        tracing::info!(follower_id, following_id = user.id, "follow removed");
        Ok((user, UnfollowOutcome::Unfollowed))
    }
}
