#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use crate::domain::types::{
    ApiToken, Board, BoardChanges, BoardMembership, Comment, FollowCounts, Mail, NewBoard,
    NewPin, NewUser, Pin, PinChanges, Profile, ProfileChanges, ResetRequest, User,
};
use crate::error::PinboardError;

/// Accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, PinboardError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PinboardError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PinboardError>;

    /// Insert an inactive user together with its default profile (one transaction).
    ///
    /// Unique violations map to `UsernameTaken` / `EmailTaken`.
    async fn create_with_profile(&self, user: &NewUser) -> Result<User, PinboardError>;

    async fn activate(&self, id: i32) -> Result<(), PinboardError>;
    async fn set_password(&self, id: i32, password_hash: &str) -> Result<(), PinboardError>;
    async fn touch_last_login(&self, id: i32, at: DateTime<Utc>) -> Result<(), PinboardError>;
}

pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Profile>, PinboardError>;
    async fn find_by_user(&self, user_id: i32) -> Result<Option<Profile>, PinboardError>;

    /// One page of profiles ordered by id, plus the total count.
    async fn list(&self, page: u64, per_page: u64) -> Result<(Vec<Profile>, u64), PinboardError>;

    async fn update(&self, id: i32, changes: &ProfileChanges) -> Result<Profile, PinboardError>;
}

/// Follow edges. The pair is not unique in storage.
pub trait FollowRepository: Send + Sync {
    async fn exists(&self, follower: i32, following: i32) -> Result<bool, PinboardError>;
    async fn create(&self, follower: i32, following: i32) -> Result<(), PinboardError>;
    /// Returns the number of edges removed.
    async fn delete(&self, follower: i32, following: i32) -> Result<u64, PinboardError>;
    async fn counts(&self, user_id: i32) -> Result<FollowCounts, PinboardError>;
}

/// Password-reset requests. History is kept; only the latest row counts.
pub trait ResetRequestRepository: Send + Sync {
    async fn create(&self, user_id: i32, code: Option<&str>)
    -> Result<ResetRequest, PinboardError>;
    async fn latest_for_user(&self, user_id: i32) -> Result<Option<ResetRequest>, PinboardError>;
    async fn mark_used(&self, id: i32) -> Result<(), PinboardError>;
}

pub trait BoardRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Board>, PinboardError>;
    async fn find_by_title(&self, title: &str) -> Result<Option<Board>, PinboardError>;

    /// One page of boards visible to `viewer`, newest first, plus the total count.
    async fn list_visible(
        &self,
        viewer: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Board>, u64), PinboardError>;

    async fn list_by_owner(
        &self,
        user_id: i32,
        include_private: bool,
    ) -> Result<Vec<Board>, PinboardError>;

    /// Unique violations map to `BoardTitleTaken`.
    async fn create(&self, board: &NewBoard) -> Result<Board, PinboardError>;
    async fn update(&self, id: i32, changes: &BoardChanges) -> Result<Board, PinboardError>;
    async fn delete(&self, id: i32) -> Result<(), PinboardError>;

    async fn contains_pin(&self, board_id: i32, pin_id: i32) -> Result<bool, PinboardError>;
    async fn add_pin(&self, board_id: i32, pin_id: i32) -> Result<(), PinboardError>;
    async fn remove_pin(&self, board_id: i32, pin_id: i32) -> Result<(), PinboardError>;

    /// Every board with its pin ids.
    async fn memberships(&self) -> Result<Vec<BoardMembership>, PinboardError>;
}

pub trait PinRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Pin>, PinboardError>;
    /// Pins with the given ids, ordered by id.
    async fn find_many(&self, ids: &[i32]) -> Result<Vec<Pin>, PinboardError>;

    /// One page of all pins, newest first, plus the total count.
    async fn list(&self, page: u64, per_page: u64) -> Result<(Vec<Pin>, u64), PinboardError>;
    async fn list_by_owner(&self, user_id: i32) -> Result<Vec<Pin>, PinboardError>;
    async fn list_by_board(&self, board_id: i32) -> Result<Vec<Pin>, PinboardError>;

    async fn create(&self, pin: &NewPin) -> Result<Pin, PinboardError>;
    async fn update(&self, id: i32, changes: &PinChanges) -> Result<Pin, PinboardError>;
    async fn delete(&self, id: i32) -> Result<(), PinboardError>;
}

pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, PinboardError>;
    /// Oldest first.
    async fn list_by_pin(&self, pin_id: i32) -> Result<Vec<Comment>, PinboardError>;
    async fn list_by_user(&self, user_id: i32) -> Result<Vec<Comment>, PinboardError>;
    async fn create(&self, user_id: i32, pin_id: i32, text: &str)
    -> Result<Comment, PinboardError>;
    async fn update_text(&self, id: i32, text: &str) -> Result<Comment, PinboardError>;
    async fn delete(&self, id: i32) -> Result<(), PinboardError>;
}

pub trait ApiTokenRepository: Send + Sync {
    async fn find_by_key(&self, key: &str) -> Result<Option<ApiToken>, PinboardError>;
    async fn find_by_user(&self, user_id: i32) -> Result<Option<ApiToken>, PinboardError>;
    async fn create(&self, token: &ApiToken) -> Result<(), PinboardError>;
    async fn delete(&self, key: &str) -> Result<(), PinboardError>;
}

/// Outbound email. Sends run on a spawned task, so the future must be `Send`.
pub trait Mailer: Clone + Send + Sync + 'static {
    fn send(&self, mail: &Mail) -> impl Future<Output = Result<(), PinboardError>> + Send;
}
