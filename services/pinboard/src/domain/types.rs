use chrono::{DateTime, Duration, Utc};

use pinboard_domain::sex::Sex;

/// Account identity.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// argon2 PHC string.
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Public profile, one per user. `username` is joined in from the owner.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub description: String,
    pub profile_status: String,
    pub photo: String,
    pub sex: Sex,
}

/// Partial profile update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub description: Option<String>,
    pub profile_status: Option<String>,
    pub sex: Option<Sex>,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowCounts {
    pub followers: u64,
    pub following: u64,
}

/// A stored password-reset request.
#[derive(Debug, Clone)]
pub struct ResetRequest {
    pub id: i32,
    pub user_id: i32,
    /// `None` when the code could not be delivered.
    pub code: Option<String>,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResetRequest {
    /// Code matches and was issued less than [`OTP_TTL_SECS`] before `now`.
    ///
    /// The used flag is deliberately not consulted.
    pub fn accepts(&self, code: &str, now: DateTime<Utc>) -> bool {
        self.code.as_deref() == Some(code)
            && now - self.created_at < Duration::seconds(OTP_TTL_SECS)
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    pub id: i32,
    pub user_id: i32,
    pub owner: String,
    pub title: String,
    pub cover: String,
    pub is_private: bool,
    pub description: String,
}

impl Board {
    /// Private boards are only visible to their owner.
    pub fn visible_to(&self, viewer: Option<i32>) -> bool {
        !self.is_private || viewer == Some(self.user_id)
    }
}

#[derive(Debug, Clone)]
pub struct NewBoard {
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub is_private: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BoardChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_private: Option<bool>,
    pub cover: Option<String>,
}

/// Board id with the ids of every pin on it.
#[derive(Debug, Clone)]
pub struct BoardMembership {
    pub board_id: i32,
    pub pin_ids: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pin {
    pub id: i32,
    pub user_id: i32,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub file: String,
    pub date_created: DateTime<Utc>,
}

impl Pin {
    pub fn media_type(&self) -> MediaType {
        media_type_of(&self.file)
    }
}

#[derive(Debug, Clone)]
pub struct NewPin {
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub file: String,
}

#[derive(Debug, Clone, Default)]
pub struct PinChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i32,
    pub user_id: i32,
    pub author: String,
    pub pin_id: i32,
    pub text: String,
    pub date_created: DateTime<Utc>,
}

/// Server-side REST token.
#[derive(Debug, Clone)]
pub struct ApiToken {
    pub key: String,
    pub user_id: i32,
    pub created: DateTime<Utc>,
}

impl ApiToken {
    /// Seconds left before expiry; negative once expired.
    pub fn expires_in(&self, ttl_secs: i64, now: DateTime<Utc>) -> i64 {
        ttl_secs - (now - self.created).num_seconds()
    }

    pub fn is_expired(&self, ttl_secs: i64, now: DateTime<Utc>) -> bool {
        self.expires_in(ttl_secs, now) < 0
    }
}

/// Outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Reset codes are valid for ten minutes.
pub const OTP_TTL_SECS: i64 = 600;

/// Reset codes are drawn uniformly from this range.
pub const OTP_RANGE: std::ops::RangeInclusive<u32> = 1000..=9999;

pub const USERNAME_MAX_LEN: usize = 64;
pub const NAME_MAX_LEN: usize = 64;
pub const PROFILE_STATUS_MAX_LEN: usize = 150;
pub const BOARD_TITLE_MAX_LEN: usize = 250;
pub const BOARD_DESCRIPTION_MAX_LEN: usize = 250;
pub const PIN_TITLE_MAX_LEN: usize = 200;
pub const PASSWORD_MIN_LEN: usize = 8;

pub const DEFAULT_PROFILE_PHOTO: &str = "profiles/default.png";
pub const DEFAULT_BOARD_COVER: &str = "boards/default.png";
pub const DEFAULT_PIN_FILE: &str = "pins/default.png";

const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "webm", "mov", "avi", "mkv"];

pub fn media_type_of(file: &str) -> MediaType {
    let ext = file
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        MediaType::Video
    } else {
        MediaType::Image
    }
}

/// Validate a username: 1-64 letters, digits and `@ . + - _`.
pub fn validate_username(username: &str) -> bool {
    let len = username.chars().count();
    if len == 0 || len > USERNAME_MAX_LEN {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}
