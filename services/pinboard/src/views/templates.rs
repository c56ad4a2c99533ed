//! Askama templates for the web interface.

use askama::Template;

use crate::auth::Flash;
use crate::domain::types::{Board, Comment, MediaType, Pin, Profile};
use crate::infra::media::media_url;
use crate::views::{board_edit_path, board_path, profile_path};

/// Data every page needs for the navigation bar and flash messages.
#[derive(Debug, Default)]
pub struct Nav {
    pub username: Option<String>,
    pub profile_url: String,
    pub messages: Vec<Flash>,
}

#[derive(Debug)]
pub struct PinCard {
    pub id: i32,
    pub title: String,
    pub owner: String,
    pub owner_url: String,
    pub file_url: String,
    pub is_video: bool,
}

impl From<&Pin> for PinCard {
    fn from(pin: &Pin) -> Self {
        Self {
            id: pin.id,
            title: pin.title.clone(),
            owner: pin.owner.clone(),
            owner_url: profile_path(&pin.owner),
            file_url: media_url(&pin.file),
            is_video: pin.media_type() == MediaType::Video,
        }
    }
}

#[derive(Debug)]
pub struct BoardCard {
    pub title: String,
    pub url: String,
    pub edit_url: String,
    pub owner: String,
    pub cover_url: String,
    pub is_private: bool,
    pub description: String,
}

impl From<&Board> for BoardCard {
    fn from(board: &Board) -> Self {
        Self {
            title: board.title.clone(),
            url: board_path(&board.title),
            edit_url: board_edit_path(&board.title),
            owner: board.owner.clone(),
            cover_url: media_url(&board.cover),
            is_private: board.is_private,
            description: board.description.clone(),
        }
    }
}

#[derive(Debug)]
pub struct CommentView {
    pub id: i32,
    pub author: String,
    pub author_url: String,
    pub text: String,
    pub date: String,
    pub can_remove: bool,
}

impl CommentView {
    pub fn new(comment: &Comment, viewer: Option<i32>) -> Self {
        Self {
            id: comment.id,
            author: comment.author.clone(),
            author_url: profile_path(&comment.author),
            text: comment.text.clone(),
            date: comment.date_created.format("%Y-%m-%d %H:%M").to_string(),
            can_remove: viewer == Some(comment.user_id),
        }
    }
}

/// `<select>` option.
#[derive(Debug)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub nav: Nav,
    pub status: u16,
    pub message: String,
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: Nav,
    pub pins: Vec<PinCard>,
}

#[derive(Template)]
#[template(path = "placeholder.html")]
pub struct PlaceholderTemplate {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub nav: Nav,
    pub username: String,
    pub email: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub username: String,
    pub next: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "profile_detail.html")]
pub struct ProfileTemplate {
    pub nav: Nav,
    pub profile: Profile,
    pub photo_url: String,
    pub sex_label: &'static str,
    pub followers: u64,
    pub following: u64,
    pub is_owner: bool,
    pub followed_by_viewer: bool,
    pub can_follow: bool,
    pub follow_url: String,
    pub unfollow_url: String,
    pub boards: Vec<BoardCard>,
    pub pins: Vec<PinCard>,
}

#[derive(Template)]
#[template(path = "edit_profile.html")]
pub struct EditProfileTemplate {
    pub nav: Nav,
    pub first_name: String,
    pub last_name: String,
    pub description: String,
    pub profile_status: String,
    pub sex_choices: Vec<Choice>,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "forgot_pass.html")]
pub struct ForgotPasswordTemplate {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "otp_sent.html")]
pub struct CodeSentTemplate {
    pub nav: Nav,
    pub email: String,
}

#[derive(Template)]
#[template(path = "change_pass.html")]
pub struct ChangePasswordTemplate {
    pub nav: Nav,
    pub action: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "board_form.html")]
pub struct BoardFormTemplate {
    pub nav: Nav,
    pub heading: &'static str,
    pub action: String,
    pub title: String,
    pub description: String,
    pub is_private: bool,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "board_detail.html")]
pub struct BoardDetailTemplate {
    pub nav: Nav,
    pub board: BoardCard,
    pub is_owner: bool,
    pub pins: Vec<PinCard>,
}

#[derive(Template)]
#[template(path = "pin_form.html")]
pub struct PinFormTemplate {
    pub nav: Nav,
    pub heading: &'static str,
    pub action: String,
    pub title: String,
    pub description: String,
    /// Boards offered for saving a new pin; empty when editing.
    pub boards: Vec<Choice>,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "pin_list.html")]
pub struct PinListTemplate {
    pub nav: Nav,
    pub heading: String,
    pub pins: Vec<PinCard>,
}

#[derive(Template)]
#[template(path = "pin_detail.html")]
pub struct PinDetailTemplate {
    pub nav: Nav,
    pub pin: PinCard,
    pub description: String,
    pub date_created: String,
    pub is_owner: bool,
    pub logged_in: bool,
    pub boards: Vec<Choice>,
    pub comments: Vec<CommentView>,
    pub related: Vec<PinCard>,
}
