use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use pinboard_domain::sex::Sex;
use pinboard_server::domain::repository::{
    ApiTokenRepository, BoardRepository, CommentRepository, FollowRepository, Mailer,
    PinRepository, ProfileRepository, ResetRequestRepository, UserRepository,
};
use pinboard_server::domain::types::{
    ApiToken, Board, BoardChanges, BoardMembership, Comment, DEFAULT_BOARD_COVER,
    DEFAULT_PROFILE_PHOTO, FollowCounts, Mail, NewBoard, NewPin, NewUser, Pin, PinChanges,
    Profile, ProfileChanges, ResetRequest, User,
};
use pinboard_server::error::PinboardError;
use pinboard_server::security::password::hash_password;

pub const TEST_SECRET: &str = "test-secret-key";
pub const TEST_PASSWORD: &str = "correct-horse";

fn owner_name(user_id: i32) -> String {
    format!("user{user_id}")
}

pub fn test_user(id: i32, username: &str) -> User {
    User {
        id,
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        is_active: true,
        is_admin: false,
        last_login: None,
        date_joined: Utc::now(),
    }
}

pub fn inactive_user(id: i32, username: &str) -> User {
    User {
        is_active: false,
        ..test_user(id, username)
    }
}

pub fn test_profile(id: i32, user: &User) -> Profile {
    Profile {
        id,
        user_id: user.id,
        username: user.username.clone(),
        first_name: String::new(),
        last_name: String::new(),
        description: String::new(),
        profile_status: String::new(),
        photo: DEFAULT_PROFILE_PHOTO.to_owned(),
        sex: Sex::default(),
    }
}

pub fn test_pin(id: i32, user_id: i32, title: &str) -> Pin {
    Pin {
        id,
        user_id,
        owner: owner_name(user_id),
        title: title.to_owned(),
        description: String::new(),
        file: format!("pins/{id}.jpg"),
        date_created: Utc::now(),
    }
}

pub fn test_board(id: i32, user_id: i32, title: &str, is_private: bool) -> Board {
    Board {
        id,
        user_id,
        owner: owner_name(user_id),
        title: title.to_owned(),
        cover: DEFAULT_BOARD_COVER.to_owned(),
        is_private,
        description: String::new(),
    }
}

pub fn reset_request(
    id: i32,
    user_id: i32,
    code: Option<&str>,
    created_at: DateTime<Utc>,
) -> ResetRequest {
    ResetRequest {
        id,
        user_id,
        code: code.map(str::to_owned),
        is_used: false,
        created_at,
        updated_at: created_at,
    }
}

fn next_id<T>(items: &[T], id: impl Fn(&T) -> i32) -> i32 {
    items.iter().map(id).max().unwrap_or(0) + 1
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    /// Profiles created alongside users, shared with a [`MockProfileRepo`].
    pub profiles: Arc<Mutex<Vec<Profile>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            profiles: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }

    pub fn profiles_handle(&self) -> Arc<Mutex<Vec<Profile>>> {
        Arc::clone(&self.profiles)
    }

    fn modify(&self, id: i32, f: impl FnOnce(&mut User)) -> Result<(), PinboardError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(PinboardError::UserNotFound)?;
        f(user);
        Ok(())
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, PinboardError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PinboardError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PinboardError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_with_profile(&self, new: &NewUser) -> Result<User, PinboardError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == new.username) {
            return Err(PinboardError::UsernameTaken);
        }
        if users.iter().any(|u| u.email == new.email) {
            return Err(PinboardError::EmailTaken);
        }
        let user = User {
            id: next_id(&users, |u| u.id),
            username: new.username.clone(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            is_active: false,
            is_admin: false,
            last_login: None,
            date_joined: Utc::now(),
        };
        users.push(user.clone());

        let mut profiles = self.profiles.lock().unwrap();
        let profile_id = next_id(&profiles, |p| p.id);
        profiles.push(test_profile(profile_id, &user));
        Ok(user)
    }

    async fn activate(&self, id: i32) -> Result<(), PinboardError> {
        self.modify(id, |u| u.is_active = true)
    }

    async fn set_password(&self, id: i32, password_hash: &str) -> Result<(), PinboardError> {
        self.modify(id, |u| u.password_hash = password_hash.to_owned())
    }

    async fn touch_last_login(&self, id: i32, at: DateTime<Utc>) -> Result<(), PinboardError> {
        self.modify(id, |u| u.last_login = Some(at))
    }
}

// ── MockProfileRepo ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockProfileRepo {
    pub profiles: Arc<Mutex<Vec<Profile>>>,
}

impl MockProfileRepo {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: Arc::new(Mutex::new(profiles)),
        }
    }
}

impl ProfileRepository for MockProfileRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<Profile>, PinboardError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Option<Profile>, PinboardError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn list(&self, page: u64, per_page: u64) -> Result<(Vec<Profile>, u64), PinboardError> {
        let profiles = self.profiles.lock().unwrap();
        let items = profiles
            .iter()
            .skip((page * per_page) as usize)
            .take(per_page as usize)
            .cloned()
            .collect();
        Ok((items, profiles.len() as u64))
    }

    async fn update(&self, id: i32, changes: &ProfileChanges) -> Result<Profile, PinboardError> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PinboardError::ProfileNotFound)?;
        if let Some(v) = &changes.first_name {
            profile.first_name = v.clone();
        }
        if let Some(v) = &changes.last_name {
            profile.last_name = v.clone();
        }
        if let Some(v) = &changes.description {
            profile.description = v.clone();
        }
        if let Some(v) = &changes.profile_status {
            profile.profile_status = v.clone();
        }
        if let Some(v) = changes.sex {
            profile.sex = v;
        }
        if let Some(v) = &changes.photo {
            profile.photo = v.clone();
        }
        Ok(profile.clone())
    }
}

// ── MockFollowRepo ───────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockFollowRepo {
    /// (follower, following) edges.
    pub edges: Arc<Mutex<Vec<(i32, i32)>>>,
}

impl MockFollowRepo {
    pub fn edges_handle(&self) -> Arc<Mutex<Vec<(i32, i32)>>> {
        Arc::clone(&self.edges)
    }
}

impl FollowRepository for MockFollowRepo {
    async fn exists(&self, follower: i32, following: i32) -> Result<bool, PinboardError> {
        Ok(self.edges.lock().unwrap().contains(&(follower, following)))
    }

    async fn create(&self, follower: i32, following: i32) -> Result<(), PinboardError> {
        self.edges.lock().unwrap().push((follower, following));
        Ok(())
    }

    async fn delete(&self, follower: i32, following: i32) -> Result<u64, PinboardError> {
        let mut edges = self.edges.lock().unwrap();
        let before = edges.len();
        edges.retain(|e| *e != (follower, following));
        Ok((before - edges.len()) as u64)
    }

    async fn counts(&self, user_id: i32) -> Result<FollowCounts, PinboardError> {
        let edges = self.edges.lock().unwrap();
        Ok(FollowCounts {
            followers: edges.iter().filter(|(_, to)| *to == user_id).count() as u64,
            following: edges.iter().filter(|(from, _)| *from == user_id).count() as u64,
        })
    }
}

// ── MockResetRepo ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockResetRepo {
    pub requests: Arc<Mutex<Vec<ResetRequest>>>,
}

impl MockResetRepo {
    pub fn new(requests: Vec<ResetRequest>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(requests)),
        }
    }

    pub fn requests_handle(&self) -> Arc<Mutex<Vec<ResetRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl ResetRequestRepository for MockResetRepo {
    async fn create(
        &self,
        user_id: i32,
        code: Option<&str>,
    ) -> Result<ResetRequest, PinboardError> {
        let mut requests = self.requests.lock().unwrap();
        let request = reset_request(next_id(&requests, |r| r.id), user_id, code, Utc::now());
        requests.push(request.clone());
        Ok(request)
    }

    async fn latest_for_user(&self, user_id: i32) -> Result<Option<ResetRequest>, PinboardError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .max_by_key(|r| (r.created_at, r.id))
            .cloned())
    }

    async fn mark_used(&self, id: i32) -> Result<(), PinboardError> {
        if let Some(r) = self.requests.lock().unwrap().iter_mut().find(|r| r.id == id) {
            r.is_used = true;
        }
        Ok(())
    }
}

// ── MockBoardRepo ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockBoardRepo {
    pub boards: Arc<Mutex<Vec<Board>>>,
    /// (board_id, pin_id) rows.
    pub board_pins: Arc<Mutex<Vec<(i32, i32)>>>,
}

impl MockBoardRepo {
    pub fn new(boards: Vec<Board>, board_pins: Vec<(i32, i32)>) -> Self {
        Self {
            boards: Arc::new(Mutex::new(boards)),
            board_pins: Arc::new(Mutex::new(board_pins)),
        }
    }

    pub fn board_pins_handle(&self) -> Arc<Mutex<Vec<(i32, i32)>>> {
        Arc::clone(&self.board_pins)
    }
}

impl BoardRepository for MockBoardRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<Board>, PinboardError> {
        Ok(self.boards.lock().unwrap().iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Board>, PinboardError> {
        Ok(self
            .boards
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.title == title)
            .cloned())
    }

    async fn list_visible(
        &self,
        viewer: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Board>, u64), PinboardError> {
        let mut visible: Vec<Board> = self
            .boards
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.visible_to(viewer))
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.id.cmp(&a.id));
        let count = visible.len() as u64;
        let items = visible
            .into_iter()
            .skip((page * per_page) as usize)
            .take(per_page as usize)
            .collect();
        Ok((items, count))
    }

    async fn list_by_owner(
        &self,
        user_id: i32,
        include_private: bool,
    ) -> Result<Vec<Board>, PinboardError> {
        Ok(self
            .boards
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id && (include_private || !b.is_private))
            .cloned()
            .collect())
    }

    async fn create(&self, new: &NewBoard) -> Result<Board, PinboardError> {
        let mut boards = self.boards.lock().unwrap();
        if boards.iter().any(|b| b.title == new.title) {
            return Err(PinboardError::BoardTitleTaken);
        }
        let board = Board {
            description: new.description.clone(),
            ..test_board(next_id(&boards, |b| b.id), new.user_id, &new.title, new.is_private)
        };
        boards.push(board.clone());
        Ok(board)
    }

    async fn update(&self, id: i32, changes: &BoardChanges) -> Result<Board, PinboardError> {
        let mut boards = self.boards.lock().unwrap();
        let board = boards
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(PinboardError::BoardNotFound)?;
        if let Some(v) = &changes.title {
            board.title = v.clone();
        }
        if let Some(v) = &changes.description {
            board.description = v.clone();
        }
        if let Some(v) = changes.is_private {
            board.is_private = v;
        }
        if let Some(v) = &changes.cover {
            board.cover = v.clone();
        }
        Ok(board.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), PinboardError> {
        self.boards.lock().unwrap().retain(|b| b.id != id);
        self.board_pins.lock().unwrap().retain(|(b, _)| *b != id);
        Ok(())
    }

    async fn contains_pin(&self, board_id: i32, pin_id: i32) -> Result<bool, PinboardError> {
        Ok(self.board_pins.lock().unwrap().contains(&(board_id, pin_id)))
    }

    async fn add_pin(&self, board_id: i32, pin_id: i32) -> Result<(), PinboardError> {
        let mut rows = self.board_pins.lock().unwrap();
        if !rows.contains(&(board_id, pin_id)) {
            rows.push((board_id, pin_id));
        }
        Ok(())
    }

    async fn remove_pin(&self, board_id: i32, pin_id: i32) -> Result<(), PinboardError> {
        self.board_pins
            .lock()
            .unwrap()
            .retain(|row| *row != (board_id, pin_id));
        Ok(())
    }

    async fn memberships(&self) -> Result<Vec<BoardMembership>, PinboardError> {
        let rows = self.board_pins.lock().unwrap();
        Ok(self
            .boards
            .lock()
            .unwrap()
            .iter()
            .map(|b| BoardMembership {
                board_id: b.id,
                pin_ids: rows
                    .iter()
                    .filter(|(board, _)| *board == b.id)
                    .map(|(_, pin)| *pin)
                    .collect(),
            })
            .collect())
    }
}

// ── MockPinRepo ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPinRepo {
    pub pins: Arc<Mutex<Vec<Pin>>>,
    /// Shared with a [`MockBoardRepo`] for `list_by_board`.
    pub board_pins: Arc<Mutex<Vec<(i32, i32)>>>,
}

impl MockPinRepo {
    pub fn new(pins: Vec<Pin>) -> Self {
        Self {
            pins: Arc::new(Mutex::new(pins)),
            board_pins: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Pin repo reading board membership from `boards`.
    pub fn linked(pins: Vec<Pin>, boards: &MockBoardRepo) -> Self {
        Self {
            pins: Arc::new(Mutex::new(pins)),
            board_pins: boards.board_pins_handle(),
        }
    }

    pub fn pins_handle(&self) -> Arc<Mutex<Vec<Pin>>> {
        Arc::clone(&self.pins)
    }
}

impl PinRepository for MockPinRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<Pin>, PinboardError> {
        Ok(self.pins.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_many(&self, ids: &[i32]) -> Result<Vec<Pin>, PinboardError> {
        let mut found: Vec<Pin> = self
            .pins
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect();
        found.sort_by_key(|p| p.id);
        Ok(found)
    }

    async fn list(&self, page: u64, per_page: u64) -> Result<(Vec<Pin>, u64), PinboardError> {
        let mut pins = self.pins.lock().unwrap().clone();
        pins.sort_by(|a, b| b.date_created.cmp(&a.date_created).then(b.id.cmp(&a.id)));
        let count = pins.len() as u64;
        let items = pins
            .into_iter()
            .skip((page * per_page) as usize)
            .take(per_page as usize)
            .collect();
        Ok((items, count))
    }

    async fn list_by_owner(&self, user_id: i32) -> Result<Vec<Pin>, PinboardError> {
        Ok(self
            .pins
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_board(&self, board_id: i32) -> Result<Vec<Pin>, PinboardError> {
        let ids: Vec<i32> = self
            .board_pins
            .lock()
            .unwrap()
            .iter()
            .filter(|(b, _)| *b == board_id)
            .map(|(_, p)| *p)
            .collect();
        self.find_many(&ids).await
    }

    async fn create(&self, new: &NewPin) -> Result<Pin, PinboardError> {
        let mut pins = self.pins.lock().unwrap();
        let pin = Pin {
            description: new.description.clone(),
            file: new.file.clone(),
            ..test_pin(next_id(&pins, |p| p.id), new.user_id, &new.title)
        };
        pins.push(pin.clone());
        Ok(pin)
    }

    async fn update(&self, id: i32, changes: &PinChanges) -> Result<Pin, PinboardError> {
        let mut pins = self.pins.lock().unwrap();
        let pin = pins
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PinboardError::PinNotFound(id))?;
        if let Some(v) = &changes.title {
            pin.title = v.clone();
        }
        if let Some(v) = &changes.description {
            pin.description = v.clone();
        }
        if let Some(v) = &changes.file {
            pin.file = v.clone();
        }
        Ok(pin.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), PinboardError> {
        self.pins.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }
}

// ── MockCommentRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockCommentRepo {
    pub comments: Arc<Mutex<Vec<Comment>>>,
}

impl MockCommentRepo {
    pub fn new(comments: Vec<Comment>) -> Self {
        Self {
            comments: Arc::new(Mutex::new(comments)),
        }
    }

    pub fn comments_handle(&self) -> Arc<Mutex<Vec<Comment>>> {
        Arc::clone(&self.comments)
    }
}

impl CommentRepository for MockCommentRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, PinboardError> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list_by_pin(&self, pin_id: i32) -> Result<Vec<Comment>, PinboardError> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.pin_id == pin_id)
            .cloned()
            .collect())
    }

    async fn list_by_user(&self, user_id: i32) -> Result<Vec<Comment>, PinboardError> {
        let mut own: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        own.reverse();
        Ok(own)
    }

    async fn create(
        &self,
        user_id: i32,
        pin_id: i32,
        text: &str,
    ) -> Result<Comment, PinboardError> {
        let mut comments = self.comments.lock().unwrap();
        let comment = Comment {
            id: next_id(&comments, |c| c.id),
            user_id,
            author: owner_name(user_id),
            pin_id,
            text: text.to_owned(),
            date_created: Utc::now(),
        };
        comments.push(comment.clone());
        Ok(comment)
    }

    async fn update_text(&self, id: i32, text: &str) -> Result<Comment, PinboardError> {
        let mut comments = self.comments.lock().unwrap();
        let comment = comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(PinboardError::CommentNotFound(id))?;
        comment.text = text.to_owned();
        Ok(comment.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), PinboardError> {
        self.comments.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }
}

// ── MockApiTokenRepo ─────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockApiTokenRepo {
    pub tokens: Arc<Mutex<Vec<ApiToken>>>,
}

impl MockApiTokenRepo {
    pub fn new(tokens: Vec<ApiToken>) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(tokens)),
        }
    }

    pub fn tokens_handle(&self) -> Arc<Mutex<Vec<ApiToken>>> {
        Arc::clone(&self.tokens)
    }
}

impl ApiTokenRepository for MockApiTokenRepo {
    async fn find_by_key(&self, key: &str) -> Result<Option<ApiToken>, PinboardError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.key == key)
            .cloned())
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Option<ApiToken>, PinboardError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.user_id == user_id)
            .cloned())
    }

    async fn create(&self, token: &ApiToken) -> Result<(), PinboardError> {
        self.tokens.lock().unwrap().push(token.clone());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), PinboardError> {
        self.tokens.lock().unwrap().retain(|t| t.key != key);
        Ok(())
    }
}

// ── Mailers ──────────────────────────────────────────────────────────────────

/// Keeps every mail it is asked to send.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<Mail>>>,
}

impl RecordingMailer {
    pub fn sent_handle(&self) -> Arc<Mutex<Vec<Mail>>> {
        Arc::clone(&self.sent)
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, mail: &Mail) -> Result<(), PinboardError> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

/// Always fails, like an unreachable relay.
#[derive(Clone, Default)]
pub struct FailingMailer;

impl Mailer for FailingMailer {
    async fn send(&self, _mail: &Mail) -> Result<(), PinboardError> {
        Err(PinboardError::Internal(anyhow::anyhow!("relay unreachable")))
    }
}
