use std::collections::{BTreeMap, BTreeSet, HashMap};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, SqlErr, TransactionTrait,
};

use pinboard_schema::{
    api_tokens, board_pins, boards, comments, follows, forgot_passwords, pins, profiles, users,
};

use crate::domain::repository::{
    ApiTokenRepository, BoardRepository, CommentRepository, FollowRepository, PinRepository,
    ProfileRepository, ResetRequestRepository, UserRepository,
};
use crate::domain::types::{
    ApiToken, Board, BoardChanges, BoardMembership, Comment, DEFAULT_BOARD_COVER,
    DEFAULT_PROFILE_PHOTO, FollowCounts, NewBoard, NewPin, NewUser, Pin, PinChanges, Profile,
    ProfileChanges, ResetRequest, User,
};
use crate::error::PinboardError;

/// Constraint message of a unique violation, if that is what `err` is.
fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => Some(msg),
        _ => None,
    }
}

async fn usernames<C: ConnectionTrait>(
    db: &C,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, String>, DbErr> {
    let ids: BTreeSet<i32> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|u| (u.id, u.username)).collect())
}

async fn username_of<C: ConnectionTrait>(db: &C, id: i32) -> Result<String, DbErr> {
    Ok(usernames(db, [id]).await?.remove(&id).unwrap_or_default())
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, PinboardError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PinboardError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PinboardError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn create_with_profile(&self, user: &NewUser) -> Result<User, PinboardError> {
        let txn = self.db.begin().await.context("begin user transaction")?;

        let inserted = users::ActiveModel {
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password: Set(user.password_hash.clone()),
            is_active: Set(false),
            is_admin: Set(false),
            last_login: Set(None),
            date_joined: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await;
        let model = match inserted {
            Ok(model) => model,
            Err(e) => {
                return Err(match unique_violation(&e) {
                    Some(msg) if msg.contains("email") => PinboardError::EmailTaken,
                    Some(_) => PinboardError::UsernameTaken,
                    None => anyhow::Error::new(e).context("insert user").into(),
                });
            }
        };

        profiles::ActiveModel {
            user_id: Set(model.id),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            description: Set(String::new()),
            profile_status: Set(String::new()),
            photo: Set(DEFAULT_PROFILE_PHOTO.to_owned()),
            sex: Set(pinboard_domain::sex::Sex::default().code().to_owned()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("insert profile")?;

        txn.commit().await.context("commit user transaction")?;
        Ok(user_from_model(model))
    }

    async fn activate(&self, id: i32) -> Result<(), PinboardError> {
        users::ActiveModel {
            id: Set(id),
            is_active: Set(true),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("activate user")?;
        Ok(())
    }

    async fn set_password(&self, id: i32, password_hash: &str) -> Result<(), PinboardError> {
        users::ActiveModel {
            id: Set(id),
            password: Set(password_hash.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set user password")?;
        Ok(())
    }

    async fn touch_last_login(&self, id: i32, at: DateTime<Utc>) -> Result<(), PinboardError> {
        users::ActiveModel {
            id: Set(id),
            last_login: Set(Some(at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("touch last login")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password,
        is_active: model.is_active,
        is_admin: model.is_admin,
        last_login: model.last_login,
        date_joined: model.date_joined,
    }
}

// ── Profile repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileRepository {
    pub db: DatabaseConnection,
}

impl DbProfileRepository {
    async fn with_username(&self, model: profiles::Model) -> Result<Profile, DbErr> {
        let username = username_of(&self.db, model.user_id).await?;
        Ok(profile_from_model(model, username))
    }
}

impl ProfileRepository for DbProfileRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Profile>, PinboardError> {
        let model = profiles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find profile by id")?;
        match model {
            Some(m) => Ok(Some(self.with_username(m).await.context("profile owner")?)),
            None => Ok(None),
        }
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Option<Profile>, PinboardError> {
        let model = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find profile by user")?;
        match model {
            Some(m) => Ok(Some(self.with_username(m).await.context("profile owner")?)),
            None => Ok(None),
        }
    }

    async fn list(&self, page: u64, per_page: u64) -> Result<(Vec<Profile>, u64), PinboardError> {
        let paginator = profiles::Entity::find()
            .order_by_asc(profiles::Column::Id)
            .paginate(&self.db, per_page);
        let count = paginator.num_items().await.context("count profiles")?;
        let models = paginator.fetch_page(page).await.context("list profiles")?;
        let names = usernames(&self.db, models.iter().map(|m| m.user_id))
            .await
            .context("profile owners")?;
        let items = models
            .into_iter()
            .map(|m| {
                let name = names.get(&m.user_id).cloned().unwrap_or_default();
                profile_from_model(m, name)
            })
            .collect();
        Ok((items, count))
    }

    async fn update(&self, id: i32, changes: &ProfileChanges) -> Result<Profile, PinboardError> {
        let mut active = profiles::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(v) = &changes.first_name {
            active.first_name = Set(v.clone());
        }
        if let Some(v) = &changes.last_name {
            active.last_name = Set(v.clone());
        }
        if let Some(v) = &changes.description {
            active.description = Set(v.clone());
        }
        if let Some(v) = &changes.profile_status {
            active.profile_status = Set(v.clone());
        }
        if let Some(v) = changes.sex {
            active.sex = Set(v.code().to_owned());
        }
        if let Some(v) = &changes.photo {
            active.photo = Set(v.clone());
        }
        let model = if active.is_changed() {
            active.update(&self.db).await.context("update profile")?
        } else {
            profiles::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .context("reload profile")?
                .ok_or(PinboardError::ProfileNotFound)?
        };
        Ok(self.with_username(model).await.context("profile owner")?)
    }
}

fn profile_from_model(model: profiles::Model, username: String) -> Profile {
    Profile {
        id: model.id,
        user_id: model.user_id,
        username,
        first_name: model.first_name,
        last_name: model.last_name,
        description: model.description,
        profile_status: model.profile_status,
        photo: model.photo,
        sex: model.sex.parse().unwrap_or_default(),
    }
}

// ── Follow repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFollowRepository {
    pub db: DatabaseConnection,
}

impl FollowRepository for DbFollowRepository {
    async fn exists(&self, follower: i32, following: i32) -> Result<bool, PinboardError> {
        let count = follows::Entity::find()
            .filter(follows::Column::FollowerId.eq(follower))
            .filter(follows::Column::FollowingId.eq(following))
            .count(&self.db)
            .await
            .context("check follow")?;
        Ok(count > 0)
    }

    async fn create(&self, follower: i32, following: i32) -> Result<(), PinboardError> {
        follows::ActiveModel {
            follower_id: Set(follower),
            following_id: Set(following),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("insert follow")?;
        Ok(())
    }

    async fn delete(&self, follower: i32, following: i32) -> Result<u64, PinboardError> {
        let res = follows::Entity::delete_many()
            .filter(follows::Column::FollowerId.eq(follower))
            .filter(follows::Column::FollowingId.eq(following))
            .exec(&self.db)
            .await
            .context("delete follow")?;
        Ok(res.rows_affected)
    }

    async fn counts(&self, user_id: i32) -> Result<FollowCounts, PinboardError> {
        let followers = follows::Entity::find()
            .filter(follows::Column::FollowingId.eq(user_id))
            .count(&self.db)
            .await
            .context("count followers")?;
        let following = follows::Entity::find()
            .filter(follows::Column::FollowerId.eq(user_id))
            .count(&self.db)
            .await
            .context("count following")?;
        Ok(FollowCounts {
            followers,
            following,
        })
    }
}

// ── Reset request repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbResetRequestRepository {
    pub db: DatabaseConnection,
}

impl ResetRequestRepository for DbResetRequestRepository {
    async fn create(
        &self,
        user_id: i32,
        code: Option<&str>,
    ) -> Result<ResetRequest, PinboardError> {
        let now = Utc::now();
        let model = forgot_passwords::ActiveModel {
            user_id: Set(user_id),
            forget_password_otp: Set(code.map(str::to_owned)),
            is_user_password_updated: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("insert reset request")?;
        Ok(reset_request_from_model(model))
    }

    async fn latest_for_user(&self, user_id: i32) -> Result<Option<ResetRequest>, PinboardError> {
        let model = forgot_passwords::Entity::find()
            .filter(forgot_passwords::Column::UserId.eq(user_id))
            .order_by_desc(forgot_passwords::Column::CreatedAt)
            .order_by_desc(forgot_passwords::Column::Id)
            .one(&self.db)
            .await
            .context("find latest reset request")?;
        Ok(model.map(reset_request_from_model))
    }

    async fn mark_used(&self, id: i32) -> Result<(), PinboardError> {
        forgot_passwords::ActiveModel {
            id: Set(id),
            is_user_password_updated: Set(true),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark reset request used")?;
        Ok(())
    }
}

fn reset_request_from_model(model: forgot_passwords::Model) -> ResetRequest {
    ResetRequest {
        id: model.id,
        user_id: model.user_id,
        code: model.forget_password_otp,
        is_used: model.is_user_password_updated,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Board repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBoardRepository {
    pub db: DatabaseConnection,
}

impl DbBoardRepository {
    async fn attach_owners(&self, models: Vec<boards::Model>) -> Result<Vec<Board>, DbErr> {
        let names = usernames(&self.db, models.iter().map(|m| m.user_id)).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let owner = names.get(&m.user_id).cloned().unwrap_or_default();
                board_from_model(m, owner)
            })
            .collect())
    }

    async fn one(&self, model: Option<boards::Model>) -> Result<Option<Board>, DbErr> {
        match model {
            Some(m) => Ok(self.attach_owners(vec![m]).await?.pop()),
            None => Ok(None),
        }
    }
}

impl BoardRepository for DbBoardRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Board>, PinboardError> {
        let model = boards::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find board by id")?;
        Ok(self.one(model).await.context("board owner")?)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Board>, PinboardError> {
        let model = boards::Entity::find()
            .filter(boards::Column::Title.eq(title))
            .one(&self.db)
            .await
            .context("find board by title")?;
        Ok(self.one(model).await.context("board owner")?)
    }

    async fn list_visible(
        &self,
        viewer: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Board>, u64), PinboardError> {
        let mut visible = Condition::any().add(boards::Column::IsPrivate.eq(false));
        if let Some(viewer) = viewer {
            visible = visible.add(boards::Column::UserId.eq(viewer));
        }
        let paginator = boards::Entity::find()
            .filter(visible)
            .order_by_desc(boards::Column::Id)
            .paginate(&self.db, per_page);
        let count = paginator.num_items().await.context("count boards")?;
        let models = paginator.fetch_page(page).await.context("list boards")?;
        let items = self.attach_owners(models).await.context("board owners")?;
        Ok((items, count))
    }

    async fn list_by_owner(
        &self,
        user_id: i32,
        include_private: bool,
    ) -> Result<Vec<Board>, PinboardError> {
        let mut query = boards::Entity::find().filter(boards::Column::UserId.eq(user_id));
        if !include_private {
            query = query.filter(boards::Column::IsPrivate.eq(false));
        }
        let models = query
            .order_by_desc(boards::Column::Id)
            .all(&self.db)
            .await
            .context("list boards by owner")?;
        Ok(self.attach_owners(models).await.context("board owners")?)
    }

    async fn create(&self, board: &NewBoard) -> Result<Board, PinboardError> {
        let inserted = boards::ActiveModel {
            user_id: Set(board.user_id),
            title: Set(board.title.clone()),
            cover: Set(DEFAULT_BOARD_COVER.to_owned()),
            is_private: Set(board.is_private),
            description: Set(board.description.clone()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        let model = match inserted {
            Ok(m) => m,
            Err(e) if unique_violation(&e).is_some() => return Err(PinboardError::BoardTitleTaken),
            Err(e) => return Err(anyhow::Error::new(e).context("insert board").into()),
        };
        let owner = username_of(&self.db, model.user_id)
            .await
            .context("board owner")?;
        Ok(board_from_model(model, owner))
    }

    async fn update(&self, id: i32, changes: &BoardChanges) -> Result<Board, PinboardError> {
        let mut active = boards::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(v) = &changes.title {
            active.title = Set(v.clone());
        }
        if let Some(v) = &changes.description {
            active.description = Set(v.clone());
        }
        if let Some(v) = changes.is_private {
            active.is_private = Set(v);
        }
        if let Some(v) = &changes.cover {
            active.cover = Set(v.clone());
        }
        let model = if active.is_changed() {
            match active.update(&self.db).await {
                Ok(m) => m,
                Err(e) if unique_violation(&e).is_some() => {
                    return Err(PinboardError::BoardTitleTaken);
                }
                Err(e) => return Err(anyhow::Error::new(e).context("update board").into()),
            }
        } else {
            boards::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .context("reload board")?
                .ok_or(PinboardError::BoardNotFound)?
        };
        let owner = username_of(&self.db, model.user_id)
            .await
            .context("board owner")?;
        Ok(board_from_model(model, owner))
    }

    async fn delete(&self, id: i32) -> Result<(), PinboardError> {
        boards::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete board")?;
        Ok(())
    }

    async fn contains_pin(&self, board_id: i32, pin_id: i32) -> Result<bool, PinboardError> {
        let found = board_pins::Entity::find_by_id((board_id, pin_id))
            .one(&self.db)
            .await
            .context("check board pin")?;
        Ok(found.is_some())
    }

    async fn add_pin(&self, board_id: i32, pin_id: i32) -> Result<(), PinboardError> {
        board_pins::Entity::insert(board_pins::ActiveModel {
            board_id: Set(board_id),
            pin_id: Set(pin_id),
        })
        .on_conflict(
            OnConflict::columns([board_pins::Column::BoardId, board_pins::Column::PinId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert board pin")?;
        Ok(())
    }

    async fn remove_pin(&self, board_id: i32, pin_id: i32) -> Result<(), PinboardError> {
        board_pins::Entity::delete_many()
            .filter(board_pins::Column::BoardId.eq(board_id))
            .filter(board_pins::Column::PinId.eq(pin_id))
            .exec(&self.db)
            .await
            .context("delete board pin")?;
        Ok(())
    }

    async fn memberships(&self) -> Result<Vec<BoardMembership>, PinboardError> {
        let rows = board_pins::Entity::find()
            .all(&self.db)
            .await
            .context("list board pins")?;
        let mut grouped: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
        for row in rows {
            grouped.entry(row.board_id).or_default().push(row.pin_id);
        }
        Ok(grouped
            .into_iter()
            .map(|(board_id, pin_ids)| BoardMembership { board_id, pin_ids })
            .collect())
    }
}

fn board_from_model(model: boards::Model, owner: String) -> Board {
    Board {
        id: model.id,
        user_id: model.user_id,
        owner,
        title: model.title,
        cover: model.cover,
        is_private: model.is_private,
        description: model.description,
    }
}

// ── Pin repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPinRepository {
    pub db: DatabaseConnection,
}

impl DbPinRepository {
    async fn attach_owners(&self, models: Vec<pins::Model>) -> Result<Vec<Pin>, DbErr> {
        let names = usernames(&self.db, models.iter().map(|m| m.user_id)).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let owner = names.get(&m.user_id).cloned().unwrap_or_default();
                pin_from_model(m, owner)
            })
            .collect())
    }
}

impl PinRepository for DbPinRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Pin>, PinboardError> {
        let model = pins::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find pin by id")?;
        match model {
            Some(m) => Ok(self.attach_owners(vec![m]).await.context("pin owner")?.pop()),
            None => Ok(None),
        }
    }

    async fn find_many(&self, ids: &[i32]) -> Result<Vec<Pin>, PinboardError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = pins::Entity::find()
            .filter(pins::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(pins::Column::Id)
            .all(&self.db)
            .await
            .context("find pins by ids")?;
        Ok(self.attach_owners(models).await.context("pin owners")?)
    }

    async fn list(&self, page: u64, per_page: u64) -> Result<(Vec<Pin>, u64), PinboardError> {
        let paginator = pins::Entity::find()
            .order_by_desc(pins::Column::DateCreated)
            .order_by_desc(pins::Column::Id)
            .paginate(&self.db, per_page);
        let count = paginator.num_items().await.context("count pins")?;
        let models = paginator.fetch_page(page).await.context("list pins")?;
        let items = self.attach_owners(models).await.context("pin owners")?;
        Ok((items, count))
    }

    async fn list_by_owner(&self, user_id: i32) -> Result<Vec<Pin>, PinboardError> {
        let models = pins::Entity::find()
            .filter(pins::Column::UserId.eq(user_id))
            .order_by_desc(pins::Column::DateCreated)
            .all(&self.db)
            .await
            .context("list pins by owner")?;
        Ok(self.attach_owners(models).await.context("pin owners")?)
    }

    async fn list_by_board(&self, board_id: i32) -> Result<Vec<Pin>, PinboardError> {
        let pin_ids: Vec<i32> = board_pins::Entity::find()
            .filter(board_pins::Column::BoardId.eq(board_id))
            .all(&self.db)
            .await
            .context("list board pins")?
            .into_iter()
            .map(|row| row.pin_id)
            .collect();
        if pin_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = pins::Entity::find()
            .filter(pins::Column::Id.is_in(pin_ids))
            .order_by_desc(pins::Column::DateCreated)
            .all(&self.db)
            .await
            .context("list pins by board")?;
        Ok(self.attach_owners(models).await.context("pin owners")?)
    }

    async fn create(&self, pin: &NewPin) -> Result<Pin, PinboardError> {
        let model = pins::ActiveModel {
            user_id: Set(pin.user_id),
            title: Set(pin.title.clone()),
            description: Set(pin.description.clone()),
            file: Set(pin.file.clone()),
            date_created: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("insert pin")?;
        let owner = username_of(&self.db, model.user_id)
            .await
            .context("pin owner")?;
        Ok(pin_from_model(model, owner))
    }

    async fn update(&self, id: i32, changes: &PinChanges) -> Result<Pin, PinboardError> {
        let model = pins::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("load pin")?
            .ok_or(PinboardError::PinNotFound(id))?;
        let mut active = model.into_active_model();
        if let Some(v) = &changes.title {
            active.title = Set(v.clone());
        }
        if let Some(v) = &changes.description {
            active.description = Set(v.clone());
        }
        if let Some(v) = &changes.file {
            active.file = Set(v.clone());
        }
        let model = active.update(&self.db).await.context("update pin")?;
        let owner = username_of(&self.db, model.user_id)
            .await
            .context("pin owner")?;
        Ok(pin_from_model(model, owner))
    }

    async fn delete(&self, id: i32) -> Result<(), PinboardError> {
        pins::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete pin")?;
        Ok(())
    }
}

fn pin_from_model(model: pins::Model, owner: String) -> Pin {
    Pin {
        id: model.id,
        user_id: model.user_id,
        owner,
        title: model.title,
        description: model.description,
        file: model.file,
        date_created: model.date_created,
    }
}

// ── Comment repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCommentRepository {
    pub db: DatabaseConnection,
}

impl DbCommentRepository {
    async fn attach_authors(&self, models: Vec<comments::Model>) -> Result<Vec<Comment>, DbErr> {
        let names = usernames(&self.db, models.iter().map(|m| m.user_id)).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let author = names.get(&m.user_id).cloned().unwrap_or_default();
                comment_from_model(m, author)
            })
            .collect())
    }
}

impl CommentRepository for DbCommentRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, PinboardError> {
        let model = comments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find comment by id")?;
        match model {
            Some(m) => Ok(self
                .attach_authors(vec![m])
                .await
                .context("comment author")?
                .pop()),
            None => Ok(None),
        }
    }

    async fn list_by_pin(&self, pin_id: i32) -> Result<Vec<Comment>, PinboardError> {
        let models = comments::Entity::find()
            .filter(comments::Column::PinId.eq(pin_id))
            .order_by_asc(comments::Column::DateCreated)
            .order_by_asc(comments::Column::Id)
            .all(&self.db)
            .await
            .context("list comments by pin")?;
        Ok(self.attach_authors(models).await.context("comment authors")?)
    }

    async fn list_by_user(&self, user_id: i32) -> Result<Vec<Comment>, PinboardError> {
        let models = comments::Entity::find()
            .filter(comments::Column::UserId.eq(user_id))
            .order_by_desc(comments::Column::DateCreated)
            .all(&self.db)
            .await
            .context("list comments by user")?;
        Ok(self.attach_authors(models).await.context("comment authors")?)
    }

    async fn create(
        &self,
        user_id: i32,
        pin_id: i32,
        text: &str,
    ) -> Result<Comment, PinboardError> {
        let model = comments::ActiveModel {
            user_id: Set(user_id),
            pin_id: Set(pin_id),
            text: Set(text.to_owned()),
            date_created: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("insert comment")?;
        let author = username_of(&self.db, user_id)
            .await
            .context("comment author")?;
        Ok(comment_from_model(model, author))
    }

    async fn update_text(&self, id: i32, text: &str) -> Result<Comment, PinboardError> {
        let model = comments::ActiveModel {
            id: Set(id),
            text: Set(text.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update comment")?;
        let author = username_of(&self.db, model.user_id)
            .await
            .context("comment author")?;
        Ok(comment_from_model(model, author))
    }

    async fn delete(&self, id: i32) -> Result<(), PinboardError> {
        comments::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete comment")?;
        Ok(())
    }
}

fn comment_from_model(model: comments::Model, author: String) -> Comment {
    Comment {
        id: model.id,
        user_id: model.user_id,
        author,
        pin_id: model.pin_id,
        text: model.text,
        date_created: model.date_created,
    }
}

// ── API token repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbApiTokenRepository {
    pub db: DatabaseConnection,
}

impl ApiTokenRepository for DbApiTokenRepository {
    async fn find_by_key(&self, key: &str) -> Result<Option<ApiToken>, PinboardError> {
        let model = api_tokens::Entity::find_by_id(key.to_owned())
            .one(&self.db)
            .await
            .context("find api token by key")?;
        Ok(model.map(api_token_from_model))
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Option<ApiToken>, PinboardError> {
        let model = api_tokens::Entity::find()
            .filter(api_tokens::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find api token by user")?;
        Ok(model.map(api_token_from_model))
    }

    async fn create(&self, token: &ApiToken) -> Result<(), PinboardError> {
        api_tokens::ActiveModel {
            key: Set(token.key.clone()),
            user_id: Set(token.user_id),
            created: Set(token.created),
        }
        .insert(&self.db)
        .await
        .context("insert api token")?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), PinboardError> {
        api_tokens::Entity::delete_by_id(key.to_owned())
            .exec(&self.db)
            .await
            .context("delete api token")?;
        Ok(())
    }
}

fn api_token_from_model(model: api_tokens::Model) -> ApiToken {
    ApiToken {
        key: model.key,
        user_id: model.user_id,
        created: model.created,
    }
}
