use crate::domain::repository::{FollowRepository, ProfileRepository, UserRepository};
use crate::domain::types::{
    FollowCounts, NAME_MAX_LEN, PROFILE_STATUS_MAX_LEN, Profile, ProfileChanges, User,
};
use crate::error::PinboardError;
use crate::usecase::check_max_len;

/// Everything shown on a profile page.
#[derive(Debug, Clone)]
pub struct ProfilePage {
    pub user: User,
    pub profile: Profile,
    pub counts: FollowCounts,
    /// Whether the viewer already follows this user.
    pub followed_by_viewer: bool,
}

pub struct ProfilePageUseCase<U, P, F>
where
    U: UserRepository,
    P: ProfileRepository,
    F: FollowRepository,
{
    pub users: U,
    pub profiles: P,
    pub follows: F,
}

impl<U, P, F> ProfilePageUseCase<U, P, F>
where
    U: UserRepository,
    P: ProfileRepository,
    F: FollowRepository,
{
    pub async fn execute(
        &self,
        username: &str,
        viewer: Option<i32>,
    ) -> Result<ProfilePage, PinboardError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(PinboardError::UserNotFound)?;
        let profile = self
            .profiles
            .find_by_user(user.id)
            .await?
            .ok_or(PinboardError::ProfileNotFound)?;
        let counts = self.follows.counts(user.id).await?;
        let followed_by_viewer = match viewer {
            Some(v) if v != user.id => self.follows.exists(v, user.id).await?,
            _ => false,
        };
        Ok(ProfilePage {
            user,
            profile,
            counts,
            followed_by_viewer,
        })
    }
}

pub struct GetProfileUseCase<P: ProfileRepository> {
    pub profiles: P,
}

impl<P: ProfileRepository> GetProfileUseCase<P> {
    pub async fn execute(&self, id: i32) -> Result<Profile, PinboardError> {
        self.profiles
            .find_by_id(id)
            .await?
            .ok_or(PinboardError::ProfileNotFound)
    }

    pub async fn for_user(&self, user_id: i32) -> Result<Profile, PinboardError> {
        self.profiles
            .find_by_user(user_id)
            .await?
            .ok_or(PinboardError::ProfileNotFound)
    }
}

pub struct ListProfilesUseCase<P: ProfileRepository> {
    pub profiles: P,
}

impl<P: ProfileRepository> ListProfilesUseCase<P> {
    pub async fn execute(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Profile>, u64), PinboardError> {
        self.profiles.list(page, per_page).await
    }
}

/// Owner-only partial update.
pub struct UpdateProfileUseCase<P: ProfileRepository> {
    pub profiles: P,
}

impl<P: ProfileRepository> UpdateProfileUseCase<P> {
    pub async fn execute(
        &self,
        actor_id: i32,
        profile_id: i32,
        changes: ProfileChanges,
    ) -> Result<Profile, PinboardError> {
        let profile = self
            .profiles
            .find_by_id(profile_id)
            .await?
            .ok_or(PinboardError::ProfileNotFound)?;
        if profile.user_id != actor_id {
            return Err(PinboardError::Forbidden("You are not allowed to do this!"));
        }

        if let Some(v) = &changes.first_name {
            check_max_len("first name", v, NAME_MAX_LEN)?;
        }
        if let Some(v) = &changes.last_name {
            check_max_len("last name", v, NAME_MAX_LEN)?;
        }
        if let Some(v) = &changes.profile_status {
            check_max_len("profile status", v, PROFILE_STATUS_MAX_LEN)?;
        }

        let updated = self.profiles.update(profile.id, &changes).await?;
        tracing::info!(user_id = actor_id, profile_id, "profile updated");
        Ok(updated)
    }
}
