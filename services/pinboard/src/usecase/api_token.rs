//! Expiring REST tokens.
//!
//! A token older than the configured lifetime is replaced by a fresh one.
//! Sign-in hands out the fresh token; authenticating with the stale one fails.

use chrono::Utc;

use crate::domain::repository::{ApiTokenRepository, UserRepository};
use crate::domain::types::{ApiToken, User};
use crate::error::PinboardError;
use crate::security::api_key::generate_api_key;
use crate::security::password::verify_password;

async fn issue<T: ApiTokenRepository>(tokens: &T, user_id: i32) -> Result<ApiToken, PinboardError> {
    let token = ApiToken {
        key: generate_api_key(),
        user_id,
        created: Utc::now(),
    };
    tokens.create(&token).await?;
    Ok(token)
}

async fn rotate<T: ApiTokenRepository>(
    tokens: &T,
    stale: &ApiToken,
) -> Result<ApiToken, PinboardError> {
    tokens.delete(&stale.key).await?;
    let fresh = issue(tokens, stale.user_id).await?;
    tracing::info!(user_id = stale.user_id, "api token rotated");
    Ok(fresh)
}

#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub token: ApiToken,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

pub struct SignInUseCase<U, T>
where
    U: UserRepository,
    T: ApiTokenRepository,
{
    pub users: U,
    pub tokens: T,
    pub ttl_secs: i64,
}

impl<U, T> SignInUseCase<U, T>
where
    U: UserRepository,
    T: ApiTokenRepository,
{
    pub async fn execute(&self, username: &str, password: &str) -> Result<SignedIn, PinboardError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .filter(|u| verify_password(password, &u.password_hash))
            .ok_or(PinboardError::InvalidCredentials)?;
        if !user.is_active {
            return Err(PinboardError::InactiveUser);
        }

        let now = Utc::now();
        let token = match self.tokens.find_by_user(user.id).await? {
            Some(t) if t.is_expired(self.ttl_secs, now) => rotate(&self.tokens, &t).await?,
            Some(t) => t,
            None => issue(&self.tokens, user.id).await?,
        };
        let expires_in = token.expires_in(self.ttl_secs, Utc::now());
        Ok(SignedIn {
            user,
            token,
            expires_in,
        })
    }
}

/// Resolve `Authorization: Token <key>` to a user.
pub struct AuthenticateTokenUseCase<U, T>
where
    U: UserRepository,
    T: ApiTokenRepository,
{
    pub users: U,
    pub tokens: T,
    pub ttl_secs: i64,
}

impl<U, T> AuthenticateTokenUseCase<U, T>
where
    U: UserRepository,
    T: ApiTokenRepository,
{
    pub async fn execute(&self, key: &str) -> Result<User, PinboardError> {
        let token = self
            .tokens
            .find_by_key(key)
            .await?
            .ok_or(PinboardError::InvalidToken)?;
        let user = self
            .users
            .find_by_id(token.user_id)
            .await?
            .ok_or(PinboardError::InvalidToken)?;
        if !user.is_active {
            return Err(PinboardError::InactiveUser);
        }
        if token.is_expired(self.ttl_secs, Utc::now()) {
            rotate(&self.tokens, &token).await?;
            return Err(PinboardError::TokenExpired);
        }
        Ok(user)
    }
}
