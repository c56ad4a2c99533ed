//! Request authentication.
//!
//! The REST API authenticates with `Authorization: Token <key>`; the web views
//! keep the user id in a `tower-sessions` session.

use anyhow::Context as _;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::PinboardError;
use crate::state::AppState;
use crate::usecase::api_token::AuthenticateTokenUseCase;

const TOKEN_PREFIX: &str = "Token ";
const USER_ID_KEY: &str = "user_id";
const FLASH_KEY: &str = "flash";

pub const LOGIN_PATH: &str = "/accounts/login/";

/// Key from an `Authorization: Token <key>` header. `None` when the header is
/// absent or uses another scheme.
pub fn token_key(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let key = value.strip_prefix(TOKEN_PREFIX)?.trim();
    (!key.is_empty()).then(|| key.to_owned())
}

fn authenticate(
    state: &AppState,
    key: String,
) -> impl Future<Output = Result<User, PinboardError>> + Send + 'static {
    let usecase = AuthenticateTokenUseCase {
        users: state.user_repo(),
        tokens: state.api_token_repo(),
        ttl_secs: state.config.token_expired_after_secs,
    };
    async move { usecase.execute(&key).await }
}

// ── REST ─────────────────────────────────────────────────────────────────────

/// Caller authenticated by API token. Missing header → 401.
#[derive(Debug, Clone)]
pub struct ApiUser(pub User);

impl FromRequestParts<AppState> for ApiUser {
    type Rejection = PinboardError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let auth = token_key(parts).map(|key| authenticate(state, key));
        async move {
            let auth = auth.ok_or(PinboardError::NotAuthenticated)?;
            Ok(Self(auth.await?))
        }
    }
}

/// Optional API token for read-only endpoints. A header that is present must
/// still be valid.
#[derive(Debug, Clone)]
pub struct MaybeApiUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeApiUser {
    type Rejection = PinboardError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let auth = token_key(parts).map(|key| authenticate(state, key));
        async move {
            match auth {
                Some(auth) => Ok(Self(Some(auth.await?))),
                None => Ok(Self(None)),
            }
        }
    }
}

// ── Web session ──────────────────────────────────────────────────────────────

/// Store the user in the session under a fresh session id.
pub async fn login_session(session: &Session, user: &User) -> Result<(), PinboardError> {
    session.cycle_id().await.context("cycle session id")?;
    session
        .insert(USER_ID_KEY, user.id)
        .await
        .context("store session user")?;
    Ok(())
}

pub async fn logout_session(session: &Session) -> Result<(), PinboardError> {
    session.flush().await.context("flush session")?;
    Ok(())
}

async fn session_user(state: &AppState, session: Option<Session>) -> Result<Option<User>, PinboardError> {
    let Some(session) = session else {
        return Ok(None);
    };
    let user_id: Option<i32> = session.get(USER_ID_KEY).await.context("read session user")?;
    let Some(user_id) = user_id else {
        return Ok(None);
    };
    let user = state.user_repo().find_by_id(user_id).await?;
    Ok(user.filter(|u| u.is_active))
}

#[derive(Serialize)]
struct NextQuery<'a> {
    next: &'a str,
}

/// `/accounts/login/?next=<path>`.
pub fn login_redirect(next: &str) -> Redirect {
    match serde_qs::to_string(&NextQuery { next }) {
        Ok(query) => Redirect::to(&format!("{LOGIN_PATH}?{query}")),
        Err(_) => Redirect::to(LOGIN_PATH),
    }
}

/// Logged-in web user. Anonymous requests are redirected to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let session = parts.extensions.get::<Session>().cloned();
        let next = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_owned())
            .unwrap_or_else(|| "/".to_owned());
        let state = state.clone();
        async move {
            match session_user(&state, session).await {
                Ok(Some(user)) => Ok(Self(user)),
                Ok(None) => Err(login_redirect(&next).into_response()),
                Err(e) => Err(crate::views::WebError::from(e).into_response()),
            }
        }
    }
}

/// Web user if logged in.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn id(&self) -> Option<i32> {
        self.0.as_ref().map(|u| u.id)
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Response;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let session = parts.extensions.get::<Session>().cloned();
        let state = state.clone();
        async move {
            session_user(&state, session)
                .await
                .map(Self)
                .map_err(|e| crate::views::WebError::from(e).into_response())
        }
    }
}

// ── Flash messages ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

impl FlashLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Error => "error",
        }
    }
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub text: String,
}

/// Queue a message. Session failures only lose the message.
pub async fn flash(session: &Session, level: FlashLevel, text: impl Into<String>) {
    let mut queued: Vec<Flash> = session.get(FLASH_KEY).await.ok().flatten().unwrap_or_default();
    queued.push(Flash {
        level,
        text: text.into(),
    });
    if let Err(e) = session.insert(FLASH_KEY, queued).await {
        tracing::warn!(error = %e, "flash message dropped");
    }
}

/// Drain queued messages.
pub async fn take_flashes(session: &Session) -> Vec<Flash> {
    session
        .remove::<Vec<Flash>>(FLASH_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}
