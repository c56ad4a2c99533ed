//! One-time-code password reset.
//!
//! request code → verify code (grant) → change password. A code is accepted
//! only while it is the user's latest and less than ten minutes old.

use chrono::Utc;
use rand::RngExt;

use crate::domain::repository::{Mailer, ResetRequestRepository, UserRepository};
use crate::domain::types::{Mail, OTP_RANGE, ResetRequest, User};
use crate::error::PinboardError;
use crate::security::password::hash_password;
use crate::security::uid::{decode_uid, encode_uid};
use crate::usecase::account::check_new_password;
use crate::usecase::deliver;

pub const RESET_CODE_SUBJECT: &str = "@noreply: Your one-time code to reset your password.";

pub fn generate_reset_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(OTP_RANGE).to_string()
}

fn reset_code_mail(user: &User, code: &str) -> Mail {
    Mail {
        to: user.email.clone(),
        subject: RESET_CODE_SUBJECT.to_owned(),
        body: format!(
            "Hi {},\n\nYour account one-time-password is {code}. This one-time code will expire in the next 10 minutes. Kindly supply it to move forward in the pipeline.\n\n\nCheers",
            user.username
        ),
    }
}

// ── Request code ─────────────────────────────────────────────────────────────

pub struct RequestResetCodeUseCase<U, R, M>
where
    U: UserRepository,
    R: ResetRequestRepository,
    M: Mailer,
{
    pub users: U,
    pub resets: R,
    pub mailer: M,
}

impl<U, R, M> RequestResetCodeUseCase<U, R, M>
where
    U: UserRepository,
    R: ResetRequestRepository,
    M: Mailer,
{
    /// The request row is stored even when mailing fails; it then holds no
    /// code and can never be verified.
    pub async fn execute(&self, email: &str) -> Result<ResetRequest, PinboardError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(PinboardError::UserNotFound)?;

        let code = generate_reset_code();
        let delivered = deliver(&self.mailer, reset_code_mail(&user, &code)).await;
        let stored = delivered.then_some(code.as_str());

        let request = self.resets.create(user.id, stored).await?;
        tracing::info!(user_id = user.id, delivered, "reset code requested");
        Ok(request)
    }
}

// ── Verify code ──────────────────────────────────────────────────────────────

/// Proof that a code was verified; becomes the change-password URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetGrant {
    pub uidb64: String,
    pub code: String,
}

impl ResetGrant {
    pub fn change_password_path(&self) -> String {
        format!("/accounts/change_pass/{}/{}", self.uidb64, self.code)
    }
}

pub struct VerifyResetCodeUseCase<U, R>
where
    U: UserRepository,
    R: ResetRequestRepository,
{
    pub users: U,
    pub resets: R,
}

impl<U, R> VerifyResetCodeUseCase<U, R>
where
    U: UserRepository,
    R: ResetRequestRepository,
{
    pub async fn execute(&self, email: &str, code: &str) -> Result<ResetGrant, PinboardError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(PinboardError::InvalidResetCode)?;
        let latest = self
            .resets
            .latest_for_user(user.id)
            .await?
            .ok_or(PinboardError::InvalidResetCode)?;
        if !latest.accepts(code, Utc::now()) {
            return Err(PinboardError::InvalidResetCode);
        }
        Ok(ResetGrant {
            uidb64: encode_uid(user.id),
            code: code.to_owned(),
        })
    }
}

// ── Check grant ──────────────────────────────────────────────────────────────

/// Re-validates a grant from the change-password URL.
pub struct CheckResetGrantUseCase<U, R>
where
    U: UserRepository,
    R: ResetRequestRepository,
{
    pub users: U,
    pub resets: R,
}

impl<U, R> CheckResetGrantUseCase<U, R>
where
    U: UserRepository,
    R: ResetRequestRepository,
{
    pub async fn execute(
        &self,
        uidb64: &str,
        code: &str,
    ) -> Result<(User, ResetRequest), PinboardError> {
        load_grant(&self.users, &self.resets, uidb64, code).await
    }
}

async fn load_grant<U, R>(
    users: &U,
    resets: &R,
    uidb64: &str,
    code: &str,
) -> Result<(User, ResetRequest), PinboardError>
where
    U: UserRepository,
    R: ResetRequestRepository,
{
    let id = decode_uid(uidb64).ok_or(PinboardError::InvalidResetCode)?;
    let user = users
        .find_by_id(id)
        .await?
        .ok_or(PinboardError::InvalidResetCode)?;
    let latest = resets
        .latest_for_user(user.id)
        .await?
        .ok_or(PinboardError::InvalidResetCode)?;
    if !latest.accepts(code, Utc::now()) {
        return Err(PinboardError::InvalidResetCode);
    }
    Ok((user, latest))
}

// ── Change password ──────────────────────────────────────────────────────────

pub struct ChangePasswordInput {
    pub uidb64: String,
    pub code: String,
    pub new_password1: String,
    pub new_password2: String,
}

/// Set the new password, mark the request used and stamp `last_login`
/// (the caller then starts a session).
pub struct ChangePasswordUseCase<U, R>
where
    U: UserRepository,
    R: ResetRequestRepository,
{
    pub users: U,
    pub resets: R,
}

impl<U, R> ChangePasswordUseCase<U, R>
where
    U: UserRepository,
    R: ResetRequestRepository,
{
    pub async fn execute(&self, input: ChangePasswordInput) -> Result<User, PinboardError> {
        let (mut user, request) =
            load_grant(&self.users, &self.resets, &input.uidb64, &input.code).await?;

        check_new_password(&input.new_password1, &input.new_password2)?;

        let hash = hash_password(&input.new_password1)?;
        self.users.set_password(user.id, &hash).await?;
        self.resets.mark_used(request.id).await?;

        let now = Utc::now();
        self.users.touch_last_login(user.id, now).await?;
        user.password_hash = hash;
        user.last_login = Some(now);
        tracing::info!(user_id = user.id, "password changed via reset code");
        Ok(user)
    }
}
