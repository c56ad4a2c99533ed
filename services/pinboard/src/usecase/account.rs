use chrono::Utc;
use validator::Validate;

use crate::domain::repository::{Mailer, UserRepository};
use crate::domain::types::{Mail, NewUser, PASSWORD_MIN_LEN, User, validate_username};
use crate::error::PinboardError;
use crate::security::activation::ActivationTokens;
use crate::security::password::{hash_password, verify_password};
use crate::security::uid::{decode_uid, encode_uid};
use crate::usecase::{deliver, validation_error};

pub const ACTIVATION_SUBJECT: &str = "Activate your account!";

// ── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Validate)]
pub struct RegisterInput {
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(
        min = 8,
        message = "This password is too short. It must contain at least 8 characters."
    ))]
    pub password1: String,
    pub password2: String,
}

impl RegisterInput {
    fn check(&self) -> Result<(), PinboardError> {
        if !validate_username(&self.username) {
            return Err(PinboardError::Validation(
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                    .to_owned(),
            ));
        }
        self.validate().map_err(validation_error)?;
        if self.password1 != self.password2 {
            return Err(PinboardError::Validation(
                "The two password fields didn't match.".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Create an inactive account plus profile and mail the activation link.
pub struct RegisterUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    pub users: U,
    pub mailer: M,
    pub tokens: ActivationTokens,
    /// Scheme + host prefixed to the activation path.
    pub domain: String,
}

impl<U, M> RegisterUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<User, PinboardError> {
        input.check()?;

        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(PinboardError::UsernameTaken);
        }
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(PinboardError::EmailTaken);
        }

        let user = self
            .users
            .create_with_profile(&NewUser {
                username: input.username,
                email: input.email,
                password_hash: hash_password(&input.password1)?,
            })
            .await?;
        tracing::info!(user_id = user.id, "user registered");

        let token = self.tokens.issue(&user)?;
        let mail = activation_mail(&user, &self.domain, &token);
        if !deliver(&self.mailer, mail).await {
            tracing::warn!(user_id = user.id, "activation mail not sent");
        }
        Ok(user)
    }
}

pub fn activation_link(domain: &str, user_id: i32, token: &str) -> String {
    format!(
        "{domain}/accounts/activate/{}/{token}/",
        encode_uid(user_id)
    )
}

fn activation_mail(user: &User, domain: &str, token: &str) -> Mail {
    Mail {
        to: user.email.clone(),
        subject: ACTIVATION_SUBJECT.to_owned(),
        body: format!(
            "Hi {},\n\nPlease click on the link below to confirm your registration:\n\n{}\n\nIf you did not sign up, you can ignore this email.\n",
            user.username,
            activation_link(domain, user.id, token)
        ),
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Check credentials and stamp `last_login`.
pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> LoginUseCase<U> {
    pub async fn execute(&self, input: LoginInput) -> Result<User, PinboardError> {
        let mut user = self
            .users
            .find_by_username(&input.username)
            .await?
            .filter(|u| verify_password(&input.password, &u.password_hash))
            .ok_or(PinboardError::InvalidCredentials)?;
        if !user.is_active {
            return Err(PinboardError::InactiveUser);
        }

        let now = Utc::now();
        self.users.touch_last_login(user.id, now).await?;
        user.last_login = Some(now);
        tracing::info!(user_id = user.id, "user logged in");
        Ok(user)
    }
}

// ── Activate ─────────────────────────────────────────────────────────────────

/// Flip the active flag when the emailed link is still valid.
pub struct ActivateAccountUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: ActivationTokens,
}

impl<U: UserRepository> ActivateAccountUseCase<U> {
    pub async fn execute(&self, uidb64: &str, token: &str) -> Result<User, PinboardError> {
        let id = decode_uid(uidb64).ok_or(PinboardError::InvalidActivationLink)?;
        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(PinboardError::InvalidActivationLink)?;
        if !self.tokens.check(&user, token) {
            return Err(PinboardError::InvalidActivationLink);
        }

        self.users.activate(user.id).await?;
        user.is_active = true;
        tracing::info!(user_id = user.id, "account activated");
        Ok(user)
    }
}

/// Password rule shared with the reset flow.
pub fn check_new_password(password1: &str, password2: &str) -> Result<(), PinboardError> {
    if password1 != password2 {
        return Err(PinboardError::Validation(
            "The two password fields didn't match.".to_owned(),
        ));
    }
    if password1.chars().count() < PASSWORD_MIN_LEN {
        return Err(PinboardError::Validation(format!(
            "This password is too short. It must contain at least {PASSWORD_MIN_LEN} characters."
        )));
    }
    Ok(())
}
