//! Account activation tokens.
//!
//! HS256 JWTs carrying the user id, an expiry and a fingerprint of the
//! account state. Activating the account (or changing its password, email or
//! last login) changes the fingerprint, so a link works at most once.

use anyhow::Context as _;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::types::User;
use crate::error::PinboardError;

#[derive(Debug, Serialize, Deserialize)]
struct ActivationClaims {
    sub: String,
    exp: u64,
    /// Account state fingerprint.
    fp: String,
}

#[derive(Clone)]
pub struct ActivationTokens {
    secret: String,
    ttl_secs: i64,
}

impl ActivationTokens {
    pub fn new(secret: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, PinboardError> {
        let exp = (Utc::now().timestamp() + self.ttl_secs).max(0) as u64;
        let claims = ActivationClaims {
            sub: user.id.to_string(),
            exp,
            fp: fingerprint(user),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("encode activation token")?;
        Ok(token)
    }

    /// True when `token` was issued for `user` in its current state and has not expired.
    pub fn check(&self, user: &User, token: &str) -> bool {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;

        let Ok(data) = decode::<ActivationClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        ) else {
            return false;
        };
        data.claims.sub == user.id.to_string() && data.claims.fp == fingerprint(user)
    }
}

fn fingerprint(user: &User) -> String {
    let last_login = user
        .last_login
        .map(|t| t.timestamp_micros().to_string())
        .unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(user.id.to_string());
    hasher.update([0]);
    hasher.update(&user.password_hash);
    hasher.update([0]);
    hasher.update(last_login);
    hasher.update([0]);
    hasher.update([u8::from(user.is_active)]);
    hasher.update(&user.email);
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}
