use std::path::PathBuf;

use pinboard_domain::pagination::clamp_per_page;

/// Pinboard configuration loaded from environment variables (after `.env`).
#[derive(Debug, Clone)]
pub struct PinboardConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 8000). Env var: `PINBOARD_PORT`.
    pub port: u16,
    /// Signing key for activation tokens.
    pub secret_key: String,
    /// Scheme + host used in emailed links (default `http://localhost:8000`).
    pub default_domain: String,
    /// Sender address for outgoing mail.
    pub email_host_user: String,
    /// HTTP mail relay endpoint. Unset means mail is only logged.
    pub mail_api_url: Option<String>,
    /// REST token lifetime (default one day).
    pub token_expired_after_secs: i64,
    /// Activation link lifetime (default three days).
    pub activation_token_ttl_secs: i64,
    /// Directory holding uploaded media (default `media`).
    pub media_root: PathBuf,
    /// Page size for paginated REST lists (default 10, at most 100).
    pub page_size: u32,
    /// Mark the session cookie `Secure` (default false).
    pub secure_cookies: bool,
}

impl PinboardConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            port: env_parse("PINBOARD_PORT").unwrap_or(8000),
            secret_key: std::env::var("SECRET_KEY").expect("SECRET_KEY"),
            default_domain: std::env::var("DEFAULT_DOMAIN")
                .map(|d| d.trim_end_matches('/').to_owned())
                .unwrap_or_else(|_| "http://localhost:8000".to_owned()),
            email_host_user: std::env::var("EMAIL_HOST_USER")
                .unwrap_or_else(|_| "noreply@localhost".to_owned()),
            mail_api_url: std::env::var("MAIL_API_URL").ok().filter(|v| !v.is_empty()),
            token_expired_after_secs: env_parse("TOKEN_EXPIRED_AFTER_SECONDS").unwrap_or(86_400),
            activation_token_ttl_secs: env_parse("ACTIVATION_TOKEN_TTL_SECS").unwrap_or(259_200),
            media_root: std::env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("media")),
            page_size: clamp_per_page(env_parse("PAGE_SIZE").unwrap_or(10)),
            secure_cookies: std::env::var("SECURE_COOKIES")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
