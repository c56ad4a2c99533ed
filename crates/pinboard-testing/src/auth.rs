//! REST authentication headers for tests.

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// `Authorization: Token <key>` for a test request.
pub struct TokenAuth {
    pub key: String,
}

impl TokenAuth {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn header_name(&self) -> HeaderName {
        AUTHORIZATION
    }

    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Token {}", self.key)).unwrap()
    }

    /// Headers as a client would send them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(self.header_name(), self.header_value());
        map
    }
}
