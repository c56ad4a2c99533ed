//! Credential helpers: password hashing, activation tokens, uid encoding and
//! API key generation.

pub mod activation;
pub mod api_key;
pub mod password;
pub mod uid;
