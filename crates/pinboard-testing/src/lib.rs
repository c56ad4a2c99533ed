//! Test utilities for the pinboard service.
//!
//! Import in `#[cfg(test)]` blocks and integration tests only.

pub mod auth;
pub mod body;
