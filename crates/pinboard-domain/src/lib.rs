//! Domain types shared by the pinboard crates.
//!
//! Pure types only, no framework dependencies.

pub mod pagination;
pub mod sex;
