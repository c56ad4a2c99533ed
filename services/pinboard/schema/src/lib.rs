//! sea-orm entities for the pinboard database.

pub mod api_tokens;
pub mod board_pins;
pub mod boards;
pub mod comments;
pub mod follows;
pub mod forgot_passwords;
pub mod pins;
pub mod profiles;
pub mod users;
