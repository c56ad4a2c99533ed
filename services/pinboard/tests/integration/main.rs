mod helpers;

mod account_test;
mod board_test;
mod comment_test;
mod password_reset_test;
mod pin_test;
mod profile_test;
mod router_test;
