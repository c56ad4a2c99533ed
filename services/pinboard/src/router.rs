use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use pinboard_core::health::{database_ready, healthz};
use pinboard_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    auth::signin,
    boards::{
        add_pin_to_board, create_board, delete_board, get_board, list_boards,
        remove_pin_from_board, update_board,
    },
    comments::{
        create_pin_comment, delete_my_comment, edit_my_comment, get_my_comment, list_my_comments,
        list_pin_comments,
    },
    follow::{follow, unfollow},
    pins::{delete_my_pin, get_my_pin, get_pin, list_my_pins, list_pins},
    profiles::{get_profile, list_profiles, update_profile},
};
use crate::state::AppState;
use crate::views::{accounts, boards, pins};

const SESSION_COOKIE: &str = "pinboard-session";

async fn readyz(State(state): State<AppState>) -> StatusCode {
    database_ready(&state.db).await
}

fn web_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(accounts::home))
        // Accounts
        .route(
            "/accounts/register/",
            get(accounts::register_page).post(accounts::register),
        )
        .route(
            "/accounts/login/",
            get(accounts::login_page).post(accounts::login),
        )
        .route("/accounts/logout/", get(accounts::logout))
        .route("/accounts/placeholder/", get(accounts::placeholder))
        .route(
            "/accounts/activate/{uidb64}/{token}/",
            get(accounts::activate),
        )
        .route("/accounts/profile/{username}", get(accounts::profile))
        .route(
            "/accounts/edit_profile",
            get(accounts::edit_profile_page).post(accounts::edit_profile),
        )
        .route("/accounts/follow/{username}", post(accounts::follow_user))
        .route("/accounts/unfollow/{username}", post(accounts::unfollow_user))
        // Password reset
        .route("/accounts/forgot_pass", get(accounts::forgot_password))
        .route("/accounts/sent_otp", post(accounts::send_reset_code))
        .route("/accounts/check_otp", post(accounts::check_reset_code))
        .route(
            "/accounts/change_pass/{uidb64}/{token}",
            get(accounts::change_password_page).post(accounts::change_password),
        )
        // Boards
        .route(
            "/boards/create",
            get(boards::create_board_page).post(boards::create_board),
        )
        .route(
            "/boards/edit/{title}",
            get(boards::edit_board_page).post(boards::edit_board),
        )
        .route("/boards/{title}", get(boards::board_detail))
        // Pins
        .route(
            "/pins/create/",
            get(pins::create_pin_page).post(pins::create_pin),
        )
        .route("/pins/{id}", get(pins::pin_detail))
        // `{id}` carries the username here; one segment cannot have two parameter names.
        .route("/pins/{id}/created/", get(pins::created_pins))
        .route(
            "/pins/edit/{id}",
            get(pins::edit_pin_page).post(pins::edit_pin),
        )
        .route("/pins/delete/{id}", post(pins::delete_pin))
        .route("/pins/save/{id}", post(pins::save_pin))
        .route("/pins/comment/{id}", post(pins::add_comment))
        .route("/pins/comment_remove/{id}", post(pins::remove_comment))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signin", post(signin))
        // Pins
        .route("/api/my_pins", get(list_my_pins))
        .route("/api/my_pins/{id}", get(get_my_pin).delete(delete_my_pin))
        .route("/api/pins", get(list_pins))
        .route("/api/pins/{id}", get(get_pin))
        .route(
            "/api/pins/{id}/comments",
            get(list_pin_comments).post(create_pin_comment),
        )
        // Profiles
        .route("/api/profile", get(list_profiles))
        .route("/api/profile/{id}", get(get_profile).patch(update_profile))
        // Boards
        .route("/api/boards", get(list_boards).post(create_board))
        .route(
            "/api/boards/{id}",
            get(get_board).patch(update_board).delete(delete_board),
        )
        .route(
            "/api/pin_in_board/{pin_id}/{board_title}",
            get(add_pin_to_board).delete(remove_pin_from_board),
        )
        // Comments
        .route("/api/comments", get(list_my_comments))
        .route(
            "/api/comments/{id}",
            get(get_my_comment)
                .patch(edit_my_comment)
                .delete(delete_my_comment),
        )
        // Follow
        .route("/api/follow", post(follow).delete(unfollow))
}

pub fn build_router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_name(SESSION_COOKIE)
        .with_http_only(true);

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .merge(web_routes())
        .merge(api_routes())
        .nest_service("/media", ServeDir::new(state.media.root()))
        .layer(session_layer)
        .layer(trace_layer())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
