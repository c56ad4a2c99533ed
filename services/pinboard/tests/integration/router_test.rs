use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::Value;

use pinboard_server::config::PinboardConfig;
use pinboard_server::router::build_router;
use pinboard_server::state::AppState;
use pinboard_testing::auth::TokenAuth;
use pinboard_testing::body::assert_error_kind;

use crate::helpers::TEST_SECRET;

fn test_config() -> PinboardConfig {
    PinboardConfig {
        database_url: "postgres://unused".to_owned(),
        port: 0,
        secret_key: TEST_SECRET.to_owned(),
        default_domain: "http://pins.test".to_owned(),
        email_host_user: "noreply@pins.test".to_owned(),
        mail_api_url: None,
        token_expired_after_secs: 3600,
        activation_token_ttl_secs: 3600,
        media_root: std::env::temp_dir().join("pinboard-router-test-media"),
        page_size: 10,
        secure_cookies: false,
    }
}

/// Router over a disconnected database: only paths that never query it succeed.
fn server() -> TestServer {
    let state = AppState::new(DatabaseConnection::Disconnected, test_config());
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn should_answer_liveness_but_not_readiness() {
    let server = server();
    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    assert_eq!(
        server.get("/readyz").await.status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn should_tag_responses_with_request_id() {
    let response = server().get("/healthz").await;
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn should_require_token_for_own_pins() {
    let response = server().get("/api/my_pins").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let message = assert_error_kind(&response.json::<Value>(), "NOT_AUTHENTICATED");
    assert_eq!(message, "Authentication credentials were not provided.");
}

#[tokio::test]
async fn should_hide_storage_failure_details() {
    let auth = TokenAuth::new("0123456789abcdef0123456789abcdef01234567");
    let response = server()
        .get("/api/my_pins")
        .add_header(auth.header_name(), auth.header_value())
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_kind(&response.json::<Value>(), "INTERNAL");
}

#[tokio::test]
async fn should_render_login_and_register_pages() {
    let server = server();

    let login = server.get("/accounts/login/").await;
    assert_eq!(login.status_code(), StatusCode::OK);
    assert!(login.text().contains("name=\"password\""));

    let register = server.get("/accounts/register/").await;
    assert_eq!(register.status_code(), StatusCode::OK);
    assert!(register.text().contains("name=\"password2\""));
}

#[tokio::test]
async fn should_keep_next_in_login_form() {
    let response = server().get("/accounts/login/?next=%2Fboards%2Fcreate").await;
    let body = response.text();
    assert!(body.contains("name=\"next\""));
    assert!(body.contains("boards"));
}

#[tokio::test]
async fn should_redirect_anonymous_visitors_to_login() {
    let server = server();
    for path in ["/", "/pins/create/", "/boards/create", "/accounts/edit_profile"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER, "{path}");
        let location = response.header("location");
        let location = location.to_str().unwrap();
        assert!(location.starts_with("/accounts/login/?next="), "{location}");
    }
}

#[tokio::test]
async fn should_404_missing_media() {
    let response = server().get("/media/pins/missing.png").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_reject_page_numbers_too_large_to_parse() {
    let server = server();
    for path in [
        "/api/boards?page=18446744073709551615",
        "/api/pins?page=1000000000000000000",
        "/api/pins?page=-1",
    ] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{path}");
    }
}

#[tokio::test]
async fn should_reach_storage_for_largest_valid_page() {
    let response = server().get("/api/pins?page=4294967295").await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_kind(&response.json::<Value>(), "INTERNAL");
}
