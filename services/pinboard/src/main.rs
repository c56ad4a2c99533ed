use sea_orm::Database;
use tracing::info;

use pinboard_core::tracing::init_tracing;
use pinboard_server::config::PinboardConfig;
use pinboard_server::router::build_router;
use pinboard_server::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing("info");

    let config = PinboardConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let http_addr = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(db, config);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("pinboard listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
