use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(pinboard_migration::Migrator).await;
}
