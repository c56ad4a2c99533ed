use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_profiles;
mod m20240101_000003_create_follows;
mod m20240101_000004_create_forgot_passwords;
mod m20240101_000005_create_pins;
mod m20240101_000006_create_boards;
mod m20240101_000007_create_board_pins;
mod m20240101_000008_create_comments;
mod m20240101_000009_create_api_tokens;
mod m20240101_000010_add_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_profiles::Migration),
            Box::new(m20240101_000003_create_follows::Migration),
            Box::new(m20240101_000004_create_forgot_passwords::Migration),
            Box::new(m20240101_000005_create_pins::Migration),
            Box::new(m20240101_000006_create_boards::Migration),
            Box::new(m20240101_000007_create_board_pins::Migration),
            Box::new(m20240101_000008_create_comments::Migration),
            Box::new(m20240101_000009_create_api_tokens::Migration),
            Box::new(m20240101_000010_add_lookup_indexes::Migration),
        ]
    }
}
