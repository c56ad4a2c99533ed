use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Latest reset request per user.
        manager
            .create_index(
                Index::create()
                    .name("idx_forgot_passwords_user_created")
                    .table(ForgotPasswords::Table)
                    .col(ForgotPasswords::UserId)
                    .col(ForgotPasswords::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_follows_pair")
                    .table(Follows::Table)
                    .col(Follows::FollowerId)
                    .col(Follows::FollowingId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pins_user_created")
                    .table(Pins::Table)
                    .col(Pins::UserId)
                    .col(Pins::DateCreated)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_pin")
                    .table(Comments::Table)
                    .col(Comments::PinId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_board_pins_pin")
                    .table(BoardPins::Table)
                    .col(BoardPins::PinId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_board_pins_pin",
            "idx_comments_pin",
            "idx_pins_user_created",
            "idx_follows_pair",
            "idx_forgot_passwords_user_created",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum ForgotPasswords {
    Table,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Follows {
    Table,
    FollowerId,
    FollowingId,
}

#[derive(Iden)]
enum Pins {
    Table,
    UserId,
    DateCreated,
}

#[derive(Iden)]
enum Comments {
    Table,
    PinId,
}

#[derive(Iden)]
enum BoardPins {
    Table,
    PinId,
}
