use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pins::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pins::UserId).integer().not_null())
                    .col(ColumnDef::new(Pins::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Pins::Description).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Pins::File)
                            .string()
                            .not_null()
                            .default("pins/default.png"),
                    )
                    .col(
                        ColumnDef::new(Pins::DateCreated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Pins::Table, Pins::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pins::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Pins {
    Table,
    Id,
    UserId,
    Title,
    Description,
    File,
    DateCreated,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
