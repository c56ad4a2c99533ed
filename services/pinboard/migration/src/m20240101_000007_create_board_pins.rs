use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BoardPins::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BoardPins::BoardId).integer().not_null())
                    .col(ColumnDef::new(BoardPins::PinId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(BoardPins::BoardId)
                            .col(BoardPins::PinId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BoardPins::Table, BoardPins::BoardId)
                            .to(Boards::Table, Boards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BoardPins::Table, BoardPins::PinId)
                            .to(Pins::Table, Pins::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BoardPins::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BoardPins {
    Table,
    BoardId,
    PinId,
}

#[derive(Iden)]
enum Boards {
    Table,
    Id,
}

#[derive(Iden)]
enum Pins {
    Table,
    Id,
}
