use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ForgotPasswords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ForgotPasswords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ForgotPasswords::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(ForgotPasswords::ForgetPasswordOtp)
                            .string_len(5)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ForgotPasswords::IsUserPasswordUpdated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ForgotPasswords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ForgotPasswords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ForgotPasswords::Table, ForgotPasswords::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ForgotPasswords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ForgotPasswords {
    Table,
    Id,
    UserId,
    ForgetPasswordOtp,
    IsUserPasswordUpdated,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
