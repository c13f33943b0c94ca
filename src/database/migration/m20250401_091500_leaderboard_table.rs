use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Leaderboard::Table)
                    .if_not_exists()
                    .col(pk_auto(Leaderboard::Id))
                    .col(string(Leaderboard::Name))
                    .col(double(Leaderboard::Score))
                    .col(date_time(Leaderboard::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Leaderboard::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Leaderboard {
    Table,
    /// Unique ID of the entry
    Id,
    /// Submitted player name
    Name,
    /// Submitted score
    Score,
    /// Timestamp of the submission
    CreatedAt,
}
