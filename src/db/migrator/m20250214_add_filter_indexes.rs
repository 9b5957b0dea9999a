use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_anime_kind")
                    .table(Anime::Table)
                    .col(Anime::Kind)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_anime_status")
                    .table(Anime::Table)
                    .col(Anime::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_anime_rating")
                    .table(Anime::Table)
                    .col(Anime::Rating)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_anime_aired_on")
                    .table(Anime::Table)
                    .col(Anime::AiredOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_anime_score")
                    .table(Anime::Table)
                    .col(Anime::Score)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_anime_kind",
            "idx_anime_status",
            "idx_anime_rating",
            "idx_anime_aired_on",
            "idx_anime_score",
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Anime::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Anime {
    Table,
    Kind,
    Status,
    Rating,
    AiredOn,
    Score,
}
