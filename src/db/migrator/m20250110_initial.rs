use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Anime::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Anime::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Anime::ExternalId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Anime::Russian)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Anime::English).string().unique_key())
                    .col(ColumnDef::new(Anime::Kind).string().not_null())
                    .col(ColumnDef::new(Anime::Rating).string())
                    .col(ColumnDef::new(Anime::Score).float())
                    .col(ColumnDef::new(Anime::Status).string().not_null())
                    .col(ColumnDef::new(Anime::Episodes).integer().not_null())
                    .col(ColumnDef::new(Anime::EpisodesAired).integer())
                    .col(ColumnDef::new(Anime::Duration).integer())
                    .col(ColumnDef::new(Anime::AiredOn).date())
                    .col(ColumnDef::new(Anime::ReleasedOn).date())
                    .col(ColumnDef::new(Anime::Season).string())
                    .col(ColumnDef::new(Anime::PosterUrl).string())
                    .col(ColumnDef::new(Anime::CreatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Anime::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Anime::NextEpisodeAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Anime::IsCensored).boolean())
                    .col(ColumnDef::new(Anime::Screenshots).text())
                    .col(ColumnDef::new(Anime::Description).text())
                    .col(ColumnDef::new(Anime::GenreIds).text())
                    .col(ColumnDef::new(Anime::RelatedIds).text())
                    .col(ColumnDef::new(Anime::RelatedTexts).text())
                    .col(ColumnDef::new(Anime::CharacterIds).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genre::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Genre::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Genre::ExternalId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Genre::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Genre::Russian).string().unique_key())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Anime::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genre::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Anime {
    Table,
    Id,
    ExternalId,
    Russian,
    English,
    Kind,
    Rating,
    Score,
    Status,
    Episodes,
    EpisodesAired,
    Duration,
    AiredOn,
    ReleasedOn,
    Season,
    PosterUrl,
    CreatedAt,
    UpdatedAt,
    NextEpisodeAt,
    IsCensored,
    Screenshots,
    Description,
    GenreIds,
    RelatedIds,
    RelatedTexts,
    CharacterIds,
}

#[derive(DeriveIden)]
enum Genre {
    Table,
    Id,
    ExternalId,
    Name,
    Russian,
}
