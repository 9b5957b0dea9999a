use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "anime")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub external_id: String,
    #[sea_orm(unique)]
    pub russian: String,
    #[sea_orm(unique)]
    pub english: Option<String>,
    pub kind: String,
    pub rating: Option<String>,
    pub score: Option<f32>,
    pub status: String,
    pub episodes: i32,
    pub episodes_aired: Option<i32>,
    pub duration: Option<i32>,
    pub aired_on: Option<Date>,
    pub released_on: Option<Date>,
    /// Composite human label like "fall_2024", not a structured date.
    pub season: Option<String>,
    pub poster_url: Option<String>,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub next_episode_at: Option<DateTimeWithTimeZone>,
    pub is_censored: Option<bool>,
    /// JSON array of screenshot URLs.
    pub screenshots: Option<String>,
    pub description: Option<String>,
    /// JSON array of genre external ids. Rows for these ids are created by
    /// the genre registrar before the anime row is written.
    pub genre_ids: Option<String>,
    pub related_ids: Option<String>,
    pub related_texts: Option<String>,
    pub character_ids: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
