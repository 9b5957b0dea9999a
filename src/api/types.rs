use serde::Serialize;

use crate::entities::{anime, genre};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnimeDto {
    pub id: i32,
    pub external_id: String,
    pub russian: String,
    pub english: Option<String>,
    pub kind: String,
    pub rating: Option<String>,
    pub score: Option<f32>,
    pub status: String,
    pub episodes: i32,
    pub episodes_aired: Option<i32>,
    pub duration: Option<i32>,
    pub aired_on: Option<String>,
    pub released_on: Option<String>,
    pub season: Option<String>,
    pub poster_url: Option<String>,
    pub next_episode_at: Option<String>,
    pub is_censored: Option<bool>,
    pub screenshots: Vec<String>,
    pub description: Option<String>,
    pub genre_ids: Vec<String>,
    pub related_ids: Vec<String>,
    pub related_texts: Vec<String>,
    pub character_ids: Vec<String>,
}

impl From<anime::Model> for AnimeDto {
    fn from(model: anime::Model) -> Self {
        Self {
            id: model.id,
            external_id: model.external_id,
            russian: model.russian,
            english: model.english,
            kind: model.kind,
            rating: model.rating,
            score: model.score,
            status: model.status,
            episodes: model.episodes,
            episodes_aired: model.episodes_aired,
            duration: model.duration,
            aired_on: model.aired_on.map(|d| d.to_string()),
            released_on: model.released_on.map(|d| d.to_string()),
            season: model.season,
            poster_url: model.poster_url,
            next_episode_at: model.next_episode_at.map(|dt| dt.to_rfc3339()),
            is_censored: model.is_censored,
            screenshots: decode_list(model.screenshots.as_deref()),
            description: model.description,
            genre_ids: decode_list(model.genre_ids.as_deref()),
            related_ids: decode_list(model.related_ids.as_deref()),
            related_texts: decode_list(model.related_texts.as_deref()),
            character_ids: decode_list(model.character_ids.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnimeListDto {
    pub total_count: u64,
    pub items: Vec<AnimeDto>,
}

#[derive(Debug, Serialize)]
pub struct GenreDto {
    pub id: i32,
    pub external_id: String,
    pub name: String,
    pub russian: Option<String>,
}

impl From<genre::Model> for GenreDto {
    fn from(model: genre::Model) -> Self {
        Self {
            id: model.id,
            external_id: model.external_id,
            name: model.name,
            russian: model.russian,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusDto {
    pub anime_count: u64,
    pub sync_running: bool,
    pub uptime_seconds: u64,
}

fn decode_list(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}
