use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SourceConfig;

/// Fixed deep projection for one catalog page. Nested objects cover
/// everything the transformer flattens: date triples, the poster, genre
/// triples, cast roles, related edges and screenshots.
const PAGE_QUERY: &str = r#"
    query ($page: PositiveInt, $limit: PositiveInt) {
        animes(page: $page, limit: $limit) {
            id
            english
            russian
            kind
            rating
            score
            status
            episodes
            episodesAired
            duration
            airedOn { year month day }
            releasedOn { year month day }
            season
            poster { originalUrl }
            createdAt
            updatedAt
            nextEpisodeAt
            isCensored
            screenshots { originalUrl }
            description
            genres { id name russian }
            characterRoles {
                character { id }
            }
            related {
                anime { id }
                relationText
            }
        }
    }
"#;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("catalog source unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("catalog source returned {status}")]
    Status { status: reqwest::StatusCode },
}

#[derive(Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    variables: PageVariables,
}

#[derive(Serialize)]
struct PageVariables {
    page: u32,
    limit: u32,
}

#[derive(Deserialize)]
struct GraphQLResponse {
    data: Option<Data>,
}

#[derive(Deserialize)]
struct Data {
    animes: Option<Vec<RawAnime>>,
}

/// One raw nested record as the source returns it. Every field is optional;
/// the feed is third-party and known to contain partially-null records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnime {
    pub id: Option<String>,
    pub english: Option<String>,
    pub russian: Option<String>,
    pub kind: Option<String>,
    pub rating: Option<String>,
    pub score: Option<f32>,
    pub status: Option<String>,
    pub episodes: Option<i32>,
    #[serde(rename = "episodesAired")]
    pub episodes_aired: Option<i32>,
    pub duration: Option<i32>,
    #[serde(rename = "airedOn")]
    pub aired_on: Option<DateParts>,
    #[serde(rename = "releasedOn")]
    pub released_on: Option<DateParts>,
    pub season: Option<String>,
    pub poster: Option<Poster>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
    #[serde(rename = "nextEpisodeAt")]
    pub next_episode_at: Option<String>,
    #[serde(rename = "isCensored")]
    pub is_censored: Option<bool>,
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Vec<RawGenre>,
    #[serde(default, rename = "characterRoles")]
    pub character_roles: Vec<CharacterRole>,
    #[serde(default)]
    pub related: Vec<RelatedEdge>,
}

/// Year/month/day triple as the source serializes incomplete dates.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DateParts {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Poster {
    #[serde(rename = "originalUrl")]
    pub original_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Screenshot {
    #[serde(rename = "originalUrl")]
    pub original_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGenre {
    pub id: Option<String>,
    pub name: Option<String>,
    pub russian: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterRole {
    pub character: Option<CharacterStub>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CharacterStub {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelatedEdge {
    pub anime: Option<RelatedStub>,
    #[serde(rename = "relationText")]
    pub relation_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelatedStub {
    pub id: Option<String>,
}

#[derive(Clone)]
pub struct ShikimoriClient {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl ShikimoriClient {
    #[must_use]
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(config.user_agent.clone())
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.graphql_url.clone(),
            page_size: config.page_size,
        }
    }

    /// Fetches one catalog page.
    ///
    /// `Err` means the page was not fetched (transport failure or non-2xx
    /// status) and the caller must treat it as unfetched, not empty. An
    /// `Ok` empty vec means the source is exhausted.
    pub async fn fetch_page(&self, page: u32) -> Result<Vec<RawAnime>, FetchError> {
        let request_body = GraphQLRequest {
            query: PAGE_QUERY,
            variables: PageVariables {
                page,
                limit: self.page_size,
            },
        };

        let response = self
            .client
            .post(&self.base_url)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
            });
        }

        let response: GraphQLResponse = response.json().await?;

        Ok(response.data.and_then(|d| d.animes).unwrap_or_default())
    }
}
