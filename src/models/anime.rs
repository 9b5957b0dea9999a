use serde::{Deserialize, Serialize};

/// One catalog record in the flat persisted shape, ready for the upsert
/// synchronizer.
///
/// Date and timestamp fields stay raw strings here; the synchronizer owns
/// parsing so an unparseable value degrades to NULL instead of dropping the
/// record. `external_id` and `russian` stay optional for the same reason:
/// the feed contains partially-null records and the synchronizer decides
/// what to skip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAnime {
    pub external_id: Option<String>,
    pub russian: Option<String>,
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
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub next_episode_at: Option<String>,
    pub is_censored: Option<bool>,
    pub screenshots: Vec<String>,
    pub description: Option<String>,
    /// Genre external ids. Filled by the orchestrator after every genre has
    /// been registered, never directly from the feed.
    pub genre_ids: Vec<String>,
    pub related_ids: Vec<String>,
    pub related_texts: Vec<String>,
    pub character_ids: Vec<String>,
}

/// Genre as it appears nested in a catalog record, kept whole until the
/// registrar has ensured a row exists for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreRef {
    pub external_id: String,
    pub name: String,
    pub russian: Option<String>,
}

/// Transformer output: the flat record plus the genre triples it referenced.
#[derive(Debug, Clone, Default)]
pub struct TransformedAnime {
    pub record: NewAnime,
    pub genres: Vec<GenreRef>,
}

/// Filter, sort and page window for the catalog query engine.
///
/// Filters compose conjunctively. The year range applies only when both
/// bounds are present. The three convenience orderings are mutually
/// exclusive and lose to an explicit `sort_by`.
#[derive(Debug, Clone)]
pub struct AnimeQuery {
    pub kind: Option<String>,
    pub rating: Option<String>,
    pub status: Option<String>,
    pub genre_ids: Vec<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub page: u64,
    pub limit: u64,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub by_score: bool,
    pub by_date: bool,
    pub by_name: bool,
}

impl Default for AnimeQuery {
    fn default() -> Self {
        Self {
            kind: None,
            rating: None,
            status: None,
            genre_ids: Vec::new(),
            start_year: None,
            end_year: None,
            page: 1,
            limit: 10,
            sort_by: None,
            sort_order: None,
            by_score: false,
            by_date: false,
            by_name: false,
        }
    }
}
