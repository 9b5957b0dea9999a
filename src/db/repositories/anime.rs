use crate::entities::{anime, prelude::*};
use crate::models::anime::{AnimeQuery, NewAnime};
use anyhow::Result;
use chrono::{DateTime, NaiveDate};
use sea_orm::sea_query::{Expr, OnConflict, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use tracing::warn;

/// Columns overwritten when a re-synced record collides on `external_id`:
/// everything except the immutable identity pair (`id`, `external_id`).
const MUTABLE_COLUMNS: [anime::Column; 23] = [
    anime::Column::Russian,
    anime::Column::English,
    anime::Column::Kind,
    anime::Column::Rating,
    anime::Column::Score,
    anime::Column::Status,
    anime::Column::Episodes,
    anime::Column::EpisodesAired,
    anime::Column::Duration,
    anime::Column::AiredOn,
    anime::Column::ReleasedOn,
    anime::Column::Season,
    anime::Column::PosterUrl,
    anime::Column::CreatedAt,
    anime::Column::UpdatedAt,
    anime::Column::NextEpisodeAt,
    anime::Column::IsCensored,
    anime::Column::Screenshots,
    anime::Column::Description,
    anime::Column::GenreIds,
    anime::Column::RelatedIds,
    anime::Column::RelatedTexts,
    anime::Column::CharacterIds,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Written,
    Skipped(&'static str),
}

pub struct AnimeRepository {
    conn: DatabaseConnection,
}

impl AnimeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Writes one flat record: insert when `external_id` is unseen,
    /// otherwise overwrite every mutable column in place.
    ///
    /// Records missing their external id or primary title are skipped.
    /// Unparseable date fields degrade to NULL and the record proceeds.
    /// A store error is returned to the caller; the failed statement rolls
    /// back on its own and must not abort the surrounding batch.
    pub async fn upsert(&self, record: &NewAnime) -> Result<UpsertOutcome> {
        let Some(external_id) = record.external_id.as_deref().filter(|s| !s.is_empty()) else {
            return Ok(UpsertOutcome::Skipped("missing external id"));
        };
        let Some(russian) = record.russian.as_deref().filter(|s| !s.is_empty()) else {
            return Ok(UpsertOutcome::Skipped("missing primary title"));
        };

        let active = anime::ActiveModel {
            external_id: Set(external_id.to_string()),
            russian: Set(russian.to_string()),
            english: Set(record.english.clone()),
            kind: Set(record.kind.clone()),
            rating: Set(record.rating.clone()),
            score: Set(record.score),
            status: Set(record.status.clone()),
            episodes: Set(record.episodes),
            episodes_aired: Set(record.episodes_aired),
            duration: Set(record.duration),
            aired_on: Set(parse_date(record.aired_on.as_deref(), external_id, "aired_on")),
            released_on: Set(parse_date(
                record.released_on.as_deref(),
                external_id,
                "released_on",
            )),
            season: Set(record.season.clone()),
            poster_url: Set(record.poster_url.clone()),
            created_at: Set(parse_datetime(
                record.created_at.as_deref(),
                external_id,
                "created_at",
            )),
            updated_at: Set(parse_datetime(
                record.updated_at.as_deref(),
                external_id,
                "updated_at",
            )),
            next_episode_at: Set(parse_datetime(
                record.next_episode_at.as_deref(),
                external_id,
                "next_episode_at",
            )),
            is_censored: Set(record.is_censored),
            screenshots: Set(encode_list(&record.screenshots)),
            description: Set(record.description.clone()),
            genre_ids: Set(encode_list(&record.genre_ids)),
            related_ids: Set(encode_list(&record.related_ids)),
            related_texts: Set(encode_list(&record.related_texts)),
            character_ids: Set(encode_list(&record.character_ids)),
            ..Default::default()
        };

        Anime::insert(active)
            .on_conflict(
                OnConflict::column(anime::Column::ExternalId)
                    .update_columns(MUTABLE_COLUMNS)
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(UpsertOutcome::Written)
    }

    /// Writes a page of records, isolating per-record failure, and returns
    /// how many were actually written. One bad record never stops the rest.
    pub async fn upsert_batch(&self, records: &[NewAnime]) -> Result<u64> {
        let mut written = 0u64;
        for record in records {
            match self.upsert(record).await {
                Ok(UpsertOutcome::Written) => written += 1,
                Ok(UpsertOutcome::Skipped(reason)) => {
                    warn!(external_id = ?record.external_id, "skipping record: {reason}");
                }
                Err(e) => {
                    warn!(
                        external_id = ?record.external_id,
                        "record write failed, continuing batch: {e}"
                    );
                }
            }
        }
        Ok(written)
    }

    pub async fn get(&self, id: i32) -> Result<Option<anime::Model>> {
        Ok(Anime::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_by_external_id(&self, external_id: &str) -> Result<Option<anime::Model>> {
        Ok(Anime::find()
            .filter(anime::Column::ExternalId.eq(external_id))
            .one(&self.conn)
            .await?)
    }

    /// Free-text name lookup: substring match against either localized
    /// title, every match returned, no page window.
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<anime::Model>> {
        Ok(Anime::find()
            .filter(
                Condition::any()
                    .add(anime::Column::Russian.contains(name))
                    .add(anime::Column::English.contains(name)),
            )
            .order_by_asc(anime::Column::Russian)
            .all(&self.conn)
            .await?)
    }

    /// Filtered, sorted, paginated listing plus the total count of the
    /// filtered set (counted before the page window is applied).
    pub async fn list_filtered(&self, query: &AnimeQuery) -> Result<(Vec<anime::Model>, u64)> {
        let mut select = Anime::find();

        if let Some(kind) = &query.kind {
            select = select.filter(anime::Column::Kind.eq(kind));
        }
        if let Some(rating) = &query.rating {
            select = select.filter(anime::Column::Rating.eq(rating));
        }
        if let Some(status) = &query.status {
            select = select.filter(anime::Column::Status.eq(status));
        }

        // Containment is conjunctive: every requested id must appear in the
        // row's genre_ids. The JSON quoting keeps the match token-exact.
        for genre_id in &query.genre_ids {
            select = select.filter(anime::Column::GenreIds.contains(format!("\"{genre_id}\"")));
        }

        // The derived year comes from the structured air date. Applied only
        // when both bounds arrive together; bounds are inclusive.
        if let (Some(start), Some(end)) = (query.start_year, query.end_year)
            && let (Some(from), Some(to)) = (
                NaiveDate::from_ymd_opt(start, 1, 1),
                NaiveDate::from_ymd_opt(end, 12, 31),
            )
        {
            select = select
                .filter(anime::Column::AiredOn.gte(from))
                .filter(anime::Column::AiredOn.lte(to));
        }

        let total = select.clone().count(&self.conn).await?;

        let select = apply_ordering(select, query);

        let offset = query.page.saturating_sub(1) * query.limit;
        let items = select
            .limit(query.limit)
            .offset(offset)
            .all(&self.conn)
            .await?;

        Ok((items, total))
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Anime::find().count(&self.conn).await?)
    }

    pub async fn distinct_kinds(&self) -> Result<Vec<String>> {
        Ok(Anime::find()
            .select_only()
            .column(anime::Column::Kind)
            .distinct()
            .order_by_asc(anime::Column::Kind)
            .into_tuple::<String>()
            .all(&self.conn)
            .await?)
    }

    pub async fn distinct_ratings(&self) -> Result<Vec<String>> {
        let rows = Anime::find()
            .select_only()
            .column(anime::Column::Rating)
            .distinct()
            .order_by_asc(anime::Column::Rating)
            .into_tuple::<Option<String>>()
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().flatten().collect())
    }
}

fn apply_ordering(select: Select<anime::Entity>, query: &AnimeQuery) -> Select<anime::Entity> {
    // An explicit sort field wins over the convenience orderings.
    if let Some(field) = query.sort_by.as_deref() {
        let order = match query.sort_order.as_deref() {
            Some("desc") => Order::Desc,
            _ => Order::Asc,
        };
        let column = match field {
            "score" => anime::Column::Score,
            "aired_on" => anime::Column::AiredOn,
            "episodes" => anime::Column::Episodes,
            "english" => anime::Column::English,
            "russian" | "name" => anime::Column::Russian,
            _ => anime::Column::Id,
        };
        return select.order_by(column, order);
    }

    if query.by_score {
        return select.order_by_desc(anime::Column::Score);
    }
    if query.by_date {
        return select.order_by_desc(anime::Column::AiredOn);
    }
    if query.by_name {
        return select
            .order_by(cyrillic_first(), Order::Asc)
            .order_by_asc(anime::Column::Russian);
    }

    select.order_by_asc(anime::Column::Id)
}

/// Two-tier name key: titles whose first character falls in the Cyrillic
/// block rank ahead of everything else; byte order applies inside each tier.
fn cyrillic_first() -> SimpleExpr {
    Expr::cust("CASE WHEN substr(russian, 1, 1) BETWEEN 'Ѐ' AND 'ӿ' THEN 0 ELSE 1 END")
}

fn parse_date(value: Option<&str>, external_id: &str, field: &str) -> Option<NaiveDate> {
    let raw = value?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            warn!("unparseable {field} {raw:?} on record {external_id}, storing null: {e}");
            None
        }
    }
}

fn parse_datetime(
    value: Option<&str>,
    external_id: &str,
    field: &str,
) -> Option<DateTime<chrono::FixedOffset>> {
    let raw = value?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt),
        Err(e) => {
            warn!("unparseable {field} {raw:?} on record {external_id}, storing null: {e}");
            None
        }
    }
}

fn encode_list(items: &[String]) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        serde_json::to_string(items).ok()
    }
}
