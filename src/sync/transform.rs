use crate::clients::shikimori::{DateParts, RawAnime};
use crate::models::anime::{GenreRef, NewAnime, TransformedAnime};

/// Maps one raw nested record into the flat persisted shape.
///
/// Pure and infallible: a field that is absent or null after flattening
/// stays `None`, and nothing here ever invents a date. The caller decides
/// what is worth logging or skipping.
#[must_use]
pub fn transform_record(raw: RawAnime) -> TransformedAnime {
    let character_ids: Vec<String> = raw
        .character_roles
        .into_iter()
        .filter_map(|role| role.character.and_then(|c| c.id))
        .collect();

    // Related edges collapse into parallel id / relation-text lists. Edges
    // whose target was not resolved by the source are dropped from both.
    let mut related_ids = Vec::new();
    let mut related_texts = Vec::new();
    for edge in raw.related {
        if let Some(id) = edge.anime.and_then(|a| a.id) {
            related_ids.push(id);
            related_texts.push(edge.relation_text.unwrap_or_default());
        }
    }

    let genres: Vec<GenreRef> = raw
        .genres
        .into_iter()
        .filter_map(|g| match (g.id, g.name) {
            (Some(external_id), Some(name)) => Some(GenreRef {
                external_id,
                name,
                russian: g.russian,
            }),
            _ => None,
        })
        .collect();

    let record = NewAnime {
        external_id: raw.id,
        russian: raw.russian,
        english: raw.english,
        kind: raw.kind.unwrap_or_else(|| "unknown".to_string()),
        rating: raw.rating,
        score: raw.score,
        status: raw.status.unwrap_or_else(|| "unknown".to_string()),
        episodes: raw.episodes.unwrap_or(0),
        episodes_aired: raw.episodes_aired,
        duration: raw.duration,
        aired_on: flatten_date(raw.aired_on),
        released_on: flatten_date(raw.released_on),
        season: raw.season,
        poster_url: raw.poster.and_then(|p| p.original_url),
        created_at: raw.created_at,
        updated_at: raw.updated_at,
        next_episode_at: raw.next_episode_at,
        is_censored: raw.is_censored,
        screenshots: raw
            .screenshots
            .into_iter()
            .filter_map(|s| s.original_url)
            .collect(),
        description: raw.description,
        genre_ids: Vec::new(),
        related_ids,
        related_texts,
        character_ids,
    };

    TransformedAnime { record, genres }
}

/// Collapses a year/month/day triple into a `"YYYY-M-D"` string. An absent
/// or incomplete triple yields `None`, never a zero date.
fn flatten_date(parts: Option<DateParts>) -> Option<String> {
    let parts = parts?;
    match (parts.year, parts.month, parts.day) {
        (Some(y), Some(m), Some(d)) => Some(format!("{y}-{m}-{d}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::shikimori::{
        CharacterRole, CharacterStub, Poster, RawGenre, RelatedEdge, RelatedStub, Screenshot,
    };

    fn raw(id: &str) -> RawAnime {
        RawAnime {
            id: Some(id.to_string()),
            russian: Some("Тест".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn full_date_triple_flattens() {
        let mut r = raw("1");
        r.aired_on = Some(DateParts {
            year: Some(2021),
            month: Some(10),
            day: Some(5),
        });
        let t = transform_record(r);
        assert_eq!(t.record.aired_on.as_deref(), Some("2021-10-5"));
    }

    #[test]
    fn incomplete_triple_becomes_null() {
        let mut r = raw("1");
        r.aired_on = Some(DateParts {
            year: Some(2021),
            month: None,
            day: None,
        });
        r.released_on = None;
        let t = transform_record(r);
        assert_eq!(t.record.aired_on, None);
        assert_eq!(t.record.released_on, None);
    }

    #[test]
    fn poster_and_screenshots_collapse_to_urls() {
        let mut r = raw("1");
        r.poster = Some(Poster {
            original_url: Some("https://img/poster.jpg".to_string()),
        });
        r.screenshots = vec![
            Screenshot {
                original_url: Some("https://img/1.jpg".to_string()),
            },
            Screenshot { original_url: None },
        ];
        let t = transform_record(r);
        assert_eq!(t.record.poster_url.as_deref(), Some("https://img/poster.jpg"));
        assert_eq!(t.record.screenshots, vec!["https://img/1.jpg".to_string()]);
    }

    #[test]
    fn missing_poster_stays_null() {
        let t = transform_record(raw("1"));
        assert_eq!(t.record.poster_url, None);
    }

    #[test]
    fn unresolved_cast_entries_are_skipped() {
        let mut r = raw("1");
        r.character_roles = vec![
            CharacterRole {
                character: Some(CharacterStub {
                    id: Some("77".to_string()),
                }),
            },
            CharacterRole { character: None },
        ];
        let t = transform_record(r);
        assert_eq!(t.record.character_ids, vec!["77".to_string()]);
    }

    #[test]
    fn related_edges_keep_parallel_lists() {
        let mut r = raw("1");
        r.related = vec![
            RelatedEdge {
                anime: Some(RelatedStub {
                    id: Some("5".to_string()),
                }),
                relation_text: Some("Sequel".to_string()),
            },
            RelatedEdge {
                anime: None,
                relation_text: Some("Adaptation".to_string()),
            },
        ];
        let t = transform_record(r);
        assert_eq!(t.record.related_ids, vec!["5".to_string()]);
        assert_eq!(t.record.related_texts, vec!["Sequel".to_string()]);
    }

    #[test]
    fn genre_triples_are_retained_separately() {
        let mut r = raw("1");
        r.genres = vec![
            RawGenre {
                id: Some("22".to_string()),
                name: Some("Romance".to_string()),
                russian: Some("Романтика".to_string()),
            },
            RawGenre {
                id: None,
                name: Some("Broken".to_string()),
                russian: None,
            },
        ];
        let t = transform_record(r);
        assert_eq!(t.genres.len(), 1);
        assert_eq!(t.genres[0].external_id, "22");
        assert!(t.record.genre_ids.is_empty());
    }

    #[test]
    fn missing_kind_and_status_degrade_without_panicking() {
        let t = transform_record(raw("1"));
        assert_eq!(t.record.kind, "unknown");
        assert_eq!(t.record.status, "unknown");
        assert_eq!(t.record.episodes, 0);
    }
}
