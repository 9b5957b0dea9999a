//! Query-engine properties: conjunctive filters, genre containment,
//! inclusive year bounds, pagination arithmetic, locale-aware ordering and
//! total counts independent of the page window.

use shikidb::db::Store;
use shikidb::models::anime::{AnimeQuery, NewAnime};

async fn temp_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("shikidb-query-test-{}.db", uuid::Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to create store")
}

struct Seed {
    external_id: String,
    russian: String,
    kind: &'static str,
    status: &'static str,
    rating: Option<&'static str>,
    score: Option<f32>,
    aired_on: Option<&'static str>,
    genre_ids: &'static [&'static str],
}

impl Seed {
    fn into_record(self) -> NewAnime {
        NewAnime {
            external_id: Some(self.external_id),
            russian: Some(self.russian),
            kind: self.kind.to_string(),
            status: self.status.to_string(),
            rating: self.rating.map(ToString::to_string),
            score: self.score,
            aired_on: self.aired_on.map(ToString::to_string),
            episodes: 12,
            genre_ids: self.genre_ids.iter().map(ToString::to_string).collect(),
            ..Default::default()
        }
    }
}

fn seed(external_id: &str, russian: &str) -> Seed {
    Seed {
        external_id: external_id.to_string(),
        russian: russian.to_string(),
        kind: "tv",
        status: "released",
        rating: None,
        score: None,
        aired_on: None,
        genre_ids: &[],
    }
}

async fn seeded_store(seeds: Vec<Seed>) -> Store {
    let store = temp_store().await;
    let records: Vec<NewAnime> = seeds.into_iter().map(Seed::into_record).collect();
    let expected = records.len() as u64;
    let written = store.upsert_anime_batch(&records).await.unwrap();
    assert_eq!(written, expected, "seed batch must write fully");
    store
}

#[tokio::test]
async fn genre_containment_is_conjunctive() {
    let store = seeded_store(vec![
        Seed {
            genre_ids: &["1", "2"],
            ..seed("a", "Оба жанра")
        },
        Seed {
            genre_ids: &["1"],
            ..seed("b", "Только первый")
        },
        Seed {
            genre_ids: &["2", "3"],
            ..seed("c", "Только второй")
        },
    ])
    .await;

    let query = AnimeQuery {
        genre_ids: vec!["1".to_string(), "2".to_string()],
        ..Default::default()
    };
    let (items, total) = store.list_anime_filtered(&query).await.unwrap();

    assert_eq!(total, 1);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].external_id, "a");
}

#[tokio::test]
async fn genre_id_match_is_token_exact() {
    // "5" must not match inside "15".
    let store = seeded_store(vec![
        Seed {
            genre_ids: &["15"],
            ..seed("a", "Пятнадцать")
        },
        Seed {
            genre_ids: &["5"],
            ..seed("b", "Пять")
        },
    ])
    .await;

    let query = AnimeQuery {
        genre_ids: vec!["5".to_string()],
        ..Default::default()
    };
    let (items, total) = store.list_anime_filtered(&query).await.unwrap();

    assert_eq!(total, 1);
    assert_eq!(items[0].external_id, "b");
}

#[tokio::test]
async fn year_range_bounds_are_inclusive() {
    let store = seeded_store(vec![
        Seed {
            aired_on: Some("1999-12-31"),
            ..seed("a", "Девяносто девять")
        },
        Seed {
            aired_on: Some("2000-1-1"),
            ..seed("b", "Ровно нижняя граница")
        },
        Seed {
            aired_on: Some("2005-6-15"),
            ..seed("c", "Середина")
        },
        Seed {
            aired_on: Some("2010-12-31"),
            ..seed("d", "Ровно верхняя граница")
        },
        Seed {
            aired_on: Some("2011-1-1"),
            ..seed("e", "За границей")
        },
    ])
    .await;

    let query = AnimeQuery {
        start_year: Some(2000),
        end_year: Some(2010),
        ..Default::default()
    };
    let (items, total) = store.list_anime_filtered(&query).await.unwrap();

    assert_eq!(total, 3);
    let ids: Vec<&str> = items.iter().map(|m| m.external_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "d"]);
}

#[tokio::test]
async fn year_range_with_one_bound_is_skipped() {
    let store = seeded_store(vec![
        Seed {
            aired_on: Some("1995-1-1"),
            ..seed("a", "Старый")
        },
        Seed {
            aired_on: Some("2020-1-1"),
            ..seed("b", "Новый")
        },
    ])
    .await;

    let query = AnimeQuery {
        start_year: Some(2000),
        end_year: None,
        ..Default::default()
    };
    let (_, total) = store.list_anime_filtered(&query).await.unwrap();

    assert_eq!(total, 2);
}

#[tokio::test]
async fn exact_filters_compose_conjunctively() {
    let store = seeded_store(vec![
        Seed {
            kind: "movie",
            rating: Some("pg_13"),
            ..seed("a", "Фильм тринадцать")
        },
        Seed {
            kind: "movie",
            rating: Some("r"),
            ..seed("b", "Фильм восемнадцать")
        },
        Seed {
            kind: "tv",
            rating: Some("pg_13"),
            ..seed("c", "Сериал тринадцать")
        },
    ])
    .await;

    let query = AnimeQuery {
        kind: Some("movie".to_string()),
        rating: Some("pg_13".to_string()),
        ..Default::default()
    };
    let (items, total) = store.list_anime_filtered(&query).await.unwrap();

    assert_eq!(total, 1);
    assert_eq!(items[0].external_id, "a");
}

#[tokio::test]
async fn pagination_window_and_total_count() {
    let seeds: Vec<Seed> = (0..25)
        .map(|i| seed(&format!("id-{i:02}"), &format!("Тайтл {i:02}")))
        .collect();
    let store = seeded_store(seeds).await;

    // page=3, limit=10 -> offset 20, so items 20..24 of the id ordering.
    let query = AnimeQuery {
        page: 3,
        limit: 10,
        ..Default::default()
    };
    let (items, total) = store.list_anime_filtered(&query).await.unwrap();

    assert_eq!(total, 25);
    assert_eq!(items.len(), 5);
    assert_eq!(items[0].external_id, "id-20");
    assert_eq!(items[4].external_id, "id-24");
}

#[tokio::test]
async fn total_count_is_independent_of_limit() {
    let seeds: Vec<Seed> = (0..9)
        .map(|i| {
            let mut s = seed(&format!("x-{i}"), &format!("Экс {i}"));
            if i < 7 {
                s.kind = "ova";
            }
            s
        })
        .collect();
    let store = seeded_store(seeds).await;

    let query = AnimeQuery {
        kind: Some("ova".to_string()),
        limit: 3,
        ..Default::default()
    };
    let (items, total) = store.list_anime_filtered(&query).await.unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(total, 7);
}

#[tokio::test]
async fn name_ordering_groups_cyrillic_first() {
    let store = seeded_store(vec![
        seed("a", "Яблоко"),
        seed("b", "Apple"),
        seed("c", "Ёжик"),
    ])
    .await;

    let query = AnimeQuery {
        by_name: true,
        ..Default::default()
    };
    let (items, _) = store.list_anime_filtered(&query).await.unwrap();

    let titles: Vec<&str> = items.iter().map(|m| m.russian.as_str()).collect();
    assert_eq!(titles, vec!["Ёжик", "Яблоко", "Apple"]);
}

#[tokio::test]
async fn score_ordering_is_descending() {
    let store = seeded_store(vec![
        Seed {
            score: Some(7.2),
            ..seed("a", "Средний")
        },
        Seed {
            score: Some(9.0),
            ..seed("b", "Лучший")
        },
        Seed {
            score: Some(5.5),
            ..seed("c", "Худший")
        },
    ])
    .await;

    let query = AnimeQuery {
        by_score: true,
        ..Default::default()
    };
    let (items, _) = store.list_anime_filtered(&query).await.unwrap();

    let ids: Vec<&str> = items.iter().map(|m| m.external_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
}

#[tokio::test]
async fn explicit_sort_wins_over_convenience_flags() {
    let store = seeded_store(vec![
        Seed {
            score: Some(9.0),
            aired_on: Some("2020-1-1"),
            ..seed("a", "Высокий балл")
        },
        Seed {
            score: Some(5.0),
            aired_on: Some("2024-1-1"),
            ..seed("b", "Свежий")
        },
    ])
    .await;

    let query = AnimeQuery {
        sort_by: Some("aired_on".to_string()),
        sort_order: Some("desc".to_string()),
        by_score: true,
        ..Default::default()
    };
    let (items, _) = store.list_anime_filtered(&query).await.unwrap();

    assert_eq!(items[0].external_id, "b");
}

#[tokio::test]
async fn name_search_matches_either_title_without_window() {
    let store = temp_store().await;

    let mut rec_a = seed("a", "Стальной алхимик").into_record();
    rec_a.english = Some("Fullmetal Alchemist".to_string());
    let rec_b = seed("b", "Алхимия чувств").into_record();
    let rec_c = seed("c", "Посторонний").into_record();

    store
        .upsert_anime_batch(&[rec_a, rec_b, rec_c])
        .await
        .unwrap();

    let by_english = store.search_anime_by_name("fullmetal").await.unwrap();
    assert_eq!(by_english.len(), 1);
    assert_eq!(by_english[0].external_id, "a");

    let by_russian = store.search_anime_by_name("Алхим").await.unwrap();
    assert_eq!(by_russian.len(), 2);
}
