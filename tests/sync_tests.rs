//! Ingestion-side properties: upsert idempotence, in-place updates,
//! per-record failure isolation and the genre registrar.

use shikidb::db::Store;
use shikidb::models::anime::{GenreRef, NewAnime};

async fn temp_store() -> Store {
    let db_path = std::env::temp_dir().join(format!("shikidb-sync-test-{}.db", uuid::Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to create store")
}

fn record(external_id: &str, russian: &str) -> NewAnime {
    NewAnime {
        external_id: Some(external_id.to_string()),
        russian: Some(russian.to_string()),
        kind: "tv".to_string(),
        status: "released".to_string(),
        episodes: 12,
        ..Default::default()
    }
}

#[tokio::test]
async fn double_ingest_converges_instead_of_duplicating() {
    let store = temp_store().await;

    let batch = vec![record("1", "Тетрадь смерти"), record("2", "Бродяга Кэнсин")];

    let first = store.upsert_anime_batch(&batch).await.unwrap();
    let second = store.upsert_anime_batch(&batch).await.unwrap();

    assert_eq!(first, 2);
    assert_eq!(second, 2);
    assert_eq!(store.count_anime().await.unwrap(), 2);

    let row = store.get_anime_by_external_id("1").await.unwrap().unwrap();
    assert_eq!(row.russian, "Тетрадь смерти");
    assert_eq!(row.episodes, 12);
}

#[tokio::test]
async fn reingest_updates_mutable_fields_in_place() {
    let store = temp_store().await;

    let mut rec = record("40028", "Атака титанов");
    rec.status = "ongoing".to_string();
    rec.score = Some(8.5);
    store.upsert_anime_batch(&[rec.clone()]).await.unwrap();

    let before = store
        .get_anime_by_external_id("40028")
        .await
        .unwrap()
        .unwrap();

    rec.status = "released".to_string();
    rec.score = Some(9.1);
    rec.episodes = 24;
    store.upsert_anime_batch(&[rec]).await.unwrap();

    let after = store
        .get_anime_by_external_id("40028")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(after.id, before.id);
    assert_eq!(after.external_id, before.external_id);
    assert_eq!(after.status, "released");
    assert_eq!(after.score, Some(9.1));
    assert_eq!(after.episodes, 24);
    assert_eq!(store.count_anime().await.unwrap(), 1);
}

#[tokio::test]
async fn record_without_external_id_is_skipped_not_fatal() {
    let store = temp_store().await;

    let mut bad = record("", "Сломанная запись");
    bad.external_id = None;

    let batch = vec![record("10", "Первый"), bad, record("11", "Второй")];

    let written = store.upsert_anime_batch(&batch).await.unwrap();

    assert_eq!(written, 2);
    assert_eq!(store.count_anime().await.unwrap(), 2);
    assert!(store.get_anime_by_external_id("10").await.unwrap().is_some());
    assert!(store.get_anime_by_external_id("11").await.unwrap().is_some());
}

#[tokio::test]
async fn record_without_primary_title_is_skipped() {
    let store = temp_store().await;

    let mut bad = record("12", "");
    bad.russian = None;

    let written = store.upsert_anime_batch(&[bad]).await.unwrap();

    assert_eq!(written, 0);
    assert_eq!(store.count_anime().await.unwrap(), 0);
}

#[tokio::test]
async fn unparseable_date_nulls_field_but_keeps_record() {
    let store = temp_store().await;

    let mut rec = record("13", "Странные даты");
    rec.aired_on = Some("not-a-date".to_string());
    rec.released_on = Some("2007-4-1".to_string());

    let written = store.upsert_anime_batch(&[rec]).await.unwrap();
    assert_eq!(written, 1);

    let row = store.get_anime_by_external_id("13").await.unwrap().unwrap();
    assert_eq!(row.aired_on, None);
    assert_eq!(
        row.released_on,
        chrono::NaiveDate::from_ymd_opt(2007, 4, 1)
    );
}

#[tokio::test]
async fn title_collision_rolls_back_only_that_record() {
    let store = temp_store().await;

    // Two distinct external ids carrying the same unique title: the second
    // violates the title index, rolls back alone and the batch continues.
    let batch = vec![
        record("20", "Дубликат"),
        record("21", "Дубликат"),
        record("22", "Уникальный"),
    ];

    let written = store.upsert_anime_batch(&batch).await.unwrap();

    assert_eq!(written, 2);
    assert!(store.get_anime_by_external_id("20").await.unwrap().is_some());
    assert!(store.get_anime_by_external_id("21").await.unwrap().is_none());
    assert!(store.get_anime_by_external_id("22").await.unwrap().is_some());
}

#[tokio::test]
async fn genre_registrar_is_idempotent() {
    let store = temp_store().await;

    let genre = GenreRef {
        external_id: "22".to_string(),
        name: "Romance".to_string(),
        russian: Some("Романтика".to_string()),
    };

    let first = store.ensure_genre(&genre).await.unwrap();
    let second = store.ensure_genre(&genre).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(store.list_genres().await.unwrap().len(), 1);

    let found = store.get_genre_by_external_id("22").await.unwrap().unwrap();
    assert_eq!(found.name, "Romance");
}

#[tokio::test]
async fn genre_rows_are_never_rewritten_after_creation() {
    let store = temp_store().await;

    let original = GenreRef {
        external_id: "8".to_string(),
        name: "Drama".to_string(),
        russian: Some("Драма".to_string()),
    };
    store.ensure_genre(&original).await.unwrap();

    // A later occurrence with a different spelling resolves to the existing
    // row without touching it.
    let renamed = GenreRef {
        external_id: "8".to_string(),
        name: "Drama Renamed".to_string(),
        russian: None,
    };
    let resolved = store.ensure_genre(&renamed).await.unwrap();

    assert_eq!(resolved.name, "Drama");
    assert_eq!(resolved.russian.as_deref(), Some("Драма"));
}
