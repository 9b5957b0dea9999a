use crate::entities::{anime, genre};
use crate::models::anime::{AnimeQuery, GenreRef, NewAnime};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::anime::UpsertOutcome;

/// Handle over the catalog store: owns the connection pool and hands out
/// repositories. Cloning is cheap; the pool is shared.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn anime_repo(&self) -> repositories::anime::AnimeRepository {
        repositories::anime::AnimeRepository::new(self.conn.clone())
    }

    fn genre_repo(&self) -> repositories::genre::GenreRepository {
        repositories::genre::GenreRepository::new(self.conn.clone())
    }

    pub async fn upsert_anime(&self, record: &NewAnime) -> Result<UpsertOutcome> {
        self.anime_repo().upsert(record).await
    }

    pub async fn upsert_anime_batch(&self, records: &[NewAnime]) -> Result<u64> {
        self.anime_repo().upsert_batch(records).await
    }

    pub async fn get_anime(&self, id: i32) -> Result<Option<anime::Model>> {
        self.anime_repo().get(id).await
    }

    pub async fn get_anime_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<anime::Model>> {
        self.anime_repo().get_by_external_id(external_id).await
    }

    pub async fn search_anime_by_name(&self, name: &str) -> Result<Vec<anime::Model>> {
        self.anime_repo().search_by_name(name).await
    }

    pub async fn list_anime_filtered(
        &self,
        query: &AnimeQuery,
    ) -> Result<(Vec<anime::Model>, u64)> {
        self.anime_repo().list_filtered(query).await
    }

    pub async fn count_anime(&self) -> Result<u64> {
        self.anime_repo().count().await
    }

    pub async fn anime_kinds(&self) -> Result<Vec<String>> {
        self.anime_repo().distinct_kinds().await
    }

    pub async fn anime_ratings(&self) -> Result<Vec<String>> {
        self.anime_repo().distinct_ratings().await
    }

    pub async fn ensure_genre(&self, genre_ref: &GenreRef) -> Result<genre::Model> {
        self.genre_repo().ensure(genre_ref).await
    }

    pub async fn list_genres(&self) -> Result<Vec<genre::Model>> {
        self.genre_repo().list().await
    }

    pub async fn get_genre_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<genre::Model>> {
        self.genre_repo().get_by_external_id(external_id).await
    }
}
