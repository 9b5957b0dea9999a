pub mod transform;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clients::shikimori::{RawAnime, ShikimoriClient};
use crate::config::SourceConfig;
use crate::db::Store;
use crate::models::anime::{NewAnime, TransformedAnime};

/// How an ingestion run ended. There is no partial-resume state: an aborted
/// run restarts from page 1 and converges through upsert idempotency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    Completed,
    Aborted,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub pages_fetched: u32,
    pub written: u64,
    pub message: String,
}

impl SyncReport {
    fn completed(pages_fetched: u32, written: u64) -> Self {
        Self {
            outcome: SyncOutcome::Completed,
            pages_fetched,
            written,
            message: "Anime list saved successfully".to_string(),
        }
    }

    fn aborted(pages_fetched: u32, written: u64) -> Self {
        Self {
            outcome: SyncOutcome::Aborted,
            pages_fetched,
            written,
            message: "Anime list not saved".to_string(),
        }
    }
}

/// Drives the catalog ingestion pipeline: fetch a page, transform each
/// record, register its genres, hand the page to the upsert synchronizer.
///
/// Pages are processed strictly sequentially, with a short sleep between
/// requests to bound the rate against the remote source. The page ceiling
/// is a circuit-breaker against unbounded remote growth.
#[derive(Clone)]
pub struct SyncService {
    client: ShikimoriClient,
    store: Store,
    max_pages: u32,
    page_delay: Duration,
    running: Arc<AtomicBool>,
}

impl SyncService {
    #[must_use]
    pub fn new(client: ShikimoriClient, store: Store, config: &SourceConfig) -> Self {
        Self {
            client,
            store,
            max_pages: config.max_pages,
            page_delay: Duration::from_millis(config.page_delay_ms),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Runs one full ingestion pass, or returns `None` when a run is
    /// already in flight. The scheduler's no-overlap policy and the manual
    /// API trigger both go through here.
    pub async fn try_run(&self) -> Option<SyncReport> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }

        let report = self.run_pages().await;
        self.running.store(false, Ordering::SeqCst);
        Some(report)
    }

    async fn run_pages(&self) -> SyncReport {
        let mut written = 0u64;
        let mut pages_fetched = 0u32;

        for page in 1..=self.max_pages {
            let raw = match self.client.fetch_page(page).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("fetch failed on page {page}, aborting run: {e}");
                    return SyncReport::aborted(pages_fetched, written);
                }
            };

            if raw.is_empty() {
                info!("catalog exhausted at page {page}");
                break;
            }

            pages_fetched += 1;
            metrics::counter!("shikidb_pages_fetched").increment(1);

            let records = self.prepare_page(raw).await;
            let page_written = match self.store.upsert_anime_batch(&records).await {
                Ok(n) => n,
                Err(e) => {
                    warn!("page {page} batch failed entirely: {e}");
                    0
                }
            };
            written += page_written;
            metrics::counter!("shikidb_records_written").increment(page_written);

            debug!("page {page} done, {page_written} records written");

            tokio::time::sleep(self.page_delay).await;
        }

        info!("sync completed: {written} records written across {pages_fetched} pages");
        SyncReport::completed(pages_fetched, written)
    }

    /// Transforms a raw page and registers every referenced genre before
    /// folding its id into the parent record. A genre that cannot be
    /// registered is dropped from the record so catalog rows never point at
    /// a tag row that does not exist.
    async fn prepare_page(&self, raw: Vec<RawAnime>) -> Vec<NewAnime> {
        let mut records = Vec::with_capacity(raw.len());

        for item in raw {
            let TransformedAnime { mut record, genres } = transform::transform_record(item);

            let mut genre_ids = Vec::with_capacity(genres.len());
            for genre in &genres {
                match self.store.ensure_genre(genre).await {
                    Ok(_) => genre_ids.push(genre.external_id.clone()),
                    Err(e) => warn!(
                        "genre {} not registered, dropping from record: {e}",
                        genre.external_id
                    ),
                }
            }
            record.genre_ids = genre_ids;

            records.push(record);
        }

        records
    }
}
