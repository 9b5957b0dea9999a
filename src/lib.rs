pub mod api;
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod scheduler;
pub mod sync;

use anyhow::Context;
use tokio::signal;

use clients::shikimori::ShikimoriClient;
pub use config::Config;
use db::Store;
use scheduler::Scheduler;
use sync::SyncService;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let (layer, task) = tracing_loki::builder()
            .label("app", "shikidb")?
            .build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "daemon" | "-d" | "--daemon" => run_daemon(config, prometheus_handle).await,

        "sync" | "-s" | "--sync" => cmd_sync(&config).await,

        "list" | "ls" | "l" => {
            let page = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1);
            cmd_list_anime(&config, page).await
        }

        "search" | "s" => {
            if args.len() < 3 {
                println!("Usage: shikidb search <query>");
                return Ok(());
            }
            let query = args[2..].join(" ");
            cmd_search_anime(&config, &query).await
        }

        "genres" | "g" => cmd_list_genres(&config).await,

        "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        unknown => {
            println!("Unknown command: {unknown}");
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("shikidb - Shikimori catalog mirror");
    println!("Syncs the full anime catalog into a local database and serves it");
    println!();
    println!("USAGE:");
    println!("  shikidb <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("  daemon            Run the API server and the sync scheduler");
    println!("  sync              Run one full catalog sync and exit");
    println!("  list [page]       List cataloged anime (50 per page)");
    println!("  search <query>    Search the local catalog by name");
    println!("  genres            List registered genres");
    println!("  help              Show this help");
}

async fn run_daemon(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!(
        "shikidb v{} starting in daemon mode...",
        env!("CARGO_PKG_VERSION")
    );

    let state = api::create_app_state(config.clone(), prometheus_handle).await?;

    let scheduler = Scheduler::new(state.sync.clone(), config.scheduler.clone());

    let scheduler_handle = tokio::spawn(async move {
        if let Err(e) = scheduler.start().await {
            error!("Scheduler error: {}", e);
        }
    });

    let server_handle: Option<tokio::task::JoinHandle<()>> = if config.server.enabled {
        let port = config.server.port;
        info!("Starting Web API on port {}", port);

        let app = api::router(state);
        let addr = format!("0.0.0.0:{port}");
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        Some(tokio::spawn(async move {
            info!("Web API running at http://0.0.0.0:{port}");
            if let Err(e) = axum::serve(listener, app).await {
                error!("Web server error: {}", e);
            }
        }))
    } else {
        None
    };

    info!("Daemon running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    scheduler_handle.abort();
    if let Some(handle) = server_handle {
        handle.abort();
    }

    info!("Goodbye");
    Ok(())
}

async fn cmd_sync(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let client = ShikimoriClient::new(&config.source);
    let sync = SyncService::new(client, store, &config.source);

    println!("Starting full catalog sync...");

    match sync.try_run().await {
        Some(report) => {
            println!("{}", report.message);
            println!(
                "  {} records written across {} pages",
                report.written, report.pages_fetched
            );
        }
        None => println!("A sync is already running"),
    }

    Ok(())
}

async fn cmd_list_anime(config: &Config, page: u64) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let query = models::anime::AnimeQuery {
        page,
        limit: 50,
        ..Default::default()
    };
    let (items, total) = store.list_anime_filtered(&query).await?;

    if items.is_empty() {
        println!("Catalog is empty.");
        println!();
        println!("Fill it with: shikidb sync");
        return Ok(());
    }

    println!("Catalog ({total} total, page {page})");
    println!("{:-<70}", "");

    for anime in items {
        let year = anime
            .aired_on
            .map_or("????".to_string(), |d| d.format("%Y").to_string());
        let english = anime.english.as_deref().unwrap_or("-");
        println!(
            "  [{}] {} / {} ({year}, {}, {})",
            anime.external_id, anime.russian, english, anime.kind, anime.status
        );
    }

    Ok(())
}

async fn cmd_search_anime(config: &Config, query: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let items = store.search_anime_by_name(query).await?;

    if items.is_empty() {
        println!("No anime matched '{query}'");
        return Ok(());
    }

    println!("Found {} matches:", items.len());
    for anime in items {
        let english = anime.english.as_deref().unwrap_or("-");
        println!("  [{}] {} / {}", anime.external_id, anime.russian, english);
    }

    Ok(())
}

async fn cmd_list_genres(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let genres = store.list_genres().await?;

    if genres.is_empty() {
        println!("No genres registered yet. Run a sync first.");
        return Ok(());
    }

    println!("Genres ({} total)", genres.len());
    for genre in genres {
        let russian = genre.russian.as_deref().unwrap_or("-");
        println!("  [{}] {} / {}", genre.external_id, genre.name, russian);
    }

    Ok(())
}
