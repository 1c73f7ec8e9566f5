use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pagewatch::application::usecases::CheckPageUseCase;
use pagewatch::application::{Notifier, Registry, Scheduler, SnapshotStore};
use pagewatch::domain::PageUrl;
use pagewatch::infrastructure::{
    console_notifier::ConsoleNotifier, http_fetcher::HttpPageFetcher,
    memory_store::InMemorySnapshotStore, multi_notifier::MultiNotifier,
    slack_notifier::SlackNotifier, sqlite_store::SqliteSnapshotStore,
};
use pagewatch::interfaces::config::Config;
use pagewatch::interfaces::http_api::{build_router, ApiState};

#[derive(Parser, Debug)]
#[command(name = "pagewatch")]
struct Args {
    /// Path to config.yaml
    #[arg(long, default_value = "config.yaml")]
    config: String,

    /// Run one check cycle for every registered page, then exit
    #[arg(long)]
    once: bool,

    /// Do not send external notifications (console only)
    #[arg(long)]
    dry_run: bool,

    /// In-memory store only; nothing survives restart
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("pagewatch=info".parse().unwrap()),
        )
        .init();
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    // 1) load config
    let cfg = match Config::load_or_default(&args.config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load config {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // 2) build infra
    let store: Arc<dyn SnapshotStore> = if args.ephemeral {
        tracing::warn!("--ephemeral enabled: snapshots will not survive restart");
        Arc::new(InMemorySnapshotStore::new())
    } else {
        let db_url = cfg.resolve_database_url();
        match SqliteSnapshotStore::new(&db_url).await {
            Ok(s) => Arc::new(s),
            Err(e) => {
                tracing::error!("Failed to open snapshot store {db_url}: {e}");
                std::process::exit(1);
            }
        }
    };

    let fetcher = match HttpPageFetcher::new(Some(Duration::from_secs(cfg.fetch_timeout_seconds))) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("Failed to build http client: {e}");
            std::process::exit(1);
        }
    };

    // notifiers fanout
    let mut notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(ConsoleNotifier::new())];
    if !args.dry_run {
        if let Ok(hook) = std::env::var("SLACK_WEBHOOK_URL") {
            notifiers.push(Box::new(SlackNotifier::new(hook)));
        } else {
            tracing::warn!("SLACK_WEBHOOK_URL not set, SlackNotifier disabled");
        }
    } else {
        tracing::warn!("--dry-run enabled: only console output");
    }
    let notifier: Arc<dyn Notifier> = Arc::new(MultiNotifier::new(notifiers));

    // 3) checker + scheduler + registry
    let checker = CheckPageUseCase {
        fetcher: Arc::new(fetcher),
        store: store.clone(),
        notifier,
    };

    if args.once {
        run_once(&cfg, store, &checker).await;
        return;
    }

    let scheduler = Arc::new(Scheduler::new(
        Duration::from_secs(cfg.check_interval_seconds),
        checker,
    ));
    let registry = Arc::new(Registry::new(store, scheduler));

    // startup contract: repopulate from durable state before arming anything else
    match registry.seed().await {
        Ok(n) => tracing::info!(pages = n, "seeded from store"),
        Err(e) => {
            tracing::error!("Failed to seed from store: {e}");
            std::process::exit(1);
        }
    }
    for raw in &cfg.urls {
        if let Err(e) = registry.add_url(raw).await {
            tracing::warn!(url = %raw, error = %e, "skipping configured url");
        }
    }

    tracing::info!(
        interval_seconds = cfg.check_interval_seconds,
        "polling started"
    );

    // 4) registration surface
    let app = build_router(ApiState { registry });
    let listener = match tokio::net::TcpListener::bind(&cfg.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {e}", cfg.listen_addr);
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %cfg.listen_addr, "api listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("api server failed: {e}");
        std::process::exit(1);
    }
}

/// One cycle for every persisted page plus any configured urls, then exit.
async fn run_once(cfg: &Config, store: Arc<dyn SnapshotStore>, checker: &CheckPageUseCase) {
    let mut urls: Vec<PageUrl> = match store.load_all().await {
        Ok(targets) => targets.into_iter().map(|t| t.url).collect(),
        Err(e) => {
            tracing::error!("Failed to load pages: {e}");
            std::process::exit(1);
        }
    };
    for raw in &cfg.urls {
        match PageUrl::parse(raw) {
            Ok(url) if !urls.contains(&url) => {
                if let Err(e) = store.register(&url).await {
                    tracing::warn!(%url, error = %e, "skipping configured url");
                    continue;
                }
                urls.push(url);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(url = %raw, error = %e, "skipping configured url"),
        }
    }

    for url in &urls {
        if let Err(e) = checker.execute(url).await {
            tracing::error!(%url, error = %e, "check cycle failed");
        }
    }
    tracing::info!(pages = urls.len(), "run once completed");
}
