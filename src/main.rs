use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use futures::future::try_join3;
#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::task;
use tracing::{error, info};
use tracing_subscriber::{filter, prelude::*, Layer};

use crate::api::ChessApi;
use crate::models::DashboardData;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod analytics;
mod api;
mod db;
mod models;
mod render;

const DEFAULT_USERNAME: &str = "peeves73";

#[derive(Debug, Clone)]
struct Config {
    api_base: String,
    log_path: PathBuf,
    db_path: PathBuf,
}

fn load_config() -> Result<Config> {
    dotenv().ok();

    let api_base =
        env::var("CHESS_API_BASE").unwrap_or_else(|_| api::DEFAULT_API_BASE.to_string());

    let log_path_str = env::var("LOG_PATH").unwrap_or_else(|_| {
        if cfg!(target_os = "linux") {
            "/var/logs/chess_dashboard"
        } else {
            "."
        }
        .to_string()
    });
    let log_path = PathBuf::from(log_path_str);

    let db_path_str = env::var("DB_PATH").unwrap_or_else(|_| "sqlite.db".to_string());
    let db_path = PathBuf::from(db_path_str);

    Ok(Config {
        api_base,
        log_path,
        db_path,
    })
}

/// Fetches the three player resources concurrently. Any single failure
/// fails the whole refresh; nothing partial gets rendered.
async fn fetch_dashboard(api: &ChessApi, username: &str) -> Result<DashboardData> {
    let (profile, stats, games) = try_join3(
        api.get_profile(username),
        api.get_stats(username),
        api.get_recent_games(username),
    )
    .await?;
    Ok(DashboardData {
        profile,
        stats,
        games,
    })
}

/// One search: fetch, then apply only if this is still the latest issued
/// request. A batch resolving after a newer search started is stale and
/// gets dropped; in-flight fetches are never cancelled.
async fn run_search(
    api: Arc<ChessApi>,
    db_path: PathBuf,
    username: String,
    token: u64,
    latest_token: Arc<AtomicU64>,
) {
    info!("Refreshing dashboard for {} (request {})", username, token);
    let result = fetch_dashboard(&api, &username).await;

    if latest_token.load(Ordering::SeqCst) != token {
        info!(
            "Discarding stale batch {} for {}, a newer search is active",
            token, username
        );
        return;
    }

    match result {
        Ok(data) => {
            println!("\n{}\n", render::render_dashboard(&data));
            if let Err(e) = db::save_last_username(&db_path, &username) {
                error!("Failed to persist last searched username: {:#}", e);
            }
        }
        Err(e) => {
            error!("Refresh for {} failed: {:#}", username, e);
            println!("Could not find data for user \"{}\".", username);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config().context("Failed to load configuration")?;

    std::panic::set_hook(Box::new(|i| {
        error!("Panic'd: {}", i);
    }));

    let file_appender = tracing_appender::rolling::daily(&config.log_path, "dashboard.log");
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(file_appender);
    let console_layer = console_subscriber::ConsoleLayer::builder()
        .server_addr(([0, 0, 0, 0], 5555))
        .spawn();

    tracing_subscriber::registry()
        .with(console_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_appender)
                .with_filter(filter::filter_fn(|metadata| {
                    metadata.target().starts_with("chess_dashboard")
                })),
        )
        .init();

    db::init_db(&config.db_path).context("Failed to initialize database")?;

    let http_client = reqwest::Client::builder()
        .connection_verbose(true)
        .build()?;
    let api = Arc::new(ChessApi::new(http_client, config.api_base.clone()));
    let latest_token = Arc::new(AtomicU64::new(0));

    let initial_username = match db::load_last_username(&config.db_path) {
        Ok(Some(username)) => username,
        Ok(None) => DEFAULT_USERNAME.to_string(),
        Err(e) => {
            error!("Failed to load last searched username: {:#}", e);
            DEFAULT_USERNAME.to_string()
        }
    };

    let token = latest_token.fetch_add(1, Ordering::SeqCst) + 1;
    task::spawn(run_search(
        api.clone(),
        config.db_path.clone(),
        initial_username,
        token,
        latest_token.clone(),
    ));

    println!("Type a chess.com username and press enter to search (ctrl-d quits).");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let username = line.trim().to_string();
        if username.is_empty() {
            continue;
        }
        let token = latest_token.fetch_add(1, Ordering::SeqCst) + 1;
        task::spawn(run_search(
            api.clone(),
            config.db_path.clone(),
            username,
            token,
            latest_token.clone(),
        ));
    }

    Ok(())
}
