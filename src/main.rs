use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use newsreel::ads::AdService;
use newsreel::app::{App, AppEvent};
use newsreel::config::Config;
use newsreel::news::NewsClient;
use newsreel::retrieval::RetrievalController;
use newsreel::storage::{Database, DatabaseError, StatsStore};
use newsreel::ui;

/// Get the config directory path (~/.config/newsreel/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("newsreel");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(name = "newsreel", about = "Terminal news reader powered by NewsAPI")]
struct Args {
    /// Config file (defaults to ~/.config/newsreel/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print engagement stats as JSON and exit
    #[arg(long)]
    stats: bool,

    /// Reset engagement stats (delete and recreate the database)
    #[arg(long)]
    reset_stats: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for --stats output.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    // SEC-007: Set directory permissions on Unix (user-only access)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(&config_dir, std::fs::Permissions::from_mode(0o700))
        {
            tracing::warn!(
                path = %config_dir.display(),
                error = %e,
                "Failed to set config directory permissions to 0700"
            );
        }
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    config.apply_env();

    let db_path = config_dir.join("newsreel.db");

    if args.reset_stats && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        println!("Engagement stats reset.");
    }

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of newsreel appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    let stats_store = Arc::new(StatsStore::open(db.clone()).await);

    if args.stats {
        let stats = stats_store.get_stats().await;
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialize stats")?
        );
        db.close().await;
        return Ok(());
    }

    // Connect timeout only: a slow NewsAPI response is left to finish.
    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(30))
        .user_agent(concat!("newsreel/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let news = NewsClient::new(http, &config.news).context("Invalid NewsAPI configuration")?;
    if !news.has_api_key() {
        eprintln!("Warning: no NewsAPI key configured. Set NEWS_API_KEY or [news].api_key.");
    }

    let retrieval = RetrievalController::with_settings(&config.news.country, config.news.sort_by());
    let ads = AdService::new(config.ads.clone());

    let mut app = App::new(Arc::new(news), Arc::new(ads), stats_store, retrieval);

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    db.close().await;
    println!("Goodbye!");
    Ok(())
}
