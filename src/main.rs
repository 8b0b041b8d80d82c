use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use movieboard::app::{App, AppEvent, FetchReason};
use movieboard::board::{BoardError, MovieBoard, PageSize, Selection};
use movieboard::catalog::Catalog;
use movieboard::config::Config;
use movieboard::keybindings::KeybindingRegistry;
use movieboard::storage::{Database, DatabaseError, MovieRepository, StoreError};
use movieboard::theme::{StyleMap, ThemeVariant};
use movieboard::ui;

/// ~/.config/movieboard/
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("movieboard"))
}

#[derive(Parser, Debug)]
#[command(name = "movieboard", about = "Browse, rate and filter movies in the terminal")]
struct Args {
    /// Config file (default: ~/.config/movieboard/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fallback catalog: "builtin", a JSON file, or an http(s) URL
    #[arg(long, value_name = "SOURCE")]
    catalog: Option<String>,

    /// Movies per page (4, 8 or 12)
    #[arg(long, value_name = "N", value_parser = parse_page_size)]
    page_size: Option<PageSize>,

    /// Overwrite the stored movies with a fresh copy from the catalog
    #[arg(long)]
    reset_store: bool,

    /// Print the first page and the category list, then exit
    #[arg(long)]
    list: bool,
}

fn parse_page_size(s: &str) -> Result<PageSize, String> {
    s.parse::<usize>()
        .ok()
        .and_then(PageSize::from_count)
        .ok_or_else(|| format!("page size must be 4, 8 or 12 (got '{}')", s))
}

fn ensure_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(config_dir, std::fs::Permissions::from_mode(0o700))
        {
            tracing::warn!(
                path = %config_dir.display(),
                error = %e,
                "Failed to set config directory permissions to 0700"
            );
        }
    }
    Ok(())
}

async fn open_database(db_path: &Path) -> Result<Database> {
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    match Database::open(db_path_str).await {
        Ok(db) => Ok(db),
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of movieboard appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => Err(anyhow::anyhow!("Failed to open database: {}", e)),
    }
}

fn print_first_page(board: &MovieBoard<Database>) {
    println!("Categories: {}", board.categories().join(", "));
    println!(
        "Page {}/{} ({} per page)",
        board.selection().current_page(),
        board.page_count(),
        board.selection().page_size()
    );
    for movie in board.window() {
        println!(
            "  [{}] {} ({}) +{} -{}",
            movie.id, movie.title, movie.category, movie.likes, movie.dislikes
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout belongs to the TUI.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    ensure_config_dir(&config_dir)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(source) = args.catalog {
        config.catalog = source;
    }
    if let Some(size) = args.page_size {
        config.movies_per_page = size.get();
    }

    let catalog = Catalog::from_source(&config.catalog, config.fetch_timeout())
        .context("Invalid catalog source")?;
    let selection = Selection::new(config.page_size(), config.pagination, config.token_mode());

    let db = open_database(&config_dir.join("movies.db")).await?;
    let mut board = MovieBoard::new(MovieRepository::new(db), selection);

    if args.reset_store {
        let count = board
            .reset_from(&catalog)
            .await
            .with_context(|| format!("Failed to reset from {}", catalog.describe()))?;
        println!("Stored {} movies from {}", count, catalog.describe());
        if !args.list {
            return Ok(());
        }
    }

    if args.list {
        if !args.reset_store {
            board
                .initialize(&catalog)
                .await
                .context("Failed to load movies")?;
        }
        print_first_page(&board);
        return Ok(());
    }

    // Store first; an absent or corrupt copy falls back to a background fetch.
    let loaded = match board.load_persisted().await {
        Ok(found) => found,
        Err(BoardError::Store(StoreError::Corrupt(e))) => {
            tracing::warn!(error = %e, "Persisted movies are corrupt, refetching");
            false
        }
        Err(e) => return Err(e).context("Failed to read stored movies"),
    };

    let mut app = App::new(board, catalog);

    match ThemeVariant::from_str_name(&config.theme) {
        Some(variant) => app.theme = StyleMap::new(variant),
        None => tracing::warn!(theme = %config.theme, "Unknown theme, using dark"),
    }

    let mut keybindings = KeybindingRegistry::new();
    for warning in keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
    }
    app.keybindings = keybindings;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    if !loaded {
        ui::spawn_catalog_fetch(&mut app, FetchReason::Initial, &event_tx);
    }

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
