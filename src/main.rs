mod api;
mod config;
mod db;
mod export;
mod logging;
mod models;
mod run;
mod session;
mod ui;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let proj_dirs = directories::ProjectDirs::from("com", "expensetui", "ExpenseTUI")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

    let config = config::Config::load(&proj_dirs.config_dir().join("config.toml"))?;
    logging::init(data_dir, &config)?;
    tracing::info!(api_url = %config.api_url, "starting expensetui");

    let mut db = db::Database::open(&data_dir.join("expensetui.db"))?;

    match args.len() {
        1 => run::as_tui(&config, &mut db),
        2.. => run::as_cli(&args, &config, &mut db),
        _ => {
            eprintln!("Usage: expensetui [command]");
            Ok(())
        }
    }
}
