use anyhow::{Context, Result};
use bh_core::HistoryCache;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bh_cli::commands::{detect, fetch, insights, search, sessions, suggest};
use bh_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let paths = config.source_paths();
    let categorizer = config.categorizer()?;
    let cache = HistoryCache::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Detect => detect::run(&mut out, &paths)?,
        Commands::Fetch { days, source, all } => {
            let days = days.unwrap_or(config.default_days);
            fetch::run(&mut out, &paths, &cache, days, source.as_deref(), *all)?;
        }
        Commands::Sessions {
            days,
            max_gap_hours,
        } => {
            let days = days.unwrap_or(config.default_days);
            let gap = max_gap_hours.unwrap_or(config.max_gap_hours);
            sessions::run(&mut out, &paths, &cache, &categorizer, days, gap)?;
        }
        Commands::Insights { days, top_domains } => {
            let days = days.unwrap_or(config.default_days);
            let top = top_domains.unwrap_or(config.top_domains);
            insights::run(
                &mut out,
                &paths,
                &cache,
                &categorizer,
                days,
                config.max_gap_hours,
                top,
            )?;
        }
        Commands::Search { query } => {
            search::run(&mut out, &paths, &cache, query, config.default_days)?;
        }
        Commands::Suggest => {
            suggest::run(&mut out, &paths, &cache, &categorizer, config.default_days)?;
        }
    }

    Ok(())
}
