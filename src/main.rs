//! Production Lists CLI - print commodity and country lists
//!
//! Fetches the listings from the production data API, using the on-disk cache
//! when it is fresh, and prints them as text or JSON. Fetch problems never fail
//! the command; they show up as warnings on stderr and empty output.

use std::sync::Arc;

use clap::Parser;

use production_lists::api::HttpClient;
use production_lists::cache::{CacheManager, CacheStore, MemoryCache};
use production_lists::cli::{CacheChoice, Cli, ListCommand, OutputFormat};
use production_lists::config::EndpointConfig;
use production_lists::notify::TracingNotifier;
use production_lists::{logging, render, DataFetcher, ListService};

/// Picks the cache backend, falling back to memory when no cache directory exists
fn open_cache(choice: CacheChoice) -> Box<dyn CacheStore> {
    match choice {
        CacheChoice::Memory => Box::new(MemoryCache::new()),
        CacheChoice::Dir(dir) => Box::new(CacheManager::with_dir(dir)),
        CacheChoice::Default => match CacheManager::new() {
            Some(manager) => Box::new(manager),
            None => {
                tracing::warn!("no cache directory available, caching in memory");
                Box::new(MemoryCache::new())
            }
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logging::init()?;

    let config = cli.apply(EndpointConfig::load(cli.config.as_deref())?);
    let client = HttpClient::new(config.timeout())?;
    let notifier = Arc::new(TracingNotifier::new());
    let fetcher = DataFetcher::new(config, client, open_cache(cli.cache_choice()), Arc::clone(&notifier));
    let service = ListService::new(fetcher);

    let output = match (cli.command, cli.format) {
        (ListCommand::Countries, OutputFormat::Text) => render::countries_text(&service.load_countries().await),
        (ListCommand::Countries, OutputFormat::Json) => render::to_json(&service.load_countries().await)?,
        (ListCommand::Commodities, OutputFormat::Text) => {
            render::commodities_text(&service.load_commodities().await)
        }
        (ListCommand::Commodities, OutputFormat::Json) => {
            render::to_json(&service.load_commodities().await)?
        }
        (ListCommand::Overview, OutputFormat::Text) => render::overview_text(&service.global_production().await),
        (ListCommand::Overview, OutputFormat::Json) => render::to_json(&service.global_production().await)?,
    };

    print!("{}", output);
    if cli.format == OutputFormat::Json {
        println!();
    }

    for warning in notifier.take_warnings() {
        eprintln!("warning: {}", warning);
    }

    Ok(())
}
