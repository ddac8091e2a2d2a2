//! Command-line interface parsing for the production lists CLI
//!
//! Credentials come from the settings file or the `API_INTERFACE_*` environment
//! variables; only the non-secret settings can also be given as flags.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{EndpointConfig, ENV_HOST, ENV_TIMEOUT_SECS};

/// Production lists - commodity and country lists from the production data API
#[derive(Parser, Debug)]
#[command(name = "prodlist")]
#[command(about = "Commodity and country lists from the production data API")]
#[command(version)]
pub struct Cli {
    /// Path to a JSON settings file (default: $XDG_CONFIG_HOME/prodlist/settings.json)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API host, overriding the settings file
    #[arg(long, env = ENV_HOST)]
    pub host: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", env = ENV_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Directory for cached listings (default: $XDG_CACHE_HOME/prodlist)
    #[arg(long, value_name = "DIR", conflicts_with = "no_cache")]
    pub cache_dir: Option<PathBuf>,

    /// Keep fetched listings in memory only
    #[arg(long)]
    pub no_cache: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: ListCommand,
}

/// Which list to print
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCommand {
    /// Countries sorted by name
    Countries,
    /// Commodities grouped by parent
    Commodities,
    /// Both lists together
    Overview,
}

/// How results are written to stdout
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Where fetched listings are cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheChoice {
    /// The platform cache directory
    Default,
    /// A specific directory
    Dir(PathBuf),
    /// Process memory only
    Memory,
}

impl Cli {
    /// Applies flag overrides on top of the loaded settings
    pub fn apply(&self, mut config: EndpointConfig) -> EndpointConfig {
        if let Some(host) = &self.host {
            config.host = Some(host.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
        config
    }

    pub fn cache_choice(&self) -> CacheChoice {
        match (&self.cache_dir, self.no_cache) {
            (_, true) => CacheChoice::Memory,
            (Some(dir), false) => CacheChoice::Dir(dir.clone()),
            (None, false) => CacheChoice::Default,
        }
    }
}
