use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use weatherdash_core::{
    Config, FileStore, RecentSearches, SearchHistory, WeatherProvider, fetch_all,
    provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Terminal weather dashboard")]
pub struct Cli {
    /// OpenWeather API key; overrides the configured one.
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `dashboard`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, default city and global cities interactively.
    Configure,

    /// Search a city: show its weather and add it to recent searches.
    Show {
        /// City name; the configured default city when absent.
        city: Option<String>,
    },

    /// List recent searches, newest first.
    History,

    /// Show current weather for a city without recording it.
    Select {
        city: String,
    },

    /// Forget all recent searches.
    ClearHistory,

    /// Current weather for the configured global cities.
    Global,

    /// Clock, default city, recent searches and global cities.
    Dashboard,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = self.config.as_deref();
        let mut config = load_config(config_path)?;
        if let Some(key) = self.api_key {
            config.set_api_key(key);
        }

        match self.command.unwrap_or(Command::Dashboard) {
            Command::Configure => {
                // Reload so a key passed on the command line is not written to disk.
                configure(load_config(config_path)?, config_path)?;
            }
            Command::Show { city } => {
                let (_, mut history) = open(&config)?;
                let city = city.unwrap_or_else(|| config.default_city.clone());
                let entries = history
                    .record_search(&city)
                    .await
                    .context("City not found")?;

                if let Some(latest) = entries.first() {
                    print!("{}", render::main_weather(&latest.snapshot));
                    print!("{}", render::details(&latest.snapshot, &Local));
                }
            }
            Command::History => {
                let searches = open_searches(&config)?;
                print!("{}", render::history(searches.entries()));
            }
            Command::Select { city } => {
                let (_, history) = open(&config)?;
                let snapshot = history.select_entry(&city).await.context("City not found")?;
                print!("{}", render::main_weather(&snapshot));
                print!("{}", render::details(&snapshot, &Local));
            }
            Command::ClearHistory => {
                open_searches(&config)?.clear();
                println!("Search history cleared.");
            }
            Command::Global => {
                let provider = provider_from_config(&config)?;
                let snapshots = fetch_all(&provider, &config.global_cities).await;
                print!("{}", render::global_cities(&snapshots));
            }
            Command::Dashboard => {
                let (provider, history) = open(&config)?;

                println!("{}", render::header(&Local::now()));
                println!();

                let (main, global) = tokio::join!(
                    provider.fetch_weather(&config.default_city),
                    fetch_all(provider.as_ref(), &config.global_cities),
                );

                match main {
                    Ok(snapshot) => {
                        print!("{}", render::main_weather(&snapshot));
                        print!("{}", render::details(&snapshot, &Local));
                    }
                    Err(err) => {
                        tracing::debug!(error = %err, "Default city lookup failed");
                        println!("City not found");
                    }
                }

                println!("\nRecent searches");
                print!("{}", render::history(history.entries()));

                println!("\nGlobal cities");
                print!("{}", render::global_cities(&global));
            }
        }

        Ok(())
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// The persisted history alone; needs no API key.
fn open_searches(config: &Config) -> anyhow::Result<RecentSearches> {
    let store = FileStore::new(config.history_dir()?);
    Ok(RecentSearches::load(Box::new(store)))
}

/// Provider plus the persisted history, both driven by `config`.
fn open(config: &Config) -> anyhow::Result<(Arc<dyn WeatherProvider>, SearchHistory)> {
    let provider: Arc<dyn WeatherProvider> = Arc::new(provider_from_config(config)?);
    let store = FileStore::new(config.history_dir()?);
    let history = SearchHistory::load(provider.clone(), Box::new(store));
    Ok((provider, history))
}

fn configure(mut config: Config, path: Option<&Path>) -> anyhow::Result<()> {
    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key);
    }

    config.default_city = inquire::Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()?;

    let cities = inquire::Text::new("Global cities (comma separated):")
        .with_default(&config.global_cities.join(", "))
        .prompt()?;
    config.global_cities = parse_city_list(&cities);

    let saved_to = match path {
        Some(path) => {
            config.save_to(path)?;
            path.to_path_buf()
        }
        None => config.save()?,
    };
    println!("Configuration saved to {}", saved_to.display());

    Ok(())
}

fn parse_city_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
