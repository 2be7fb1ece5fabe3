//! Main module for the Movie Buddy CLI application (mb).
//!
//! This module provides the main function and auxiliary functionalities for
//! the CLI application. It handles command parsing, configuration loading, and
//! initialization, as well as invoking the appropriate functionalities based on
//! the provided command-line arguments.
//!
//! # Examples
//!
//! Browsing the catalog interactively:
//!
//! ```sh
//! cargo run -- browse
//! mb browse
//! ```
//!
//! Printing the three movies most similar to the movie on page 42:
//!
//! ```sh
//! cargo run -- recommend 42 -k 3
//! mb recommend 42 -k 3
//! ```
//!
//! Initializing the application's configuration:
//!
//! ```sh
//! cargo run -- init
//! mb init
//! ```

use clap::Parser;
use movie_buddy::{
    browser,
    catalog::Catalog,
    commands,
    config::{self, MovieBuddyConfig},
    render, similarity,
};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::{env, error::Error, fs};
use tracing::{debug, info};

static TRACING: OnceCell<()> = OnceCell::new();

fn main() -> Result<(), Box<dyn Error>> {
    TRACING.get_or_init(|| {
        tracing_subscriber::fmt::init();
    });
    run()
}

/// Main function body of the Movie Buddy CLI application.
///
/// Parses command-line arguments, loads configuration and the catalog for the
/// commands that need them, and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if there is an issue loading the configuration or the
/// catalog, or executing the specified command.
fn run() -> Result<(), Box<dyn Error>> {
    let cli = commands::Cli::parse();

    match cli.command {
        commands::Commands::Browse { embedding } => {
            let config = load_session_config()?;
            let kind = embedding.unwrap_or_else(|| config.default_embedding.clone());
            let catalog = Catalog::load(&config.plots_path, &config.embeddings)?;
            browser::browse(&catalog, &config, &kind)?;
        }
        commands::Commands::Recommend {
            page,
            count,
            embedding,
        } => {
            let config = load_session_config()?;
            let kind = embedding.unwrap_or_else(|| config.default_embedding.clone());
            let catalog = Catalog::load(&config.plots_path, &config.embeddings)?;
            recommend_once(&catalog, page, count as usize, &kind)?;
        }
        commands::Commands::Init => {
            debug!("Initializing configuration");
            init()?;
        }
    }

    Ok(())
}

/// Resolve and load the session configuration.
///
/// In a test environment the config is read from the current directory,
/// otherwise from the user's per-platform config directory.
fn load_session_config() -> Result<MovieBuddyConfig, Box<dyn Error>> {
    let config_path = if env::var("IN_TEST_ENVIRONMENT").is_ok() {
        env::current_dir()?.join("config.yaml")
    } else {
        movie_buddy::config_dir()?.join("config.yaml")
    };

    debug!("Loading config from: {}", config_path.display());
    let config = config::load_config(
        config_path
            .to_str()
            .ok_or("Config path is not valid UTF-8")?,
    )?;
    debug!("Config loaded: {:?}", config);
    Ok(config)
}

/// Print the movies most similar to the one at the given 1-based page.
///
/// Runs the similarity engine over the full catalog and prints the query
/// movie followed by its `k` nearest neighbors, with scores.
fn recommend_once(
    catalog: &Catalog,
    page: usize,
    k: usize,
    kind: &str,
) -> Result<(), Box<dyn Error>> {
    if page == 0 || page > catalog.len() {
        return Err(format!("Page number should be between 1 and {}", catalog.len()).into());
    }

    let neighbors = similarity::top_k(catalog.records(), page - 1, kind, k + 1)?;
    let records: Vec<_> = neighbors
        .iter()
        .map(|n| catalog.records()[n.position].clone())
        .collect();
    let scores: Vec<f32> = neighbors.iter().map(|n| n.score).collect();

    render::print_neighbors(&records, &scores)?;
    Ok(())
}

/// Initializes the application's configuration.
///
/// Creates the configuration directory and writes a starter `config.yaml`
/// pointing at the conventional artifact locations. The configuration is
/// stored in YAML format.
///
/// # Errors
///
/// Returns an error if there is an issue creating the directory or the file,
/// or serializing the configuration to YAML.
fn init() -> Result<(), Box<dyn Error>> {
    let config_dir = movie_buddy::config_dir()?;
    info!("Creating config directory: {}", config_dir.display());
    fs::create_dir_all(&config_dir)?;

    let config_path = config_dir.join("config.yaml");
    info!("Creating config file: {}", config_path.display());
    let config = MovieBuddyConfig {
        plots_path: "artifacts/movie_plots.jsonl".into(),
        embeddings: BTreeMap::from([
            ("sbert".to_string(), "artifacts/sbert_embeddings.bin".into()),
            ("tfidf".to_string(), "artifacts/tfidf_embeddings.bin".into()),
        ]),
        default_embedding: "sbert".to_string(),
        max_recommendations: 5,
    };
    let config_yaml = serde_yaml::to_string(&config)?;
    fs::write(config_path, config_yaml)?;

    Ok(())
}
