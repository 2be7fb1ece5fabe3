//! This module provides functionality for loading and handling the application's configuration.
//!
//! It defines the `MovieBuddyConfig` struct, which holds the configuration parameters,
//! and a `load_config` function to load the configuration from a file.
//!
//! # Examples
//!
//! Loading the configuration from a file:
//!
//! ```no_run
//! use movie_buddy::config::{MovieBuddyConfig, load_config};
//!
//! let config_file_path = "/path/to/config.yaml";
//! let config: MovieBuddyConfig = load_config(config_file_path).unwrap();
//! println!("{:?}", config);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::{error::Error, fs};

use tracing::*;

/// Default upper bound for the number of requested recommendations.
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;

/// Represents the application's configuration.
///
/// This struct holds the parameters needed to run the browser: where the
/// persisted plot corpus and embedding datasets live, which embedding kind
/// to compare on by default, and how many recommendations a user may request
/// at once. It is constructed by loading a YAML configuration file using the
/// `load_config` function.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct MovieBuddyConfig {
    /// Path of the JSON Lines plot dataset.
    pub plots_path: PathBuf,

    /// Embedding kind → path of its bincode-encoded vector dataset.
    pub embeddings: BTreeMap<String, PathBuf>,

    /// The embedding kind used when a request doesn't name one.
    pub default_embedding: String,

    // Upper bound for k in a recommendation request.
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

fn default_max_recommendations() -> usize {
    DEFAULT_MAX_RECOMMENDATIONS
}

impl MovieBuddyConfig {
    /// Check the configuration for internal consistency.
    ///
    /// # Errors
    /// - No embedding sources are configured.
    /// - `default_embedding` names a kind with no configured source.
    /// - `max_recommendations` is zero.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.embeddings.is_empty() {
            return Err("No embedding sources configured".into());
        }
        if !self.embeddings.contains_key(&self.default_embedding) {
            return Err(format!(
                "default_embedding '{}' has no configured source (available: {})",
                self.default_embedding,
                self.embeddings
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            )
            .into());
        }
        if self.max_recommendations == 0 {
            return Err("max_recommendations must be at least 1".into());
        }
        Ok(())
    }
}

/// Loads the application's configuration from a YAML file.
///
/// This function reads the file at the given path, parses it as YAML,
/// constructs a `MovieBuddyConfig` from it, and validates it.
///
/// # Parameters
///
/// - `file`: The path to the YAML configuration file.
///
/// # Returns
///
/// - `Ok(MovieBuddyConfig)`: The loaded configuration.
/// - `Err(Box<dyn Error>)`: An error occurred while reading the file, parsing
///   the YAML, or validating the result.
///
/// # Examples
///
/// ```no_run
/// use movie_buddy::config::load_config;
///
/// let config_file_path = "/path/to/config.yaml";
/// match load_config(config_file_path) {
///     Ok(config) => println!("{:?}", config),
///     Err(err) => eprintln!("Error loading config: {}", err),
/// }
/// ```
pub fn load_config(file: &str) -> Result<MovieBuddyConfig, Box<dyn Error>> {
    debug!("Loading config from {file}");
    let content = fs::read_to_string(file)?;
    let config: MovieBuddyConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
