//! This module defines the command-line interface for the application using `clap`.
//!
//! It provides a `Cli` struct that represents the parsed command-line arguments,
//! and a `Commands` enum that represents the available subcommands and their
//! options.
//!
//! # Examples
//!
//! Parsing command-line arguments:
//!
//! ```no_run
//! use clap::{Parser, Subcommand};
//! use movie_buddy::commands::{Cli, Commands};
//!
//! let cli = Cli::parse();
//! match cli.command {
//!     Commands::Browse { .. } => { /* run the interactive browser */ }
//!     Commands::Recommend { .. } => { /* one-shot recommendation */ }
//!     Commands::Init => { /* write a starter config */ }
//! }
//! ```

use clap::{Parser, Subcommand};

/// Represents the parsed command-line arguments.
///
/// This struct is constructed by parsing the command-line arguments using `clap`.
/// It contains a `command` field that holds the parsed subcommand and its options.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, propagate_version = true, color = clap::ColorChoice::Always)]
pub struct Cli {
    /// The parsed subcommand and its options.
    #[command(subcommand)]
    pub command: Commands,
}

/// Represents the available subcommands and their options.
///
/// Each variant of this enum corresponds to a subcommand that the user can invoke
/// from the command line, along with any options specific to that subcommand.
#[derive(Subcommand, Debug)]
#[command(about, long_about = None, color = clap::ColorChoice::Always)]
pub enum Commands {
    /// The 'browse' subcommand, which starts the interactive catalog browser.
    ///
    /// This subcommand can be invoked with either 'b' or 'browse'.
    #[clap(name = "browse", alias = "b")]
    Browse {
        /// Embedding kind to compare on; falls back to the configured default.
        #[arg(name = "embedding", short = 'e')]
        embedding: Option<String>,
    },

    /// The 'recommend' subcommand, which prints the movies most similar to
    /// the one at the given page and exits.
    #[clap(name = "recommend", alias = "r")]
    Recommend {
        /// 1-based page number of the movie to recommend from.
        page: usize,

        /// Number of recommendations requested.
        #[arg(name = "count", short = 'k', default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
        count: u8,

        /// Embedding kind to compare on; falls back to the configured default.
        #[arg(name = "embedding", short = 'e')]
        embedding: Option<String>,
    },

    /// The 'init' subcommand, which takes no arguments and is used for initialization.
    ///
    /// When invoked, this subcommand performs setup and initialization tasks, such
    /// as creating the config directory and writing a starter configuration file.
    Init,
}
