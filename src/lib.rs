//! # Movie Buddy (library root)
//!
//! This crate provides the core plumbing for the **Movie Buddy** CLI and library:
//! - The in-memory movie corpus (`catalog`).
//! - Brute-force nearest-neighbor retrieval over plot embeddings (`similarity`).
//! - Per-session browsing, filtering, and pagination state (`explorer`).
//! - CLI parsing & commands (`commands`), the interactive loop (`browser`),
//!   and terminal output (`render`).
//! - Configuration handling (`config`).
//!
//! In addition, this module exposes a utility for discovering the
//! per-platform configuration directory ([`config_dir`]).
//!
//! ## Data layout & discovery
//! The browser never generates data itself. It expects a plot corpus and one
//! or more embedding datasets produced offline, at the paths named by
//! `config.yaml` in the per-platform config directory:
//!
//! - macOS: `~/Library/Application Support/com.awful-sec.mb/config.yaml`
//! - Linux (XDG): `~/.config/mb/config.yaml`
//! - Windows: `C:\Users\<you>\AppData\Roaming\mb\config.yaml`
//!
//! Run `mb init` to create the directory and a starter config.
//!
//! ## Session model
//! A session loads the [`catalog::Catalog`] once and owns one
//! [`explorer::Explorer`] that mutates with every user action. The catalog is
//! immutable after load, so several sessions could share one instance; each
//! explorer is private to its session and dies with it. Every per-action
//! operation is a pure in-memory computation: no network or disk I/O happens
//! after startup.
//!
//! ## Modules
//! - [`browser`], [`catalog`], [`commands`], [`config`], [`explorer`],
//!   [`render`], [`similarity`]

use directories::ProjectDirs;
use std::error::Error;

pub mod browser;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod explorer;
pub mod render;
pub mod similarity;

/// Return the per-platform configuration directory used by Movie Buddy.
///
/// This uses [`directories::ProjectDirs`] with the application triple
/// `("com", "awful-sec", "mb")`, so you get the right place on each OS
/// (e.g., `~/Library/Application Support/com.awful-sec.mb` on macOS).
///
/// The directory is **not** created by this function; callers that need it should
/// create it with `fs::create_dir_all`.
///
/// # Errors
/// Returns an error if the platform configuration directory cannot be determined
/// (which is rare but possible in heavily sandboxed environments).
///
/// # Examples
/// ```rust
/// let cfg = movie_buddy::config_dir().expect("has a config dir");
/// println!("config at {}", cfg.display());
/// ```
pub fn config_dir() -> Result<std::path::PathBuf, Box<dyn Error>> {
    let proj_dirs = ProjectDirs::from("com", "awful-sec", "mb")
        .ok_or("Unable to determine config directory")?;
    let config_dir = proj_dirs.config_dir().to_path_buf();

    Ok(config_dir)
}
