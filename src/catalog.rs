//! # Catalog Store
//!
//! In-memory movie catalog for Movie Buddy.
//!
//! This module loads the persisted movie corpus into an ordered, read-only
//! [`Catalog`]: one [`MovieRecord`] per movie, each carrying the title, source
//! URL, plot text, and one or more precomputed embedding vectors keyed by
//! embedding kind (e.g. `"sbert"`).
//!
//! ## Persisted layout
//! - **Plot dataset**: a JSON Lines file, one `{title, url, plot}` object per
//!   line. Row order defines the default catalog (and display) order.
//! - **Embedding datasets**: one binary file per embedding kind, a
//!   bincode-encoded `Vec<Vec<f32>>` in the same row order as the plot file.
//!
//! ## Invariants enforced at load time
//! - Every embedding dataset has exactly as many rows as the plot dataset.
//! - Within one kind, every vector has the same dimensionality.
//!
//! Violations abort the load with a [`CatalogError`]; a half-loaded catalog is
//! never returned.
//!
//! ## Quick Example
//! ```no_run
//! use movie_buddy::catalog::Catalog;
//! use std::collections::BTreeMap;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut sources = BTreeMap::new();
//! sources.insert("sbert".to_string(), PathBuf::from("artifacts/sbert_embeddings.bin"));
//! let catalog = Catalog::load("artifacts/movie_plots.jsonl", &sources)?;
//! println!("{} movies loaded", catalog.len());
//! # Ok(()) }
//! ```

use indicatif::ProgressBar;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while building a [`Catalog`] from disk.
///
/// All variants are fatal: the catalog is loaded once at startup and a
/// partially joined corpus is worse than no corpus.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A source file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A plot row was not valid JSON (or was missing required fields).
    #[error("Malformed plot row at {path}:{line}: {source}")]
    MalformedPlotRow {
        /// Path of the plot dataset.
        path: PathBuf,
        /// 1-based line number of the bad row.
        line: usize,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// An embedding dataset could not be decoded.
    #[error("Failed to decode embeddings for kind '{kind}' from {path}: {source}")]
    MalformedEmbeddings {
        /// Embedding kind being loaded.
        kind: String,
        /// Path of the embedding dataset.
        path: PathBuf,
        /// Underlying bincode error.
        source: bincode::error::DecodeError,
    },

    /// An embedding dataset does not have one row per plot row.
    #[error("Row count mismatch for embedding kind '{kind}': {got} vectors for {expected} plots")]
    RowCountMismatch {
        /// Embedding kind being loaded.
        kind: String,
        /// Number of plot rows.
        expected: usize,
        /// Number of embedding rows found.
        got: usize,
    },

    /// A vector within one embedding kind has the wrong dimensionality.
    #[error(
        "Dimension mismatch for embedding kind '{kind}' at row {row}: expected {expected}, got {got}"
    )]
    DimensionMismatch {
        /// Embedding kind being loaded.
        kind: String,
        /// 0-based row of the offending vector.
        row: usize,
        /// Dimensionality of the first vector of this kind.
        expected: usize,
        /// Dimensionality of the offending vector.
        got: usize,
    },
}

/// One row of the plot dataset as persisted on disk.
#[derive(Debug, Deserialize)]
struct PlotRow {
    title: String,
    url: String,
    plot: String,
}

/// A single movie: title, source URL, plot text, and embedding vectors.
///
/// Records are immutable once loaded. The `embeddings` map holds one dense
/// vector per embedding kind; all records in a catalog carry the same kinds
/// with the same per-kind dimensionality.
///
/// # Examples
/// ```rust
/// use movie_buddy::catalog::MovieRecord;
/// use std::collections::HashMap;
///
/// let record = MovieRecord {
///     title: "Alpha".into(),
///     url: "https://example.com/alpha".into(),
///     plot: "A film about the first letter.".into(),
///     embeddings: HashMap::from([("sbert".to_string(), vec![1.0, 0.0])]),
/// };
/// assert!(record.embedding("sbert").is_some());
/// assert!(record.embedding("tfidf").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    /// Movie title.
    pub title: String,
    /// Source URL the plot was collected from.
    pub url: String,
    /// Full plot text.
    pub plot: String,
    /// Embedding kind → dense vector.
    pub embeddings: HashMap<String, Vec<f32>>,
}

impl MovieRecord {
    /// Look up the embedding vector for a kind, if this record carries one.
    pub fn embedding(&self, kind: &str) -> Option<&[f32]> {
        self.embeddings.get(kind).map(|v| v.as_slice())
    }
}

/// The full, immutable, ordered movie corpus for one session.
///
/// Built once at startup via [`Catalog::load`] and never mutated afterwards;
/// it can be shared immutably across sessions without synchronization. Index
/// positions are stable within one loaded instance.
#[derive(Debug)]
pub struct Catalog {
    records: Vec<MovieRecord>,
}

impl Catalog {
    /// Load a catalog by joining the plot dataset with one or more parallel
    /// embedding datasets.
    ///
    /// Rows are joined by position: plot row `i` receives vector `i` of every
    /// embedding source. The plot file's row order defines the catalog order.
    ///
    /// # Parameters
    /// - `plots_path`: JSON Lines file of `{title, url, plot}` rows.
    /// - `embedding_sources`: embedding kind → path of a bincode-encoded
    ///   `Vec<Vec<f32>>` with one vector per plot row.
    ///
    /// # Errors
    /// Any row-count disagreement between the plot data and an embedding
    /// source, or non-uniform vector length within a kind, fails the whole
    /// load. See [`CatalogError`].
    pub fn load(
        plots_path: impl AsRef<Path>,
        embedding_sources: &BTreeMap<String, PathBuf>,
    ) -> Result<Self, CatalogError> {
        let plots_path = plots_path.as_ref();
        let content = fs::read_to_string(plots_path).map_err(|source| CatalogError::Io {
            path: plots_path.to_path_buf(),
            source,
        })?;

        let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
        info!("Loading {} plot rows from {}", lines.len(), plots_path.display());

        let bar = ProgressBar::new(lines.len() as u64);
        let mut records = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let row: PlotRow =
                serde_json::from_str(line).map_err(|source| CatalogError::MalformedPlotRow {
                    path: plots_path.to_path_buf(),
                    line: i + 1,
                    source,
                })?;
            records.push(MovieRecord {
                title: row.title,
                url: row.url,
                plot: row.plot,
                embeddings: HashMap::new(),
            });
            bar.inc(1);
        }
        bar.finish_and_clear();

        for (kind, path) in embedding_sources {
            let vectors = load_embedding_rows(kind, path)?;

            if vectors.len() != records.len() {
                return Err(CatalogError::RowCountMismatch {
                    kind: kind.clone(),
                    expected: records.len(),
                    got: vectors.len(),
                });
            }

            let expected_dim = vectors.first().map(|v| v.len()).unwrap_or(0);
            debug!("Embedding kind '{kind}' has dimension {expected_dim}");
            for (row, vector) in vectors.iter().enumerate() {
                if vector.len() != expected_dim {
                    return Err(CatalogError::DimensionMismatch {
                        kind: kind.clone(),
                        row,
                        expected: expected_dim,
                        got: vector.len(),
                    });
                }
            }

            for (record, vector) in records.iter_mut().zip(vectors) {
                record.embeddings.insert(kind.clone(), vector);
            }
        }

        info!("Catalog ready: {} records", records.len());
        Ok(Self { records })
    }

    /// Build a catalog directly from records. Used by tests and by callers
    /// that assemble a corpus in memory.
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        Self { records }
    }

    /// The ordered records, indexed `0..n-1`.
    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    /// Number of movies in the catalog.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Decode one embedding dataset from disk.
fn load_embedding_rows(kind: &str, path: &Path) -> Result<Vec<Vec<f32>>, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard()).map_err(
        |source| CatalogError::MalformedEmbeddings {
            kind: kind.to_string(),
            path: path.to_path_buf(),
            source,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_plots(dir: &TempDir, rows: &[(&str, &str, &str)]) -> PathBuf {
        let path = dir.path().join("movie_plots.jsonl");
        let mut file = File::create(&path).unwrap();
        for (title, url, plot) in rows {
            writeln!(
                file,
                "{}",
                serde_json::json!({ "title": title, "url": url, "plot": plot })
            )
            .unwrap();
        }
        path
    }

    fn write_embeddings(dir: &TempDir, name: &str, vectors: &Vec<Vec<f32>>) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        bincode::serde::encode_into_std_write(vectors, &mut file, bincode::config::standard())
            .unwrap();
        path
    }

    fn plot_rows() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("Alpha", "https://example.com/alpha", "plot A"),
            ("Beta", "https://example.com/beta", "plot B"),
            ("Gamma", "https://example.com/gamma", "plot C"),
        ]
    }

    #[test]
    fn test_load_joins_rows_in_order() {
        let dir = TempDir::new().unwrap();
        let plots = write_plots(&dir, &plot_rows());
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]];
        let embeds = write_embeddings(&dir, "sbert.bin", &vectors);

        let mut sources = BTreeMap::new();
        sources.insert("sbert".to_string(), embeds);
        let catalog = Catalog::load(&plots, &sources).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.records()[0].title, "Alpha");
        assert_eq!(catalog.records()[2].title, "Gamma");
        assert_eq!(catalog.records()[1].embedding("sbert").unwrap(), &[0.0, 1.0]);
    }

    #[test]
    fn test_load_multiple_embedding_kinds() {
        let dir = TempDir::new().unwrap();
        let plots = write_plots(&dir, &plot_rows());
        let sbert = write_embeddings(
            &dir,
            "sbert.bin",
            &vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
        );
        let tfidf = write_embeddings(
            &dir,
            "tfidf.bin",
            &vec![vec![0.5; 4], vec![0.25; 4], vec![0.75; 4]],
        );

        let mut sources = BTreeMap::new();
        sources.insert("sbert".to_string(), sbert);
        sources.insert("tfidf".to_string(), tfidf);
        let catalog = Catalog::load(&plots, &sources).unwrap();

        let record = &catalog.records()[0];
        assert_eq!(record.embedding("sbert").unwrap().len(), 2);
        assert_eq!(record.embedding("tfidf").unwrap().len(), 4);
    }

    #[test]
    fn test_load_rejects_row_count_mismatch() {
        let dir = TempDir::new().unwrap();
        let plots = write_plots(&dir, &plot_rows());
        let embeds = write_embeddings(&dir, "sbert.bin", &vec![vec![1.0, 0.0], vec![0.0, 1.0]]);

        let mut sources = BTreeMap::new();
        sources.insert("sbert".to_string(), embeds);
        let err = Catalog::load(&plots, &sources).unwrap_err();

        match err {
            CatalogError::RowCountMismatch { expected, got, .. } => {
                assert_eq!(expected, 3);
                assert_eq!(got, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_dimension_mismatch() {
        let dir = TempDir::new().unwrap();
        let plots = write_plots(&dir, &plot_rows());
        let embeds = write_embeddings(
            &dir,
            "sbert.bin",
            &vec![vec![1.0, 0.0], vec![0.0, 1.0, 0.5], vec![1.0, 0.0]],
        );

        let mut sources = BTreeMap::new();
        sources.insert("sbert".to_string(), embeds);
        let err = Catalog::load(&plots, &sources).unwrap_err();

        match err {
            CatalogError::DimensionMismatch { row, expected, got, .. } => {
                assert_eq!(row, 1);
                assert_eq!(expected, 2);
                assert_eq!(got, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_malformed_plot_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movie_plots.jsonl");
        let mut file = File::create(&path).unwrap();
        writeln!(file, r#"{{"title": "Alpha", "url": "u", "plot": "p"}}"#).unwrap();
        writeln!(file, "not json at all").unwrap();

        let err = Catalog::load(&path, &BTreeMap::new()).unwrap_err();
        match err {
            CatalogError::MalformedPlotRow { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_plot_file() {
        let err = Catalog::load("non/existent/plots.jsonl", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
