//! # Similarity Engine
//!
//! Brute-force nearest-neighbor retrieval over catalog embeddings.
//!
//! Given a query position into a record sequence, an embedding kind, and a
//! result count `k`, [`top_k`] scores **every** candidate with cosine
//! similarity and returns the best `k` in descending score order. There is no
//! index structure on purpose: the exhaustive scan is O(n·d) per query, which
//! is fine at catalog scale, and it keeps the ranking fully deterministic.
//!
//! Determinism matters for reproducible recommendations, so ties are pinned
//! down explicitly: equal scores are ordered by ascending original position
//! (the sort is stable). Because no score can exceed the query's
//! self-similarity of 1.0, and the query occupies the lowest position among
//! its ties, the query record is always part of its own top-k for `k >= 1`.
//!
//! ## Quick Example
//! ```rust
//! use movie_buddy::catalog::MovieRecord;
//! use movie_buddy::similarity::top_k;
//! use std::collections::HashMap;
//!
//! let record = |title: &str, v: Vec<f32>| MovieRecord {
//!     title: title.into(),
//!     url: String::new(),
//!     plot: String::new(),
//!     embeddings: HashMap::from([("sbert".to_string(), v)]),
//! };
//! let records = vec![
//!     record("Alpha", vec![1.0, 0.0]),
//!     record("Beta", vec![0.0, 1.0]),
//! ];
//! let neighbors = top_k(&records, 0, "sbert", 2).unwrap();
//! assert_eq!(neighbors[0].position, 0);
//! assert!((neighbors[0].score - 1.0).abs() < 1e-6);
//! ```

use std::cmp::Ordering;
use thiserror::Error;

use crate::catalog::MovieRecord;

/// Errors raised by the similarity engine.
///
/// The engine is a pure function of its inputs; every failure leaves the
/// caller's state untouched.
#[derive(Debug, Error)]
pub enum SimilarityError {
    /// The requested embedding kind is absent on a record.
    #[error("Embedding kind '{kind}' not present on record {position}")]
    MissingEmbedding {
        /// The embedding kind that was requested.
        kind: String,
        /// Position of the record missing it.
        position: usize,
    },

    /// The query position does not index into the candidate sequence.
    #[error("Query position {position} out of range for {len} records")]
    QueryOutOfRange {
        /// Requested query position.
        position: usize,
        /// Length of the candidate sequence.
        len: usize,
    },

    /// A result count of zero was requested.
    #[error("Requested result count must be at least 1")]
    ZeroResultCount,
}

/// One scored candidate from a [`top_k`] query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the candidate in the queried sequence.
    pub position: usize,
    /// Cosine similarity against the query vector.
    pub score: f32,
}

/// Cosine similarity between two vectors: `dot(a,b) / (||a|| * ||b||)`.
///
/// Defined as `0.0` when either vector's norm is zero, so degenerate
/// zero-vector rows score below any real match instead of producing NaN.
/// Symmetric in its arguments.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Score every record against the query record and return the top `k`.
///
/// The query itself is a candidate and scores 1.0 against its own (non-zero)
/// vector, so it leads its own result list. Results are sorted by score
/// descending; ties keep ascending position order.
///
/// # Parameters
/// - `records`: The candidate sequence (often the active view, not the full
///   catalog).
/// - `query_position`: Position of the query record within `records`.
/// - `kind`: Embedding kind to compare on; must be present on every record.
/// - `k`: Number of results; the output holds exactly `min(k, records.len())`
///   entries.
///
/// # Errors
/// - [`SimilarityError::QueryOutOfRange`] when `query_position >= records.len()`.
/// - [`SimilarityError::ZeroResultCount`] when `k == 0`.
/// - [`SimilarityError::MissingEmbedding`] when any record lacks `kind`.
pub fn top_k(
    records: &[MovieRecord],
    query_position: usize,
    kind: &str,
    k: usize,
) -> Result<Vec<Neighbor>, SimilarityError> {
    if k == 0 {
        return Err(SimilarityError::ZeroResultCount);
    }
    if query_position >= records.len() {
        return Err(SimilarityError::QueryOutOfRange {
            position: query_position,
            len: records.len(),
        });
    }

    let query = embedding_of(&records[query_position], query_position, kind)?;

    let mut scored = Vec::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        let vector = embedding_of(record, position, kind)?;
        scored.push(Neighbor {
            position,
            score: cosine_similarity(query, vector),
        });
    }

    // Stable sort: equal scores stay in ascending position order.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(k);
    Ok(scored)
}

fn embedding_of<'a>(
    record: &'a MovieRecord,
    position: usize,
    kind: &str,
) -> Result<&'a [f32], SimilarityError> {
    record
        .embedding(kind)
        .ok_or_else(|| SimilarityError::MissingEmbedding {
            kind: kind.to_string(),
            position,
        })
}
