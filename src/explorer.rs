//! # Explorer (session view state)
//!
//! The **explorer** owns everything one session displays: the active record
//! sequence (full catalog, a title-filtered subset, or a recommendation
//! result set), the current page, the similarity scores of the last
//! recommendation, and the applied title filter. Every user action (page
//! turn, search, recommend, reset) goes through a transition method here.
//!
//! The explorer moves between three states:
//!
//! - **Browsing**: the full catalog, no filter, no scores.
//! - **Filtered**: a title-filtered subset. Entered via [`Explorer::search`],
//!   only from Browsing.
//! - **Recommending**: a ranked recommendation result set with one score per
//!   record. Entered via [`Explorer::recommend`], from any state.
//!
//! Transitions never partially mutate: a rejected action leaves the view
//! exactly as it was. Each successful transition returns a [`Render`] signal
//! so the presentation layer knows whether to redraw, instead of relying on
//! an ambient rerun mechanism.
//!
//! Positions within the active view are 0-based internally; the external
//! page numbers (display, [`Explorer::goto`]) are 1-based.
//!
//! ## Quick start
//! ```rust
//! use movie_buddy::catalog::{Catalog, MovieRecord};
//! use movie_buddy::explorer::Explorer;
//! use std::collections::HashMap;
//!
//! let records = vec![
//!     MovieRecord {
//!         title: "Alpha".into(),
//!         url: "https://example.com/alpha".into(),
//!         plot: "plot A".into(),
//!         embeddings: HashMap::from([("sbert".to_string(), vec![1.0, 0.0])]),
//!     },
//!     MovieRecord {
//!         title: "Beta".into(),
//!         url: "https://example.com/beta".into(),
//!         plot: "plot B".into(),
//!         embeddings: HashMap::from([("sbert".to_string(), vec![0.0, 1.0])]),
//!     },
//! ];
//! let catalog = Catalog::from_records(records);
//! let mut explorer = Explorer::new(&catalog);
//!
//! explorer.next();
//! assert_eq!(explorer.current_page_number(), 2);
//! explorer.search("alp").unwrap();
//! assert_eq!(explorer.page_count(), 1);
//! explorer.reset();
//! assert_eq!(explorer.page_count(), 2);
//! ```

use regex::RegexBuilder;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, MovieRecord};
use crate::similarity::{self, SimilarityError};

/// Errors surfaced by explorer transitions.
///
/// All of these are user-visible conditions, not bugs; the view state is
/// unchanged whenever one is returned.
#[derive(Debug, Error)]
pub enum ExploreError {
    /// The search text matched no titles.
    #[error("No matches found, please try again")]
    NoMatch,

    /// A search was attempted while a filter or recommendation view is active.
    #[error("A filter is already applied, reset to clear it first")]
    FilterAlreadyApplied,

    /// A goto target outside `[1, page_count]`.
    #[error("Page number should be between 1 and {last}")]
    PageOutOfRange {
        /// Highest valid 1-based page number.
        last: usize,
    },

    /// The similarity engine rejected a recommendation request.
    #[error(transparent)]
    Similarity(#[from] SimilarityError),
}

/// Signal returned by transitions telling the presentation layer whether the
/// view changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    /// The view changed; redraw the current record.
    Refresh,
    /// Nothing changed.
    Unchanged,
}

/// Per-session view state over a shared, immutable [`Catalog`].
///
/// The explorer does not own the catalog; you must keep it alive while the
/// session runs. The active view holds its own copies of the displayed
/// records, so positions within it are independent of catalog indices and
/// restart from 0 after every narrowing operation.
#[derive(Debug)]
pub struct Explorer<'a> {
    /// The full corpus, used to restore the view on reset.
    catalog: &'a Catalog,
    /// Currently displayed records in display order.
    active: Vec<MovieRecord>,
    /// 0-based position of the displayed record within `active`.
    current_page: usize,
    /// One score per active position when recommending, empty otherwise.
    similarity_scores: Vec<f32>,
    /// Active title filter, empty when none.
    applied_filter: String,
    /// Whether `active` is a recommendation result set.
    is_recommendation_view: bool,
}

impl<'a> Explorer<'a> {
    /// Start a session in the Browsing state over the full catalog.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            active: catalog.records().to_vec(),
            current_page: 0,
            similarity_scores: Vec::new(),
            applied_filter: String::new(),
            is_recommendation_view: false,
        }
    }

    /// Filter the view down to titles containing `text` (case-insensitive).
    ///
    /// Allowed only while Browsing. Empty text is a no-op. Zero matches leave
    /// the view unchanged and report [`ExploreError::NoMatch`]; attempting to
    /// stack a second filter (or to filter a recommendation view) reports
    /// [`ExploreError::FilterAlreadyApplied`].
    pub fn search(&mut self, text: &str) -> Result<Render, ExploreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Render::Unchanged);
        }
        if !self.applied_filter.is_empty() || self.is_recommendation_view {
            return Err(ExploreError::FilterAlreadyApplied);
        }

        // Escaped, so the search text is a literal substring, not a pattern.
        let matcher = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()
            .expect("escaped search text is always a valid pattern");

        let matches: Vec<MovieRecord> = self
            .active
            .iter()
            .filter(|record| matcher.is_match(&record.title))
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(ExploreError::NoMatch);
        }

        debug!("Filter '{text}' matched {} titles", matches.len());
        self.active = matches;
        self.current_page = 0;
        self.applied_filter = text.to_string();
        Ok(Render::Refresh)
    }

    /// Replace the view with the movies most similar to the current one.
    ///
    /// Runs the similarity engine over the **active** view with the current
    /// page as the query and `k + 1` results, so the query record leads the
    /// new view followed by its `k` nearest neighbors. Scores are kept, one
    /// per new position. Allowed from any state; an engine error leaves the
    /// view untouched.
    pub fn recommend(&mut self, k: usize, kind: &str) -> Result<Render, ExploreError> {
        let neighbors = similarity::top_k(&self.active, self.current_page, kind, k + 1)?;

        debug!(
            "Recommendation from page {} over {} records returned {} results",
            self.current_page + 1,
            self.active.len(),
            neighbors.len()
        );

        let mut matches = Vec::with_capacity(neighbors.len());
        let mut scores = Vec::with_capacity(neighbors.len());
        for neighbor in &neighbors {
            matches.push(self.active[neighbor.position].clone());
            scores.push(neighbor.score);
        }

        self.active = matches;
        self.similarity_scores = scores;
        self.current_page = 0;
        self.applied_filter.clear();
        self.is_recommendation_view = true;
        Ok(Render::Refresh)
    }

    /// Return to Browsing over the full catalog, clearing every filter and
    /// recommendation artifact. Always succeeds.
    pub fn reset(&mut self) -> Render {
        self.active = self.catalog.records().to_vec();
        self.current_page = 0;
        self.similarity_scores.clear();
        self.applied_filter.clear();
        self.is_recommendation_view = false;
        Render::Refresh
    }

    /// Jump to a 1-based page number within the active view.
    pub fn goto(&mut self, page_number: usize) -> Result<Render, ExploreError> {
        if page_number == 0 || page_number > self.active.len() {
            return Err(ExploreError::PageOutOfRange {
                last: self.active.len(),
            });
        }
        self.current_page = page_number - 1;
        Ok(Render::Refresh)
    }

    /// Advance one page, wrapping from the last page back to the first.
    pub fn next(&mut self) -> Render {
        if self.active.is_empty() {
            return Render::Unchanged;
        }
        self.current_page = if self.current_page == self.active.len() - 1 {
            0
        } else {
            self.current_page + 1
        };
        Render::Refresh
    }

    /// Go back one page, wrapping from the first page to the last.
    pub fn prev(&mut self) -> Render {
        if self.active.is_empty() {
            return Render::Unchanged;
        }
        self.current_page = if self.current_page == 0 {
            self.active.len() - 1
        } else {
            self.current_page - 1
        };
        Render::Refresh
    }

    /// The record currently displayed, `None` only for an empty catalog.
    pub fn current_record(&self) -> Option<&MovieRecord> {
        self.active.get(self.current_page)
    }

    /// Similarity score of the displayed record when in the Recommending
    /// state, `None` otherwise.
    pub fn current_score(&self) -> Option<f32> {
        self.similarity_scores.get(self.current_page).copied()
    }

    /// Number of pages (records) in the active view.
    pub fn page_count(&self) -> usize {
        self.active.len()
    }

    /// 1-based page number of the displayed record, for display.
    pub fn current_page_number(&self) -> usize {
        self.current_page + 1
    }

    /// The active title filter, empty when none is applied.
    pub fn applied_filter(&self) -> &str {
        &self.applied_filter
    }

    /// Whether the active view is a recommendation result set.
    pub fn is_recommendation_view(&self) -> bool {
        self.is_recommendation_view
    }

    /// The records of the active view, in display order.
    pub fn active_records(&self) -> &[MovieRecord] {
        &self.active
    }

    /// Scores of the active view, one per position, empty outside the
    /// Recommending state.
    pub fn similarity_scores(&self) -> &[f32] {
        &self.similarity_scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const KIND: &str = "sbert";

    fn record(title: &str, vector: Vec<f32>) -> MovieRecord {
        MovieRecord {
            title: title.to_string(),
            url: format!("https://example.com/{}", title.to_lowercase()),
            plot: format!("plot of {title}"),
            embeddings: HashMap::from([(KIND.to_string(), vector)]),
        }
    }

    /// Alpha and Gamma share a vector, Beta is orthogonal.
    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            record("Alpha", vec![1.0, 0.0]),
            record("Beta", vec![0.0, 1.0]),
            record("Gamma", vec![1.0, 0.0]),
        ])
    }

    #[test]
    fn test_initial_state_is_browsing_page_one() {
        let catalog = catalog();
        let explorer = Explorer::new(&catalog);
        assert_eq!(explorer.page_count(), 3);
        assert_eq!(explorer.current_page_number(), 1);
        assert_eq!(explorer.applied_filter(), "");
        assert!(!explorer.is_recommendation_view());
        assert!(explorer.similarity_scores().is_empty());
        assert_eq!(explorer.current_record().unwrap().title, "Alpha");
    }

    #[test]
    fn test_next_wraps_last_page_to_first() {
        let catalog = catalog();
        let mut explorer = Explorer::new(&catalog);
        explorer.goto(3).unwrap();
        assert_eq!(explorer.next(), Render::Refresh);
        assert_eq!(explorer.current_page_number(), 1);
    }

    #[test]
    fn test_prev_wraps_first_page_to_last() {
        let catalog = catalog();
        let mut explorer = Explorer::new(&catalog);
        assert_eq!(explorer.prev(), Render::Refresh);
        assert_eq!(explorer.current_page_number(), 3);
    }

    #[test]
    fn test_goto_out_of_range_leaves_page_unchanged() {
        let catalog = catalog();
        let mut explorer = Explorer::new(&catalog);
        explorer.goto(2).unwrap();

        let err = explorer.goto(5).unwrap_err();
        match err {
            ExploreError::PageOutOfRange { last } => assert_eq!(last, 3),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(explorer.current_page_number(), 2);

        assert!(explorer.goto(0).is_err());
        assert_eq!(explorer.current_page_number(), 2);
    }

    #[test]
    fn test_search_filters_titles_case_insensitively() {
        let catalog = catalog();
        let mut explorer = Explorer::new(&catalog);
        assert_eq!(explorer.search("aLpH").unwrap(), Render::Refresh);
        assert_eq!(explorer.page_count(), 1);
        assert_eq!(explorer.current_record().unwrap().title, "Alpha");
        assert_eq!(explorer.applied_filter(), "aLpH");
        assert_eq!(explorer.current_page_number(), 1);
    }

    #[test]
    fn test_search_empty_text_is_a_no_op() {
        let catalog = catalog();
        let mut explorer = Explorer::new(&catalog);
        explorer.goto(2).unwrap();
        assert_eq!(explorer.search("").unwrap(), Render::Unchanged);
        assert_eq!(explorer.search("   ").unwrap(), Render::Unchanged);
        assert_eq!(explorer.page_count(), 3);
        assert_eq!(explorer.current_page_number(), 2);
        assert_eq!(explorer.applied_filter(), "");
    }

    #[test]
    fn test_search_with_no_matches_keeps_full_view() {
        let catalog = catalog();
        let mut explorer = Explorer::new(&catalog);
        let err = explorer.search("zzz_no_such_title").unwrap_err();
        assert!(matches!(err, ExploreError::NoMatch));
        assert_eq!(explorer.page_count(), 3);
        assert_eq!(explorer.applied_filter(), "");
    }

    #[test]
    fn test_second_search_is_rejected_while_filtered() {
        let catalog = catalog();
        let mut explorer = Explorer::new(&catalog);
        explorer.search("a").unwrap();
        let pages_before = explorer.page_count();

        let err = explorer.search("beta").unwrap_err();
        assert!(matches!(err, ExploreError::FilterAlreadyApplied));
        assert_eq!(explorer.page_count(), pages_before);
        assert_eq!(explorer.applied_filter(), "a");
    }

    #[test]
    fn test_search_is_rejected_while_recommending() {
        let catalog = catalog();
        let mut explorer = Explorer::new(&catalog);
        explorer.recommend(1, KIND).unwrap();
        let err = explorer.search("alpha").unwrap_err();
        assert!(matches!(err, ExploreError::FilterAlreadyApplied));
        assert!(explorer.is_recommendation_view());
    }

    #[test]
    fn test_recommend_from_first_page_returns_query_then_tied_neighbor() {
        let catalog = catalog();
        let mut explorer = Explorer::new(&catalog);
        assert_eq!(explorer.recommend(1, KIND).unwrap(), Render::Refresh);

        // Alpha (query, 1.0) then Gamma (1.0, tie broken by position); Beta excluded.
        assert_eq!(explorer.page_count(), 2);
        assert_eq!(explorer.active_records()[0].title, "Alpha");
        assert_eq!(explorer.active_records()[1].title, "Gamma");
        assert!(explorer.is_recommendation_view());
        assert_eq!(explorer.current_page_number(), 1);

        let scores = explorer.similarity_scores();
        assert_eq!(scores.len(), 2);
        assert!((scores[0] - 1.0).abs() < 1e-6);
        assert!((scores[1] - 1.0).abs() < 1e-6);
        assert!((explorer.current_score().unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_recommend_queries_the_displayed_record() {
        let catalog = catalog();
        let mut explorer = Explorer::new(&catalog);
        explorer.goto(2).unwrap();
        explorer.recommend(2, KIND).unwrap();

        // Beta is orthogonal to the others: it leads with 1.0, the rest score 0.
        assert_eq!(explorer.active_records()[0].title, "Beta");
        assert!((explorer.similarity_scores()[0] - 1.0).abs() < 1e-6);
        assert!(explorer.similarity_scores()[1].abs() < 1e-6);
    }

    #[test]
    fn test_recommend_over_filtered_view_uses_view_positions() {
        let catalog = catalog();
        let mut explorer = Explorer::new(&catalog);
        // Every title contains an 'a', so the filter keeps all three rows.
        explorer.search("a").unwrap();
        assert_eq!(explorer.page_count(), 3);
        explorer.recommend(1, KIND).unwrap();
        assert!(explorer.is_recommendation_view());
        // The filter no longer describes the active view.
        assert_eq!(explorer.applied_filter(), "");
    }

    #[test]
    fn test_recommend_with_missing_kind_leaves_state_unchanged() {
        let catalog = catalog();
        let mut explorer = Explorer::new(&catalog);
        explorer.goto(2).unwrap();

        let err = explorer.recommend(1, "tfidf").unwrap_err();
        assert!(matches!(
            err,
            ExploreError::Similarity(SimilarityError::MissingEmbedding { .. })
        ));
        assert_eq!(explorer.page_count(), 3);
        assert_eq!(explorer.current_page_number(), 2);
        assert!(!explorer.is_recommendation_view());
        assert!(explorer.similarity_scores().is_empty());
    }

    #[test]
    fn test_reset_restores_full_catalog_from_any_state() {
        let catalog = catalog();

        let mut filtered = Explorer::new(&catalog);
        filtered.search("alpha").unwrap();
        assert_eq!(filtered.reset(), Render::Refresh);
        assert_eq!(filtered.page_count(), 3);
        assert_eq!(filtered.applied_filter(), "");

        let mut recommending = Explorer::new(&catalog);
        recommending.recommend(1, KIND).unwrap();
        recommending.next();
        recommending.reset();
        assert_eq!(recommending.page_count(), 3);
        assert_eq!(recommending.current_page_number(), 1);
        assert!(recommending.similarity_scores().is_empty());
        assert!(!recommending.is_recommendation_view());
    }

    #[test]
    fn test_scores_cover_every_position_or_none() {
        let catalog = catalog();
        let mut explorer = Explorer::new(&catalog);
        assert!(explorer.similarity_scores().is_empty());
        assert!(explorer.current_score().is_none());

        explorer.recommend(2, KIND).unwrap();
        assert_eq!(explorer.similarity_scores().len(), explorer.page_count());

        explorer.reset();
        assert!(explorer.similarity_scores().is_empty());
    }

    #[test]
    fn test_empty_catalog_paging_is_inert() {
        let catalog = Catalog::from_records(Vec::new());
        let mut explorer = Explorer::new(&catalog);
        assert!(explorer.current_record().is_none());
        assert_eq!(explorer.next(), Render::Unchanged);
        assert_eq!(explorer.prev(), Render::Unchanged);
        assert!(explorer.goto(1).is_err());
    }
}
