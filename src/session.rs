//! # Dashboard Session
//!
//! Holds the raw dataset, the current filters and everything derived from them.
//!
//! - The raw dataset sits behind an `Arc` and is swapped whole when a fetch
//!   succeeds, never edited in place
//! - A failed fetch keeps whatever was loaded before (nothing, on first load)
//!   and records the error message
//! - Facet options are rebuilt only when the raw dataset changes
//! - Every filter change rebuilds every chart dataset from scratch
//! - While a fetch is pending, filter changes are recorded but nothing is
//!   derived; [`Dashboard::view`] returns `None` until the fetch settles
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    accessor::{FetchError, RecordSource},
    aggregate::{DerivedDatasets, FacetOptions, derive},
    filter::{Facet, FilterState, apply},
    record::Record,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

pub struct Dashboard {
    raw: Arc<Vec<Record>>,
    filters: FilterState,
    options: FacetOptions,
    derived: DerivedDatasets,
    state: LoadState,
}

/// Read-only snapshot handed to the presentation layer.
pub struct DashboardView<'a> {
    pub filters: &'a FilterState,
    pub options: &'a FacetOptions,
    pub derived: &'a DerivedDatasets,
    pub error: Option<&'a str>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            raw: Arc::new(Vec::new()),
            filters: FilterState::new(),
            options: FacetOptions::default(),
            derived: derive(&[]),
            state: LoadState::Idle,
        }
    }

    pub async fn load<S: RecordSource>(&mut self, source: &S) {
        self.begin_fetch();

        let result = source.fetch_all_records().await;
        self.complete_fetch(result);
    }

    pub fn begin_fetch(&mut self) {
        self.state = LoadState::Loading;
    }

    pub fn complete_fetch(&mut self, result: Result<Vec<Record>, FetchError>) {
        match result {
            Ok(records) => {
                debug!("Replacing raw dataset with {} records", records.len());

                self.raw = Arc::new(records);
                self.options = FacetOptions::from_records(&self.raw);
                self.state = LoadState::Ready;
            }
            Err(e) => {
                warn!("Failed to load dataset: {e}");

                self.state = LoadState::Failed(e.to_string());
            }
        }

        self.recompute();
    }

    pub fn set_filter(&mut self, facet: Facet, value: impl Into<String>) {
        self.filters.set(facet, value);
        self.recompute();
    }

    pub fn clear_filter(&mut self, facet: Facet) {
        self.filters.clear(facet);
        self.recompute();
    }

    pub fn reset_filters(&mut self) {
        self.filters.reset();
        self.recompute();
    }

    fn recompute(&mut self) {
        if self.is_loading() {
            return;
        }

        let filtered = apply(&self.raw, &self.filters);
        debug!("Recomputing charts over {}/{} records", filtered.len(), self.raw.len());

        self.derived = derive(&filtered);
    }

    pub fn view(&self) -> Option<DashboardView<'_>> {
        if self.is_loading() {
            return None;
        }

        Some(DashboardView {
            filters: &self.filters,
            options: &self.options,
            derived: &self.derived,
            error: self.error(),
        })
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn raw(&self) -> &[Record] {
        &self.raw
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }
}
