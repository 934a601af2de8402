//! # Insights Dashboard
//!
//! Client core of the insights dashboard. Loads the whole dataset from the
//! backend once, then filters and aggregates it in memory for the charts.
//!
//! ## Flow
//!
//! - [`accessor::HttpRecordSource`] fetches `GET /api/data` once per session
//! - [`filter::FilterState`] holds one selected value per facet (topic, sector, region, pestle, source, country)
//! - [`filter::matches`] keeps a record only if every selected facet equals the record's value exactly
//! - [`aggregate::derive`] turns the filtered subset into the intensity histogram, region pie,
//!   topic bars and scatter points, plus summary averages
//! - [`session::Dashboard`] ties it together and recomputes everything on each filter change
//! - [`presentation::Presenter`] is where a front end plugs in
//!
//!
//!
//! ## Notes
//!
//! ### Averages
//! Averages divide by the number of filtered records, counting a missing score as 0. This understates
//! the mean when scores are missing but matches what the dashboard has always shown. No records means
//! NaN, rendered as "undefined".
//!
//! ### Dataset
//! - ~1000 rows, small enough to hold in memory and refilter on every click
//! - Many rows leave facets empty and scores blank, so nothing on a record is required
pub mod accessor;
pub mod aggregate;
pub mod filter;
pub mod presentation;
pub mod record;
pub mod session;

pub use accessor::{FetchError, HttpRecordSource, RecordSource};
pub use aggregate::{DerivedDatasets, FacetOptions};
pub use filter::{Facet, FilterState};
pub use record::Record;
pub use session::{Dashboard, LoadState};
