//! Business logic for the TVWS query and ingestion workflow.
//!
//! This crate sits between `tvws-api` (the raw Spectrum Service client)
//! and UI consumers (the `tvws` CLI):
//!
//! - **[`SessionGate`]**: owns the bearer credential. It restores it
//!   from a [`TokenStore`] on construction, installs it on the client
//!   after a successful login, and clears it when the service reports
//!   the session invalid.
//! - **[`SelectionCascade`]**: the region, site, and time selection
//!   state machine that must resolve before a query may run. Modeled as
//!   tagged variants, so a site can never be chosen without a region.
//! - **[`QueryExecutor`]**: validates a resolved selection, coerces the
//!   query time to UTC, runs the query, and owns the latest
//!   [`QueryResult`](tvws_api::QueryResult) (replaced wholesale).
//! - **[`project`]**: shapes a query result into table rows, chart
//!   points, and the portable CSV export.
//! - **[`ingest`]**: single-record and CSV-batch measurement uploads
//!   with per-row fault isolation and a [`BatchReport`] ledger.

pub mod error;
pub mod ingest;
pub mod project;
pub mod query;
pub mod selection;
pub mod session;

mod time;

pub use error::CoreError;
pub use ingest::{BatchReport, RowFailure};
pub use query::QueryExecutor;
pub use selection::{ResolvedSelection, SelectionCascade};
pub use session::{MemoryTokenStore, SessionGate, TokenStore};
