//! Query Executor: submits a resolved selection and owns the latest
//! result.

use chrono::NaiveDateTime;
use tracing::info;

use tvws_api::{QueryRequest, QueryResult, SpectrumClient};

use crate::error::CoreError;
use crate::selection::ResolvedSelection;
use crate::time::{local_to_utc, to_wire};

/// Runs spectrum-availability queries and holds the single live
/// [`QueryResult`], which is replaced wholesale on every successful run.
#[derive(Default)]
pub struct QueryExecutor {
    latest: Option<QueryResult>,
}

impl QueryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent result, if any query has completed.
    pub fn latest(&self) -> Option<&QueryResult> {
        self.latest.as_ref()
    }

    /// Drop the held result (e.g. on leaving the query view).
    pub fn clear(&mut self) {
        self.latest = None;
    }

    /// Run a query from a fully resolved selection.
    pub async fn run(
        &mut self,
        client: &SpectrumClient,
        selection: &ResolvedSelection,
    ) -> Result<&QueryResult, CoreError> {
        self.run_query(client, &selection.region, &selection.site, selection.time)
            .await
    }

    /// Run a query with explicit arguments.
    ///
    /// Refuses empty region or site names before any network call. The
    /// local wall-clock `time` is coerced to an absolute UTC instant for
    /// transmission. A remote rejection becomes [`CoreError::Query`]
    /// carrying the service detail; no retry is attempted and no
    /// selection state is mutated.
    pub async fn run_query(
        &mut self,
        client: &SpectrumClient,
        region: &str,
        site: &str,
        time: NaiveDateTime,
    ) -> Result<&QueryResult, CoreError> {
        if region.trim().is_empty() {
            return Err(CoreError::validation("region", "must not be empty"));
        }
        if site.trim().is_empty() {
            return Err(CoreError::validation("site", "must not be empty"));
        }

        let request = QueryRequest {
            region: region.to_owned(),
            site: site.to_owned(),
            time: to_wire(local_to_utc(time)),
        };

        let result = client
            .query_tvws(&request)
            .await
            .map_err(CoreError::query_from)?;

        info!(
            region,
            site,
            free = result.free_count(),
            occupied = result.occupied_count(),
            "query complete"
        );

        Ok(self.latest.insert(result))
    }
}
