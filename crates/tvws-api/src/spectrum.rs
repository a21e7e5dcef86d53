// Spectrum query and measurement-upload endpoints.

use tracing::debug;

use crate::client::SpectrumClient;
use crate::error::Error;
use crate::model::{MeasurementUpload, QueryRequest, QueryResult};

impl SpectrumClient {
    /// Run a spectrum-availability query.
    ///
    /// `POST /query-tvws` with `{state, location, time}`. The `time`
    /// field must already be an absolute ISO-8601 UTC instant; callers
    /// coerce local input before building the request.
    pub async fn query_tvws(&self, request: &QueryRequest) -> Result<QueryResult, Error> {
        let url = self.endpoint(&["query-tvws"]);
        debug!(region = %request.region, site = %request.site, "running spectrum query");
        self.post(url, request).await
    }

    /// Upload one measurement record (one site, one timestamp,
    /// one-or-more readings).
    ///
    /// `POST /upload-measurements`. The ack body is discarded.
    pub async fn upload_measurements(&self, upload: &MeasurementUpload) -> Result<(), Error> {
        let url = self.endpoint(&["upload-measurements"]);
        debug!(
            region = %upload.region,
            site = %upload.site,
            readings = upload.readings.len(),
            "uploading measurements"
        );
        let _ack: serde_json::Value = self.post(url, upload).await?;
        Ok(())
    }
}
