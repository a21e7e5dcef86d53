//! Ingestion Pipeline: single-record and CSV-batch measurement uploads.
//!
//! The batch path isolates faults per row: a malformed row or a remote
//! rejection is recorded in the [`BatchReport`] ledger and processing
//! continues with the next row. Rows are submitted strictly
//! sequentially, one upload call per row, in row order.

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use tvws_api::{MeasurementUpload, NewReading, SpectrumClient};

use crate::error::CoreError;
use crate::time::{parse_timestamp, to_wire};

/// Expected CSV header fields. Position is taken from the header row,
/// not from this ordering.
pub const BATCH_FIELDS: [&str; 6] = [
    "state",
    "location",
    "timestamp",
    "channel",
    "frequency",
    "signal_strength",
];

/// One failed batch row: 1-indexed data-row number plus the reason the
/// row was skipped or rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub row: usize,
    pub reason: String,
}

/// Per-row ledger returned by [`submit_batch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failures: Vec<RowFailure>,
}

impl BatchReport {
    /// Total rows processed (submitted + failed).
    pub fn total(&self) -> usize {
        self.succeeded + self.failures.len()
    }

    /// `true` when every row was submitted.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

// ── Single-record path ──────────────────────────────────────────────

/// Submit one measurement record.
///
/// Validation happens before any network call: region, site, and
/// timestamp must be non-empty, at least one reading is required, and
/// the timestamp must parse. An invalid record is never partially
/// submitted. Remote rejection surfaces as [`CoreError::Upload`] with
/// the service detail.
pub async fn submit_one(
    client: &SpectrumClient,
    region: &str,
    site: &str,
    timestamp: &str,
    readings: &[NewReading],
) -> Result<(), CoreError> {
    if region.trim().is_empty() {
        return Err(CoreError::validation("region", "must not be empty"));
    }
    if site.trim().is_empty() {
        return Err(CoreError::validation("site", "must not be empty"));
    }
    if timestamp.trim().is_empty() {
        return Err(CoreError::validation("timestamp", "must not be empty"));
    }
    if readings.is_empty() {
        return Err(CoreError::validation("readings", "at least one reading"));
    }

    let instant =
        parse_timestamp(timestamp).map_err(|reason| CoreError::validation("timestamp", reason))?;

    let upload = MeasurementUpload {
        region: region.to_owned(),
        site: site.to_owned(),
        timestamp: to_wire(instant),
        readings: readings.to_vec(),
    };

    client
        .upload_measurements(&upload)
        .await
        .map_err(CoreError::upload_from)?;

    info!(region, site, readings = readings.len(), "measurement uploaded");
    Ok(())
}

// ── Batch path ──────────────────────────────────────────────────────

/// Header-position map for one batch.
#[derive(Debug)]
struct ColumnMap {
    state: usize,
    location: usize,
    timestamp: usize,
    channel: usize,
    frequency: usize,
    signal_strength: usize,
}

impl ColumnMap {
    /// Zip the header row against the required field names. Fields may
    /// appear in any order; a missing required field fails the whole
    /// batch (no row can be interpreted without it).
    fn from_headers(headers: &StringRecord) -> Result<Self, CoreError> {
        let find = |name: &str| -> Result<usize, CoreError> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    CoreError::validation("batch", format!("header is missing '{name}'"))
                })
        };

        Ok(Self {
            state: find("state")?,
            location: find("location")?,
            timestamp: find("timestamp")?,
            channel: find("channel")?,
            frequency: find("frequency")?,
            signal_strength: find("signal_strength")?,
        })
    }
}

fn batch_reader(text: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.trim().as_bytes())
}

/// Number of data records in a batch, under the same parsing rules as
/// [`submit_batch`]. Raw line counts overshoot: blank interior lines
/// and quoted multi-line values are not records.
pub fn count_records(text: &str) -> usize {
    batch_reader(text).into_records().count()
}

/// Submit a delimited-text batch, one single-reading upload per data
/// row, strictly in row order.
///
/// The first line names the fields (any order, matched by name). Each
/// subsequent line becomes one record. A row with a missing field, an
/// unparseable number or timestamp, or a remote rejection is recorded
/// in the ledger and does not stop the remaining rows.
pub async fn submit_batch(client: &SpectrumClient, text: &str) -> Result<BatchReport, CoreError> {
    submit_batch_with(client, text, |_, _| {}).await
}

/// [`submit_batch`] with a per-row observer, called after each row with
/// its 1-indexed number and whether it was accepted. Used by progress
/// displays.
pub async fn submit_batch_with(
    client: &SpectrumClient,
    text: &str,
    mut observe: impl FnMut(usize, bool),
) -> Result<BatchReport, CoreError> {
    let mut reader = batch_reader(text);

    let headers = reader
        .headers()
        .map_err(|e| CoreError::validation("batch", format!("unreadable header: {e}")))?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut report = BatchReport::default();

    for (index, record) in reader.records().enumerate() {
        let row = index + 1;

        let upload = match record
            .map_err(|e| format!("malformed row: {e}"))
            .and_then(|r| row_to_upload(&columns, &r))
        {
            Ok(upload) => upload,
            Err(reason) => {
                warn!(row, %reason, "skipping batch row");
                report.failures.push(RowFailure { row, reason });
                observe(row, false);
                continue;
            }
        };

        match client.upload_measurements(&upload).await {
            Ok(()) => {
                debug!(row, "batch row uploaded");
                report.succeeded += 1;
                observe(row, true);
            }
            Err(err) => {
                let reason = match CoreError::upload_from(err) {
                    CoreError::Connection { message } => format!("service unreachable: {message}"),
                    other => other.to_string(),
                };
                warn!(row, %reason, "batch row rejected");
                report.failures.push(RowFailure { row, reason });
                observe(row, false);
            }
        }
    }

    info!(
        succeeded = report.succeeded,
        failed = report.failures.len(),
        "batch complete"
    );
    Ok(report)
}

/// Build one single-reading upload from a CSV record, or the reason it
/// cannot be built.
fn row_to_upload(columns: &ColumnMap, record: &StringRecord) -> Result<MeasurementUpload, String> {
    let field = |idx: usize, name: &str| -> Result<&str, String> {
        match record.get(idx).map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(format!("missing field '{name}'")),
        }
    };

    let state = field(columns.state, "state")?;
    let location = field(columns.location, "location")?;
    let timestamp = field(columns.timestamp, "timestamp")?;

    let channel: u8 = field(columns.channel, "channel")?
        .parse()
        .map_err(|_| format!("invalid channel: '{}'", record.get(columns.channel).unwrap_or("")))?;
    let frequency_mhz: f64 = field(columns.frequency, "frequency")?.parse().map_err(|_| {
        format!(
            "invalid frequency: '{}'",
            record.get(columns.frequency).unwrap_or("")
        )
    })?;
    let signal_strength_dbm: f64 =
        field(columns.signal_strength, "signal_strength")?
            .parse()
            .map_err(|_| {
                format!(
                    "invalid signal_strength: '{}'",
                    record.get(columns.signal_strength).unwrap_or("")
                )
            })?;

    let instant = parse_timestamp(timestamp)?;

    Ok(MeasurementUpload {
        region: state.to_owned(),
        site: location.to_owned(),
        timestamp: to_wire(instant),
        readings: vec![NewReading {
            channel,
            frequency_mhz,
            signal_strength_dbm,
        }],
    })
}
