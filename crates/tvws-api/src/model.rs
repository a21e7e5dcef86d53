//! Wire types for the Remote Spectrum Service JSON contract.
//!
//! Field names follow the service's JSON (`state`, `_id`,
//! `totalAvailableBandwidth`, ...) via serde renames; Rust-side names
//! follow the domain vocabulary (region, site).

use serde::{Deserialize, Serialize};

/// UHF channel numbering starts at 21 (470 MHz).
pub const FIRST_CHANNEL: u8 = 21;
/// UHF channel numbering ends at 69.
pub const LAST_CHANNEL: u8 = 69;
/// UHF channel width in MHz.
pub const CHANNEL_WIDTH_MHZ: f64 = 8.0;
/// Base frequency of channel 21 in MHz.
pub const BASE_FREQUENCY_MHZ: f64 = 470.0;

/// Nominal center frequency for a UHF channel: `470 + (ch − 21) × 8` MHz.
///
/// Used only to pre-fill new measurement rows; the service never requires
/// channel and frequency to agree.
pub fn frequency_for_channel(channel: u8) -> f64 {
    BASE_FREQUENCY_MHZ + f64::from(channel.saturating_sub(FIRST_CHANNEL)) * CHANNEL_WIDTH_MHZ
}

// ── Identity ────────────────────────────────────────────────────────

/// Authenticated user identity as reported by `/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub name: String,
}

/// Access role assigned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful `/auth/login` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSession {
    pub access_token: String,
    pub user: Identity,
}

// ── Reference data ──────────────────────────────────────────────────

/// An administrative region ("state"). Read-mostly reference data;
/// `name` is the human-facing key used in all subsequent calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// WGS84 decimal-degree coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A geocoded measurement site, always scoped to exactly one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "state")]
    pub region: String,
    pub name: String,
    pub coordinates: Coordinates,
}

// ── Channel readings ────────────────────────────────────────────────

/// Free/occupied classification, assigned by the service. Never computed
/// client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    Free,
    Occupied,
}

impl ChannelStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Occupied => "occupied",
        }
    }
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified channel observation in a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReading {
    pub channel: u8,
    pub frequency_mhz: f64,
    pub signal_strength_dbm: f64,
    pub status: ChannelStatus,
}

/// An outbound measurement reading: a [`ChannelReading`] minus `status`
/// (classification is the service's job).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReading {
    pub channel: u8,
    pub frequency_mhz: f64,
    pub signal_strength_dbm: f64,
}

impl NewReading {
    /// Default noise-floor pre-fill for interactively added rows.
    pub const DEFAULT_SIGNAL_DBM: f64 = -85.0;

    /// The conventional first row: channel 21 at 470 MHz, −85 dBm.
    pub fn first() -> Self {
        Self {
            channel: FIRST_CHANNEL,
            frequency_mhz: BASE_FREQUENCY_MHZ,
            signal_strength_dbm: Self::DEFAULT_SIGNAL_DBM,
        }
    }

    /// Pre-fill the row after `prev`: next channel, its nominal
    /// frequency, default signal strength. Ergonomic only; submission
    /// never validates the channel/frequency pairing.
    pub fn next_after(prev: &Self) -> Self {
        let channel = prev.channel.saturating_add(1);
        Self {
            channel,
            frequency_mhz: frequency_for_channel(channel),
            signal_strength_dbm: Self::DEFAULT_SIGNAL_DBM,
        }
    }
}

// ── Requests ────────────────────────────────────────────────────────

/// Outbound `/query-tvws` request. `time` must already be an absolute
/// ISO-8601 UTC instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(rename = "state")]
    pub region: String,
    #[serde(rename = "location")]
    pub site: String,
    pub time: String,
}

/// Outbound `/upload-measurements` request: one timestamp, one site,
/// one-or-more readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementUpload {
    #[serde(rename = "state")]
    pub region: String,
    #[serde(rename = "location")]
    pub site: String,
    pub timestamp: String,
    pub readings: Vec<NewReading>,
}

// ── Query result ────────────────────────────────────────────────────

/// A spectrum-availability answer. Transient: held for one query/render
/// cycle and superseded wholesale by the next query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub channels: Vec<ChannelReading>,
    #[serde(rename = "totalAvailableBandwidth")]
    pub total_available_bandwidth_mhz: f64,
    #[serde(rename = "location")]
    pub site: Site,
    #[serde(rename = "queryTime")]
    pub query_time: String,
}

impl QueryResult {
    /// Channels the service classified as free, in server order.
    pub fn free_channels(&self) -> impl Iterator<Item = &ChannelReading> {
        self.channels
            .iter()
            .filter(|c| c.status == ChannelStatus::Free)
    }

    /// Channels the service classified as occupied, in server order.
    pub fn occupied_channels(&self) -> impl Iterator<Item = &ChannelReading> {
        self.channels
            .iter()
            .filter(|c| c.status == ChannelStatus::Occupied)
    }

    pub fn free_count(&self) -> usize {
        self.free_channels().count()
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied_channels().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_frequency_mapping() {
        assert!((frequency_for_channel(21) - 470.0).abs() < f64::EPSILON);
        assert!((frequency_for_channel(22) - 478.0).abs() < f64::EPSILON);
        assert!((frequency_for_channel(69) - 854.0).abs() < f64::EPSILON);
    }

    #[test]
    fn default_row_generation_rule() {
        let mut row = NewReading::first();
        let mut channels = Vec::new();
        let mut freqs = Vec::new();
        for _ in 0..3 {
            row = NewReading::next_after(&row);
            channels.push(row.channel);
            freqs.push(row.frequency_mhz);
        }
        assert_eq!(channels, vec![22, 23, 24]);
        assert_eq!(freqs, vec![478.0, 486.0, 494.0]);
        assert!((row.signal_strength_dbm - (-85.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn status_serde_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChannelStatus::Free).expect("serialize"),
            "\"free\""
        );
        let parsed: ChannelStatus =
            serde_json::from_str("\"occupied\"").expect("deserialize");
        assert_eq!(parsed, ChannelStatus::Occupied);
    }
}
