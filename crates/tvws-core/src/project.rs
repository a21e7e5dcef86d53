//! Result Projector: tabular, chart, and export shapes for a
//! [`QueryResult`].
//!
//! All projections preserve the server-provided channel order; nothing
//! here sorts, filters, or reclassifies.

use chrono::NaiveDate;

use tvws_api::{ChannelStatus, QueryResult};

/// One table row. Mirrors a [`ChannelReading`](tvws_api::ChannelReading)
/// with the signed dBm value intact.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRow {
    pub channel: u8,
    pub frequency_mhz: f64,
    pub signal_strength_dbm: f64,
    pub status: ChannelStatus,
}

/// One chart point. `magnitude` is the absolute signal strength, used
/// only for bar height; textual presentation must restore the sign via
/// [`ChartPoint::display_dbm`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub channel: u8,
    pub magnitude: f64,
    pub status: ChannelStatus,
}

impl ChartPoint {
    /// The signed dBm value for labels and tooltips.
    pub fn display_dbm(&self) -> f64 {
        -self.magnitude.abs()
    }
}

/// Project a result into table rows, in server order.
pub fn table_rows(result: &QueryResult) -> Vec<ChannelRow> {
    result
        .channels
        .iter()
        .map(|c| ChannelRow {
            channel: c.channel,
            frequency_mhz: c.frequency_mhz,
            signal_strength_dbm: c.signal_strength_dbm,
            status: c.status,
        })
        .collect()
}

/// Project a result into chart points, in server order.
pub fn chart_series(result: &QueryResult) -> Vec<ChartPoint> {
    result
        .channels
        .iter()
        .map(|c| ChartPoint {
            channel: c.channel,
            magnitude: c.signal_strength_dbm.abs(),
            status: c.status,
        })
        .collect()
}

/// Header line of the CSV export.
pub const EXPORT_HEADER: &str = "Channel,Frequency (MHz),Signal Strength (dBm),Status";

/// Serialize a result to the portable CSV export: the header plus one
/// line per channel in table order, `\n`-joined.
pub fn export_csv(result: &QueryResult) -> String {
    let mut lines = Vec::with_capacity(result.channels.len() + 1);
    lines.push(EXPORT_HEADER.to_owned());
    for c in &result.channels {
        lines.push(format!(
            "{},{},{},{}",
            c.channel, c.frequency_mhz, c.signal_strength_dbm, c.status
        ));
    }
    lines.join("\n")
}

/// Export filename convention: `tvws-{region}-{site}-{YYYY-MM-DD}.csv`
/// (export date, not query time).
pub fn export_filename(region: &str, site: &str, date: NaiveDate) -> String {
    format!("tvws-{region}-{site}-{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tvws_api::{ChannelReading, Coordinates, Site};

    fn sample_result() -> QueryResult {
        QueryResult {
            channels: vec![
                ChannelReading {
                    channel: 21,
                    frequency_mhz: 470.0,
                    signal_strength_dbm: -95.2,
                    status: ChannelStatus::Free,
                },
                ChannelReading {
                    channel: 22,
                    frequency_mhz: 478.0,
                    signal_strength_dbm: -61.0,
                    status: ChannelStatus::Occupied,
                },
            ],
            total_available_bandwidth_mhz: 8.0,
            site: Site {
                id: "l1".into(),
                region: "Edo".into(),
                name: "Benin".into(),
                coordinates: Coordinates { lat: 6.34, lon: 5.63 },
            },
            query_time: "2025-01-20T14:30:00Z".into(),
        }
    }

    #[test]
    fn table_preserves_server_order() {
        let rows = table_rows(&sample_result());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].channel, 21);
        assert_eq!(rows[1].channel, 22);
        assert_eq!(rows[0].status, ChannelStatus::Free);
    }

    #[test]
    fn chart_magnitude_is_unsigned_but_display_restores_sign() {
        let series = chart_series(&sample_result());
        assert!((series[0].magnitude - 95.2).abs() < 1e-9);
        assert!((series[0].display_dbm() - (-95.2)).abs() < 1e-9);
        assert!((series[1].magnitude - 61.0).abs() < 1e-9);
    }

    #[test]
    fn export_round_trips_the_table() {
        let result = sample_result();
        let text = export_csv(&result);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), result.channels.len() + 1);
        assert_eq!(lines[0], EXPORT_HEADER);

        for (line, reading) in lines[1..].iter().zip(&result.channels) {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields.len(), 4);
            assert_eq!(fields[0].parse::<u8>().expect("channel"), reading.channel);
            let frequency: f64 = fields[1].parse().expect("frequency");
            assert!((frequency - reading.frequency_mhz).abs() < 1e-9);
            let signal: f64 = fields[2].parse().expect("signal");
            assert!((signal - reading.signal_strength_dbm).abs() < 1e-9);
            assert_eq!(fields[3], reading.status.as_str());
        }
    }

    #[test]
    fn scenario_edo_benin_two_channels() {
        let result = sample_result();
        assert_eq!(result.free_count(), 1);
        assert_eq!(result.occupied_count(), 1);
        assert_eq!(export_csv(&result).lines().count(), 3);
    }

    #[test]
    fn filename_encodes_region_site_and_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 20).expect("valid date");
        assert_eq!(
            export_filename("Edo", "Benin", date),
            "tvws-Edo-Benin-2025-01-20.csv"
        );
    }
}
