//! Spectrum query handler: runs the selection cascade, executes the
//! query, and renders summary, channel table, bar chart, and CSV export.

use std::path::PathBuf;

use chrono::Local;
use owo_colors::OwoColorize;
use tabled::Tabled;

use tvws_api::{ChannelStatus, QueryResult};
use tvws_core::{QueryExecutor, SelectionCascade, project};

use crate::cli::{GlobalOpts, OutputFormat, QueryArgs};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ChannelTableRow {
    #[tabled(rename = "Channel")]
    channel: u8,
    #[tabled(rename = "Frequency (MHz)")]
    frequency: f64,
    #[tabled(rename = "Signal (dBm)")]
    signal: f64,
    #[tabled(rename = "Status")]
    status: &'static str,
}

pub async fn handle(ctx: &Context, args: QueryArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let client = ctx.gate.client();

    // Resolve the selection: region fetch validates the state name and
    // gives the site membership check a real list to work against.
    let mut cascade = SelectionCascade::new();
    cascade.choose_region(client, &args.state).await?;
    cascade.choose_site(&args.site)?;
    if let Some(ref time) = args.time {
        cascade.set_time(util::parse_local_time(time)?);
    }
    let selection = cascade.resolved().ok_or_else(|| CliError::Validation {
        field: "selection".into(),
        reason: "state, location, and time must all be set".into(),
    })?;

    let mut executor = QueryExecutor::new();
    let result = executor.run(client, &selection).await?;

    match global.output {
        OutputFormat::Table => {
            let colored = output::should_color(&global.color);
            output::print_output(&render_report(result, colored), global.quiet);
        }
        OutputFormat::Plain => {
            let free: Vec<String> = result
                .free_channels()
                .map(|c| c.channel.to_string())
                .collect();
            output::print_output(&free.join("\n"), global.quiet);
        }
        _ => {
            let rendered = output::render_single(
                &global.output,
                result,
                |_| String::new(),
                |_| String::new(),
            );
            output::print_output(&rendered, global.quiet);
        }
    }

    if let Some(path) = args.export {
        let path = path.unwrap_or_else(|| {
            PathBuf::from(project::export_filename(
                &selection.region,
                &selection.site,
                Local::now().date_naive(),
            ))
        });
        let mut csv = project::export_csv(result);
        csv.push('\n');
        std::fs::write(&path, csv)?;
        if !global.quiet {
            eprintln!("Exported to {}", path.display());
        }
    }

    Ok(())
}

/// Human-readable report: summary block, channel table, bar chart.
fn render_report(result: &QueryResult, colored: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} ({})\n",
        result.site.name, result.site.region
    ));
    out.push_str(&format!("Query time: {}\n", result.query_time));
    out.push_str(&format!(
        "Coordinates: {:.4}, {:.4}\n",
        result.site.coordinates.lat, result.site.coordinates.lon
    ));
    out.push_str(&format!(
        "Free: {}   Occupied: {}   Available bandwidth: {} MHz\n\n",
        result.free_count(),
        result.occupied_count(),
        result.total_available_bandwidth_mhz
    ));

    let rows: Vec<ChannelTableRow> = project::table_rows(result)
        .iter()
        .map(|r| ChannelTableRow {
            channel: r.channel,
            frequency: r.frequency_mhz,
            signal: r.signal_strength_dbm,
            status: r.status.as_str(),
        })
        .collect();
    out.push_str(&output::render_table(&rows));
    out.push_str("\n\n");

    out.push_str(&render_chart(result, colored));
    out
}

/// Signal-strength bar chart: one bar per channel, height from the
/// unsigned magnitude, label showing the signed dBm value.
fn render_chart(result: &QueryResult, colored: bool) -> String {
    const MAX_WIDTH: f64 = 40.0;

    let series = project::chart_series(result);
    let max = series.iter().map(|p| p.magnitude).fold(1.0, f64::max);

    let mut lines = Vec::with_capacity(series.len());
    for point in &series {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let width = ((point.magnitude / max) * MAX_WIDTH).round().max(1.0) as usize;
        let bar = "█".repeat(width);
        let bar = if colored {
            match point.status {
                ChannelStatus::Free => bar.green().to_string(),
                ChannelStatus::Occupied => bar.red().to_string(),
            }
        } else {
            bar
        };
        lines.push(format!(
            "ch {:>2}  {bar}  {} dBm ({})",
            point.channel,
            point.display_dbm(),
            point.status.as_str()
        ));
    }
    lines.join("\n")
}
