//! Measurement upload handlers: single record and CSV batch.

use indicatif::{ProgressBar, ProgressStyle};

use tvws_core::ingest::{self, BATCH_FIELDS};

use crate::cli::{GlobalOpts, UploadArgs, UploadCommand};
use crate::config::Context;
use crate::error::CliError;

pub async fn handle(ctx: &Context, args: UploadArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let client = ctx.gate.client();

    match args.command {
        UploadCommand::Single {
            state,
            site,
            timestamp,
            readings,
        } => {
            ingest::submit_one(client, &state, &site, &timestamp, &readings).await?;
            if !global.quiet {
                eprintln!(
                    "Uploaded {} reading{} for {site}, {state}",
                    readings.len(),
                    if readings.len() == 1 { "" } else { "s" }
                );
            }
            Ok(())
        }

        UploadCommand::Batch { file } => {
            let text = std::fs::read_to_string(&file)?;

            // Counted with the batch parser, not raw lines: blank lines
            // and quoted multi-line values are not records.
            let total = ingest::count_records(&text);
            if total == 0 {
                return Err(CliError::Validation {
                    field: "file".into(),
                    reason: format!(
                        "no data rows; expected a header of {} plus one row per record",
                        BATCH_FIELDS.join(",")
                    ),
                });
            }

            let bar = progress_bar(total, global.quiet);
            let report = ingest::submit_batch_with(client, &text, |_, _| bar.inc(1)).await?;
            bar.finish_and_clear();

            if !global.quiet {
                eprintln!(
                    "Uploaded {} of {} rows from {}",
                    report.succeeded,
                    report.total(),
                    file.display()
                );
                for failure in &report.failures {
                    eprintln!("  row {}: {}", failure.row, failure.reason);
                }
            }

            if report.is_clean() {
                Ok(())
            } else {
                Err(CliError::BatchPartial {
                    failed: report.failures.len(),
                    total: report.total(),
                })
            }
        }
    }
}

fn progress_bar(total: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{wide_bar} {pos}/{len} rows")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}
