//! State (region) command handlers.

use tabled::Tabled;

use tvws_api::Region;

use crate::cli::{GlobalOpts, StatesArgs, StatesCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct RegionRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
}

fn to_row(region: &Region) -> RegionRow {
    RegionRow {
        name: region.name.clone(),
        id: region.id.clone(),
    }
}

pub async fn handle(ctx: &Context, args: StatesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let client = ctx.gate.client();

    match args.command {
        StatesCommand::List => {
            let regions = tvws_core::SelectionCascade::load_regions(client).await?;
            let rendered =
                output::render_list(&global.output, &regions, to_row, |r| r.name.clone());
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        StatesCommand::Add { name } => {
            if name.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: "must not be empty".into(),
                });
            }
            let region = client.add_state(&name).await?;
            if !global.quiet {
                eprintln!("State '{}' added", region.name);
            }
            Ok(())
        }
    }
}
