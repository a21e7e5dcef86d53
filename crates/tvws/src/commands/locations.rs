//! Location (site) command handlers.

use tabled::Tabled;

use tvws_api::Site;

use crate::cli::{GlobalOpts, LocationsArgs, LocationsCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Latitude")]
    lat: f64,
    #[tabled(rename = "Longitude")]
    lon: f64,
}

fn to_row(site: &Site) -> SiteRow {
    SiteRow {
        name: site.name.clone(),
        state: site.region.clone(),
        lat: site.coordinates.lat,
        lon: site.coordinates.lon,
    }
}

pub async fn handle(
    ctx: &Context,
    args: LocationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = ctx.gate.client();

    match args.command {
        LocationsCommand::List { state } => {
            let sites = client.list_locations(&state).await?;
            let rendered = output::render_list(&global.output, &sites, to_row, |s| s.name.clone());
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        LocationsCommand::Add {
            state,
            name,
            lat,
            lon,
        } => {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(CliError::Validation {
                    field: "lat".into(),
                    reason: format!("{lat} is outside -90..=90"),
                });
            }
            if !(-180.0..=180.0).contains(&lon) {
                return Err(CliError::Validation {
                    field: "lon".into(),
                    reason: format!("{lon} is outside -180..=180"),
                });
            }

            let site = client.add_location(&state, &name, lat, lon).await?;
            if !global.quiet {
                eprintln!("Location '{}' added to {}", site.name, site.region);
            }
            Ok(())
        }
    }
}
