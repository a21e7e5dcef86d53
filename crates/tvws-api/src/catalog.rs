// Reference-data endpoints: regions ("states") and sites ("locations").
//
// Regions and sites are read-mostly; the add endpoints are
// administrator-only on the service side.

use serde_json::json;
use tracing::debug;

use crate::client::SpectrumClient;
use crate::error::Error;
use crate::model::{Region, Site};

impl SpectrumClient {
    /// List all administrative regions.
    ///
    /// `GET /states`
    pub async fn list_states(&self) -> Result<Vec<Region>, Error> {
        let url = self.endpoint(&["states"]);
        debug!("listing regions");
        self.get(url).await
    }

    /// List the sites belonging to one region, by region name.
    ///
    /// `GET /locations/{state}`. The state name is percent-encoded.
    pub async fn list_locations(&self, region: &str) -> Result<Vec<Site>, Error> {
        let url = self.endpoint(&["locations", region]);
        debug!(region, "listing sites");
        self.get(url).await
    }

    /// Register a new region.
    ///
    /// `POST /states` with `{name}`.
    pub async fn add_state(&self, name: &str) -> Result<Region, Error> {
        let url = self.endpoint(&["states"]);
        debug!(name, "adding region");
        self.post(url, &json!({ "name": name })).await
    }

    /// Register a new site within a region.
    ///
    /// `POST /locations` with `{state, name, coordinates: {lat, lon}}`.
    pub async fn add_location(
        &self,
        region: &str,
        name: &str,
        lat: f64,
        lon: f64,
    ) -> Result<Site, Error> {
        let url = self.endpoint(&["locations"]);
        debug!(region, name, "adding site");
        self.post(
            url,
            &json!({
                "state": region,
                "name": name,
                "coordinates": { "lat": lat, "lon": lon },
            }),
        )
        .await
    }
}
