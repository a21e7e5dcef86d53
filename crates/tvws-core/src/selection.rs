//! Selection Cascade: the region → site → time state machine.
//!
//! A query needs all three choices resolved. The stages are tagged
//! variants rather than independent flags, so invalid combinations (a
//! site with no region, a site list from a stale region) cannot be
//! represented.

use chrono::{Local, NaiveDateTime, Timelike};
use tracing::debug;

use tvws_api::{Region, Site, SpectrumClient};

use crate::error::CoreError;

/// A fully resolved selection, ready for the Query Executor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSelection {
    pub region: String,
    pub site: String,
    pub time: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
enum Stage {
    #[default]
    Empty,
    RegionChosen {
        region: String,
        sites: Vec<Site>,
    },
    SiteChosen {
        region: String,
        sites: Vec<Site>,
        site: String,
    },
}

/// Cascading selection state. Construction pre-populates the time with
/// the current local wall-clock truncated to minute precision, so a
/// query is ready as soon as region and site are chosen.
#[derive(Debug)]
pub struct SelectionCascade {
    stage: Stage,
    time: Option<NaiveDateTime>,
}

impl Default for SelectionCascade {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionCascade {
    pub fn new() -> Self {
        Self {
            stage: Stage::Empty,
            time: Some(default_query_time()),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn region(&self) -> Option<&str> {
        match &self.stage {
            Stage::Empty => None,
            Stage::RegionChosen { region, .. } | Stage::SiteChosen { region, .. } => {
                Some(region.as_str())
            }
        }
    }

    pub fn site(&self) -> Option<&str> {
        match &self.stage {
            Stage::SiteChosen { site, .. } => Some(site.as_str()),
            _ => None,
        }
    }

    /// The site list for the currently selected region. Empty slice
    /// while no region is chosen, never a stale region's list.
    pub fn sites(&self) -> &[Site] {
        match &self.stage {
            Stage::Empty => &[],
            Stage::RegionChosen { sites, .. } | Stage::SiteChosen { sites, .. } => sites,
        }
    }

    pub fn time(&self) -> Option<NaiveDateTime> {
        self.time
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Fetch the region list that feeds a region chooser. Does not
    /// touch the selection state.
    pub async fn load_regions(client: &SpectrumClient) -> Result<Vec<Region>, CoreError> {
        client.list_states().await.map_err(CoreError::query_from)
    }

    /// Choose a region, fetching its site list from the service.
    ///
    /// Any previously chosen site is discarded before the fetch, so a
    /// fetch failure still leaves no stale pairing behind.
    pub async fn choose_region(
        &mut self,
        client: &SpectrumClient,
        name: &str,
    ) -> Result<&[Site], CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::validation("region", "must not be empty"));
        }

        self.stage = Stage::Empty;
        let sites = client
            .list_locations(name)
            .await
            .map_err(CoreError::query_from)?;
        debug!(region = name, sites = sites.len(), "region chosen");
        self.region_chosen(name.to_owned(), sites);
        Ok(self.sites())
    }

    /// Enter `RegionChosen` with an already-fetched site list.
    pub fn region_chosen(&mut self, region: String, sites: Vec<Site>) {
        self.stage = Stage::RegionChosen { region, sites };
    }

    /// Choose a site from the current region's list.
    pub fn choose_site(&mut self, name: &str) -> Result<(), CoreError> {
        let (region, sites) = match std::mem::take(&mut self.stage) {
            Stage::Empty => {
                return Err(CoreError::validation("site", "choose a region first"));
            }
            Stage::RegionChosen { region, sites } | Stage::SiteChosen { region, sites, .. } => {
                (region, sites)
            }
        };

        if !sites.iter().any(|s| s.name == name) {
            let region_name = region.clone();
            self.stage = Stage::RegionChosen { region, sites };
            return Err(CoreError::validation(
                "site",
                format!("'{name}' is not a site in {region_name}"),
            ));
        }

        self.stage = Stage::SiteChosen {
            region,
            sites,
            site: name.to_owned(),
        };
        Ok(())
    }

    pub fn set_time(&mut self, time: NaiveDateTime) {
        self.time = Some(time);
    }

    /// Reset to `Empty`, discarding region, site list, and site. The
    /// time survives; it is independent of the location choice.
    pub fn clear_region(&mut self) {
        self.stage = Stage::Empty;
    }

    /// `Some` only when region, site, and time are all resolved.
    pub fn resolved(&self) -> Option<ResolvedSelection> {
        match (&self.stage, self.time) {
            (Stage::SiteChosen { region, site, .. }, Some(time)) => Some(ResolvedSelection {
                region: region.clone(),
                site: site.clone(),
                time,
            }),
            _ => None,
        }
    }
}

/// Current local wall-clock truncated to minute precision.
pub fn default_query_time() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvws_api::Coordinates;

    fn site(region: &str, name: &str) -> Site {
        Site {
            id: format!("{region}-{name}"),
            region: region.to_owned(),
            name: name.to_owned(),
            coordinates: Coordinates { lat: 6.3, lon: 5.6 },
        }
    }

    #[test]
    fn starts_with_default_time_and_nothing_else() {
        let cascade = SelectionCascade::new();
        assert!(cascade.region().is_none());
        assert!(cascade.site().is_none());
        assert!(cascade.sites().is_empty());
        let time = cascade.time().expect("default time");
        assert_eq!(time.second(), 0);
        assert_eq!(time.nanosecond(), 0);
        assert!(cascade.resolved().is_none());
    }

    #[test]
    fn region_change_discards_site_and_site_list() {
        let mut cascade = SelectionCascade::new();
        cascade.region_chosen("Edo".into(), vec![site("Edo", "Benin")]);
        cascade.choose_site("Benin").expect("site in list");
        assert_eq!(cascade.site(), Some("Benin"));

        cascade.region_chosen("Lagos".into(), vec![site("Lagos", "Ikeja")]);
        assert_eq!(cascade.region(), Some("Lagos"));
        assert!(cascade.site().is_none(), "stale site survived region change");
        assert!(cascade.sites().iter().all(|s| s.region == "Lagos"));
        assert!(cascade.resolved().is_none());
    }

    #[test]
    fn site_requires_region_and_membership() {
        let mut cascade = SelectionCascade::new();
        assert!(cascade.choose_site("Benin").is_err());

        cascade.region_chosen("Edo".into(), vec![site("Edo", "Benin")]);
        assert!(cascade.choose_site("Ikeja").is_err());
        // Failed choice keeps the region and its list usable.
        assert_eq!(cascade.region(), Some("Edo"));
        assert_eq!(cascade.sites().len(), 1);
        assert!(cascade.choose_site("Benin").is_ok());
    }

    #[test]
    fn resolved_requires_all_three() {
        let mut cascade = SelectionCascade::new();
        cascade.region_chosen("Edo".into(), vec![site("Edo", "Benin")]);
        assert!(cascade.resolved().is_none());

        cascade.choose_site("Benin").expect("site in list");
        let resolved = cascade.resolved().expect("fully resolved");
        assert_eq!(resolved.region, "Edo");
        assert_eq!(resolved.site, "Benin");

        cascade.clear_region();
        assert!(cascade.resolved().is_none());
        assert!(cascade.time().is_some(), "time survives a region reset");
    }
}
