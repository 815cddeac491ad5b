//! Runtime flags resolved once from the command line

/// Immutable per-process run options
///
/// Built once before any scan starts and passed explicitly to the scheduler
/// and every scan loop.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Site names to skip entirely (compared case-insensitively)
    pub disabled_sites: Vec<String>,

    /// Page every scan starts at instead of the site's initial page
    pub start_page: Option<u32>,

    /// Log every delivered record
    pub debug: bool,
}

impl RunOptions {
    /// Parses a comma separated disable list such as `"finn, karrierestart"`
    pub fn parse_disabled_sites(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|name| name.trim().trim_matches('/').to_lowercase())
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Returns true if the named site is on the disable list
    pub fn is_disabled(&self, site_name: &str) -> bool {
        self.disabled_sites
            .iter()
            .any(|disabled| disabled.eq_ignore_ascii_case(site_name))
    }
}
