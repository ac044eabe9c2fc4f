use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Fixed dashboard constants
// ---------------------------------------------------------------------------

/// Default location of the pre-merged transaction dataset.
pub const DEFAULT_DATA_PATH: &str = "./all_data.csv";

/// Environment variable overriding [`DEFAULT_DATA_PATH`].
pub const DATA_PATH_ENV: &str = "RUSTY_BAZAAR_DATA";

/// How many cities the city ranking keeps.
pub const TOP_CITY_LIMIT: usize = 10;

/// Placeholder payment type meaning "unknown".  Never charted and never
/// offered as a filter choice.
pub const UNDEFINED_PAYMENT_TYPE: &str = "not_defined";

/// Transaction-count boundaries for the Low / Medium / High customer buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterThresholds {
    /// Highest count still labelled Low.
    pub low_max: usize,
    /// Highest count still labelled Medium; anything above is High.
    pub medium_max: usize,
}

impl ClusterThresholds {
    pub const DEFAULT: ClusterThresholds = ClusterThresholds {
        low_max: 2,
        medium_max: 5,
    };
}

impl Default for ClusterThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Runtime configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub top_city_limit: usize,
    pub thresholds: ClusterThresholds,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_city_limit: TOP_CITY_LIMIT,
            thresholds: ClusterThresholds::DEFAULT,
        }
    }
}

impl DashboardConfig {
    /// Read the data path override from the environment.
    pub fn from_env() -> Self {
        Self::with_data_path(std::env::var(DATA_PATH_ENV).ok())
    }

    fn with_data_path(path: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = path.filter(|p| !p.trim().is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_constants() {
        let config = DashboardConfig::default();
        assert_eq!(config.data_path, PathBuf::from("./all_data.csv"));
        assert_eq!(config.top_city_limit, 10);
        assert_eq!(config.thresholds.low_max, 2);
        assert_eq!(config.thresholds.medium_max, 5);
    }

    #[test]
    fn blank_override_keeps_default_path() {
        let config = DashboardConfig::with_data_path(Some("   ".to_string()));
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));

        let config = DashboardConfig::with_data_path(Some("/tmp/orders.parquet".to_string()));
        assert_eq!(config.data_path, PathBuf::from("/tmp/orders.parquet"));
    }
}
