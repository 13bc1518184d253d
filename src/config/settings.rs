use serde::{Deserialize, Serialize};

use crate::analytics::ros::default_bands;
use crate::analytics::{IdentitySource, MatchRules, RosBand, UnlabeledBookings};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub lanes: LaneSettings,
    #[serde(default)]
    pub customers: CustomerSettings,
    #[serde(default = "default_bands")]
    pub ros_bands: Vec<RosBand>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dashboard: DashboardSettings::default(),
            data: DataSettings::default(),
            lanes: LaneSettings::default(),
            customers: CustomerSettings::default(),
            ros_bands: default_bands(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Trailing months shown when `--months` is not given.
    pub months: i32,
    pub currency_symbol: String,
    /// chrono format string for dates in tables
    pub date_format: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            months: 12,
            currency_symbol: "$".to_string(),
            date_format: "%b %d, %Y".to_string(),
        }
    }
}

/// Snapshot file names, relative to the config directory unless absolute.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DataSettings {
    pub quotations: String,
    pub bookings: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            quotations: "quotations.json".to_string(),
            bookings: "bookings.json".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LaneSettings {
    pub unlabeled_bookings: UnlabeledBookings,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct CustomerSettings {
    /// Customers shown by `freight quotes` when no `--customer` is given.
    pub allowed: Vec<String>,
    pub substring_match: bool,
    pub summary_identity: IdentitySource,
}

impl Default for CustomerSettings {
    fn default() -> Self {
        Self {
            allowed: Vec::new(),
            substring_match: true,
            summary_identity: IdentitySource::default(),
        }
    }
}

impl CustomerSettings {
    pub fn match_rules(&self) -> MatchRules {
        MatchRules {
            substring: self.substring_match,
        }
    }
}
