mod settings;

pub use settings::{Config, CustomerSettings, DashboardSettings, DataSettings, LaneSettings};

use crate::error::{FreightError, Result};
use crate::records::{decode_collection, Booking, Quotation};
use chrono::format::{Item, StrftimeItems};
use directories::ProjectDirs;
use serde::Serialize;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Month counts the CLI accepts; requests outside are clamped.
pub const MONTHS_RANGE: RangeInclusive<i32> = 3..=24;

/// Get the config directory path (~/.freight/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "freight") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.freight/
    let home = dirs_home().ok_or_else(|| {
        FreightError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".freight"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ and resolve relative snapshot paths against the config directory
pub fn resolve_data_path(path: &str, config_dir: &Path) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        config_dir.join(path)
    }
}

pub fn clamp_months(months: i32) -> i32 {
    months.clamp(*MONTHS_RANGE.start(), *MONTHS_RANGE.end())
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    if !config_dir.exists() {
        return Err(FreightError::ConfigNotFound(config_dir.to_path_buf()));
    }
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(FreightError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    let config: Config =
        toml::from_str(&content).map_err(|e| FreightError::ConfigParse { path, source: e })?;
    validate_date_format(&config.dashboard.date_format)?;
    Ok(config)
}

/// Reject strftime patterns chrono cannot render
pub fn validate_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(FreightError::InvalidDateFormat(format.to_string()));
    }
    Ok(())
}

/// Load the quotation snapshot (empty if the file is missing)
pub fn load_quotations(config_dir: &Path, config: &Config) -> Result<Vec<Quotation>> {
    let path = resolve_data_path(&config.data.quotations, config_dir);
    load_snapshot(&path, "quotations")
}

/// Load the booking snapshot (empty if the file is missing)
pub fn load_bookings(config_dir: &Path, config: &Config) -> Result<Vec<Booking>> {
    let path = resolve_data_path(&config.data.bookings, config_dir);
    load_snapshot(&path, "bookings")
}

fn load_snapshot<T: serde::de::DeserializeOwned>(path: &Path, kind: &str) -> Result<Vec<T>> {
    if !path.exists() {
        info!(kind, path = %path.display(), "snapshot file missing, using empty collection");
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| FreightError::SnapshotParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    let records: Vec<T> = decode_collection(value, kind);
    debug!(kind, count = records.len(), path = %path.display(), "loaded snapshot");
    Ok(records)
}

/// Write a snapshot collection as pretty JSON
pub fn save_snapshot<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let content = serde_json::to_string_pretty(records)?;
    fs::write(path, content)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[dashboard]
months = 12              # trailing months shown by default (3-24)
currency_symbol = "$"
date_format = "%b %d, %Y"

[data]
# Snapshot files exported by the operations app, relative to this directory
quotations = "quotations.json"
bookings = "bookings.json"

[lanes]
# Booking lines without origin/destination: "count" toward every lane,
# or "exclude" them whenever a lane filter is set
unlabeled_bookings = "count"

[customers]
# Customers listed by 'freight quotes' when no --customer is given
allowed = []
# Substring rules also accept short names inside unrelated ones
substring_match = true
# "customer" groups by the customer field only, "resolved" also falls back
# to inquiry snapshot, customer name and customer code
summary_identity = "customer"

[[ros_bands]]
id = "low"
label = "Low"
max = 12.0

[[ros_bands]]
id = "mid"
label = "Mid"
min = 12.0
max = 20.0

[[ros_bands]]
id = "high"
label = "High"
min = 20.0
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{IdentitySource, UnlabeledBookings};

    #[test]
    fn template_parses_to_defaults() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        let defaults = Config::default();
        assert_eq!(config.dashboard.months, defaults.dashboard.months);
        assert_eq!(config.ros_bands, defaults.ros_bands);
        assert_eq!(config.lanes.unlabeled_bookings, UnlabeledBookings::Count);
        assert_eq!(config.customers.summary_identity, IdentitySource::Customer);
        assert!(config.customers.match_rules().substring);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.data.quotations, "quotations.json");
        assert_eq!(config.ros_bands.len(), 3);
    }

    #[test]
    fn clamps_month_requests() {
        assert_eq!(clamp_months(1), 3);
        assert_eq!(clamp_months(12), 12);
        assert_eq!(clamp_months(60), 24);
    }

    #[test]
    fn relative_data_paths_resolve_under_config_dir() {
        let dir = Path::new("/tmp/freight-config");
        assert_eq!(resolve_data_path("quotes.json", dir), dir.join("quotes.json"));
        assert_eq!(resolve_data_path("/data/b.json", dir), PathBuf::from("/data/b.json"));
    }

    #[test]
    fn loads_lenient_snapshots_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), CONFIG_TEMPLATE).unwrap();
        fs::write(
            dir.path().join("quotations.json"),
            r#"[{"id": "Q-1", "lines": [{"qty": 2}]}, 5]"#,
        )
        .unwrap();
        fs::write(dir.path().join("bookings.json"), r#"{"not": "an array"}"#).unwrap();

        let config = load_config(dir.path()).unwrap();
        let quotations = load_quotations(dir.path(), &config).unwrap();
        let bookings = load_bookings(dir.path(), &config).unwrap();
        assert_eq!(quotations.len(), 1);
        assert!(bookings.is_empty());
    }

    #[test]
    fn rejects_unknown_date_specifiers() {
        assert!(validate_date_format("%b %d, %Y").is_ok());
        assert!(matches!(
            validate_date_format("%Q"),
            Err(FreightError::InvalidDateFormat(f)) if f == "%Q"
        ));

        let dir = tempfile::tempdir().unwrap();
        let content = CONFIG_TEMPLATE.replace(r#"date_format = "%b %d, %Y""#, r#"date_format = "%Q""#);
        fs::write(dir.path().join("config.toml"), content).unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, FreightError::InvalidDateFormat(_)));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("quotations.json"), "[{").unwrap();
        let err = load_quotations(dir.path(), &Config::default()).unwrap_err();
        assert!(matches!(err, FreightError::SnapshotParse { .. }));
    }
}
