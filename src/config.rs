//! Service configuration: database location and rule policies
use super::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

pub const DB_PATH_VAR: &str = "BOOKING_DB_PATH";
pub const UNIT_CHECK_VAR: &str = "BOOKING_UNIT_CHECK";
pub const EXTENSION_SCAN_VAR: &str = "BOOKING_EXTENSION_SCAN";

/// How the unit availability rule compares a proposed stay with existing ones.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UnitCheck {
    /// Full inclusive overlap against every booking for the unit.
    #[default]
    StayOverlap,
    /// Only the first stored booking for the unit, and only the proposed
    /// check-in date is tested against it.
    FirstCheckIn,
}

/// How the extension check finds the booking that follows the guest's stay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionScan {
    /// Successor by check-in date.
    #[default]
    Chronological,
    /// Successor by store position; the scan gives up at the first booking
    /// that belongs to another guest.
    StoreOrder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub db_path: PathBuf,
    pub unit_check: UnitCheck,
    pub extension_scan: ExtensionScan,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./bookings.db"),
            unit_check: UnitCheck::default(),
            extension_scan: ExtensionScan::default(),
        }
    }
}

impl ServiceConfig {
    pub fn set_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }
    pub fn set_unit_check(mut self, unit_check: UnitCheck) -> Self {
        self.unit_check = unit_check;
        self
    }
    pub fn set_extension_scan(mut self, extension_scan: ExtensionScan) -> Self {
        self.extension_scan = extension_scan;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup, falling back to defaults for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(DB_PATH_VAR) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(UNIT_CHECK_VAR) {
            config.unit_check = value.parse()?;
        }
        if let Some(value) = lookup(EXTENSION_SCAN_VAR) {
            config.extension_scan = value.parse()?;
        }

        Ok(config)
    }
}

impl FromStr for UnitCheck {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stay-overlap" => Ok(UnitCheck::StayOverlap),
            "first-check-in" => Ok(UnitCheck::FirstCheckIn),
            _ => Err(ConfigError::UnknownUnitCheck(s.to_string())),
        }
    }
}

impl FromStr for ExtensionScan {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chronological" => Ok(ExtensionScan::Chronological),
            "store-order" => Ok(ExtensionScan::StoreOrder),
            _ => Err(ConfigError::UnknownExtensionScan(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_falls_back_to_defaults() {
        let config = ServiceConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.unit_check, UnitCheck::StayOverlap);
        assert_eq!(config.extension_scan, ExtensionScan::Chronological);
    }

    #[test]
    fn lookup_reads_every_key() {
        let vars = HashMap::from([
            (DB_PATH_VAR, "/tmp/stays.db"),
            (UNIT_CHECK_VAR, "First-Check-In"),
            (EXTENSION_SCAN_VAR, "store-order"),
        ]);
        let config = ServiceConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/stays.db"));
        assert_eq!(config.unit_check, UnitCheck::FirstCheckIn);
        assert_eq!(config.extension_scan, ExtensionScan::StoreOrder);
    }

    #[test]
    fn lookup_rejects_unknown_policy() {
        let err = ServiceConfig::from_lookup(|k| (k == UNIT_CHECK_VAR).then(|| "sometimes".into()))
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownUnitCheck("sometimes".into()));
    }
}
