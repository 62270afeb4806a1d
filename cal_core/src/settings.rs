//! Calendar settings shared by every client of the store.
//!
//! Settings are plain serde data so a client can load them from whatever
//! configuration format it uses; missing fields fall back to the defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default record file, resolved against the working directory
pub const DEFAULT_RECORD_FILE: &str = "OffdayList.txt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Off-day record file
    pub record_file: PathBuf,

    /// Fill the blank cells before the 1st and after the last day with the
    /// neighbouring months' day numbers
    pub include_overflow: bool,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        CalendarSettings {
            record_file: PathBuf::from(DEFAULT_RECORD_FILE),
            include_overflow: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CalendarSettings::default();
        assert_eq!(settings.record_file, PathBuf::from("OffdayList.txt"));
        assert!(settings.include_overflow);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: CalendarSettings = serde_json::from_str(r#"{"include_overflow": false}"#).unwrap();
        assert_eq!(settings.record_file, PathBuf::from(DEFAULT_RECORD_FILE));
        assert!(!settings.include_overflow);
    }
}
