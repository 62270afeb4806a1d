use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cal_core::CalendarSettings;
use serde::Deserialize;
use tracing::debug;

/// Contents of `cal.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalToml {
    pub record_file: Option<PathBuf>,
    pub include_overflow: Option<bool>,
}

impl CalToml {
    fn into_settings(self) -> CalendarSettings {
        let defaults = CalendarSettings::default();
        CalendarSettings {
            record_file: self.record_file.unwrap_or(defaults.record_file),
            include_overflow: self.include_overflow.unwrap_or(defaults.include_overflow),
        }
    }
}

/// Load settings from `path`, falling back to defaults when the file does
/// not exist. `file_override` replaces the configured record file.
pub fn load(path: &Path, file_override: Option<PathBuf>) -> Result<CalendarSettings> {
    let toml_config = if path.exists() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str::<CalToml>(&text)
            .with_context(|| format!("invalid config {}", path.display()))?
    } else {
        debug!(path = %path.display(), "no config file, using defaults");
        CalToml::default()
    };

    let mut settings = toml_config.into_settings();
    if let Some(file) = file_override {
        settings.record_file = file;
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load(&dir.path().join("cal.toml"), None).unwrap();
        assert_eq!(settings, CalendarSettings::default());
    }

    #[test]
    fn test_config_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cal.toml");
        std::fs::write(&path, "record_file = \"days.txt\"\ninclude_overflow = false\n").unwrap();

        let settings = load(&path, None).unwrap();
        assert_eq!(settings.record_file, PathBuf::from("days.txt"));
        assert!(!settings.include_overflow);

        let overridden = load(&path, Some(PathBuf::from("other.txt"))).unwrap();
        assert_eq!(overridden.record_file, PathBuf::from("other.txt"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cal.toml");
        std::fs::write(&path, "colour = \"red\"\n").unwrap();
        assert!(load(&path, None).is_err());
    }
}
