//! Profiler configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{KeyprofError, Result};
use crate::flatten::FlattenOptions;

/// Profiler and utility configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Maximum nesting level to descend (-1 = unbounded)
    pub level_max: i32,
    /// Emit paths of nested records as well as their leaves
    pub include_container_keys: bool,
    /// Last path segments flagged as engine-internal in field reports
    pub hidden_fields: Vec<String>,
    /// Map/reduce partitions (0 = one per worker thread)
    pub partitions: usize,
    /// Progress log interval for maintenance utilities, in records
    pub report_every: usize,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            level_max: -1,
            include_container_keys: false,
            hidden_fields: vec![
                "floatApprox".to_string(),
                "top".to_string(),
                "bottom".to_string(),
            ],
            partitions: 0,
            report_every: 1000,
        }
    }
}

impl ProfilerConfig {
    /// Loads a JSON configuration file; missing keys take default values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| KeyprofError::Io(format!("{}: {}", path.display(), e)))?;
        let config: ProfilerConfig = serde_json::from_str(&text)
            .map_err(|e| KeyprofError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.report_every == 0 {
            return Err(KeyprofError::InvalidConfig(
                "report_every must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions {
            level_max: self.level_max,
            include_container_keys: self.include_container_keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ProfilerConfig::default();
        assert_eq!(config.flatten_options(), FlattenOptions::default());
        assert_eq!(config.hidden_fields.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_fills_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"level_max": 2, "report_every": 10}}"#).unwrap();

        let config = ProfilerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.level_max, 2);
        assert_eq!(config.report_every, 10);
        assert!(!config.include_container_keys);
        assert_eq!(config.partitions, 0);
    }

    #[test]
    fn test_from_file_rejects_zero_report_every() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"report_every": 0}}"#).unwrap();
        assert!(matches!(
            ProfilerConfig::from_file(file.path()),
            Err(KeyprofError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_file_missing() {
        assert!(matches!(
            ProfilerConfig::from_file("/nonexistent/keyprof.json"),
            Err(KeyprofError::Io(_))
        ));
    }
}
