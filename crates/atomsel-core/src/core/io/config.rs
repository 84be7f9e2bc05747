use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_MEMORY_HEADROOM: f64 = 0.1;
pub const DEFAULT_MEMORY_CHECK_INTERVAL: usize = 5_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Runtime limits for a structure read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ReaderConfig {
    /// Stop after this many atoms have been emitted.
    pub max_atoms: Option<usize>,
    /// Stop early when less than this fraction of system memory is available.
    pub memory_headroom: f64,
    /// Number of input lines between two memory checks.
    pub memory_check_interval: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_atoms: None,
            memory_headroom: DEFAULT_MEMORY_HEADROOM,
            memory_check_interval: DEFAULT_MEMORY_CHECK_INTERVAL,
        }
    }
}

impl ReaderConfig {
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::new()
    }

    /// Reads a configuration from TOML, e.g. `max-atoms = 1000`.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ReaderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Checks the limits; configs assembled field by field should pass through here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.memory_headroom) {
            return Err(ConfigError::InvalidParameter {
                name: "memory_headroom",
                reason: format!("{} is not in [0, 1)", self.memory_headroom),
            });
        }
        if self.memory_check_interval == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "memory_check_interval",
                reason: "must be at least 1 line".into(),
            });
        }
        if self.max_atoms == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "max_atoms",
                reason: "must be at least 1 atom".into(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct ReaderConfigBuilder {
    max_atoms: Option<usize>,
    memory_headroom: Option<f64>,
    memory_check_interval: Option<usize>,
}

impl ReaderConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_atoms(mut self, n: usize) -> Self {
        self.max_atoms = Some(n);
        self
    }
    pub fn memory_headroom(mut self, fraction: f64) -> Self {
        self.memory_headroom = Some(fraction);
        self
    }
    pub fn memory_check_interval(mut self, lines: usize) -> Self {
        self.memory_check_interval = Some(lines);
        self
    }

    pub fn build(self) -> Result<ReaderConfig, ConfigError> {
        let config = ReaderConfig {
            max_atoms: self.max_atoms,
            memory_headroom: self.memory_headroom.unwrap_or(DEFAULT_MEMORY_HEADROOM),
            memory_check_interval: self
                .memory_check_interval
                .unwrap_or(DEFAULT_MEMORY_CHECK_INTERVAL),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_uses_defaults_for_unset_values() {
        let config = ReaderConfig::builder().build().unwrap();
        assert_eq!(config, ReaderConfig::default());
        assert_eq!(config.max_atoms, None);
        assert_eq!(config.memory_headroom, DEFAULT_MEMORY_HEADROOM);
    }

    #[test]
    fn builder_applies_overrides() {
        let config = ReaderConfig::builder()
            .max_atoms(5)
            .memory_headroom(0.25)
            .memory_check_interval(100)
            .build()
            .unwrap();
        assert_eq!(config.max_atoms, Some(5));
        assert_eq!(config.memory_headroom, 0.25);
        assert_eq!(config.memory_check_interval, 100);
    }

    #[test]
    fn builder_rejects_out_of_range_values() {
        for result in [
            ReaderConfig::builder().memory_headroom(1.5).build(),
            ReaderConfig::builder().memory_headroom(-0.1).build(),
            ReaderConfig::builder().memory_check_interval(0).build(),
            ReaderConfig::builder().max_atoms(0).build(),
        ] {
            assert!(matches!(
                result,
                Err(ConfigError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn from_toml_str_reads_kebab_case_keys() {
        let config = ReaderConfig::from_toml_str("max-atoms = 10\nmemory-headroom = 0.2").unwrap();
        assert_eq!(config.max_atoms, Some(10));
        assert_eq!(config.memory_headroom, 0.2);
        assert_eq!(config.memory_check_interval, DEFAULT_MEMORY_CHECK_INTERVAL);
    }

    #[test]
    fn from_toml_str_rejects_unknown_keys_and_bad_values() {
        assert!(matches!(
            ReaderConfig::from_toml_str("max_atom = 10"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            ReaderConfig::from_toml_str("memory-check-interval = 0"),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn load_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reader.toml");
        std::fs::write(&path, "max-atoms = 3").unwrap();
        assert_eq!(ReaderConfig::load(&path).unwrap().max_atoms, Some(3));
        assert!(matches!(
            ReaderConfig::load(&dir.path().join("nope.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
