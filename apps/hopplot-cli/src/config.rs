//! Configuration for the hopplot CLI
//!
//! Rendering-related settings (dot count, stacking, HOP seed) live here and
//! are passed explicitly into each command. Values come from, in order of
//! precedence: command-line flags, a TOML file, and the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings for every command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HopplotConfig {
    /// Dotplot construction
    pub dotplot: DotplotConfig,
    /// Dot stacking
    pub layout: LayoutConfig,
    /// Hypothetical outcome plot frames
    pub hops: HopConfig,
    /// Output formatting
    pub output: OutputConfig,
}

/// Dotplot construction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotplotConfig {
    /// Number of dots
    pub dot_count: i64,
    /// Above this many dots a warning about overplotting is logged
    pub max_dots: usize,
    /// Level of the central interval reported alongside the dots
    pub interval: f64,
}

impl Default for DotplotConfig {
    fn default() -> Self {
        Self {
            dot_count: 50,
            max_dots: 500,
            interval: 0.8,
        }
    }
}

/// Dot stacking settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fixed binwidth; chosen from `max_stack` when absent
    pub binwidth: Option<f64>,
    /// Tallest column allowed when choosing a binwidth
    pub max_stack: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            binwidth: None,
            max_stack: 10,
        }
    }
}

/// HOP settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HopConfig {
    /// Number of animation frames
    pub frames: usize,
    /// Shuffle seed
    pub seed: u64,
}

impl Default for HopConfig {
    fn default() -> Self {
        Self {
            frames: 100,
            seed: 42,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

impl HopplotConfig {
    /// Default config file location, `<config dir>/hopplot/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hopplot").join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used if present and the built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => path,
                None => {
                    tracing::debug!("no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&contents)
            .map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dotplot.dot_count <= 0 {
            return Err(ConfigError::OutOfRange(
                "dotplot.dot_count must be positive".to_string(),
            ));
        }

        if !(self.dotplot.interval > 0.0 && self.dotplot.interval <= 1.0) {
            return Err(ConfigError::OutOfRange(
                "dotplot.interval must be in (0, 1]".to_string(),
            ));
        }

        if let Some(binwidth) = self.layout.binwidth {
            if !(binwidth.is_finite() && binwidth > 0.0) {
                return Err(ConfigError::OutOfRange(
                    "layout.binwidth must be positive".to_string(),
                ));
            }
        }

        if self.layout.max_stack == 0 {
            return Err(ConfigError::OutOfRange(
                "layout.max_stack must be at least 1".to_string(),
            ));
        }

        if self.hops.frames == 0 {
            return Err(ConfigError::OutOfRange(
                "hops.frames must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = HopplotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dotplot.dot_count, 50);
        assert_eq!(config.hops.seed, 42);
    }

    #[test]
    fn test_partial_toml() {
        let config = HopplotConfig::from_toml(
            r#"
            [dotplot]
            dot_count = 20

            [hops]
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.dotplot.dot_count, 20);
        assert_eq!(config.dotplot.interval, 0.8);
        assert_eq!(config.hops.seed, 7);
        assert_eq!(config.hops.frames, 100);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = HopplotConfig::default();
        config.layout.binwidth = Some(0.5);
        let toml = config.to_toml().unwrap();
        assert_eq!(HopplotConfig::from_toml(&toml).unwrap(), config);
    }

    #[test]
    fn test_out_of_range() {
        let mut config = HopplotConfig::default();
        config.dotplot.dot_count = 0;
        assert!(config.validate().is_err());

        let mut config = HopplotConfig::default();
        config.dotplot.interval = 1.5;
        assert!(config.validate().is_err());

        let mut config = HopplotConfig::default();
        config.layout.binwidth = Some(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[layout]\nmax_stack = 4").unwrap();

        let config = HopplotConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.layout.max_stack, 4);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[hops]\nframes = 0").unwrap();
        assert!(matches!(
            HopplotConfig::load(Some(file.path())),
            Err(ConfigError::OutOfRange(_))
        ));

        assert!(matches!(
            HopplotConfig::load(Some(Path::new("/no/such/config.toml"))),
            Err(ConfigError::Read { .. })
        ));
    }
}
