//! User configuration for the `gci` command.
//!
//! Stored in `~/.gci/config.toml`; partial files are fine, unspecified
//! values take their defaults. Command-line flags win over the file.

use std::path::{Path, PathBuf};

use gci_algo::{EstimatorOptions, MissingCategoryPolicy, DEFAULT_SAMPLES_PER_HOUR};
use gci_core::{GciError, GciResult};
use gci_io::sources::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GciConfig {
    pub core: CoreConfig,
    pub estimator: EstimatorConfig,
    pub nyiso: NyisoConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Balancing authority code used to filter the plant registry.
    pub region: String,

    /// Directory holding `co2_curves<year>.json` packages.
    pub basis_dir: PathBuf,

    /// Basis year used when a command is given none.
    pub default_year: u16,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            region: "NYIS".to_string(),
            basis_dir: PathBuf::from("basis"),
            default_year: 2019,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub samples_per_hour: f64,
    pub missing_category: MissingCategoryPolicy,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            samples_per_hour: DEFAULT_SAMPLES_PER_HOUR,
            missing_category: MissingCategoryPolicy::default(),
        }
    }
}

impl EstimatorConfig {
    pub fn options(&self) -> EstimatorOptions {
        EstimatorOptions {
            samples_per_hour: self.samples_per_hour,
            missing_category: self.missing_category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NyisoConfig {
    pub base_url: String,
}

impl Default for NyisoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GciConfig {
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".gci"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load from the default location, or defaults if there is no file.
    pub fn load() -> GciResult<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> GciResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| GciError::Config(format!("invalid config {}: {e}", path.display())))
    }

    pub fn save_to(&self, path: &Path) -> GciResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| GciError::Config(format!("serializing config: {e}")))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GciConfig::default();
        assert_eq!(config.core.region, "NYIS");
        assert_eq!(config.core.default_year, 2019);
        assert_eq!(config.estimator.samples_per_hour, 12.0);
        assert_eq!(
            config.estimator.missing_category,
            MissingCategoryPolicy::ExcludeCategory
        );
        assert!(config.nyiso.base_url.ends_with("/rtfuelmix"));
    }

    #[test]
    fn test_partial_config_parsing() {
        let toml = r#"
            [core]
            basis_dir = "/srv/gci/basis"

            [estimator]
            missing_category = "zero-emissions"
        "#;

        let config: GciConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.core.basis_dir, PathBuf::from("/srv/gci/basis"));
        assert_eq!(
            config.estimator.missing_category,
            MissingCategoryPolicy::ZeroEmissions
        );

        assert_eq!(config.core.region, "NYIS");
        assert_eq!(config.estimator.samples_per_hour, 12.0);
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();

        let mut config = GciConfig::default();
        config.core.default_year = 2021;
        config.estimator.samples_per_hour = 4.0;
        config.save_to(file.path()).unwrap();

        let loaded = GciConfig::load_from(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_policy_is_a_config_error() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[estimator]\nmissing_category = \"maybe\"\n").unwrap();
        let err = GciConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, GciError::Config(_)));
    }
}
