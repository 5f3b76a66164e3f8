use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{climatology::RiskThresholds, model::YearRange};

/// NASA POWER daily point endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    pub base_url: String,
    pub community: String,
    pub start_year: i32,
    pub end_year: i32,
    pub timeout_secs: u64,
}

impl Default for PowerConfig {
    fn default() -> Self {
        let years = YearRange::default();
        Self {
            base_url: "https://power.larc.nasa.gov/api/temporal/daily/point".to_string(),
            community: "AG".to_string(),
            start_year: years.start,
            end_year: years.end,
            timeout_secs: 30,
        }
    }
}

/// Nominatim search endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// Nominatim rejects requests without an identifying User-Agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: "ClimaGuard-MVP".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Where chart data is written; defaults to the platform data directory.
    pub dir: Option<PathBuf>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [power]
/// start_year = 2000
/// end_year = 2020
///
/// [thresholds]
/// hot_temperature_c = 30.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub power: PowerConfig,
    pub geocoder: GeocoderConfig,
    pub thresholds: RiskThresholds,
    pub artifacts: ArtifactConfig,
}

impl Config {
    /// Years requested from NASA POWER.
    pub fn year_range(&self) -> Result<YearRange> {
        YearRange::new(self.power.start_year, self.power.end_year)
    }

    pub fn set_year_range(&mut self, years: YearRange) {
        self.power.start_year = years.start;
        self.power.end_year = years.end;
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.year_range()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory chart artifacts are written to.
    pub fn artifact_dir(&self) -> Result<PathBuf> {
        match &self.artifacts.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().join("charts")),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "climaguard", "climaguard")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_2000_to_2020() {
        let cfg = Config::default();
        let years = cfg.year_range().expect("default range must be valid");

        assert_eq!(years, YearRange::new(2000, 2020).unwrap());
        assert_eq!(cfg.power.community, "AG");
        assert_eq!(cfg.thresholds, RiskThresholds::default());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[power]\nstart_year = 1995\n\n[thresholds]\nhot_temperature_c = 30.0\n",
        )
        .unwrap();

        let cfg = Config::load_from(&path).unwrap();

        assert_eq!(cfg.power.start_year, 1995);
        assert_eq!(cfg.power.end_year, 2020);
        assert_eq!(cfg.thresholds.hot_temperature_c, 30.0);
        assert_eq!(cfg.thresholds.extreme_temperature_c, 35.0);
        assert_eq!(cfg.geocoder, GeocoderConfig::default());
    }

    #[test]
    fn inverted_year_range_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[power]\nstart_year = 2021\nend_year = 2001\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid year range"));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_year_range(YearRange::new(2005, 2015).unwrap());
        cfg.artifacts.dir = Some(dir.path().join("charts"));
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.artifact_dir().unwrap(), dir.path().join("charts"));
    }
}
