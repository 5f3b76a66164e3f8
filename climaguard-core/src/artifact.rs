use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf};
use uuid::Uuid;

use crate::climatology::ChartData;

/// Per-request identifier for a stored chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactKey(Uuid);

impl ArtifactKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ArtifactKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chart files, one per request, under a single directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn chart_path(&self, key: ArtifactKey) -> PathBuf {
        self.root.join(format!("chart-{key}.json"))
    }

    /// Writes `chart` under a fresh key and returns that key.
    pub fn store_chart(&self, chart: &ChartData) -> Result<ArtifactKey> {
        fs::create_dir_all(&self.root).with_context(|| {
            format!("Failed to create artifact directory: {}", self.root.display())
        })?;

        let key = ArtifactKey::new();
        let path = self.chart_path(key);
        let json =
            serde_json::to_string_pretty(chart).context("Failed to serialize chart data")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write chart artifact: {}", path.display()))?;

        tracing::debug!(%key, path = %path.display(), "stored chart artifact");
        Ok(key)
    }

    pub fn load_chart(&self, key: ArtifactKey) -> Result<ChartData> {
        let path = self.chart_path(key);
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read chart artifact: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse chart artifact: {}", path.display()))
    }
}
