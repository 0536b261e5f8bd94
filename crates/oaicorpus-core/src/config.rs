use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::models::Dialect;

// ─── CorpusConfig ───────────────────────────────────────────

/// Top-level configuration, loaded once from TOML and passed around
/// explicitly, with no process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Repositories in merge order: on identifier collision the later
    /// repository wins.
    pub repositories: Vec<RepositoryConfig>,

    /// Path to the type-synonym table (JSON).
    pub type_table: PathBuf,

    /// Root for harvested XML pages and emitted JSON artifacts.
    pub data_dir: PathBuf,

    #[serde(default)]
    pub detector: DetectorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub name: String,
    pub base_url: String,

    /// Token every identifier of this repository carries. Declared here
    /// and validated at load instead of being inferred from identifier
    /// substrings scattered through the code.
    pub namespace: String,

    pub dialect: Dialect,
}

impl RepositoryConfig {
    /// Folder holding this repository's harvested pages.
    pub fn pages_dir(&self, data_dir: &Path) -> PathBuf {
        data_dir.join("xml").join(&self.name)
    }

    pub fn owns(&self, identifier: &str) -> bool {
        identifier.contains(&self.namespace)
    }
}

/// Statistical language detector settings: how many independent passes
/// to run and the per-pass probability each must clear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub repetitions: usize,
    pub threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            repetitions: 10,
            threshold: 0.99,
        }
    }
}

impl CorpusConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.repositories.is_empty() {
            return Err(CoreError::Config("no repositories configured".into()));
        }
        for repo in &self.repositories {
            if repo.namespace.trim().is_empty() {
                return Err(CoreError::Config(format!(
                    "repository {:?} has an empty namespace",
                    repo.name
                )));
            }
        }
        for (i, a) in self.repositories.iter().enumerate() {
            for b in &self.repositories[i + 1..] {
                if a.namespace == b.namespace {
                    return Err(CoreError::Config(format!(
                        "repositories {:?} and {:?} share the namespace {:?}",
                        a.name, b.name, a.namespace
                    )));
                }
            }
        }
        Ok(())
    }

    /// The repository whose declared namespace appears in `identifier`.
    pub fn repository_for(&self, identifier: &str) -> Option<&RepositoryConfig> {
        self.repositories.iter().find(|r| r.owns(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
type_table = "config/clustered_types.json"
data_dir = "data"

[[repositories]]
name = "depositonce"
base_url = "https://depositonce.tu-berlin.de/oai/request"
namespace = "depositonce"
dialect = "dim"

[[repositories]]
name = "refubium"
base_url = "https://refubium.fu-berlin.de/oai/request"
namespace = "refubium"
dialect = "xoai"

[detector]
repetitions = 5
threshold = 0.95
"#;

    #[test]
    fn parses_and_resolves_namespaces() {
        let config: CorpusConfig = toml::from_str(CONFIG).unwrap();
        config.validate().unwrap();
        assert_eq!(config.repositories[0].dialect, Dialect::Dim);
        assert_eq!(config.detector.repetitions, 5);
        let repo = config
            .repository_for("oai:depositonce.tu-berlin.de:11303/11631")
            .unwrap();
        assert_eq!(repo.name, "depositonce");
        assert!(config.repository_for("oai:example.org:1").is_none());
    }

    #[test]
    fn duplicate_namespaces_are_rejected() {
        let mut config: CorpusConfig = toml::from_str(CONFIG).unwrap();
        config.repositories[1].namespace = "depositonce".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn detector_defaults_match_the_detection_contract() {
        let detector = DetectorConfig::default();
        assert_eq!(detector.repetitions, 10);
        assert_eq!(detector.threshold, 0.99);
    }
}
