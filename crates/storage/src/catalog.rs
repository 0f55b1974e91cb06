//! YAML catalog of vehicle models and their interval profiles.
//!
//! ```yaml
//! models:
//!   - name: TEM2
//!     intervals: [30, 225, 450, 900, 2160, 4320]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use depot_core::IntervalProfile;

use crate::error::{Result, StorageError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCatalog {
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    /// Validated on deserialization: six positive day counts.
    pub intervals: IntervalProfile,
}

impl ModelCatalog {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let catalog: ModelCatalog = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let catalog = Self::from_yaml(&contents)?;
        info!(
            path = %path.display(),
            models = catalog.models.len(),
            "loaded model catalog"
        );
        Ok(catalog)
    }

    /// Names must be non-empty and unique within one file.
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.models {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(StorageError::Validation(
                    "model name must not be empty".to_string(),
                ));
            }
            if !seen.insert(name) {
                return Err(StorageError::Validation(format!(
                    "model '{}' appears more than once",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::Tier;

    #[test]
    fn parses_models() {
        let catalog = ModelCatalog::from_yaml(
            r#"
models:
  - name: TEM2
    intervals: [30, 225, 450, 900, 2160, 4320]
  - name: ChME3
    intervals: [45, 180, 360, 720, 1800, 3600]
"#,
        )
        .unwrap();

        assert_eq!(catalog.models.len(), 2);
        assert_eq!(catalog.models[1].name, "ChME3");
        assert_eq!(catalog.models[1].intervals.days(Tier::MinorInspection), 45);
    }

    #[test]
    fn short_profile_fails_to_parse() {
        let err = ModelCatalog::from_yaml(
            r#"
models:
  - name: TEM2
    intervals: [30, 225, 450]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, StorageError::Yaml(_)));
        assert!(err.to_string().contains("expected 6"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = ModelCatalog::from_yaml(
            r#"
models:
  - name: TEM2
    intervals: [30, 225, 450, 900, 2160, 4320]
  - name: TEM2
    intervals: [30, 225, 450, 900, 2160, 4320]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }

    #[test]
    fn empty_document_has_no_models() {
        let catalog = ModelCatalog::from_yaml("models: []").unwrap();
        assert!(catalog.models.is_empty());
    }
}
