//! Exam/section/question activation table rendered into the form.
//!
//! ```yaml
//! sections: [Lectura, Redacción, Matemáticas, Variable]
//! exams:
//!   first: 1
//!   last: 60
//!   default: "off"
//!   overrides: { 1: "on", 2: "on" }
//! questions:
//!   first: 1
//!   last: 60
//!   default: "on"
//! ```

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;

use crate::core::app_state::ConfigError;

pub const DEFAULT_CATALOG_PATH: &str = "config/exam_catalog.yml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    On,
    Off,
}

/// Contiguous range of numbers, each `default` unless overridden.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivationTable {
    pub first: u32,
    pub last: u32,
    pub default: Activation,
    #[serde(default)]
    pub overrides: BTreeMap<u32, Activation>,
}

impl ActivationTable {
    /// Numbers marked `on`, ascending.
    pub fn enabled(&self) -> Vec<u32> {
        (self.first..=self.last)
            .filter(|n| *self.overrides.get(n).unwrap_or(&self.default) == Activation::On)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExamCatalog {
    pub sections: Vec<String>,
    pub exams: ActivationTable,
    pub questions: ActivationTable,
}

impl ExamCatalog {
    pub fn from_yaml(src: &str) -> Result<Self, ConfigError> {
        let catalog: Self =
            serde_yml::from_str(src).map_err(|e| ConfigError::Catalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Catalog(format!("{}: {e}", path.display())))?;
        Self::from_yaml(&src)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, t) in [("exams", &self.exams), ("questions", &self.questions)] {
            if t.first == 0 || t.first > t.last {
                return Err(ConfigError::Catalog(format!(
                    "{name}: invalid range {}..={}",
                    t.first, t.last
                )));
            }
        }
        if self.sections.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Catalog("sections: blank label".into()));
        }
        Ok(())
    }
}
