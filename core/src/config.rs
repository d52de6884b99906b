//! Record plan configuration, loaded from JSON.
//!
//! A plan names a list of fields, each with a value kind, optional
//! bounds and an optional inclusion percent. Bounds are kept as raw JSON
//! here and parsed against the field's kind when the plan is built.

use crate::{
    error::{RandomizerError, RandomizerResult},
    optional::InclusionRule,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Run seed. A seed given on the command line takes precedence.
    #[serde(default)]
    pub seed:   Option<u64>,
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub min: Option<serde_json::Value>,
    #[serde(default)]
    pub max: Option<serde_json::Value>,
    /// When present the field is wrapped in an OptionalRandomizer.
    #[serde(default)]
    pub optional_percent: Option<i32>,
    #[serde(default)]
    pub inclusion_rule: InclusionRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Date,
    DateTime,
    Uuid,
}

impl FieldKind {
    pub fn takes_bounds(self) -> bool {
        !matches!(self, Self::Uuid)
    }
}

impl PlanConfig {
    /// Load and validate a plan file.
    pub fn load(path: impl AsRef<Path>) -> RandomizerResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config = Self::from_json(&raw)?;
        log::debug!("Loaded plan {} with {} fields", path.display(), config.fields.len());
        Ok(config)
    }

    pub fn from_json(raw: &str) -> RandomizerResult<Self> {
        let config: PlanConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Structural checks only. Bound values are checked when the plan is built.
    pub fn validate(&self) -> RandomizerResult<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(RandomizerError::Config {
                    field:  field.name.clone(),
                    reason: "field name is empty".into(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(RandomizerError::Config {
                    field:  field.name.clone(),
                    reason: "duplicate field name".into(),
                });
            }
            if !field.kind.takes_bounds() && (field.min.is_some() || field.max.is_some()) {
                return Err(RandomizerError::Config {
                    field:  field.name.clone(),
                    reason: format!("{:?} fields take no bounds", field.kind),
                });
            }
        }
        Ok(())
    }
}
