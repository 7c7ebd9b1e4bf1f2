//! `FeatureConfig.json`: the features of the product and the sub-features
//! each one is built from.

use serde::Deserialize;

use crate::config::model::{ConfigModel, FieldViolation, Location};

/// Root of `FeatureConfig.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeatureConfig {
    /// Declared features.
    pub features: Vec<SingleFeatureConfig>,
}

/// One feature entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SingleFeatureConfig {
    /// Feature name.
    pub name: String,

    /// Names of the sub-features this feature uses. Must not be empty.
    pub subfeature_names: Vec<String>,
}

impl ConfigModel for FeatureConfig {
    const FILE_NAME: &'static str = "FeatureConfig.json";

    fn check(&self) -> Vec<FieldViolation> {
        self.features
            .iter()
            .enumerate()
            .filter(|(_, feature)| feature.subfeature_names.is_empty())
            .map(|(i, _)| {
                FieldViolation::new(
                    Location::root()
                        .field("features")
                        .index(i)
                        .field("subfeature_names"),
                    "subfeature_names cannot be empty",
                )
            })
            .collect()
    }
}

impl FeatureConfig {
    /// Every referenced sub-feature name with the first feature that
    /// references it, in order of first reference.
    #[must_use]
    pub fn referenced_subfeatures(&self) -> Vec<(&str, &str)> {
        let mut seen = std::collections::HashSet::new();
        let mut referenced = Vec::new();
        for feature in &self.features {
            for name in &feature.subfeature_names {
                if seen.insert(name.as_str()) {
                    referenced.push((name.as_str(), feature.name.as_str()));
                }
            }
        }
        referenced
    }
}
