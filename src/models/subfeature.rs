//! `SubFeatureConfig.json`: the authoritative list of sub-features.

use std::collections::HashSet;

use serde::Deserialize;

use crate::config::model::ConfigModel;

/// Root of `SubFeatureConfig.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SubFeatureConfig {
    /// Defined sub-features.
    pub subfeatures: Vec<SingleSubFeatureConfig>,
}

/// One sub-feature entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SingleSubFeatureConfig {
    /// Sub-feature name.
    pub name: String,
}

impl ConfigModel for SubFeatureConfig {
    const FILE_NAME: &'static str = "SubFeatureConfig.json";
}

impl SubFeatureConfig {
    /// Names of all defined sub-features.
    #[must_use]
    pub fn names(&self) -> HashSet<&str> {
        self.subfeatures.iter().map(|s| s.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_names() {
        let config = SubFeatureConfig::from_value(json!({
            "subfeatures": [{"name": "sub_1"}, {"name": "sub_2"}]
        }))
        .unwrap();
        let names = config.names();
        assert!(names.contains("sub_1"));
        assert!(names.contains("sub_2"));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(SubFeatureConfig::from_value(json!({"subfeatures": [{"name": 1}]})).is_err());
    }
}
