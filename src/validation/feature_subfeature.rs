//! Every sub-feature a feature references must be defined.

use crate::error::ValidationError;
use crate::models::{FeatureConfig, SubFeatureConfig};

/// Message of the error raised for each undefined sub-feature.
pub const UNDEFINED_SUBFEATURE: &str = "Referenced subfeature is undefined";

/// Checks that every name in any feature's `subfeature_names` appears in
/// the sub-feature config.
///
/// Produces one error per distinct undefined name, ordered by first
/// reference. Each error carries the name as `undefined_subfeature` and the
/// first feature that referenced it as `feature`.
pub fn feature_references_defined_subfeatures(
    features: &FeatureConfig,
    subfeatures: &SubFeatureConfig,
) -> Vec<ValidationError> {
    let defined = subfeatures.names();

    features
        .referenced_subfeatures()
        .into_iter()
        .filter(|(name, _)| !defined.contains(name))
        .map(|(name, feature)| {
            ValidationError::cross_config(UNDEFINED_SUBFEATURE)
                .with("undefined_subfeature", name)
                .with("feature", feature)
        })
        .collect()
}
