//! `DatabaseConfig.json`: connection settings.

use serde::Deserialize;

use crate::config::model::{ConfigModel, FieldViolation, Location};

/// Root of `DatabaseConfig.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Database host.
    pub host: String,

    /// Database port, kept as a string as it appears in the file.
    pub port: String,
}

impl ConfigModel for DatabaseConfig {
    const FILE_NAME: &'static str = "DatabaseConfig.json";

    fn check(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.host.trim().is_empty() {
            violations.push(FieldViolation::new(
                Location::root().field("host"),
                "host cannot be empty",
            ));
        }
        if self.port.trim().is_empty() {
            violations.push(FieldViolation::new(
                Location::root().field("port"),
                "port cannot be empty",
            ));
        }
        violations
    }
}
