//! `MyNewThingConfig.json`.

use serde::Deserialize;

use crate::config::model::ConfigModel;

/// Root of `MyNewThingConfig.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MyNewThingConfig {
    /// Display name.
    pub name: String,

    /// Allowed statuses.
    pub statuses: Vec<String>,
}

impl ConfigModel for MyNewThingConfig {
    const FILE_NAME: &'static str = "MyNewThingConfig.json";
}
