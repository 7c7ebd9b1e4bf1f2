//! Configuration directory loader
//!
//! Loading a directory runs this pipeline for every registered `*.json`
//! file, in sorted file-name order:
//! 1. Size limit check
//! 2. Raw read, UTF-8 BOM stripped
//! 3. JSON decoding
//! 4. Typed construction through the registered [`ConfigModel`]
//!
//! A failing file contributes errors and the loader moves on to the next
//! one; the batch never stops early.
//!
//! [`ConfigModel`]: crate::config::model::ConfigModel

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::model::ErasedConfig;
use crate::config::registry::{ConfigModelRegistry, ModelEntry};
use crate::config::set::ConfigSet;
use crate::error::{ErrorGroup, ValidationError};

/// File suffix of loadable config files.
pub const CONFIG_SUFFIX: &str = ".json";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// ============================================================================
// Public API
// ============================================================================

/// Options for the configuration loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Directory holding the config files.
    pub configs_dir: PathBuf,

    /// Limits applied to each file.
    pub limits: ConfigLimits,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            configs_dir: PathBuf::from("configs"),
            limits: ConfigLimits::default(),
        }
    }
}

impl LoaderOptions {
    /// Default options for `configs_dir`.
    #[must_use]
    pub fn for_dir(configs_dir: impl Into<PathBuf>) -> Self {
        Self {
            configs_dir: configs_dir.into(),
            ..Self::default()
        }
    }
}

/// Limits for configuration size to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_config_size: env_or("CROSSCONF_MAX_CONFIG_SIZE", 10 * 1024 * 1024),
        }
    }
}

/// Result of loading a configuration directory.
#[derive(Debug, Default)]
pub struct LoadResult {
    /// Configs that were constructed successfully.
    pub configs: ConfigSet,

    /// Creation and single-config errors, in file order.
    pub errors: Vec<ValidationError>,
}

impl LoadResult {
    /// Splits the result into its configs and errors.
    #[must_use]
    pub fn unpack(self) -> (ConfigSet, Vec<ValidationError>) {
        (self.configs, self.errors)
    }

    /// Returns `true` if any file failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Converts collected errors into a single failure.
    ///
    /// # Errors
    ///
    /// Returns every collected error as one [`ErrorGroup`] if any file failed.
    pub fn into_strict(self) -> Result<ConfigSet, ErrorGroup> {
        ErrorGroup::check(self.errors)?;
        Ok(self.configs)
    }
}

/// Loads every registered config file found in one directory.
#[derive(Debug)]
pub struct ConfigLoader<'r> {
    registry: &'r ConfigModelRegistry,
    options: LoaderOptions,
}

impl<'r> ConfigLoader<'r> {
    /// Creates a loader over `registry` with the given options.
    #[must_use]
    pub const fn new(registry: &'r ConfigModelRegistry, options: LoaderOptions) -> Self {
        Self { registry, options }
    }

    /// The options this loader was built with.
    #[must_use]
    pub const fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Loads the directory, collecting every error instead of failing.
    ///
    /// Files whose name is not registered are skipped. A directory that
    /// cannot be listed produces one creation error and an empty set.
    #[must_use]
    pub fn load(&self) -> LoadResult {
        let dir = &self.options.configs_dir;
        let mut result = LoadResult::default();

        tracing::info!(dir = %dir.display(), "loading configuration directory");

        let (candidates, failures) = match list_candidates(dir) {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot read configuration directory");
                result.errors.push(
                    ValidationError::config_creation(format!(
                        "Failed to read config directory: {e}"
                    ))
                    .with("path", dir.display())
                    .with_source(e),
                );
                return result;
            }
        };

        for e in failures {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot read directory entry");
            result.errors.push(
                ValidationError::config_creation(format!(
                    "Failed to read config directory entry: {e}"
                ))
                .with("path", dir.display())
                .with_source(e),
            );
        }

        for path in candidates {
            let Some(file_name) = path.file_name().and_then(OsStr::to_str) else {
                continue;
            };

            let Some(entry) = self.registry.lookup(file_name) else {
                if let Some(suggestion) = self.registry.suggest(file_name) {
                    tracing::warn!(
                        file = file_name,
                        "unrecognized config file, did you mean '{suggestion}'?"
                    );
                } else {
                    tracing::debug!(file = file_name, "skipping unrecognized file");
                }
                continue;
            };

            match self.load_file(entry, &path) {
                Ok(config) => {
                    tracing::debug!(
                        file = file_name,
                        config_type = entry.tag.name,
                        "config loaded"
                    );
                    if let Some(previous) =
                        result.configs.insert_erased(entry.tag, file_name, config)
                    {
                        tracing::warn!(
                            file = file_name,
                            previous = %previous,
                            "config type loaded twice, keeping the later file"
                        );
                    }
                }
                Err(errors) => {
                    tracing::debug!(
                        file = file_name,
                        errors = errors.len(),
                        "config failed to load"
                    );
                    result.errors.extend(errors);
                }
            }
        }

        tracing::info!(
            loaded = result.configs.len(),
            errors = result.errors.len(),
            "configuration directory loaded"
        );
        result
    }

    /// Loads the directory and fails if any file failed.
    ///
    /// # Errors
    ///
    /// Returns every creation and single-config error as one [`ErrorGroup`].
    pub fn load_strict(&self) -> Result<ConfigSet, ErrorGroup> {
        self.load().into_strict()
    }

    /// Runs the decode and construct stages on raw file content.
    ///
    /// # Errors
    ///
    /// Returns a creation error if `file_name` is not registered or the
    /// content is not JSON, and one single-config error per field
    /// violation otherwise.
    pub fn load_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Box<dyn ErasedConfig>, Vec<ValidationError>> {
        let Some(entry) = self.registry.lookup(file_name) else {
            return Err(vec![
                ValidationError::config_creation("No config model registered for file")
                    .with("config_file", file_name),
            ]);
        };
        construct(entry, file_name, bytes)
    }

    fn load_file(
        &self,
        entry: &ModelEntry,
        path: &Path,
    ) -> Result<Box<dyn ErasedConfig>, Vec<ValidationError>> {
        let file_name = entry.file_name;
        let limit = self.options.limits.max_config_size;

        let creation_error = |message: String, e: std::io::Error| {
            vec![
                ValidationError::config_creation(message)
                    .with("config_file", file_name)
                    .with("path", path.display())
                    .with_source(e),
            ]
        };

        let metadata = std::fs::metadata(path)
            .map_err(|e| creation_error(format!("Failed to read config file: {e}"), e))?;

        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > limit {
            return Err(vec![
                ValidationError::config_creation("Config file exceeds size limit")
                    .with("config_file", file_name)
                    .with("size", format!("{file_size} bytes"))
                    .with("limit", format!("{limit} bytes")),
            ]);
        }

        let raw = std::fs::read(path)
            .map_err(|e| creation_error(format!("Failed to read config file: {e}"), e))?;

        construct(entry, file_name, &raw)
    }
}

/// Decode and construct stages shared by files and raw bytes.
fn construct(
    entry: &ModelEntry,
    file_name: &str,
    raw: &[u8],
) -> Result<Box<dyn ErasedConfig>, Vec<ValidationError>> {
    let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);

    let value: serde_json::Value = serde_json::from_slice(raw).map_err(|e| {
        vec![
            ValidationError::config_creation(format!("Failed to parse config file: {e}"))
                .with("config_file", file_name)
                .with("line", e.line())
                .with("column", e.column())
                .with_source(e),
        ]
    })?;

    entry.construct(value).map_err(|violations| {
        violations
            .into_iter()
            .map(|violation| {
                ValidationError::single_config(format!(
                    "schema validation failed: {}",
                    violation.message
                ))
                .with("config_file", file_name)
                .with("location", &violation.location)
            })
            .collect()
    })
}

/// Lists `*.json` files directly inside `dir`, sorted by file name.
///
/// Entries that cannot be read are returned separately so the remaining
/// files are still loaded.
fn list_candidates(dir: &Path) -> std::io::Result<(Vec<PathBuf>, Vec<std::io::Error>)> {
    let entries = std::fs::read_dir(dir)?.map(|entry| entry.map(|e| e.path()));
    Ok(collect_candidates(entries))
}

fn collect_candidates(
    entries: impl Iterator<Item = std::io::Result<PathBuf>>,
) -> (Vec<PathBuf>, Vec<std::io::Error>) {
    let mut candidates = Vec::new();
    let mut failures = Vec::new();

    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                failures.push(e);
                continue;
            }
        };
        let is_config_name = path
            .file_name()
            .and_then(OsStr::to_str)
            .is_some_and(|name| name.ends_with(CONFIG_SUFFIX));
        if is_config_name && path.is_file() {
            candidates.push(path);
        }
    }

    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    (candidates, failures)
}

/// Parses an environment variable with a default value.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{ConfigModel, FieldViolation, Location};
    use crate::error::ErrorKind;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct NamesConfig {
        names: Vec<String>,
    }

    impl ConfigModel for NamesConfig {
        const FILE_NAME: &'static str = "NamesConfig.json";

        fn check(&self) -> Vec<FieldViolation> {
            self.names
                .iter()
                .enumerate()
                .filter(|(_, name)| name.is_empty())
                .map(|(i, _)| {
                    FieldViolation::new(Location::root().field("names").index(i), "empty name")
                })
                .collect()
        }
    }

    #[derive(Debug, Deserialize)]
    struct FlagConfig {
        enabled: bool,
    }

    impl ConfigModel for FlagConfig {
        const FILE_NAME: &'static str = "FlagConfig.json";
    }

    fn registry() -> ConfigModelRegistry {
        let mut registry = ConfigModelRegistry::new();
        registry.register::<NamesConfig>().unwrap();
        registry.register::<FlagConfig>().unwrap();
        registry
    }

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_loads_registered_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "NamesConfig.json", r#"{"names": ["a", "b"]}"#);
        write(dir.path(), "FlagConfig.json", r#"{"enabled": true}"#);

        let registry = registry();
        let loader = ConfigLoader::new(&registry, LoaderOptions::for_dir(dir.path()));
        let (configs, errors) = loader.load().unpack();

        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(configs.len(), 2);
        assert_eq!(configs.get::<NamesConfig>().unwrap().names, vec!["a", "b"]);
        assert!(configs.get::<FlagConfig>().unwrap().enabled);
    }

    #[test]
    fn test_insertion_follows_sorted_file_names() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "NamesConfig.json", r#"{"names": []}"#);
        write(dir.path(), "FlagConfig.json", r#"{"enabled": false}"#);

        let registry = registry();
        let result = ConfigLoader::new(&registry, LoaderOptions::for_dir(dir.path())).load();
        let names: Vec<_> = result.configs.type_names().collect();
        assert_eq!(names, vec!["FlagConfig", "NamesConfig"]);
    }

    #[test]
    fn test_unregistered_and_non_json_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Unrelated.json", "not even json");
        write(dir.path(), "notes.txt", "hello");
        write(dir.path(), "FlagConfig.json.bak", "{");
        std::fs::create_dir(dir.path().join("NamesConfig.json")).unwrap();

        let registry = registry();
        let result = ConfigLoader::new(&registry, LoaderOptions::for_dir(dir.path())).load();
        assert!(result.errors.is_empty());
        assert!(result.configs.is_empty());
    }

    #[test]
    fn test_malformed_json_is_creation_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "FlagConfig.json", "{ \"enabled\": ");
        write(dir.path(), "NamesConfig.json", r#"{"names": ["x"]}"#);

        let registry = registry();
        let result = ConfigLoader::new(&registry, LoaderOptions::for_dir(dir.path())).load();

        assert_eq!(result.errors.len(), 1);
        let err = &result.errors[0];
        assert_eq!(err.kind(), ErrorKind::ConfigCreation);
        assert_eq!(err.attr("config_file"), Some("FlagConfig.json"));
        assert!(err.attr("line").is_some());
        // The other file still loads.
        assert!(result.configs.contains::<NamesConfig>());
        assert!(!result.configs.contains::<FlagConfig>());
    }

    #[test]
    fn test_one_error_per_violation() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "NamesConfig.json", r#"{"names": ["", "ok", ""]}"#);

        let registry = registry();
        let result = ConfigLoader::new(&registry, LoaderOptions::for_dir(dir.path())).load();

        assert_eq!(result.errors.len(), 2);
        for err in &result.errors {
            assert_eq!(err.kind(), ErrorKind::SingleConfig);
            assert_eq!(err.attr("config_file"), Some("NamesConfig.json"));
            assert_eq!(err.message(), "schema validation failed: empty name");
        }
        assert_eq!(result.errors[0].attr("location"), Some("names[0]"));
        assert_eq!(result.errors[1].attr("location"), Some("names[2]"));
        assert!(!result.configs.contains::<NamesConfig>());
    }

    #[test]
    fn test_wrong_shape_is_single_config_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "FlagConfig.json", r#"{"enabled": "yes"}"#);

        let registry = registry();
        let result = ConfigLoader::new(&registry, LoaderOptions::for_dir(dir.path())).load();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind(), ErrorKind::SingleConfig);
        assert_eq!(result.errors[0].attr("location"), Some("enabled"));
    }

    #[test]
    fn test_bom_is_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let mut content = UTF8_BOM.to_vec();
        content.extend_from_slice(br#"{"enabled": true}"#);
        std::fs::write(dir.path().join("FlagConfig.json"), content).unwrap();

        let registry = registry();
        let result = ConfigLoader::new(&registry, LoaderOptions::for_dir(dir.path())).load();
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert!(result.configs.contains::<FlagConfig>());
    }

    #[test]
    fn test_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "FlagConfig.json", r#"{"enabled": true}"#);

        let registry = registry();
        let options = LoaderOptions {
            configs_dir: dir.path().to_path_buf(),
            limits: ConfigLimits { max_config_size: 4 },
        };
        let result = ConfigLoader::new(&registry, options).load();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind(), ErrorKind::ConfigCreation);
        assert_eq!(result.errors[0].attr("limit"), Some("4 bytes"));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let registry = registry();
        let result = ConfigLoader::new(&registry, LoaderOptions::for_dir(&missing)).load();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind(), ErrorKind::ConfigCreation);
        assert_eq!(
            result.errors[0].attr("path"),
            Some(missing.display().to_string().as_str())
        );
        assert!(result.configs.is_empty());
    }

    #[test]
    fn test_strict_mode_groups_every_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "FlagConfig.json", "[");
        write(dir.path(), "NamesConfig.json", r#"{"names": [""]}"#);

        let registry = registry();
        let loader = ConfigLoader::new(&registry, LoaderOptions::for_dir(dir.path()));
        let group = loader.load_strict().unwrap_err();
        assert_eq!(group.len(), 2);
        assert_eq!(group.errors()[0].kind(), ErrorKind::ConfigCreation);
        assert_eq!(group.errors()[1].kind(), ErrorKind::SingleConfig);
    }

    #[test]
    fn test_strict_mode_passes_clean_load() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "FlagConfig.json", r#"{"enabled": true}"#);

        let registry = registry();
        let loader = ConfigLoader::new(&registry, LoaderOptions::for_dir(dir.path()));
        let configs = loader.load_strict().unwrap();
        assert_eq!(configs.len(), 1);
    }

    #[test]
    fn test_load_bytes_unregistered() {
        let registry = registry();
        let loader = ConfigLoader::new(&registry, LoaderOptions::default());
        let errors = loader.load_bytes("Nope.json", b"{}").unwrap_err();
        assert_eq!(errors[0].kind(), ErrorKind::ConfigCreation);
    }

    #[test]
    fn test_load_bytes_registered() {
        let registry = registry();
        let loader = ConfigLoader::new(&registry, LoaderOptions::default());
        let config = loader
            .load_bytes("FlagConfig.json", br#"{"enabled": false}"#)
            .unwrap();
        assert!(!config.as_any().downcast_ref::<FlagConfig>().unwrap().enabled);
    }

    #[test]
    fn test_unreadable_entry_does_not_stop_listing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "A.json", "{}");
        write(dir.path(), "B.json", "{}");

        let entries = vec![
            Ok(dir.path().join("B.json")),
            Err(std::io::Error::other("entry vanished")),
            Ok(dir.path().join("A.json")),
        ];
        let (candidates, failures) = collect_candidates(entries.into_iter());

        let names: Vec<_> = candidates
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["A.json", "B.json"]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].to_string(), "entry vanished");
    }

    #[test]
    fn test_config_limits_default() {
        let limits = ConfigLimits::default();
        assert!(limits.max_config_size > 0);
    }

    #[test]
    fn test_loader_options_default() {
        let options = LoaderOptions::default();
        assert_eq!(options.configs_dir, PathBuf::from("configs"));
    }
}
