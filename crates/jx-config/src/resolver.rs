//! Layered configuration resolution
//!
//! The `ConfigResolver` merges up to two sources on top of the documented
//! defaults, in a fixed order:
//!
//! 1. Global config (`<exec_path>.config`, with Windows fallbacks)
//! 2. Per-application config (`<app>.jxcore.config`, or a flattened name
//!    inside `globalApplicationConfigPath`)
//!
//! Later sources override earlier ones key by key. Missing sources are
//! skipped. A source that exists but cannot be read or parsed aborts
//! resolution.

use std::path::{Path, PathBuf};

use jx_fs::Platform;
use serde_json::Value;

use crate::Result;
use crate::context::ProcessContext;
use crate::document::{ConfigDocument, ConfigSource, json_kind};
use crate::host::SourceStore;
use crate::locator::SourceLocator;
use crate::record::ConfigurationRecord;

/// Global-only key carrying the npmjx install path.
pub const NPMJX_PATH_KEY: &str = "npmjxPath";

/// Directory name appended to the global module path.
pub const MODULE_DIR: &str = "node_modules";

/// Outcome of resolving configuration for a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Effective configuration.
    pub record: ConfigurationRecord,

    /// Normalized npmjx path, when the global source provided one.
    pub npmjx_path: Option<String>,

    /// Sources that existed and were merged, in merge order.
    pub applied_sources: Vec<PathBuf>,
}

impl Resolution {
    /// Directory to register with the module loader, if any.
    ///
    /// # Example
    ///
    /// ```
    /// use jx_config::{ConfigurationRecord, Resolution};
    ///
    /// let resolution = Resolution {
    ///     record: ConfigurationRecord {
    ///         global_module_path: Some("/opt/mods/".into()),
    ///         ..ConfigurationRecord::default()
    ///     },
    ///     npmjx_path: None,
    ///     applied_sources: Vec::new(),
    /// };
    /// assert_eq!(resolution.module_search_path().as_deref(), Some("/opt/mods/node_modules"));
    /// ```
    pub fn module_search_path(&self) -> Option<String> {
        self.record
            .global_module_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{path}{MODULE_DIR}"))
    }
}

/// Resolves the effective configuration for one process.
pub struct ConfigResolver<'a> {
    context: &'a ProcessContext,
    locator: SourceLocator<'a>,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(context: &'a ProcessContext) -> Self {
        Self {
            context,
            locator: SourceLocator::new(context),
        }
    }

    /// Resolve the configuration by merging all sources.
    ///
    /// # Errors
    ///
    /// Any source that exists but cannot be read or parsed. Nothing is
    /// partially applied in that case; the caller must not start the
    /// application.
    pub fn resolve(&self) -> Result<Resolution> {
        let platform = self.context.platform();
        let mut record = ConfigurationRecord::default();
        let mut applied_sources = Vec::new();
        let mut npmjx_path = None;

        // Layer 1 - global config next to the executable
        let global_path = PathBuf::from(self.locator.global_config_path());
        if let Some(document) = self.load_layer("global", &global_path)? {
            record.merge(&document);
            npmjx_path = document
                .get(NPMJX_PATH_KEY)
                .and_then(|value| normalize_npmjx_path(value, platform));
            applied_sources.push(global_path);
        }

        record.close_ports();

        // Layer 2 - per-application config
        let app_path = PathBuf::from(
            self.locator
                .app_config_path(record.global_application_config_path.as_deref()),
        );
        if let Some(document) = self.load_layer("application", &app_path)? {
            record.merge(&document);
            applied_sources.push(app_path);
        }

        if let Some(path) = record.global_module_path.take() {
            record.global_module_path = Some(normalize_module_path(&path, platform));
        }

        Ok(Resolution {
            record,
            npmjx_path,
            applied_sources,
        })
    }

    /// Merge a single source into `record`.
    ///
    /// Virtual sources are looked up in `store`. Returns whether the source
    /// existed.
    pub fn merge_source(
        record: &mut ConfigurationRecord,
        source: &ConfigSource,
        store: &dyn SourceStore,
    ) -> Result<bool> {
        match source.load(store)? {
            Some(document) => {
                let applied = record.merge(&document);
                tracing::debug!(%source, keys = applied.len(), "Merged configuration source");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn load_layer(&self, layer: &str, path: &Path) -> Result<Option<ConfigDocument>> {
        let document = ConfigSource::file(path).load(&NoVirtualSources)?;
        match &document {
            Some(_) => tracing::debug!(?path, layer, "Loading config layer"),
            None => tracing::debug!(?path, layer, "No config found, skipping layer"),
        }
        Ok(document)
    }
}

/// Resolve the configuration for `context`.
pub fn resolve_configuration(context: &ProcessContext) -> Result<Resolution> {
    ConfigResolver::new(context).resolve()
}

/// Trim and drop one trailing separator. Empty or non-string values are
/// not exposed.
fn normalize_npmjx_path(value: &Value, platform: Platform) -> Option<String> {
    match value.as_str() {
        Some("") => None,
        Some(path) => Some(platform.strip_trailing_separator(path.trim())),
        None => {
            tracing::warn!(
                key = NPMJX_PATH_KEY,
                found = json_kind(value),
                "Ignoring configuration value of unexpected type"
            );
            None
        }
    }
}

/// Trim, ensure a trailing separator and fold case where paths ignore it.
/// An empty path is kept as-is and never registered.
fn normalize_module_path(path: &str, platform: Platform) -> String {
    if path.is_empty() {
        return String::new();
    }
    let path = platform.ensure_trailing_separator(path.trim());
    platform.fold_case(&path)
}

/// File layers never consult the virtual store.
struct NoVirtualSources;

impl SourceStore for NoVirtualSources {
    fn exists_source(&self, _name: &str) -> bool {
        false
    }

    fn read_source(&self, _name: &str) -> Option<String> {
        None
    }
}
