//! Configuration source discovery
//!
//! Computes where the global and per-application configuration files may
//! live. Nothing here fails: a candidate that does not exist is still a
//! valid answer and the resolver skips it.

use jx_fs::{Platform, flatten_location};

use crate::context::ProcessContext;

/// Suffix appended to the executable path for the global config.
pub const GLOBAL_CONFIG_SUFFIX: &str = ".config";

/// Suffix appended to an application location for its own config.
pub const APP_CONFIG_SUFFIX: &str = ".jxcore.config";

/// Global config file name used by older Windows deployments.
const LEGACY_GLOBAL_CONFIG: (&str, &str) = ("jx.exe.config", "node.config");

/// Locates candidate configuration sources for a process.
#[derive(Debug, Clone, Copy)]
pub struct SourceLocator<'a> {
    context: &'a ProcessContext,
}

impl<'a> SourceLocator<'a> {
    pub fn new(context: &'a ProcessContext) -> Self {
        Self { context }
    }

    /// Application location taken from the argv slot of the execution mode.
    ///
    /// A missing slot yields an empty location.
    pub fn app_location(&self) -> &'a str {
        let slot = self.context.exec_mode().location_slot();
        match self.context.argv().get(slot) {
            Some(location) => location,
            None => {
                tracing::debug!(slot, "No application location in argv");
                ""
            }
        }
    }

    /// `<exec_path>.config`, before any platform fallback.
    pub fn derived_global_path(&self) -> String {
        format!("{}{}", self.context.exec_path(), GLOBAL_CONFIG_SUFFIX)
    }

    /// Fallback candidates for the global config, in the order they are tried.
    ///
    /// Empty on platforms whose executables have no extension.
    pub fn global_candidates(&self) -> Vec<String> {
        if !self.context.platform().has_executable_extension() {
            return Vec::new();
        }

        let derived = self.derived_global_path();
        let mut candidates = vec![derived.replacen(".exe.", ".", 1)];

        let (current, legacy) = LEGACY_GLOBAL_CONFIG;
        let legacy_path = derived.replace(current, legacy);
        if legacy_path != derived {
            candidates.push(legacy_path);
        }
        candidates
    }

    /// Path of the global config source.
    ///
    /// The first existing fallback candidate wins; otherwise the derived
    /// path is returned even when nothing exists there.
    pub fn global_config_path(&self) -> String {
        self.global_candidates()
            .into_iter()
            .find(|candidate| jx_fs::exists(candidate))
            .unwrap_or_else(|| self.derived_global_path())
    }

    /// Path of the per-application config source.
    ///
    /// With a global application config directory the location is
    /// flattened into a file name inside it. Without one the file sits next
    /// to the application, or next to the executable when the application
    /// is packaged inside it.
    pub fn app_config_path(&self, global_application_config_path: Option<&str>) -> String {
        let platform: Platform = self.context.platform();

        match global_application_config_path.filter(|dir| !dir.is_empty()) {
            Some(dir) => {
                let name = format!("{}{}", flatten_location(self.app_location()), APP_CONFIG_SUFFIX);
                platform.join(dir, &name)
            }
            None if self.context.deployment().embedded_source => {
                format!("{}{}", self.context.exec_path(), APP_CONFIG_SUFFIX)
            }
            None => format!("{}{}", self.app_location(), APP_CONFIG_SUFFIX),
        }
    }
}
