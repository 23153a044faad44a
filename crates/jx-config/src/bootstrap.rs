//! Bootstrap side effects applied from a resolved configuration

use crate::Result;
use crate::context::ProcessContext;
use crate::host::HostRuntime;
use crate::resolver::{Resolution, resolve_configuration};

/// Virtual sources implementing the monitoring API.
pub const MONITOR_SOURCES: [&str; 2] = ["_jx_monitor_helper", "_jx_monitor"];

/// Replacement installed over the monitoring sources when the API is disabled.
pub const MONITOR_DISABLED_STUB: &str =
    "console.error('monitoring API is disabled for this process');";

/// Applies a resolution's side effects to the host runtime.
///
/// Order is fixed: process-level exposure (npmjx path, module search path),
/// the before-start notification, the resource watcher, then the monitoring
/// gate. Nothing is retried.
pub struct BootstrapApplier<'a> {
    resolution: &'a Resolution,
}

impl<'a> BootstrapApplier<'a> {
    pub fn new(resolution: &'a Resolution) -> Self {
        Self { resolution }
    }

    pub fn apply(&self, host: &mut dyn HostRuntime) -> Result<()> {
        let record = &self.resolution.record;

        if let Some(npmjx_path) = &self.resolution.npmjx_path {
            host.define_npmjx_path(npmjx_path)?;
        }

        if let Some(search_path) = self.resolution.module_search_path() {
            host.add_global_module_path(&search_path)?;
        }

        host.before_application_start(record)?;

        if record.wants_resource_watcher() {
            tracing::debug!(
                max_cpu = ?record.max_cpu,
                max_memory = ?record.max_memory,
                "Starting resource watcher"
            );
            host.start_resource_watcher()?;
        }

        if !record.allow_monitoring_api {
            tracing::info!("Monitoring API disabled by configuration");
            for name in MONITOR_SOURCES {
                host.set_source(name, MONITOR_DISABLED_STUB)?;
            }
        }

        Ok(())
    }
}

/// Resolve configuration for `context` and apply it to `host`.
///
/// Returns `Ok(None)` without touching the filesystem or the host when the
/// deployment does not bootstrap. Resolution errors return before any side
/// effect is applied.
pub fn bootstrap(
    context: &ProcessContext,
    host: &mut dyn HostRuntime,
) -> Result<Option<Resolution>> {
    if !context.deployment().is_bootstrap_eligible() {
        tracing::debug!(deployment = ?context.deployment(), "Skipping configuration bootstrap");
        return Ok(None);
    }

    let resolution = resolve_configuration(context)?;
    tracing::debug!(sources = ?resolution.applied_sources, "Configuration resolved");

    BootstrapApplier::new(&resolution).apply(host)?;
    Ok(Some(resolution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InProcessHost;
    use crate::record::ConfigurationRecord;

    fn resolution(record: ConfigurationRecord) -> Resolution {
        Resolution {
            record,
            npmjx_path: None,
            applied_sources: Vec::new(),
        }
    }

    #[test]
    fn defaults_only_notify_the_host() {
        let mut host = InProcessHost::new();
        let resolved = resolution(ConfigurationRecord::default());
        BootstrapApplier::new(&resolved).apply(&mut host).unwrap();

        assert_eq!(host.started_with(), Some(&ConfigurationRecord::default()));
        assert!(!host.watcher_running());
        assert!(host.module_paths().is_empty());
        assert_eq!(host.npmjx_path(), None);
    }

    #[test]
    fn disabled_monitoring_replaces_both_sources() {
        let mut host = InProcessHost::new()
            .with_source("_jx_monitor", "real monitor")
            .with_source("_jx_monitor_helper", "real helper");
        let resolved = resolution(ConfigurationRecord {
            allow_monitoring_api: false,
            ..ConfigurationRecord::default()
        });
        BootstrapApplier::new(&resolved).apply(&mut host).unwrap();

        for name in MONITOR_SOURCES {
            assert_eq!(host.source(name).as_deref(), Some(MONITOR_DISABLED_STUB));
        }
    }

    #[test]
    fn memory_ceiling_starts_watcher() {
        let mut host = InProcessHost::new();
        let resolved = resolution(ConfigurationRecord {
            max_memory: Some(256_000.into()),
            ..ConfigurationRecord::default()
        });
        BootstrapApplier::new(&resolved).apply(&mut host).unwrap();
        assert!(host.watcher_running());
    }
}
