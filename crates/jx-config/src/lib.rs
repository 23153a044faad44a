//! Runtime configuration bootstrap for the jx host runtime
//!
//! Before the first line of an application runs, the runtime resolves its
//! operating configuration from layered JSON sources and applies the
//! resulting side effects:
//!
//! - **Source location**: global config next to the executable, per-app
//!   config next to (or keyed by) the application
//! - **Resolution**: defaults, then global, then per-app, over a closed key set
//! - **Bootstrap**: module search path, before-start notification, resource
//!   watcher, monitoring API gate
//!
//! # Architecture
//!
//! ```text
//!   ProcessContext
//!         |
//!   SourceLocator -> ConfigResolver -> Resolution -> BootstrapApplier
//!                                                          |
//!                                                     HostRuntime
//! ```
//!
//! # Example
//!
//! ```no_run
//! use jx_config::{InProcessHost, ProcessContext, bootstrap};
//!
//! fn start() -> jx_config::Result<()> {
//!     let context = ProcessContext::from_env()?;
//!     let mut host = InProcessHost::new();
//!     if let Some(resolution) = bootstrap(&context, &mut host)? {
//!         println!("maxCPU = {:?}", resolution.record.max_cpu);
//!     }
//!     Ok(())
//! }
//! ```

pub mod bootstrap;
pub mod context;
pub mod document;
pub mod error;
pub mod host;
pub mod locator;
pub mod record;
pub mod resolver;

pub use bootstrap::{BootstrapApplier, MONITOR_DISABLED_STUB, MONITOR_SOURCES, bootstrap};
pub use context::{Deployment, ExecMode, ProcessContext};
pub use document::{ConfigDocument, ConfigSource};
pub use error::{Error, Result, STARTUP_DIAGNOSTIC};
pub use host::{HostRuntime, InProcessHost, SourceStore, decode_source, encode_source};
pub use jx_fs::Platform;
pub use locator::SourceLocator;
pub use record::{ConfigKey, ConfigurationRecord};
pub use resolver::{ConfigResolver, MODULE_DIR, NPMJX_PATH_KEY, Resolution, resolve_configuration};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_errors_display_their_origin() {
        let error = ConfigDocument::parse("{", "/usr/bin/jx.config").unwrap_err();

        let display = format!("{}", error);
        assert!(
            display.contains("/usr/bin/jx.config"),
            "Error display should contain the origin, got: {}",
            display
        );
        assert!(error.is_fatal_source());
    }

    #[test]
    fn host_errors_are_not_source_errors() {
        assert!(!Error::AlreadyStarted.is_fatal_source());
        assert!(!Error::host("binding missing").is_fatal_source());
    }
}
