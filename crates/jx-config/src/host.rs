//! Host runtime capabilities used during bootstrap
//!
//! The native runtime exposes a handful of bindings to the bootstrap
//! sequence. They are modelled as traits so the sequence can run against
//! the in-process implementation here or a recording fake in tests.

use std::collections::HashMap;
use std::sync::OnceLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::record::ConfigurationRecord;
use crate::{Error, Result};

/// Name of the read-only process property carrying the npmjx path.
pub const NPMJX_PATH_PROPERTY: &str = "__npmjxpath";

/// Read access to the host's in-memory virtual source store.
pub trait SourceStore {
    /// Whether a source is registered under `name`.
    fn exists_source(&self, name: &str) -> bool;

    /// Base64-encoded payload registered under `name`.
    fn read_source(&self, name: &str) -> Option<String>;
}

/// Native bindings the bootstrap sequence drives.
pub trait HostRuntime: SourceStore {
    /// Hand the final record to the runtime. Called once, before the
    /// application entry script runs.
    fn before_application_start(&mut self, record: &ConfigurationRecord) -> Result<()>;

    /// Start the CPU/memory watcher.
    fn start_resource_watcher(&mut self) -> Result<()>;

    /// Register or replace a virtual source with plain script text.
    fn set_source(&mut self, name: &str, code: &str) -> Result<()>;

    /// Add a directory to the module loader's global search path.
    fn add_global_module_path(&mut self, path: &str) -> Result<()>;

    /// Define the read-only npmjx path property.
    ///
    /// Implementations reject a second definition.
    fn define_npmjx_path(&mut self, path: &str) -> Result<()>;
}

/// Decode a base64 virtual source payload into script text.
pub fn decode_source(name: &str, payload: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::SourceEncoding {
            origin: name.to_string(),
            message: e.to_string(),
        })?;

    String::from_utf8(bytes).map_err(|e| Error::SourceEncoding {
        origin: name.to_string(),
        message: e.to_string(),
    })
}

/// Encode script text the way the virtual store keeps it.
pub fn encode_source(code: &str) -> String {
    STANDARD.encode(code.as_bytes())
}

/// Host runtime bindings backed by process memory.
///
/// Set-once state lives in `OnceLock`s: the npmjx property and the record
/// the runtime was started with cannot be replaced once written.
#[derive(Debug, Default)]
pub struct InProcessHost {
    sources: HashMap<String, String>,
    module_paths: Vec<String>,
    npmjx_path: OnceLock<String>,
    started_with: OnceLock<ConfigurationRecord>,
    watcher_running: bool,
}

impl InProcessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register a virtual source with plain script text.
    pub fn with_source(mut self, name: &str, code: &str) -> Self {
        self.sources.insert(name.to_string(), encode_source(code));
        self
    }

    /// Decoded text of a virtual source.
    pub fn source(&self, name: &str) -> Option<String> {
        let payload = self.sources.get(name)?;
        decode_source(name, payload).ok()
    }

    pub fn module_paths(&self) -> &[String] {
        &self.module_paths
    }

    pub fn npmjx_path(&self) -> Option<&str> {
        self.npmjx_path.get().map(String::as_str)
    }

    /// Record the runtime was started with, once notified.
    pub fn started_with(&self) -> Option<&ConfigurationRecord> {
        self.started_with.get()
    }

    pub fn watcher_running(&self) -> bool {
        self.watcher_running
    }
}

impl SourceStore for InProcessHost {
    fn exists_source(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    fn read_source(&self, name: &str) -> Option<String> {
        self.sources.get(name).cloned()
    }
}

impl HostRuntime for InProcessHost {
    fn before_application_start(&mut self, record: &ConfigurationRecord) -> Result<()> {
        self.started_with
            .set(record.clone())
            .map_err(|_| Error::AlreadyStarted)?;
        tracing::info!("Host notified of application start");
        Ok(())
    }

    fn start_resource_watcher(&mut self) -> Result<()> {
        if !self.watcher_running {
            tracing::info!("Resource watcher started");
            self.watcher_running = true;
        }
        Ok(())
    }

    fn set_source(&mut self, name: &str, code: &str) -> Result<()> {
        tracing::debug!(name, "Virtual source replaced");
        self.sources.insert(name.to_string(), encode_source(code));
        Ok(())
    }

    fn add_global_module_path(&mut self, path: &str) -> Result<()> {
        tracing::info!(path, "Global module path registered");
        self.module_paths.push(path.to_string());
        Ok(())
    }

    fn define_npmjx_path(&mut self, path: &str) -> Result<()> {
        self.npmjx_path
            .set(path.to_string())
            .map_err(|_| Error::PropertyRedefined {
                name: NPMJX_PATH_PROPERTY.to_string(),
            })?;
        tracing::debug!(path, "npmjx path defined");
        Ok(())
    }
}
