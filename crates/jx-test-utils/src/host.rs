//! A host runtime fake that records every call in order.

use std::collections::HashMap;

use jx_config::{ConfigurationRecord, HostRuntime, Result, SourceStore, encode_source};

/// One call made against a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    DefineNpmjxPath(String),
    AddGlobalModulePath(String),
    BeforeApplicationStart(ConfigurationRecord),
    StartResourceWatcher,
    SetSource { name: String, code: String },
}

/// Host runtime that accepts every call and remembers it.
///
/// Virtual sources can be pre-registered with [`RecordingHost::with_source`]
/// to exercise reads from the store.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
    sources: HashMap<String, String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a virtual source with plain text; it is stored base64-encoded.
    pub fn with_source(mut self, name: &str, code: &str) -> Self {
        self.sources.insert(name.to_string(), encode_source(code));
        self
    }

    /// Register a virtual source with a raw (possibly invalid) payload.
    pub fn with_raw_source(mut self, name: &str, payload: &str) -> Self {
        self.sources.insert(name.to_string(), payload.to_string());
        self
    }

    /// Records passed to `before_application_start`.
    pub fn start_notifications(&self) -> Vec<&ConfigurationRecord> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::BeforeApplicationStart(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Names passed to `set_source`, in call order.
    pub fn replaced_sources(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::SetSource { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn watcher_started(&self) -> bool {
        self.calls.contains(&HostCall::StartResourceWatcher)
    }
}

impl SourceStore for RecordingHost {
    fn exists_source(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    fn read_source(&self, name: &str) -> Option<String> {
        self.sources.get(name).cloned()
    }
}

impl HostRuntime for RecordingHost {
    fn before_application_start(&mut self, record: &ConfigurationRecord) -> Result<()> {
        self.calls
            .push(HostCall::BeforeApplicationStart(record.clone()));
        Ok(())
    }

    fn start_resource_watcher(&mut self) -> Result<()> {
        self.calls.push(HostCall::StartResourceWatcher);
        Ok(())
    }

    fn set_source(&mut self, name: &str, code: &str) -> Result<()> {
        self.calls.push(HostCall::SetSource {
            name: name.to_string(),
            code: code.to_string(),
        });
        self.sources.insert(name.to_string(), encode_source(code));
        Ok(())
    }

    fn add_global_module_path(&mut self, path: &str) -> Result<()> {
        self.calls
            .push(HostCall::AddGlobalModulePath(path.to_string()));
        Ok(())
    }

    fn define_npmjx_path(&mut self, path: &str) -> Result<()> {
        self.calls.push(HostCall::DefineNpmjxPath(path.to_string()));
        Ok(())
    }
}
