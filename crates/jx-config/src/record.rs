//! The effective configuration record and its merge rule

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::document::{ConfigDocument, json_kind};

/// A recognized configuration key.
///
/// The set is closed: document keys outside it are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    MaxMemory,
    AllowSysExec,
    AllowLocalNativeModules,
    AllowCustomSocketPort,
    GlobalModulePath,
    MaxCpu,
    MaxCpuInterval,
    GlobalApplicationConfigPath,
    AllowMonitoringApi,
}

impl ConfigKey {
    /// Every recognized key, in merge order.
    pub const ALL: [ConfigKey; 9] = [
        ConfigKey::MaxMemory,
        ConfigKey::AllowSysExec,
        ConfigKey::AllowLocalNativeModules,
        ConfigKey::AllowCustomSocketPort,
        ConfigKey::GlobalModulePath,
        ConfigKey::MaxCpu,
        ConfigKey::MaxCpuInterval,
        ConfigKey::GlobalApplicationConfigPath,
        ConfigKey::AllowMonitoringApi,
    ];

    /// Key name as written in configuration documents.
    pub fn name(self) -> &'static str {
        match self {
            Self::MaxMemory => "maxMemory",
            Self::AllowSysExec => "allowSysExec",
            Self::AllowLocalNativeModules => "allowLocalNativeModules",
            Self::AllowCustomSocketPort => "allowCustomSocketPort",
            Self::GlobalModulePath => "globalModulePath",
            Self::MaxCpu => "maxCPU",
            Self::MaxCpuInterval => "maxCPUInterval",
            Self::GlobalApplicationConfigPath => "globalApplicationConfigPath",
            Self::AllowMonitoringApi => "allowMonitoringAPI",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

/// Resolved runtime configuration handed to the host before the
/// application starts.
///
/// `None` means "use the runtime default".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationRecord {
    pub max_memory: Option<Number>,
    pub allow_sys_exec: Option<bool>,
    pub allow_local_native_modules: bool,
    pub allow_custom_socket_port: Option<bool>,
    pub global_module_path: Option<String>,
    #[serde(rename = "maxCPU")]
    pub max_cpu: Option<Number>,
    #[serde(rename = "maxCPUInterval")]
    pub max_cpu_interval: Option<Number>,
    pub global_application_config_path: Option<String>,
    #[serde(rename = "allowMonitoringAPI")]
    pub allow_monitoring_api: bool,
    /// Never settable from a configuration source.
    #[serde(rename = "portTCP")]
    pub port_tcp: Option<u16>,
    /// Never settable from a configuration source.
    #[serde(rename = "portTCPS")]
    pub port_tcps: Option<u16>,
}

impl Default for ConfigurationRecord {
    fn default() -> Self {
        Self {
            max_memory: None,
            allow_sys_exec: None,
            allow_local_native_modules: true,
            allow_custom_socket_port: None,
            global_module_path: None,
            max_cpu: None,
            max_cpu_interval: None,
            global_application_config_path: None,
            allow_monitoring_api: true,
            port_tcp: None,
            port_tcps: None,
        }
    }
}

impl ConfigurationRecord {
    /// Merge a document into this record.
    ///
    /// For every recognized key present with a non-null value the document
    /// wins. Absent keys keep their current value. A value of the wrong type
    /// is discarded with a warning. Returns the keys that were applied.
    pub fn merge(&mut self, document: &ConfigDocument) -> Vec<ConfigKey> {
        let mut applied = Vec::new();
        for key in ConfigKey::ALL {
            let Some(value) = document.get(key.name()) else {
                continue;
            };
            if self.assign(key, value) {
                applied.push(key);
            } else {
                tracing::warn!(
                    key = key.name(),
                    found = json_kind(value),
                    "Ignoring configuration value of unexpected type"
                );
            }
        }
        applied
    }

    /// Clear the socket ports, which only the host may set.
    pub fn close_ports(&mut self) {
        self.port_tcp = None;
        self.port_tcps = None;
    }

    /// Whether a CPU or memory ceiling asks for a resource watcher.
    pub fn wants_resource_watcher(&self) -> bool {
        is_non_zero(self.max_cpu.as_ref()) || is_non_zero(self.max_memory.as_ref())
    }

    fn assign(&mut self, key: ConfigKey, value: &Value) -> bool {
        match key {
            ConfigKey::MaxMemory => set(&mut self.max_memory, as_number(value)),
            ConfigKey::AllowSysExec => set(&mut self.allow_sys_exec, value.as_bool()),
            ConfigKey::AllowLocalNativeModules => {
                set_flag(&mut self.allow_local_native_modules, value.as_bool())
            }
            ConfigKey::AllowCustomSocketPort => {
                set(&mut self.allow_custom_socket_port, value.as_bool())
            }
            ConfigKey::GlobalModulePath => {
                set(&mut self.global_module_path, value.as_str().map(str::to_string))
            }
            ConfigKey::MaxCpu => set(&mut self.max_cpu, as_number(value)),
            ConfigKey::MaxCpuInterval => set(&mut self.max_cpu_interval, as_number(value)),
            ConfigKey::GlobalApplicationConfigPath => set(
                &mut self.global_application_config_path,
                value.as_str().map(str::to_string),
            ),
            ConfigKey::AllowMonitoringApi => {
                set_flag(&mut self.allow_monitoring_api, value.as_bool())
            }
        }
    }
}

fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(number) => Some(number.clone()),
        _ => None,
    }
}

fn is_non_zero(number: Option<&Number>) -> bool {
    number
        .and_then(Number::as_f64)
        .is_some_and(|n| n != 0.0)
}

fn set<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => false,
    }
}

fn set_flag(slot: &mut bool, value: Option<bool>) -> bool {
    match value {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(text: &str) -> ConfigDocument {
        ConfigDocument::parse(text, "test").unwrap()
    }

    #[test]
    fn key_names_round_trip() {
        for key in ConfigKey::ALL {
            assert_eq!(ConfigKey::from_name(key.name()), Some(key));
        }
        assert_eq!(ConfigKey::from_name("portTCP"), None);
        assert_eq!(ConfigKey::from_name("npmjxPath"), None);
    }

    #[test]
    fn defaults_allow_native_modules_and_monitoring() {
        let record = ConfigurationRecord::default();
        assert!(record.allow_local_native_modules);
        assert!(record.allow_monitoring_api);
        assert_eq!(record.max_memory, None);
        assert!(!record.wants_resource_watcher());
    }

    #[test]
    fn merge_overwrites_present_keys_only() {
        let mut record = ConfigurationRecord::default();
        record.merge(&doc(r#"{"maxMemory": 512, "allowSysExec": false}"#));
        let applied = record.merge(&doc(r#"{"maxCPU": 80, "maxMemory": null}"#));

        assert_eq!(applied, vec![ConfigKey::MaxCpu]);
        assert_eq!(record.max_memory, Some(512.into()));
        assert_eq!(record.allow_sys_exec, Some(false));
        assert_eq!(record.max_cpu, Some(80.into()));
    }

    #[test]
    fn mismatched_type_keeps_previous_value() {
        let mut record = ConfigurationRecord::default();
        let applied = record.merge(&doc(r#"{"allowMonitoringAPI": "no", "maxCPU": "high"}"#));

        assert!(applied.is_empty());
        assert!(record.allow_monitoring_api);
        assert_eq!(record.max_cpu, None);
    }

    #[test]
    fn documents_cannot_set_ports() {
        let mut record = ConfigurationRecord::default();
        record.merge(&doc(r#"{"portTCP": 8080, "portTCPS": 8443}"#));
        assert_eq!(record.port_tcp, None);
        assert_eq!(record.port_tcps, None);
    }

    #[test]
    fn zero_ceilings_do_not_want_watcher() {
        let record = ConfigurationRecord {
            max_cpu: Some(0.into()),
            max_memory: Number::from_f64(0.0),
            ..ConfigurationRecord::default()
        };
        assert!(!record.wants_resource_watcher());
    }

    #[test]
    fn fractional_and_exponent_ceilings_are_kept() {
        let mut record = ConfigurationRecord::default();
        let applied = record.merge(&doc(r#"{"maxCPU": 12.5, "maxMemory": 1e6, "maxCPUInterval": 0.5}"#));

        assert_eq!(
            applied,
            vec![ConfigKey::MaxMemory, ConfigKey::MaxCpu, ConfigKey::MaxCpuInterval]
        );
        assert_eq!(record.max_cpu.as_ref().and_then(Number::as_f64), Some(12.5));
        assert_eq!(record.max_memory.as_ref().and_then(Number::as_f64), Some(1e6));
        assert!(record.wants_resource_watcher());
    }

    #[test]
    fn negative_ceiling_still_wants_watcher() {
        let mut record = ConfigurationRecord::default();
        record.merge(&doc(r#"{"maxMemory": -1}"#));
        assert!(record.wants_resource_watcher());
    }

    #[test]
    fn serializes_with_document_key_names() {
        let value = serde_json::to_value(ConfigurationRecord::default()).unwrap();
        let object = value.as_object().unwrap();
        for key in ConfigKey::ALL {
            assert!(object.contains_key(key.name()), "missing {}", key.name());
        }
        assert!(object["portTCP"].is_null());
        assert!(object["portTCPS"].is_null());
        assert_eq!(object.len(), ConfigKey::ALL.len() + 2);
    }
}
