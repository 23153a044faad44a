//! Process description consumed by source location and resolution

use std::fmt;
use std::str::FromStr;

use jx_fs::Platform;

use crate::{Error, Result};

/// How the host runtime was launched.
///
/// The mode decides which positional argument carries the application
/// location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExecMode {
    /// Plain `jx app.js`
    #[default]
    Default,
    /// Running under the supervising monitor
    Monitor,
    /// Multi-threaded embedded-deployment mode
    MultiThreaded,
}

impl ExecMode {
    /// Index into `argv` holding the application location.
    pub fn location_slot(self) -> usize {
        match self {
            Self::Default => 1,
            Self::MultiThreaded => 2,
            Self::Monitor => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Monitor => "monitor",
            Self::MultiThreaded => "multi-threaded",
        }
    }
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "monitor" => Ok(Self::Monitor),
            "multi-threaded" | "mted" => Ok(Self::MultiThreaded),
            other => Err(format!("unknown execution mode: {other}")),
        }
    }
}

/// Packaging facts about the running process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deployment {
    /// The runtime is embedded as a library inside another program.
    pub embedded_host: bool,
    /// Application source is packaged into the executable.
    pub embedded_source: bool,
    /// The executable is a packaged application.
    pub packaged: bool,
}

impl Deployment {
    /// Whether configuration bootstrap runs for this deployment.
    ///
    /// Embedded hosts configure the runtime themselves. Embedded sources
    /// only bootstrap when they are also packaged.
    pub fn is_bootstrap_eligible(&self) -> bool {
        !self.embedded_host && (!self.embedded_source || self.packaged)
    }
}

/// Everything resolution needs to know about the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessContext {
    exec_path: String,
    argv: Vec<String>,
    exec_mode: ExecMode,
    platform: Platform,
    deployment: Deployment,
}

impl ProcessContext {
    /// Describe a process by its executable path and argument vector.
    ///
    /// Starts with the default execution mode, the current platform and a
    /// plain (non-embedded) deployment.
    pub fn new(exec_path: impl Into<String>, argv: Vec<String>) -> Self {
        Self {
            exec_path: exec_path.into(),
            argv,
            exec_mode: ExecMode::default(),
            platform: Platform::current(),
            deployment: Deployment::default(),
        }
    }

    /// Describe the current process from `std::env`.
    pub fn from_env() -> Result<Self> {
        let exec_path = std::env::current_exe()
            .map_err(|e| Error::host(format!("cannot locate running executable: {e}")))?;
        Ok(Self::new(
            exec_path.to_string_lossy().into_owned(),
            std::env::args().collect(),
        ))
    }

    pub fn with_exec_mode(mut self, exec_mode: ExecMode) -> Self {
        self.exec_mode = exec_mode;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_deployment(mut self, deployment: Deployment) -> Self {
        self.deployment = deployment;
        self
    }

    pub fn exec_path(&self) -> &str {
        &self.exec_path
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn exec_mode(&self) -> ExecMode {
        self.exec_mode
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn deployment(&self) -> Deployment {
        self.deployment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_slot_depends_on_mode() {
        assert_eq!(ExecMode::Default.location_slot(), 1);
        assert_eq!(ExecMode::MultiThreaded.location_slot(), 2);
        assert_eq!(ExecMode::Monitor.location_slot(), 3);
    }

    #[test]
    fn plain_and_packaged_deployments_are_eligible() {
        assert!(Deployment::default().is_bootstrap_eligible());
        assert!(
            Deployment {
                embedded_source: true,
                packaged: true,
                ..Deployment::default()
            }
            .is_bootstrap_eligible()
        );
    }

    #[test]
    fn embedded_deployments_skip_bootstrap() {
        let embedded_host = Deployment {
            embedded_host: true,
            ..Deployment::default()
        };
        let unpackaged_source = Deployment {
            embedded_source: true,
            ..Deployment::default()
        };
        assert!(!embedded_host.is_bootstrap_eligible());
        assert!(!unpackaged_source.is_bootstrap_eligible());
    }

    #[test]
    fn exec_mode_parses_short_alias() {
        assert_eq!("mted".parse::<ExecMode>().unwrap(), ExecMode::MultiThreaded);
        assert!("cluster".parse::<ExecMode>().is_err());
    }
}
