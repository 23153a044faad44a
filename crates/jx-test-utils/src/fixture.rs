//! [`ConfigFixture`] builder for configuration layouts on disk.

use std::fs;
use std::path::{Path, PathBuf};

use jx_config::{ExecMode, Platform, ProcessContext};
use tempfile::TempDir;

/// A temporary directory laid out like an installed runtime:
///
/// ```text
/// <root>/bin/jx            executable
/// <root>/app/server.js     application
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use jx_test_utils::ConfigFixture;
///
/// let fixture = ConfigFixture::new();
/// fixture.write_global(r#"{"maxCPU": 50}"#);
/// let context = fixture.context();
/// ```
pub struct ConfigFixture {
    temp_dir: TempDir,
    exec_name: String,
}

impl Default for ConfigFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigFixture {
    /// Create a layout with a `jx` executable.
    pub fn new() -> Self {
        Self::with_executable("jx")
    }

    /// Create a layout with a custom executable name, e.g. `jx.exe`.
    pub fn with_executable(exec_name: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("bin")).unwrap();
        fs::create_dir_all(temp_dir.path().join("app")).unwrap();
        fs::write(temp_dir.path().join("bin").join(exec_name), "").unwrap();
        Self {
            temp_dir,
            exec_name: exec_name.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn exec_path(&self) -> PathBuf {
        self.root().join("bin").join(&self.exec_name)
    }

    pub fn app_location(&self) -> PathBuf {
        self.root().join("app").join("server.js")
    }

    /// Write `<exec_path>.config`.
    pub fn write_global(&self, content: &str) -> PathBuf {
        let path = PathBuf::from(format!("{}.config", self.exec_path().display()));
        fs::write(&path, content).unwrap();
        path
    }

    /// Write `<app_location>.jxcore.config`.
    pub fn write_app(&self, content: &str) -> PathBuf {
        let path = PathBuf::from(format!("{}.jxcore.config", self.app_location().display()));
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Process context for `jx <app_location>` on a POSIX platform.
    pub fn context(&self) -> ProcessContext {
        self.context_for(ExecMode::Default)
    }

    /// Process context with the app location in the slot `mode` reads.
    pub fn context_for(&self, mode: ExecMode) -> ProcessContext {
        let exec = self.exec_path().display().to_string();
        let mut argv = vec![exec.clone(); mode.location_slot()];
        argv.push(self.app_location().display().to_string());
        ProcessContext::new(exec, argv)
            .with_exec_mode(mode)
            .with_platform(Platform::Posix)
    }
}
