//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use jx_config::{Deployment, ExecMode, Platform, ProcessContext};

use crate::error::{CliError, Result};

/// Resolve and apply jx runtime configuration for a process
#[derive(Parser, Debug)]
#[command(name = "jx-bootstrap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Path of the runtime executable (defaults to this binary)
    #[arg(long, env = "JX_EXEC_PATH")]
    pub exec_path: Option<PathBuf>,

    /// Execution mode: default, monitor or multi-threaded
    #[arg(long, default_value = "default")]
    pub mode: ExecMode,

    /// Path conventions to apply: posix or windows (defaults to the current platform)
    #[arg(long)]
    pub platform: Option<Platform>,

    /// The runtime is embedded in another program
    #[arg(long)]
    pub embedded_host: bool,

    /// Application source is packaged into the executable
    #[arg(long)]
    pub embedded_source: bool,

    /// The executable is a packaged application
    #[arg(long)]
    pub packaged: bool,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,

    /// Process argument vector, starting with the executable
    ///
    /// The application location is read from the slot the execution mode
    /// selects (1 by default, 2 multi-threaded, 3 monitor).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub argv: Vec<String>,
}

impl Cli {
    /// Build the process description the bootstrap runs against.
    pub fn process_context(&self) -> Result<ProcessContext> {
        let exec_path = match &self.exec_path {
            Some(path) => path.clone(),
            None => std::env::current_exe()?,
        };
        let exec_path = exec_path.to_string_lossy().into_owned();
        if exec_path.is_empty() {
            return Err(CliError::user("executable path must not be empty"));
        }

        let argv = if self.argv.is_empty() {
            vec![exec_path.clone()]
        } else {
            self.argv.clone()
        };

        Ok(ProcessContext::new(exec_path, argv)
            .with_exec_mode(self.mode)
            .with_platform(self.platform.unwrap_or_else(Platform::current))
            .with_deployment(Deployment {
                embedded_host: self.embedded_host,
                embedded_source: self.embedded_source,
                packaged: self.packaged,
            }))
    }
}
