//! Rendering of a completed bootstrap

use std::path::PathBuf;

use colored::Colorize;
use jx_config::{ConfigurationRecord, InProcessHost, Resolution};
use serde::Serialize;

use crate::error::Result;

/// What the bootstrap resolved and what it did to the host.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapReport<'a> {
    pub record: &'a ConfigurationRecord,
    pub applied_sources: &'a [PathBuf],
    pub npmjx_path: Option<&'a str>,
    pub module_paths: &'a [String],
    pub watcher_started: bool,
    pub monitoring_disabled: bool,
}

impl<'a> BootstrapReport<'a> {
    pub fn new(resolution: &'a Resolution, host: &'a InProcessHost) -> Self {
        Self {
            record: &resolution.record,
            applied_sources: &resolution.applied_sources,
            npmjx_path: host.npmjx_path(),
            module_paths: host.module_paths(),
            watcher_started: host.watcher_running(),
            monitoring_disabled: !resolution.record.allow_monitoring_api,
        }
    }

    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
            return Ok(());
        }

        println!("{}", "Configuration sources".bold());
        if self.applied_sources.is_empty() {
            println!("  {}", "(none, using defaults)".dimmed());
        }
        for source in self.applied_sources {
            println!("  {} {}", "+".green(), source.display());
        }

        println!();
        println!("{}", "Effective configuration".bold());
        let value = serde_json::to_value(self.record)?;
        if let Some(fields) = value.as_object() {
            for (key, value) in fields {
                println!("  {:<28} {}", key.cyan(), value);
            }
        }

        println!();
        println!("{}", "Host effects".bold());
        for path in self.module_paths {
            println!("  module path      {}", path);
        }
        if let Some(npmjx_path) = self.npmjx_path {
            println!("  npmjx path       {}", npmjx_path);
        }
        println!("  resource watcher {}", on_off(self.watcher_started));
        println!("  monitoring API   {}", on_off(!self.monitoring_disabled));
        Ok(())
    }
}

fn on_off(enabled: bool) -> colored::ColoredString {
    if enabled {
        "on".green()
    } else {
        "off".yellow()
    }
}
