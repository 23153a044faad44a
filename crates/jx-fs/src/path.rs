//! Platform path conventions
//!
//! Configuration paths are built as strings with the separator of the
//! platform the runtime runs on, not the one the resolver was compiled for.
//! This keeps Windows naming rules testable from any host.

use std::fmt;
use std::str::FromStr;

/// Path convention family of the running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// `/` separated, case-sensitive, executables carry no extension.
    Posix,
    /// `\` separated, case-insensitive, executables end in `.exe`.
    Windows,
}

impl Platform {
    /// Platform of the current build target.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Path separator character.
    pub fn separator(self) -> char {
        match self {
            Self::Posix => '/',
            Self::Windows => '\\',
        }
    }

    /// Whether paths compare case-insensitively.
    pub fn is_case_insensitive(self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Whether executables carry a distinct file extension.
    pub fn has_executable_extension(self) -> bool {
        matches!(self, Self::Windows)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Posix => "posix",
            Self::Windows => "windows",
        }
    }

    /// Join a directory and a file name with this platform's separator.
    pub fn join(self, dir: &str, name: &str) -> String {
        format!("{}{}{}", dir, self.separator(), name)
    }

    /// Remove a single trailing separator, if present.
    pub fn strip_trailing_separator(self, path: &str) -> String {
        path.strip_suffix(self.separator())
            .unwrap_or(path)
            .to_string()
    }

    /// Append a separator unless the path already ends with one.
    pub fn ensure_trailing_separator(self, path: &str) -> String {
        if path.ends_with(self.separator()) {
            path.to_string()
        } else {
            format!("{}{}", path, self.separator())
        }
    }

    /// Lower-case the path where the platform ignores case.
    pub fn fold_case(self, path: &str) -> String {
        if self.is_case_insensitive() {
            path.to_lowercase()
        } else {
            path.to_string()
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "posix" | "unix" | "linux" | "macos" => Ok(Self::Posix),
            "windows" | "win32" => Ok(Self::Windows),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Flatten a location into a single file-name segment.
///
/// Every `/`, `\` and `:` becomes `_`, so `"/a/b:c"` turns into `"_a_b_c"`.
pub fn flatten_location(location: &str) -> String {
    location.replace(['/', '\\', ':'], "_")
}
