//! Error types for jx-config

/// Result type for jx-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Diagnostic printed before a process refuses to start over a bad source.
pub const STARTUP_DIAGNOSTIC: &str = "Application couldn't start because of the configuration file is either corrupted or not accessible.";

/// Errors that can occur while resolving or applying configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source exists but could not be read
    #[error("Configuration source {origin} is not accessible: {source}")]
    SourceUnreadable {
        origin: String,
        #[source]
        source: jx_fs::Error,
    },

    /// A source was read but is not valid JSON
    #[error("Configuration source {origin} is corrupted: {source}")]
    SourceCorrupt {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// A source holds the JSON literal `null`
    #[error("Configuration source {origin} holds a null document")]
    SourceNull { origin: String },

    /// A virtual source payload could not be decoded to text
    #[error("Virtual source {origin} could not be decoded: {message}")]
    SourceEncoding { origin: String, message: String },

    /// A read-only process property was defined twice
    #[error("Process property {name} is read-only and already defined")]
    PropertyRedefined { name: String },

    /// The host was notified of application start more than once
    #[error("Host runtime was already notified of application start")]
    AlreadyStarted,

    /// A host binding reported a failure
    #[error("Host runtime error: {message}")]
    Host { message: String },
}

impl Error {
    /// Whether this error comes from reading or parsing a configuration source.
    ///
    /// These are operator errors: the process must not start.
    pub fn is_fatal_source(&self) -> bool {
        matches!(
            self,
            Self::SourceUnreadable { .. }
                | Self::SourceCorrupt { .. }
                | Self::SourceNull { .. }
                | Self::SourceEncoding { .. }
        )
    }

    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }
}
