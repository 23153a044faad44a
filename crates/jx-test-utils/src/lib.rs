//! Shared test utilities for the jx-bootstrap workspace.
//!
//! This crate is a dev-dependency only, never published. Use it from
//! integration tests (`tests/`); unit tests inside `jx-config` would see a
//! second copy of its types.
//!
//! # Modules
//!
//! - [`host`] — [`RecordingHost`], a fake host runtime that records calls
//! - [`fixture`] — [`ConfigFixture`] builder for on-disk config layouts

pub mod fixture;
pub mod host;

pub use fixture::ConfigFixture;
pub use host::{HostCall, RecordingHost};
