//! Filesystem layer for jx-bootstrap
//!
//! Provides the platform path conventions the configuration resolver
//! depends on, and reads that treat a missing file as "no content".

pub mod error;
pub mod io;
pub mod path;

pub use error::{Error, Result};
pub use io::{exists, read_optional_text};
pub use path::{Platform, flatten_location};
