//! Domain-level building blocks for the render bridge.
//!
//! Pure configuration, validation, and payload helpers with no I/O beyond
//! startup directory creation. Everything here is shared by the cache,
//! pipeline, and API crates.

pub mod config;
pub mod error;
pub mod ids;
pub mod payload;
