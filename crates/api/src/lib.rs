//! Render bridge HTTP server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! router assembly) so integration tests and the binary entrypoint both use
//! the exact same stack.

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;
