//! FaceFusion subprocess invocation and supervision.
//!
//! [`invocation::EngineSettings`] holds the fixed command contract (only the
//! three paths vary per job); [`runner::run`] spawns the engine, streams its
//! stdio into the host's logs live, and yields the exit status plus the
//! retained log for diagnostics.

pub mod invocation;
pub mod runner;

pub use invocation::EngineSettings;
pub use runner::{run, EngineError, RenderRun};
