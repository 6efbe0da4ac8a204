//! Template asset cache and HTTP fetcher.
//!
//! [`store::TemplateCache`] is a keyed, on-disk store of immutable template
//! assets with a per-key single-flight guard around the download path.
//! [`fetch::fetch`] performs the streamed transfer and guarantees that a
//! failed download never leaves a partial file behind.

pub mod fetch;
pub mod store;

pub use fetch::FetchError;
pub use store::TemplateCache;
