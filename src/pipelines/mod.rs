//! Pipelines.
//!
//! Ingestion (with or without a cache file) and tag inventory are implemented here, and the module
//! provides a light [pipeline::Pipeline] trait that enables easy and flexible pipeline creation.
pub mod ingest;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod tags;

pub use ingest::{ingest, load_or_ingest, CachedIngest, Ingest};
pub use pipeline::Pipeline;
pub use tags::TagInventory;
