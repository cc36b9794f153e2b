//! Service plumbing shared by Shelf binaries: configuration loading, tracing,
//! health probes, HTTP middleware and small serde/sea-query helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
