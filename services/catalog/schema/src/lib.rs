//! sea-orm entity models for the catalog tables.

pub mod categories;
pub mod counters;
pub mod products;
pub mod users;
