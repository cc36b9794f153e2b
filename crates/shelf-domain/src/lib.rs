//! Domain types shared across the Shelf workspace.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never depend on storage or HTTP here.

pub mod id;
pub mod kind;
pub mod lifecycle;
pub mod pagination;
pub mod query;
pub mod user;
