pub mod category;
pub mod integrity;
pub mod lifecycle;
pub mod product;
pub mod query;
pub mod sequence;
pub mod user;
