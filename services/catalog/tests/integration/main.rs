mod helpers;

mod integrity_test;
mod lifecycle_test;
mod query_test;
mod store_test;
