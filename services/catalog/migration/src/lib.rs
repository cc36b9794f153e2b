use sea_orm_migration::prelude::*;

mod m20261018_000001_create_counters;
mod m20261018_000002_create_users;
mod m20261018_000003_create_categories;
mod m20261018_000004_create_products;
mod m20261018_000005_add_visible_name_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261018_000001_create_counters::Migration),
            Box::new(m20261018_000002_create_users::Migration),
            Box::new(m20261018_000003_create_categories::Migration),
            Box::new(m20261018_000004_create_products::Migration),
            Box::new(m20261018_000005_add_visible_name_indexes::Migration),
        ]
    }
}
