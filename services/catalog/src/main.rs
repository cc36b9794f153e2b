use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use shelf_catalog::config::CatalogConfig;
use shelf_catalog::router::build_router;
use shelf_catalog::state::AppState;
use shelf_catalog_migration::Migrator;
use shelf_core::config::Config;
use shelf_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    let config = CatalogConfig::from_env();
    init_tracing(config.log_format);

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("failed to apply migrations");
        info!("migrations applied");
    }

    let router = build_router(AppState { db });
    let http_addr = format!("0.0.0.0:{}", config.catalog_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("catalog service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
