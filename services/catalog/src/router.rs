use axum::{
    Router,
    routing::{get, post},
};

use shelf_core::health::{healthz, readyz};
use shelf_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    categories::{
        archive_category, create_category, get_category, list_categories, update_category,
    },
    maintenance::{get_sequences, reconcile},
    products::{archive_product, create_product, get_product, list_products, update_product},
    users::{archive_user, create_user, get_user, list_users},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // Users
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/archive", post(archive_user))
        // Categories
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", get(get_category).patch(update_category))
        .route("/categories/{id}/archive", post(archive_category))
        // Products
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", get(get_product).patch(update_product))
        .route("/products/{id}/archive", post(archive_product))
        // Maintenance
        .route("/maintenance/reconcile", post(reconcile))
        .route("/maintenance/sequences", get(get_sequences));

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz::<AppState>))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
}
