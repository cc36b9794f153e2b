use sea_orm::DatabaseConnection;

use shelf_core::health::ReadinessProbe;

use crate::infra::db::{DbCategoryRepository, DbProductRepository, DbSequence, DbUserRepository};
use crate::infra::password::Argon2Hasher;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn sequence(&self) -> DbSequence {
        DbSequence {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn category_repo(&self) -> DbCategoryRepository {
        DbCategoryRepository {
            db: self.db.clone(),
        }
    }

    pub fn product_repo(&self) -> DbProductRepository {
        DbProductRepository {
            db: self.db.clone(),
        }
    }

    pub fn hasher(&self) -> Argon2Hasher {
        Argon2Hasher
    }
}

impl ReadinessProbe for AppState {
    async fn is_ready(&self) -> bool {
        self.db.ping().await.is_ok()
    }
}
