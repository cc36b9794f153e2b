use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use shelf_domain::kind::EntityKind;

/// Catalog error taxonomy.
///
/// Everything except `StorageUnavailable` is detected before any write and is
/// final; `StorageUnavailable` is always safe to retry from scratch.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0} not found")]
    NotFound(EntityKind),
    #[error("{0} with this name already exists")]
    Conflict(EntityKind),
    #[error("referenced {0} does not exist or is archived")]
    InvalidReference(EntityKind),
    #[error("{0} is archived")]
    Archived(EntityKind),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("storage unavailable")]
    StorageUnavailable(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidReference(_) => "INVALID_REFERENCE",
            Self::Archived(_) => "ARCHIVED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
        }
    }

    /// Storage failures may succeed on retry; everything else will not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::Archived(_) => StatusCode::CONFLICT,
            Self::InvalidReference(_) | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        if let Self::StorageUnavailable(ref e) = self {
            tracing::error!(error = ?e, kind = "STORAGE_UNAVAILABLE", "storage error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
