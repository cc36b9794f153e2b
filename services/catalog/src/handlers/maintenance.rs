use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use shelf_domain::id::{CategoryId, ProductId};

use crate::domain::types::ReconcileReport;
use crate::error::CatalogError;
use crate::state::AppState;
use crate::usecase::integrity::{ReconcileInput, ReconcileUseCase};
use crate::usecase::sequence::CurrentSequenceUseCase;

// ── POST /api/v1/maintenance/reconcile ───────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileParams {
    #[serde(default)]
    pub archive_orphans: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResponse {
    pub categories_scanned: u64,
    pub categories_repaired: Vec<CategoryId>,
    pub orphaned_products: Vec<ProductId>,
    pub orphans_archived: Vec<ProductId>,
}

impl From<ReconcileReport> for ReconcileResponse {
    fn from(report: ReconcileReport) -> Self {
        Self {
            categories_scanned: report.categories_scanned,
            categories_repaired: report.categories_repaired,
            orphaned_products: report.orphaned_products,
            orphans_archived: report.orphans_archived,
        }
    }
}

pub async fn reconcile(
    State(state): State<AppState>,
    Query(params): Query<ReconcileParams>,
) -> Result<Json<ReconcileResponse>, CatalogError> {
    let usecase = ReconcileUseCase {
        categories: state.category_repo(),
        products: state.product_repo(),
    };
    let report = usecase
        .execute(ReconcileInput {
            archive_orphans: params.archive_orphans,
        })
        .await?;
    Ok(Json(report.into()))
}

// ── GET /api/v1/maintenance/sequences ────────────────────────────────────────

/// Current counter value per kind, e.g. `{"category":3,"product":12,"user":2}`.
pub async fn get_sequences(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<&'static str, u64>>, CatalogError> {
    let usecase = CurrentSequenceUseCase {
        sequence: state.sequence(),
    };
    let values = usecase.execute().await?;
    Ok(Json(
        values
            .into_iter()
            .map(|(kind, seq)| (kind.as_str(), seq))
            .collect(),
    ))
}
