use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use shelf_domain::id::{CategoryId, ProductId, UserId};
use shelf_domain::kind::EntityKind;

use crate::domain::types::{CascadeReport, Category, CategoryPatch, CategorySortField};
use crate::error::CatalogError;
use crate::handlers::products::ProductResponse;
use crate::handlers::users::UserSummary;
use crate::handlers::{ListParams, ListResponse, parse_id};
use crate::state::AppState;
use crate::usecase::category::{
    CreateCategoryInput, CreateCategoryUseCase, GetCategoryDetailUseCase, UpdateCategoryUseCase,
};
use crate::usecase::lifecycle::ArchiveCategoryUseCase;
use crate::usecase::query::ListUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub product_ids: Vec<ProductId>,
    pub creator_id: UserId,
    #[serde(serialize_with = "shelf_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            product_ids: category.product_ids,
            creator_id: category.creator_id,
            created_at: category.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryDetailResponse {
    #[serde(flatten)]
    pub category: CategoryResponse,
    pub creator: Option<UserSummary>,
    pub products: Vec<ProductResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeResponse {
    pub archived: bool,
    pub products_archived: Vec<ProductId>,
    pub products_failed: Vec<ProductId>,
}

impl From<CascadeReport> for CascadeResponse {
    fn from(report: CascadeReport) -> Self {
        Self {
            archived: report.category_archived,
            products_archived: report.products_archived,
            products_failed: report.products_failed,
        }
    }
}

// ── POST /api/v1/categories ──────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default, deserialize_with = "shelf_core::serde::trimmed_opt_string")]
    pub description: Option<String>,
    pub creator_id: UserId,
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), CatalogError> {
    let usecase = CreateCategoryUseCase {
        categories: state.category_repo(),
        users: state.user_repo(),
        sequence: state.sequence(),
    };
    let category = usecase
        .execute(CreateCategoryInput {
            name: body.name,
            description: body.description,
            creator_id: body.creator_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

// ── GET /api/v1/categories ───────────────────────────────────────────────────

pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<CategoryResponse>>, CatalogError> {
    let usecase = ListUseCase {
        repo: state.category_repo(),
    };
    let page = usecase
        .execute::<CategorySortField>(&params.into())
        .await?;
    Ok(Json(ListResponse::from_page(page, CategoryResponse::from)))
}

// ── GET /api/v1/categories/{id} ──────────────────────────────────────────────

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryDetailResponse>, CatalogError> {
    let usecase = GetCategoryDetailUseCase {
        categories: state.category_repo(),
        products: state.product_repo(),
        users: state.user_repo(),
    };
    let detail = usecase.execute(parse_id(&id)?).await?;
    if detail.category.visibility.is_archived() {
        return Err(CatalogError::NotFound(EntityKind::Category));
    }
    Ok(Json(CategoryDetailResponse {
        category: detail.category.into(),
        creator: detail.creator.map(UserSummary::from),
        products: detail.products.into_iter().map(ProductResponse::from).collect(),
    }))
}

// ── PATCH /api/v1/categories/{id} ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, CatalogError> {
    let usecase = UpdateCategoryUseCase {
        categories: state.category_repo(),
    };
    let category = usecase
        .execute(
            parse_id(&id)?,
            CategoryPatch {
                name: body.name,
                description: body.description,
            },
        )
        .await?;
    Ok(Json(category.into()))
}

// ── POST /api/v1/categories/{id}/archive ─────────────────────────────────────

pub async fn archive_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CascadeResponse>, CatalogError> {
    let usecase = ArchiveCategoryUseCase {
        categories: state.category_repo(),
        products: state.product_repo(),
    };
    let report = usecase.execute(parse_id(&id)?).await?;
    Ok(Json(report.into()))
}
