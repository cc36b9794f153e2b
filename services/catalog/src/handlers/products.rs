use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use shelf_domain::id::{CategoryId, ProductId, UserId};
use shelf_domain::kind::EntityKind;

use crate::domain::types::{Category, Product, ProductPatch, ProductSortField};
use crate::error::CatalogError;
use crate::handlers::users::{ArchiveResponse, UserSummary};
use crate::handlers::{ListParams, ListResponse, parse_id};
use crate::state::AppState;
use crate::usecase::lifecycle::ArchiveProductUseCase;
use crate::usecase::product::{
    CreateProductInput, CreateProductUseCase, GetProductDetailUseCase, UpdateProductUseCase,
};
use crate::usecase::query::ListUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub image_ref: Option<String>,
    pub price: Option<f64>,
    pub category_id: CategoryId,
    pub creator_id: UserId,
    #[serde(serialize_with = "shelf_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            image_ref: product.image_ref,
            price: product.price,
            category_id: product.category_id,
            creator_id: product.creator_id,
            created_at: product.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
}

impl From<Category> for CategorySummary {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub category: Option<CategorySummary>,
    pub creator: Option<UserSummary>,
}

// ── POST /api/v1/products ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default, deserialize_with = "shelf_core::serde::trimmed_opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "shelf_core::serde::trimmed_opt_string")]
    pub image_ref: Option<String>,
    pub price: Option<f64>,
    pub category_id: CategoryId,
    pub creator_id: UserId,
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), CatalogError> {
    let usecase = CreateProductUseCase {
        products: state.product_repo(),
        categories: state.category_repo(),
        users: state.user_repo(),
        sequence: state.sequence(),
    };
    let product = usecase
        .execute(CreateProductInput {
            name: body.name,
            description: body.description,
            image_ref: body.image_ref,
            price: body.price,
            category_id: body.category_id,
            creator_id: body.creator_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

// ── GET /api/v1/products ─────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<ProductResponse>>, CatalogError> {
    let usecase = ListUseCase {
        repo: state.product_repo(),
    };
    let page = usecase
        .execute::<ProductSortField>(&params.into())
        .await?;
    Ok(Json(ListResponse::from_page(page, ProductResponse::from)))
}

// ── GET /api/v1/products/{id} ────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetailResponse>, CatalogError> {
    let usecase = GetProductDetailUseCase {
        products: state.product_repo(),
        categories: state.category_repo(),
        users: state.user_repo(),
    };
    let detail = usecase.execute(parse_id(&id)?).await?;
    if detail.product.visibility.is_archived() {
        return Err(CatalogError::NotFound(EntityKind::Product));
    }
    Ok(Json(ProductDetailResponse {
        product: detail.product.into(),
        category: detail.category.map(CategorySummary::from),
        creator: detail.creator.map(UserSummary::from),
    }))
}

// ── PATCH /api/v1/products/{id} ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_ref: Option<String>,
    pub price: Option<f64>,
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, CatalogError> {
    let usecase = UpdateProductUseCase {
        products: state.product_repo(),
    };
    let product = usecase
        .execute(
            parse_id(&id)?,
            ProductPatch {
                name: body.name,
                description: body.description,
                image_ref: body.image_ref,
                price: body.price,
            },
        )
        .await?;
    Ok(Json(product.into()))
}

// ── POST /api/v1/products/{id}/archive ───────────────────────────────────────

pub async fn archive_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArchiveResponse>, CatalogError> {
    let usecase = ArchiveProductUseCase {
        products: state.product_repo(),
        categories: state.category_repo(),
    };
    let archived = usecase.execute(parse_id(&id)?).await?;
    Ok(Json(ArchiveResponse { archived }))
}
