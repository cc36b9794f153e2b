use chrono::{DateTime, Utc};

use shelf_domain::id::{CategoryId, ProductId, UserId};
use shelf_domain::lifecycle::Visibility;
use shelf_domain::query::SortField;
use shelf_domain::user::UserRole;

use crate::error::CatalogError;

/// User account. Never updated in-core beyond its visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub visibility: Visibility,
}

/// Category with its cached list of member products.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    /// Cache of the visible products whose `category_id` is this category.
    /// Ordered by insertion, never contains duplicates.
    pub product_ids: Vec<ProductId>,
    pub creator_id: UserId,
    pub created_at: DateTime<Utc>,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub image_ref: Option<String>,
    pub price: Option<f64>,
    /// Authoritative side of the category link.
    pub category_id: CategoryId,
    pub creator_id: UserId,
    pub created_at: DateTime<Utc>,
    pub visibility: Visibility,
}

/// Editable category fields. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    pub fn apply_to(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.clone();
        }
        if let Some(description) = &self.description {
            category.description = Some(description.clone());
        }
    }
}

/// Editable product fields. Category, creator and id are fixed at creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_ref: Option<String>,
    pub price: Option<f64>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.image_ref.is_none()
            && self.price.is_none()
    }

    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = Some(description.clone());
        }
        if let Some(image_ref) = &self.image_ref {
            product.image_ref = Some(image_ref.clone());
        }
        if let Some(price) = self.price {
            product.price = Some(price);
        }
    }
}

/// Category with its creator and the visible products it lists.
#[derive(Debug, Clone)]
pub struct CategoryDetail {
    pub category: Category,
    pub creator: Option<User>,
    pub products: Vec<Product>,
}

/// Product with its owning category and creator.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub product: Product,
    pub category: Option<Category>,
    pub creator: Option<User>,
}

/// Outcome of archiving a category and cascading to its products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// `false` when the category was already archived and nothing ran.
    pub category_archived: bool,
    pub products_archived: Vec<ProductId>,
    /// Products the cascade could not archive; left visible under an archived category.
    pub products_failed: Vec<ProductId>,
}

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub categories_scanned: u64,
    /// Categories whose cached `product_ids` was rewritten.
    pub categories_repaired: Vec<CategoryId>,
    /// Visible products whose category is missing or archived.
    pub orphaned_products: Vec<ProductId>,
    /// Orphans archived by this pass (only when requested).
    pub orphans_archived: Vec<ProductId>,
}

// ── Sort fields ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserSortField {
    #[default]
    CreatedAt,
    Username,
    Id,
}

impl SortField for UserSortField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "created_at" | "createdAt" => Some(Self::CreatedAt),
            "username" => Some(Self::Username),
            "id" | "_id" => Some(Self::Id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategorySortField {
    #[default]
    CreatedAt,
    Name,
    Id,
}

impl SortField for CategorySortField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "created_at" | "createdAt" => Some(Self::CreatedAt),
            "name" => Some(Self::Name),
            "id" | "_id" => Some(Self::Id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSortField {
    #[default]
    CreatedAt,
    Name,
    Price,
    Id,
}

impl SortField for ProductSortField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "created_at" | "createdAt" => Some(Self::CreatedAt),
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "id" | "_id" => Some(Self::Id),
            _ => None,
        }
    }
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Trim a required name; blank names are rejected.
pub fn normalize_name(raw: &str) -> Result<String, CatalogError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CatalogError::InvalidInput("name must not be blank"));
    }
    Ok(name.to_owned())
}

/// Prices are optional but, when present, finite and non-negative.
pub fn validate_price(price: Option<f64>) -> Result<(), CatalogError> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => {
            Err(CatalogError::InvalidInput("price must be a non-negative number"))
        }
        _ => Ok(()),
    }
}
