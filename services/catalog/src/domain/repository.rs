#![allow(async_fn_in_trait)]

use shelf_domain::id::{CategoryId, ProductId, UserId};
use shelf_domain::kind::EntityKind;
use shelf_domain::query::ListQuery;

use crate::domain::types::{
    Category, CategorySortField, Product, ProductSortField, User, UserSortField,
};
use crate::error::CatalogError;

/// Per-kind counters with an atomic increment-and-fetch.
pub trait SequencePort: Send + Sync {
    /// Increment the counter for `kind` (creating it at 0 first) and return the new value.
    /// Concurrent callers never observe the same value.
    async fn next(&self, kind: EntityKind) -> Result<u64, CatalogError>;

    /// Current counter value without incrementing; 0 if never allocated.
    async fn current(&self, kind: EntityKind) -> Result<u64, CatalogError>;
}

/// Filtered, sorted, paginated reads over the visible records of one kind.
pub trait ListRepository<F>: Send + Sync {
    type Item;

    async fn list_visible(&self, query: &ListQuery<F>) -> Result<Vec<Self::Item>, CatalogError>;

    /// Size of the filtered set, ignoring pagination.
    async fn count_visible(&self, search: Option<&str>) -> Result<u64, CatalogError>;
}

pub trait UserRepository: ListRepository<UserSortField, Item = User> {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, CatalogError>;

    async fn find_visible_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, CatalogError>;

    async fn insert(&self, user: &User) -> Result<(), CatalogError>;

    /// Visible → Archived. Returns `false` if the user was not visible.
    async fn mark_archived(&self, id: UserId) -> Result<bool, CatalogError>;
}

pub trait CategoryRepository: ListRepository<CategorySortField, Item = Category> {
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, CatalogError>;

    async fn find_visible_by_name(&self, name: &str) -> Result<Option<Category>, CatalogError>;

    /// Every category regardless of visibility, ordered by id.
    async fn list_all(&self) -> Result<Vec<Category>, CatalogError>;

    async fn insert(&self, category: &Category) -> Result<(), CatalogError>;

    /// Persist the editable fields. Returns `false` if the category is no longer visible.
    async fn update(&self, category: &Category) -> Result<bool, CatalogError>;

    /// Visible → Archived. Returns `false` if the category was not visible.
    async fn mark_archived(&self, id: CategoryId) -> Result<bool, CatalogError>;

    /// Append `product_id` to the cached list unless already present. Single-record atomic.
    async fn add_product_id(
        &self,
        id: CategoryId,
        product_id: ProductId,
    ) -> Result<(), CatalogError>;

    /// Remove `product_id` from the cached list if present. Single-record atomic.
    async fn remove_product_id(
        &self,
        id: CategoryId,
        product_id: ProductId,
    ) -> Result<(), CatalogError>;

    /// Overwrite the cached list wholesale (reconciliation only).
    async fn replace_product_ids(
        &self,
        id: CategoryId,
        product_ids: &[ProductId],
    ) -> Result<(), CatalogError>;
}

pub trait ProductRepository: ListRepository<ProductSortField, Item = Product> {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, CatalogError>;

    async fn find_visible_by_name(&self, name: &str) -> Result<Option<Product>, CatalogError>;

    /// Products with the given ids in any state, in the order of `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, CatalogError>;

    /// Ids of visible products whose `category_id` is `category_id`, ascending.
    async fn list_visible_ids_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<ProductId>, CatalogError>;

    /// `(product, category)` pairs for every visible product, ascending by product id.
    async fn list_visible_links(&self) -> Result<Vec<(ProductId, CategoryId)>, CatalogError>;

    async fn insert(&self, product: &Product) -> Result<(), CatalogError>;

    /// Persist the editable fields. Returns `false` if the product is no longer visible.
    async fn update(&self, product: &Product) -> Result<bool, CatalogError>;

    /// Visible → Archived. Returns `false` if the product was not visible.
    async fn mark_archived(&self, id: ProductId) -> Result<bool, CatalogError>;
}

/// One-way password hashing for signup.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, CatalogError>;
}
