use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use shelf_catalog::domain::repository::{
    CategoryRepository, ListRepository, ProductRepository,
};
use shelf_catalog::domain::types::{
    Category, CategorySortField, Product, ProductSortField, User,
};
use shelf_catalog::error::CatalogError;
use shelf_catalog::infra::memory::MemoryStore;
use shelf_catalog::infra::password::Argon2Hasher;
use shelf_catalog::usecase::category::{CreateCategoryInput, CreateCategoryUseCase};
use shelf_catalog::usecase::product::{CreateProductInput, CreateProductUseCase};
use shelf_catalog::usecase::user::{CreateUserInput, CreateUserUseCase};
use shelf_domain::id::{CategoryId, ProductId, UserId};
use shelf_domain::query::ListQuery;

// ── Seeding ──────────────────────────────────────────────────────────────────

pub async fn seed_user(store: &MemoryStore, username: &str) -> User {
    CreateUserUseCase {
        users: store.clone(),
        sequence: store.clone(),
        hasher: Argon2Hasher,
    }
    .execute(CreateUserInput {
        username: username.into(),
        password: "correct horse battery staple".into(),
        email: Some(format!("{username}@example.com")),
        avatar: None,
        role: None,
    })
    .await
    .unwrap()
}

pub async fn seed_category(store: &MemoryStore, name: &str, creator_id: UserId) -> Category {
    CreateCategoryUseCase {
        categories: store.clone(),
        users: store.clone(),
        sequence: store.clone(),
    }
    .execute(CreateCategoryInput {
        name: name.into(),
        description: None,
        creator_id,
    })
    .await
    .unwrap()
}

pub fn product_input(name: &str, category_id: CategoryId, creator_id: UserId) -> CreateProductInput {
    CreateProductInput {
        name: name.into(),
        description: None,
        image_ref: None,
        price: Some(9.5),
        category_id,
        creator_id,
    }
}

pub async fn seed_product(
    store: &MemoryStore,
    name: &str,
    category_id: CategoryId,
    creator_id: UserId,
) -> Product {
    CreateProductUseCase {
        products: store.clone(),
        categories: store.clone(),
        users: store.clone(),
        sequence: store.clone(),
    }
    .execute(product_input(name, category_id, creator_id))
    .await
    .unwrap()
}

pub async fn category(store: &MemoryStore, id: CategoryId) -> Category {
    CategoryRepository::find_by_id(store, id)
        .await
        .unwrap()
        .unwrap()
}

pub async fn product(store: &MemoryStore, id: ProductId) -> Product {
    ProductRepository::find_by_id(store, id)
        .await
        .unwrap()
        .unwrap()
}

fn injected(what: &str) -> CatalogError {
    CatalogError::StorageUnavailable(anyhow::anyhow!("injected failure: {what}"))
}

// ── FlakyCategories ──────────────────────────────────────────────────────────

/// Category store whose list maintenance writes fail while `fail_links` is set.
#[derive(Clone)]
pub struct FlakyCategories {
    pub inner: MemoryStore,
    pub fail_links: Arc<AtomicBool>,
}

impl FlakyCategories {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_links: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn heal(&self) {
        self.fail_links.store(false, Ordering::SeqCst);
    }

    fn check(&self, what: &str) -> Result<(), CatalogError> {
        if self.fail_links.load(Ordering::SeqCst) {
            return Err(injected(what));
        }
        Ok(())
    }
}

impl ListRepository<CategorySortField> for FlakyCategories {
    type Item = Category;

    async fn list_visible(
        &self,
        query: &ListQuery<CategorySortField>,
    ) -> Result<Vec<Category>, CatalogError> {
        ListRepository::<CategorySortField>::list_visible(&self.inner, query).await
    }

    async fn count_visible(&self, search: Option<&str>) -> Result<u64, CatalogError> {
        ListRepository::<CategorySortField>::count_visible(&self.inner, search).await
    }
}

impl CategoryRepository for FlakyCategories {
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, CatalogError> {
        CategoryRepository::find_by_id(&self.inner, id).await
    }

    async fn find_visible_by_name(&self, name: &str) -> Result<Option<Category>, CatalogError> {
        CategoryRepository::find_visible_by_name(&self.inner, name).await
    }

    async fn list_all(&self) -> Result<Vec<Category>, CatalogError> {
        self.inner.list_all().await
    }

    async fn insert(&self, category: &Category) -> Result<(), CatalogError> {
        CategoryRepository::insert(&self.inner, category).await
    }

    async fn update(&self, category: &Category) -> Result<bool, CatalogError> {
        CategoryRepository::update(&self.inner, category).await
    }

    async fn mark_archived(&self, id: CategoryId) -> Result<bool, CatalogError> {
        CategoryRepository::mark_archived(&self.inner, id).await
    }

    async fn add_product_id(
        &self,
        id: CategoryId,
        product_id: ProductId,
    ) -> Result<(), CatalogError> {
        self.check("add_product_id")?;
        self.inner.add_product_id(id, product_id).await
    }

    async fn remove_product_id(
        &self,
        id: CategoryId,
        product_id: ProductId,
    ) -> Result<(), CatalogError> {
        self.check("remove_product_id")?;
        self.inner.remove_product_id(id, product_id).await
    }

    async fn replace_product_ids(
        &self,
        id: CategoryId,
        product_ids: &[ProductId],
    ) -> Result<(), CatalogError> {
        self.inner.replace_product_ids(id, product_ids).await
    }
}

// ── FlakyProducts ────────────────────────────────────────────────────────────

/// Product store that refuses to archive the listed ids.
#[derive(Clone)]
pub struct FlakyProducts {
    pub inner: MemoryStore,
    pub fail_archive: Arc<Mutex<BTreeSet<ProductId>>>,
}

impl FlakyProducts {
    pub fn failing(inner: MemoryStore, ids: impl IntoIterator<Item = ProductId>) -> Self {
        Self {
            inner,
            fail_archive: Arc::new(Mutex::new(ids.into_iter().collect())),
        }
    }
}

impl ListRepository<ProductSortField> for FlakyProducts {
    type Item = Product;

    async fn list_visible(
        &self,
        query: &ListQuery<ProductSortField>,
    ) -> Result<Vec<Product>, CatalogError> {
        ListRepository::<ProductSortField>::list_visible(&self.inner, query).await
    }

    async fn count_visible(&self, search: Option<&str>) -> Result<u64, CatalogError> {
        ListRepository::<ProductSortField>::count_visible(&self.inner, search).await
    }
}

impl ProductRepository for FlakyProducts {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        ProductRepository::find_by_id(&self.inner, id).await
    }

    async fn find_visible_by_name(&self, name: &str) -> Result<Option<Product>, CatalogError> {
        ProductRepository::find_visible_by_name(&self.inner, name).await
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, CatalogError> {
        self.inner.find_by_ids(ids).await
    }

    async fn list_visible_ids_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<ProductId>, CatalogError> {
        self.inner.list_visible_ids_by_category(category_id).await
    }

    async fn list_visible_links(&self) -> Result<Vec<(ProductId, CategoryId)>, CatalogError> {
        self.inner.list_visible_links().await
    }

    async fn insert(&self, product: &Product) -> Result<(), CatalogError> {
        ProductRepository::insert(&self.inner, product).await
    }

    async fn update(&self, product: &Product) -> Result<bool, CatalogError> {
        ProductRepository::update(&self.inner, product).await
    }

    async fn mark_archived(&self, id: ProductId) -> Result<bool, CatalogError> {
        if self.fail_archive.lock().unwrap().contains(&id) {
            return Err(injected("mark_archived"));
        }
        ProductRepository::mark_archived(&self.inner, id).await
    }
}
