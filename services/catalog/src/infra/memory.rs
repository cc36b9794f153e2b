//! Single-process store. Each method takes one lock for its whole read or
//! write, so per-record operations are atomic like their Postgres counterparts.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tokio::sync::RwLock;

use shelf_domain::id::{CategoryId, ProductId, UserId};
use shelf_domain::kind::EntityKind;
use shelf_domain::lifecycle::{ArchiveTransition, Visibility};
use shelf_domain::pagination::Sort;
use shelf_domain::query::{ListQuery, SortField};

use crate::domain::repository::{
    CategoryRepository, ListRepository, ProductRepository, SequencePort, UserRepository,
};
use crate::domain::types::{
    Category, CategorySortField, Product, ProductSortField, User, UserSortField,
};
use crate::error::CatalogError;

#[derive(Default)]
struct Inner {
    counters: [AtomicU64; 3],
    users: RwLock<BTreeMap<UserId, User>>,
    categories: RwLock<BTreeMap<CategoryId, Category>>,
    products: RwLock<BTreeMap<ProductId, Product>>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Filter by name, sort with `cmp` (ties by id via the caller), then cut one page.
fn page_of<'a, T, F>(
    rows: impl Iterator<Item = &'a T>,
    query: &ListQuery<F>,
    name: impl Fn(&T) -> &str,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Vec<T>
where
    T: Clone + 'a,
    F: SortField,
{
    let mut matched: Vec<&T> = rows.filter(|r| query.matches_name(name(*r))).collect();
    matched.sort_by(|a, b| match query.sort {
        Sort::Asc => cmp(*a, *b),
        Sort::Desc => cmp(*b, *a),
    });
    matched
        .into_iter()
        .skip(usize::try_from(query.page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(query.page.limit()).unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

fn archive(visibility: &mut Visibility) -> bool {
    visibility.archive() == ArchiveTransition::Archived
}

/// NULL prices sort after every number, as in Postgres.
fn cmp_price(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

// ── Sequence ─────────────────────────────────────────────────────────────────

impl SequencePort for MemoryStore {
    async fn next(&self, kind: EntityKind) -> Result<u64, CatalogError> {
        Ok(self.inner.counters[kind.index()].fetch_add(1, AtomicOrdering::SeqCst) + 1)
    }

    async fn current(&self, kind: EntityKind) -> Result<u64, CatalogError> {
        Ok(self.inner.counters[kind.index()].load(AtomicOrdering::SeqCst))
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

impl ListRepository<UserSortField> for MemoryStore {
    type Item = User;

    async fn list_visible(
        &self,
        query: &ListQuery<UserSortField>,
    ) -> Result<Vec<User>, CatalogError> {
        let users = self.inner.users.read().await;
        Ok(page_of(
            users.values().filter(|u| u.visibility.is_visible()),
            query,
            |u| u.username.as_str(),
            |a, b| {
                let primary = match query.sort_field {
                    UserSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                    UserSortField::Username => a.username.cmp(&b.username),
                    UserSortField::Id => Ordering::Equal,
                };
                primary.then(a.id.cmp(&b.id))
            },
        ))
    }

    async fn count_visible(&self, search: Option<&str>) -> Result<u64, CatalogError> {
        let query = ListQuery::<UserSortField> {
            search: search.map(str::to_owned),
            ..Default::default()
        };
        let users = self.inner.users.read().await;
        Ok(users
            .values()
            .filter(|u| u.visibility.is_visible() && query.matches_name(&u.username))
            .count() as u64)
    }
}

impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, CatalogError> {
        Ok(self.inner.users.read().await.get(&id).cloned())
    }

    async fn find_visible_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, CatalogError> {
        let users = self.inner.users.read().await;
        Ok(users
            .values()
            .find(|u| u.visibility.is_visible() && u.username == username)
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), CatalogError> {
        let mut users = self.inner.users.write().await;
        let taken = user.visibility.is_visible()
            && users
                .values()
                .any(|u| u.visibility.is_visible() && u.username == user.username);
        if taken || users.contains_key(&user.id) {
            return Err(CatalogError::Conflict(EntityKind::User));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn mark_archived(&self, id: UserId) -> Result<bool, CatalogError> {
        let mut users = self.inner.users.write().await;
        Ok(match users.get_mut(&id) {
            Some(u) => archive(&mut u.visibility),
            None => false,
        })
    }
}

// ── Categories ───────────────────────────────────────────────────────────────

impl ListRepository<CategorySortField> for MemoryStore {
    type Item = Category;

    async fn list_visible(
        &self,
        query: &ListQuery<CategorySortField>,
    ) -> Result<Vec<Category>, CatalogError> {
        let categories = self.inner.categories.read().await;
        Ok(page_of(
            categories.values().filter(|c| c.visibility.is_visible()),
            query,
            |c| c.name.as_str(),
            |a, b| {
                let primary = match query.sort_field {
                    CategorySortField::CreatedAt => a.created_at.cmp(&b.created_at),
                    CategorySortField::Name => a.name.cmp(&b.name),
                    CategorySortField::Id => Ordering::Equal,
                };
                primary.then(a.id.cmp(&b.id))
            },
        ))
    }

    async fn count_visible(&self, search: Option<&str>) -> Result<u64, CatalogError> {
        let query = ListQuery::<CategorySortField> {
            search: search.map(str::to_owned),
            ..Default::default()
        };
        let categories = self.inner.categories.read().await;
        Ok(categories
            .values()
            .filter(|c| c.visibility.is_visible() && query.matches_name(&c.name))
            .count() as u64)
    }
}

impl CategoryRepository for MemoryStore {
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, CatalogError> {
        Ok(self.inner.categories.read().await.get(&id).cloned())
    }

    async fn find_visible_by_name(&self, name: &str) -> Result<Option<Category>, CatalogError> {
        let categories = self.inner.categories.read().await;
        Ok(categories
            .values()
            .find(|c| c.visibility.is_visible() && c.name == name)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.inner.categories.read().await.values().cloned().collect())
    }

    async fn insert(&self, category: &Category) -> Result<(), CatalogError> {
        let mut categories = self.inner.categories.write().await;
        let taken = category.visibility.is_visible()
            && categories
                .values()
                .any(|c| c.visibility.is_visible() && c.name == category.name);
        if taken || categories.contains_key(&category.id) {
            return Err(CatalogError::Conflict(EntityKind::Category));
        }
        categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn update(&self, category: &Category) -> Result<bool, CatalogError> {
        let mut categories = self.inner.categories.write().await;
        if categories.values().any(|c| {
            c.id != category.id && c.visibility.is_visible() && c.name == category.name
        }) {
            return Err(CatalogError::Conflict(EntityKind::Category));
        }
        match categories.get_mut(&category.id) {
            Some(stored) if stored.visibility.accepts_updates() => {
                stored.name = category.name.clone();
                stored.description = category.description.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_archived(&self, id: CategoryId) -> Result<bool, CatalogError> {
        let mut categories = self.inner.categories.write().await;
        Ok(match categories.get_mut(&id) {
            Some(c) => archive(&mut c.visibility),
            None => false,
        })
    }

    async fn add_product_id(
        &self,
        id: CategoryId,
        product_id: ProductId,
    ) -> Result<(), CatalogError> {
        let mut categories = self.inner.categories.write().await;
        if let Some(c) = categories.get_mut(&id) {
            if !c.product_ids.contains(&product_id) {
                c.product_ids.push(product_id);
            }
        }
        Ok(())
    }

    async fn remove_product_id(
        &self,
        id: CategoryId,
        product_id: ProductId,
    ) -> Result<(), CatalogError> {
        let mut categories = self.inner.categories.write().await;
        if let Some(c) = categories.get_mut(&id) {
            c.product_ids.retain(|p| *p != product_id);
        }
        Ok(())
    }

    async fn replace_product_ids(
        &self,
        id: CategoryId,
        product_ids: &[ProductId],
    ) -> Result<(), CatalogError> {
        let mut categories = self.inner.categories.write().await;
        if let Some(c) = categories.get_mut(&id) {
            c.product_ids = product_ids.to_vec();
        }
        Ok(())
    }
}

// ── Products ─────────────────────────────────────────────────────────────────

impl ListRepository<ProductSortField> for MemoryStore {
    type Item = Product;

    async fn list_visible(
        &self,
        query: &ListQuery<ProductSortField>,
    ) -> Result<Vec<Product>, CatalogError> {
        let products = self.inner.products.read().await;
        Ok(page_of(
            products.values().filter(|p| p.visibility.is_visible()),
            query,
            |p| p.name.as_str(),
            |a, b| {
                let primary = match query.sort_field {
                    ProductSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                    ProductSortField::Name => a.name.cmp(&b.name),
                    ProductSortField::Price => cmp_price(a.price, b.price),
                    ProductSortField::Id => Ordering::Equal,
                };
                primary.then(a.id.cmp(&b.id))
            },
        ))
    }

    async fn count_visible(&self, search: Option<&str>) -> Result<u64, CatalogError> {
        let query = ListQuery::<ProductSortField> {
            search: search.map(str::to_owned),
            ..Default::default()
        };
        let products = self.inner.products.read().await;
        Ok(products
            .values()
            .filter(|p| p.visibility.is_visible() && query.matches_name(&p.name))
            .count() as u64)
    }
}

impl ProductRepository for MemoryStore {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.inner.products.read().await.get(&id).cloned())
    }

    async fn find_visible_by_name(&self, name: &str) -> Result<Option<Product>, CatalogError> {
        let products = self.inner.products.read().await;
        Ok(products
            .values()
            .find(|p| p.visibility.is_visible() && p.name == name)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, CatalogError> {
        let products = self.inner.products.read().await;
        Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
    }

    async fn list_visible_ids_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<ProductId>, CatalogError> {
        let products = self.inner.products.read().await;
        Ok(products
            .values()
            .filter(|p| p.visibility.is_visible() && p.category_id == category_id)
            .map(|p| p.id)
            .collect())
    }

    async fn list_visible_links(&self) -> Result<Vec<(ProductId, CategoryId)>, CatalogError> {
        let products = self.inner.products.read().await;
        Ok(products
            .values()
            .filter(|p| p.visibility.is_visible())
            .map(|p| (p.id, p.category_id))
            .collect())
    }

    async fn insert(&self, product: &Product) -> Result<(), CatalogError> {
        let mut products = self.inner.products.write().await;
        let taken = product.visibility.is_visible()
            && products
                .values()
                .any(|p| p.visibility.is_visible() && p.name == product.name);
        if taken || products.contains_key(&product.id) {
            return Err(CatalogError::Conflict(EntityKind::Product));
        }
        products.insert(product.id, product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, CatalogError> {
        let mut products = self.inner.products.write().await;
        if products
            .values()
            .any(|p| p.id != product.id && p.visibility.is_visible() && p.name == product.name)
        {
            return Err(CatalogError::Conflict(EntityKind::Product));
        }
        match products.get_mut(&product.id) {
            Some(stored) if stored.visibility.accepts_updates() => {
                stored.name = product.name.clone();
                stored.description = product.description.clone();
                stored.image_ref = product.image_ref.clone();
                stored.price = product.price;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_archived(&self, id: ProductId) -> Result<bool, CatalogError> {
        let mut products = self.inner.products.write().await;
        Ok(match products.get_mut(&id) {
            Some(p) => archive(&mut p.visibility),
            None => false,
        })
    }
}
