//! Visible → Archived transitions. Archiving is idempotent: a second call on an
//! archived record succeeds without writing anything.

use std::collections::BTreeSet;

use shelf_domain::id::{CategoryId, ProductId, UserId};
use shelf_domain::kind::EntityKind;
use shelf_domain::lifecycle::{ArchiveTransition, Visibility};

use crate::domain::repository::{CategoryRepository, ProductRepository, UserRepository};
use crate::domain::types::CascadeReport;
use crate::error::CatalogError;
use crate::usecase::integrity::archive_product;

fn transition(current: Visibility) -> ArchiveTransition {
    let mut next = current;
    next.archive()
}

// ── ArchiveUser ──────────────────────────────────────────────────────────────

pub struct ArchiveUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ArchiveUserUseCase<U> {
    /// Returns whether this call performed the transition.
    pub async fn execute(&self, id: UserId) -> Result<bool, CatalogError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(EntityKind::User))?;
        if transition(user.visibility) == ArchiveTransition::AlreadyArchived {
            return Ok(false);
        }
        let archived = self.users.mark_archived(id).await?;
        if archived {
            tracing::info!(user_id = %id, "user archived");
        }
        Ok(archived)
    }
}

// ── ArchiveProduct ───────────────────────────────────────────────────────────

pub struct ArchiveProductUseCase<P: ProductRepository, C: CategoryRepository> {
    pub products: P,
    pub categories: C,
}

impl<P: ProductRepository, C: CategoryRepository> ArchiveProductUseCase<P, C> {
    /// Archive the product and drop it from its category's list.
    /// The category itself stays visible.
    pub async fn execute(&self, id: ProductId) -> Result<bool, CatalogError> {
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(EntityKind::Product))?;
        if transition(product.visibility) == ArchiveTransition::AlreadyArchived {
            return Ok(false);
        }
        let archived =
            archive_product(&self.products, &self.categories, id, product.category_id).await?;
        if archived {
            tracing::info!(product_id = %id, category_id = %product.category_id, "product archived");
        }
        Ok(archived)
    }
}

// ── ArchiveCategory ──────────────────────────────────────────────────────────

pub struct ArchiveCategoryUseCase<C: CategoryRepository, P: ProductRepository> {
    pub categories: C,
    pub products: P,
}

impl<C: CategoryRepository, P: ProductRepository> ArchiveCategoryUseCase<C, P> {
    /// Archive the category, then every product it owns.
    ///
    /// Owned products are the union of the cached list and a scan of visible
    /// products pointing at the category, so a stale list cannot hide one.
    /// Per-product failures are collected in the report, not returned.
    pub async fn execute(&self, id: CategoryId) -> Result<CascadeReport, CatalogError> {
        let category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(EntityKind::Category))?;
        if transition(category.visibility) == ArchiveTransition::AlreadyArchived {
            return Ok(CascadeReport::default());
        }
        if !self.categories.mark_archived(id).await? {
            // Lost a race with another archive call; that call owns the cascade.
            return Ok(CascadeReport::default());
        }

        let mut owned: BTreeSet<ProductId> = category.product_ids.iter().copied().collect();
        match self.products.list_visible_ids_by_category(id).await {
            Ok(ids) => owned.extend(ids),
            Err(e) => {
                tracing::warn!(category_id = %id, error = %e, "product scan failed, cascading cached list only");
            }
        }

        let mut report = CascadeReport {
            category_archived: true,
            ..Default::default()
        };
        for product_id in owned {
            match self.cascade_one(id, product_id).await {
                Ok(true) => report.products_archived.push(product_id),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        category_id = %id,
                        product_id = %product_id,
                        error = %e,
                        "cascade failed to archive product"
                    );
                    report.products_failed.push(product_id);
                }
            }
        }

        tracing::info!(
            category_id = %id,
            archived = report.products_archived.len(),
            failed = report.products_failed.len(),
            "category archived"
        );
        Ok(report)
    }

    async fn cascade_one(
        &self,
        category_id: CategoryId,
        product_id: ProductId,
    ) -> Result<bool, CatalogError> {
        // Only archive products that still point here; a cached id may be stale.
        match self.products.find_by_id(product_id).await? {
            Some(p) if p.category_id == category_id && p.visibility.is_visible() => {
                archive_product(&self.products, &self.categories, product_id, category_id).await
            }
            _ => Ok(false),
        }
    }
}
