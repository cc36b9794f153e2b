//! Two-way link between `Category.product_ids` and `Product.category_id`.
//!
//! The product record is authoritative and always written first. The second
//! write (the category's cached list) is best effort: a failure is logged and
//! left for [`ReconcileUseCase`] to repair.

use std::collections::{BTreeMap, BTreeSet};

use shelf_domain::id::{CategoryId, ProductId};

use crate::domain::repository::{CategoryRepository, ProductRepository};
use crate::domain::types::{Product, ReconcileReport};
use crate::error::CatalogError;

/// Append `product` to its category's list. Returns whether the write succeeded.
pub async fn link_product<C: CategoryRepository>(categories: &C, product: &Product) -> bool {
    match categories
        .add_product_id(product.category_id, product.id)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                product_id = %product.id,
                category_id = %product.category_id,
                error = %e,
                "failed to link product to category"
            );
            false
        }
    }
}

/// Remove `product_id` from the category's list. Returns whether the write succeeded.
pub async fn unlink_product<C: CategoryRepository>(
    categories: &C,
    category_id: CategoryId,
    product_id: ProductId,
) -> bool {
    match categories.remove_product_id(category_id, product_id).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                product_id = %product_id,
                category_id = %category_id,
                error = %e,
                "failed to unlink product from category"
            );
            false
        }
    }
}

/// Product archival protocol: mark archived, then unlink.
///
/// Returns `false` without touching the category when the product was not
/// visible. Only the first write can fail the call.
pub(crate) async fn archive_product<P, C>(
    products: &P,
    categories: &C,
    product_id: ProductId,
    category_id: CategoryId,
) -> Result<bool, CatalogError>
where
    P: ProductRepository,
    C: CategoryRepository,
{
    if !products.mark_archived(product_id).await? {
        return Ok(false);
    }
    unlink_product(categories, category_id, product_id).await;
    Ok(true)
}

// ── Reconcile ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileInput {
    /// Archive visible products whose category is missing or archived.
    pub archive_orphans: bool,
}

pub struct ReconcileUseCase<C: CategoryRepository, P: ProductRepository> {
    pub categories: C,
    pub products: P,
}

impl<C: CategoryRepository, P: ProductRepository> ReconcileUseCase<C, P> {
    pub async fn execute(&self, input: ReconcileInput) -> Result<ReconcileReport, CatalogError> {
        let categories = self.categories.list_all().await?;
        let links = self.products.list_visible_links().await?;

        let visible: BTreeSet<CategoryId> = categories
            .iter()
            .filter(|c| c.visibility.is_visible())
            .map(|c| c.id)
            .collect();

        let mut report = ReconcileReport {
            categories_scanned: categories.len() as u64,
            ..Default::default()
        };

        let mut expected: BTreeMap<CategoryId, Vec<ProductId>> = BTreeMap::new();
        for (product_id, category_id) in links {
            if !visible.contains(&category_id) {
                report.orphaned_products.push(product_id);
                if input.archive_orphans && self.products.mark_archived(product_id).await? {
                    report.orphans_archived.push(product_id);
                    continue;
                }
            }
            // Links arrive in ascending product order.
            expected.entry(category_id).or_default().push(product_id);
        }

        for category in &categories {
            let want = expected.remove(&category.id).unwrap_or_default();
            if category.product_ids == want {
                continue;
            }
            self.categories
                .replace_product_ids(category.id, &want)
                .await?;
            tracing::info!(
                category_id = %category.id,
                before = category.product_ids.len(),
                after = want.len(),
                "repaired category product list"
            );
            report.categories_repaired.push(category.id);
        }

        if !report.orphaned_products.is_empty() {
            tracing::warn!(
                orphans = report.orphaned_products.len(),
                archived = report.orphans_archived.len(),
                "found visible products without a visible category"
            );
        }
        Ok(report)
    }
}
