use shelf_catalog::domain::repository::CategoryRepository;
use shelf_catalog::domain::types::ReconcileReport;
use shelf_catalog::infra::memory::MemoryStore;
use shelf_catalog::usecase::integrity::{ReconcileInput, ReconcileUseCase};
use shelf_catalog::usecase::lifecycle::{ArchiveCategoryUseCase, ArchiveProductUseCase};
use shelf_catalog::usecase::product::CreateProductUseCase;

use crate::helpers::{
    FlakyCategories, FlakyProducts, category, product, product_input, seed_category, seed_product,
    seed_user,
};

fn reconcile(store: &MemoryStore) -> ReconcileUseCase<MemoryStore, MemoryStore> {
    ReconcileUseCase {
        categories: store.clone(),
        products: store.clone(),
    }
}

#[tokio::test]
async fn should_append_new_product_to_category_list() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    let sencha = seed_product(&store, "Sencha", tea.id, owner.id).await;
    let matcha = seed_product(&store, "Matcha", tea.id, owner.id).await;

    assert_eq!(
        category(&store, tea.id).await.product_ids,
        vec![sencha.id, matcha.id]
    );
}

#[tokio::test]
async fn should_succeed_when_link_write_fails_and_reconcile_restores_list() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    let flaky = FlakyCategories::new(store.clone());

    let created = CreateProductUseCase {
        products: store.clone(),
        categories: flaky.clone(),
        users: store.clone(),
        sequence: store.clone(),
    }
    .execute(product_input("Sencha", tea.id, owner.id))
    .await
    .expect("creation succeeds once the product row is stored");

    assert!(product(&store, created.id).await.visibility.is_visible());
    assert!(category(&store, tea.id).await.product_ids.is_empty());

    flaky.heal();
    let report = ReconcileUseCase {
        categories: flaky,
        products: store.clone(),
    }
    .execute(ReconcileInput::default())
    .await
    .unwrap();
    assert_eq!(report.categories_repaired, vec![tea.id]);
    assert_eq!(category(&store, tea.id).await.product_ids, vec![created.id]);
}

#[tokio::test]
async fn should_remove_archived_product_from_list_and_keep_category_visible() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    let sencha = seed_product(&store, "Sencha", tea.id, owner.id).await;
    let matcha = seed_product(&store, "Matcha", tea.id, owner.id).await;

    ArchiveProductUseCase {
        products: store.clone(),
        categories: store.clone(),
    }
    .execute(sencha.id)
    .await
    .unwrap();

    let tea = category(&store, tea.id).await;
    assert!(tea.visibility.is_visible());
    assert_eq!(tea.product_ids, vec![matcha.id]);
}

#[tokio::test]
async fn should_leave_stale_entry_when_unlink_fails_until_reconciled() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    let sencha = seed_product(&store, "Sencha", tea.id, owner.id).await;
    let flaky = FlakyCategories::new(store.clone());

    let archived = ArchiveProductUseCase {
        products: store.clone(),
        categories: flaky,
    }
    .execute(sencha.id)
    .await
    .unwrap();
    assert!(archived);
    assert!(product(&store, sencha.id).await.visibility.is_archived());
    assert_eq!(category(&store, tea.id).await.product_ids, vec![sencha.id]);

    reconcile(&store)
        .execute(ReconcileInput::default())
        .await
        .unwrap();
    assert!(category(&store, tea.id).await.product_ids.is_empty());
}

#[tokio::test]
async fn should_cascade_to_products_missing_from_cached_list() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    let sencha = seed_product(&store, "Sencha", tea.id, owner.id).await;
    let matcha = seed_product(&store, "Matcha", tea.id, owner.id).await;
    // Simulate a lost link write.
    store
        .remove_product_id(tea.id, matcha.id)
        .await
        .unwrap();

    let report = ArchiveCategoryUseCase {
        categories: store.clone(),
        products: store.clone(),
    }
    .execute(tea.id)
    .await
    .unwrap();

    assert_eq!(report.products_archived, vec![sencha.id, matcha.id]);
    assert!(product(&store, matcha.id).await.visibility.is_archived());
}

#[tokio::test]
async fn should_report_failed_cascade_and_complete_it_by_reconciling() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    let sencha = seed_product(&store, "Sencha", tea.id, owner.id).await;
    let matcha = seed_product(&store, "Matcha", tea.id, owner.id).await;

    let report = ArchiveCategoryUseCase {
        categories: store.clone(),
        products: FlakyProducts::failing(store.clone(), [matcha.id]),
    }
    .execute(tea.id)
    .await
    .expect("per-product failures do not fail the cascade");
    assert!(report.category_archived);
    assert_eq!(report.products_archived, vec![sencha.id]);
    assert_eq!(report.products_failed, vec![matcha.id]);
    assert!(product(&store, matcha.id).await.visibility.is_visible());

    let detected = reconcile(&store)
        .execute(ReconcileInput::default())
        .await
        .unwrap();
    assert_eq!(detected.orphaned_products, vec![matcha.id]);
    assert!(detected.orphans_archived.is_empty());

    let repaired = reconcile(&store)
        .execute(ReconcileInput {
            archive_orphans: true,
        })
        .await
        .unwrap();
    assert_eq!(repaired.orphans_archived, vec![matcha.id]);
    assert!(product(&store, matcha.id).await.visibility.is_archived());
    assert!(category(&store, tea.id).await.product_ids.is_empty());
}

#[tokio::test]
async fn should_find_nothing_to_repair_in_consistent_catalog() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    let coffee = seed_category(&store, "Coffee", owner.id).await;
    seed_product(&store, "Sencha", tea.id, owner.id).await;
    seed_product(&store, "Espresso", coffee.id, owner.id).await;

    let report = reconcile(&store)
        .execute(ReconcileInput::default())
        .await
        .unwrap();
    assert_eq!(
        report,
        ReconcileReport {
            categories_scanned: 2,
            ..Default::default()
        }
    );
}
