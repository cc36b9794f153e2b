use shelf_catalog::domain::types::CascadeReport;
use shelf_catalog::infra::memory::MemoryStore;
use shelf_catalog::usecase::lifecycle::{
    ArchiveCategoryUseCase, ArchiveProductUseCase, ArchiveUserUseCase,
};
use shelf_domain::lifecycle::Visibility;

use crate::helpers::{category, product, seed_category, seed_product, seed_user};

#[tokio::test]
async fn should_archive_every_product_of_archived_category() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    let p1 = seed_product(&store, "Sencha", tea.id, owner.id).await;
    let p2 = seed_product(&store, "Matcha", tea.id, owner.id).await;

    let report = ArchiveCategoryUseCase {
        categories: store.clone(),
        products: store.clone(),
    }
    .execute(tea.id)
    .await
    .unwrap();

    assert!(report.category_archived);
    assert_eq!(report.products_archived, vec![p1.id, p2.id]);
    assert!(category(&store, tea.id).await.visibility.is_archived());
    assert!(product(&store, p1.id).await.visibility.is_archived());
    assert!(product(&store, p2.id).await.visibility.is_archived());
}

#[tokio::test]
async fn should_not_touch_other_categories() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    let coffee = seed_category(&store, "Coffee", owner.id).await;
    let espresso = seed_product(&store, "Espresso", coffee.id, owner.id).await;

    ArchiveCategoryUseCase {
        categories: store.clone(),
        products: store.clone(),
    }
    .execute(tea.id)
    .await
    .unwrap();

    assert!(product(&store, espresso.id).await.visibility.is_visible());
    assert_eq!(
        category(&store, coffee.id).await.product_ids,
        vec![espresso.id]
    );
}

#[tokio::test]
async fn should_treat_second_archive_as_no_op() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    let sencha = seed_product(&store, "Sencha", tea.id, owner.id).await;

    let categories = ArchiveCategoryUseCase {
        categories: store.clone(),
        products: store.clone(),
    };
    categories.execute(tea.id).await.unwrap();
    let after_first = (
        category(&store, tea.id).await,
        product(&store, sencha.id).await,
    );
    let second = categories.execute(tea.id).await.unwrap();
    assert_eq!(second, CascadeReport::default());
    assert_eq!(
        (
            category(&store, tea.id).await,
            product(&store, sencha.id).await
        ),
        after_first
    );

    let products = ArchiveProductUseCase {
        products: store.clone(),
        categories: store.clone(),
    };
    assert!(!products.execute(sencha.id).await.unwrap());

    let users = ArchiveUserUseCase {
        users: store.clone(),
    };
    assert!(users.execute(owner.id).await.unwrap());
    assert!(!users.execute(owner.id).await.unwrap());
}

#[tokio::test]
async fn should_free_category_name_after_archive() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    ArchiveCategoryUseCase {
        categories: store.clone(),
        products: store.clone(),
    }
    .execute(tea.id)
    .await
    .unwrap();

    let reborn = seed_category(&store, "Tea", owner.id).await;
    assert_ne!(reborn.id, tea.id);
    assert_eq!(reborn.visibility, Visibility::Visible);
    assert_eq!(
        category(&store, tea.id).await.visibility,
        Visibility::Archived
    );
}
