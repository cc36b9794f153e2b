use shelf_catalog::domain::types::{CategoryPatch, ProductPatch};
use shelf_catalog::error::CatalogError;
use shelf_catalog::infra::memory::MemoryStore;
use shelf_catalog::infra::password::Argon2Hasher;
use shelf_catalog::usecase::category::{
    CreateCategoryInput, CreateCategoryUseCase, GetCategoryDetailUseCase, UpdateCategoryUseCase,
};
use shelf_catalog::usecase::lifecycle::{
    ArchiveCategoryUseCase, ArchiveProductUseCase, ArchiveUserUseCase,
};
use shelf_catalog::usecase::product::{
    CreateProductUseCase, GetProductDetailUseCase, UpdateProductUseCase,
};
use shelf_catalog::usecase::user::{CreateUserInput, CreateUserUseCase};
use shelf_domain::kind::EntityKind;

use crate::helpers::{product, product_input, seed_category, seed_product, seed_user};

fn signup(username: &str) -> CreateUserInput {
    CreateUserInput {
        username: username.into(),
        password: "pw".into(),
        email: None,
        avatar: None,
        role: None,
    }
}

#[tokio::test]
async fn should_reject_duplicate_username_and_allow_reuse_after_archive() {
    let store = MemoryStore::new();
    let uc = CreateUserUseCase {
        users: store.clone(),
        sequence: store.clone(),
        hasher: Argon2Hasher,
    };
    let alice = uc.execute(signup("alice")).await.unwrap();

    let duplicate = uc.execute(signup("alice")).await;
    assert!(matches!(duplicate, Err(CatalogError::Conflict(EntityKind::User))));

    ArchiveUserUseCase {
        users: store.clone(),
    }
    .execute(alice.id)
    .await
    .unwrap();
    let again = uc.execute(signup("alice")).await.unwrap();
    assert_ne!(again.id, alice.id);
}

#[tokio::test]
async fn should_reject_archived_creator() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    ArchiveUserUseCase {
        users: store.clone(),
    }
    .execute(owner.id)
    .await
    .unwrap();

    let result = CreateCategoryUseCase {
        categories: store.clone(),
        users: store.clone(),
        sequence: store.clone(),
    }
    .execute(CreateCategoryInput {
        name: "Tea".into(),
        description: None,
        creator_id: owner.id,
    })
    .await;
    assert!(matches!(
        result,
        Err(CatalogError::InvalidReference(EntityKind::User))
    ));
}

#[tokio::test]
async fn should_reject_product_under_archived_category() {
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

    let result = CreateProductUseCase {
        products: store.clone(),
        categories: store.clone(),
        users: store.clone(),
        sequence: store.clone(),
    }
    .execute(product_input("Sencha", tea.id, owner.id))
    .await;
    assert!(matches!(
        result,
        Err(CatalogError::InvalidReference(EntityKind::Category))
    ));
}

#[tokio::test]
async fn should_refuse_updates_to_archived_product_and_leave_it_unchanged() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    let sencha = seed_product(&store, "Sencha", tea.id, owner.id).await;
    ArchiveProductUseCase {
        products: store.clone(),
        categories: store.clone(),
    }
    .execute(sencha.id)
    .await
    .unwrap();

    let result = UpdateProductUseCase {
        products: store.clone(),
    }
    .execute(
        sencha.id,
        ProductPatch {
            name: Some("Gyokuro".into()),
            price: Some(20.0),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(CatalogError::Archived(EntityKind::Product))));

    let stored = product(&store, sencha.id).await;
    assert_eq!(stored.name, "Sencha");
    assert_eq!(stored.price, sencha.price);
    assert!(stored.visibility.is_archived());
}

#[tokio::test]
async fn should_refuse_updates_to_archived_category() {
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

    let result = UpdateCategoryUseCase {
        categories: store.clone(),
    }
    .execute(
        tea.id,
        CategoryPatch {
            description: Some("leaves".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(CatalogError::Archived(EntityKind::Category))));
}

#[tokio::test]
async fn should_reject_rename_onto_visible_name() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    let sencha = seed_product(&store, "Sencha", tea.id, owner.id).await;
    seed_product(&store, "Matcha", tea.id, owner.id).await;

    let result = UpdateProductUseCase {
        products: store.clone(),
    }
    .execute(
        sencha.id,
        ProductPatch {
            name: Some(" Matcha ".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(CatalogError::Conflict(EntityKind::Product))));
}

#[tokio::test]
async fn should_return_archived_records_by_id() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    let sencha = seed_product(&store, "Sencha", tea.id, owner.id).await;
    ArchiveProductUseCase {
        products: store.clone(),
        categories: store.clone(),
    }
    .execute(sencha.id)
    .await
    .unwrap();

    let found = GetProductDetailUseCase {
        products: store.clone(),
        categories: store.clone(),
        users: store.clone(),
    }
    .execute(sencha.id)
    .await
    .unwrap();
    assert!(found.product.visibility.is_archived());
}

#[tokio::test]
async fn should_list_visible_products_in_category_detail() {
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

    let detail = GetCategoryDetailUseCase {
        categories: store.clone(),
        products: store.clone(),
        users: store.clone(),
    }
    .execute(tea.id)
    .await
    .unwrap();
    let names: Vec<_> = detail.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Matcha"]);
    assert_eq!(detail.category.product_ids, vec![matcha.id]);
    assert_eq!(detail.creator.map(|u| u.username).as_deref(), Some("owner"));
}
