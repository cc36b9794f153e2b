use shelf_catalog::domain::types::{CategorySortField, ProductSortField, UserSortField};
use shelf_catalog::infra::memory::MemoryStore;
use shelf_catalog::usecase::lifecycle::ArchiveProductUseCase;
use shelf_catalog::usecase::query::ListUseCase;
use shelf_domain::query::ListCriteria;

use crate::helpers::{seed_category, seed_product, seed_user};

fn criteria(pairs: &[(&str, &str)]) -> ListCriteria {
    let mut c = ListCriteria::default();
    for (key, value) in pairs {
        let value = Some((*value).to_owned());
        match *key {
            "page" => c.page = value,
            "limit" => c.page_size = value,
            "search" => c.search = value,
            "sortBy" => c.sort_by = value,
            "sortOrder" => c.sort_order = value,
            other => panic!("unknown criterion {other}"),
        }
    }
    c
}

async fn catalog_of(n: usize) -> MemoryStore {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    for i in 0..n {
        seed_product(&store, &format!("Tea {i:02}"), tea.id, owner.id).await;
    }
    store
}

#[tokio::test]
async fn should_return_second_page_of_twenty_five_records() {
    let store = catalog_of(25).await;
    let page = ListUseCase { repo: store }
        .execute::<ProductSortField>(&criteria(&[
            ("page", "2"),
            ("limit", "10"),
            ("sortBy", "id"),
            ("sortOrder", "asc"),
        ]))
        .await
        .unwrap();

    assert_eq!(page.total_count, 25);
    assert_eq!(page.total_pages(), 3);
    assert_eq!((page.page_number, page.page_size), (2, 10));
    let names: Vec<_> = page.items.iter().map(|p| p.name.clone()).collect();
    let expected: Vec<_> = (10..20).map(|i| format!("Tea {i:02}")).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn should_exclude_archived_records_from_items_and_total() {
    let store = catalog_of(3).await;
    ArchiveProductUseCase {
        products: store.clone(),
        categories: store.clone(),
    }
    .execute(shelf_domain::id::ProductId(2))
    .await
    .unwrap();

    let page = ListUseCase { repo: store }
        .execute::<ProductSortField>(&ListCriteria::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 2);
    assert!(page.items.iter().all(|p| p.visibility.is_visible()));
}

#[tokio::test]
async fn should_search_case_insensitively_and_literally() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner").await;
    let tea = seed_category(&store, "Tea", owner.id).await;
    seed_product(&store, "Green Tea", tea.id, owner.id).await;
    seed_product(&store, "Teapot", tea.id, owner.id).await;
    seed_product(&store, "100% Arabica", tea.id, owner.id).await;
    seed_product(&store, "1000 Arabica", tea.id, owner.id).await;

    let uc = ListUseCase { repo: store };
    let tea_hits = uc
        .execute::<ProductSortField>(&criteria(&[("search", "  TEA ")]))
        .await
        .unwrap();
    assert_eq!(tea_hits.total_count, 2);

    let percent = uc
        .execute::<ProductSortField>(&criteria(&[("search", "100%")]))
        .await
        .unwrap();
    let names: Vec<_> = percent.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["100% Arabica"]);
}

#[tokio::test]
async fn should_fall_back_to_defaults_for_bad_parameters() {
    let store = catalog_of(12).await;
    let page = ListUseCase { repo: store }
        .execute::<ProductSortField>(&criteria(&[
            ("page", "-1"),
            ("limit", "lots"),
            ("sortBy", "password"),
            ("sortOrder", "sideways"),
        ]))
        .await
        .unwrap();
    assert_eq!((page.page_number, page.page_size), (1, 10));
    assert_eq!(page.items.len(), 10);
    // createdAt descending: newest first.
    assert_eq!(page.items[0].name, "Tea 11");
}

#[tokio::test]
async fn should_return_every_record_when_limit_exceeds_one_hundred() {
    let store = catalog_of(150).await;
    let page = ListUseCase { repo: store }
        .execute::<ProductSortField>(&criteria(&[("limit", "150")]))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 150);
    assert_eq!(page.page_size, 150);
    assert_eq!(page.total_pages(), 1);
}

#[tokio::test]
async fn should_sort_categories_and_users_by_name() {
    let store = MemoryStore::new();
    let zed = seed_user(&store, "zed").await;
    seed_user(&store, "amy").await;
    for name in ["Tea", "Coffee", "Cocoa"] {
        seed_category(&store, name, zed.id).await;
    }

    let uc = ListUseCase { repo: store };
    let categories = uc
        .execute::<CategorySortField>(&criteria(&[("sortBy", "name"), ("sortOrder", "asc")]))
        .await
        .unwrap();
    let names: Vec<_> = categories.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Cocoa", "Coffee", "Tea"]);

    let users = uc
        .execute::<UserSortField>(&criteria(&[("sortBy", "username"), ("sortOrder", "desc")]))
        .await
        .unwrap();
    let names: Vec<_> = users.items.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["zed", "amy"]);
}
