mod common;

use stockroom_store::InMemoryProductRepository;

#[tokio::test]
async fn test_duplicate_name_is_rejected() {
    common::duplicate_name_is_rejected(&InMemoryProductRepository::new()).await;
}

#[tokio::test]
async fn test_records_round_trip() {
    common::records_round_trip(&InMemoryProductRepository::new()).await;
}

#[tokio::test]
async fn test_missing_names_report_not_found() {
    common::missing_names_report_not_found(&InMemoryProductRepository::new()).await;
}

#[tokio::test]
async fn test_updates_touch_only_the_named_row() {
    common::updates_touch_only_the_named_row(&InMemoryProductRepository::new()).await;
}

#[tokio::test]
async fn test_delete_removes_extension_rows() {
    common::delete_removes_extension_rows(&InMemoryProductRepository::new()).await;
}

#[tokio::test]
async fn test_names_are_canonicalized() {
    common::names_are_canonicalized(&InMemoryProductRepository::new()).await;
}

#[tokio::test]
async fn test_read_all_is_ordered_by_name() {
    common::read_all_is_ordered_by_name(&InMemoryProductRepository::new()).await;
}

#[tokio::test]
async fn test_empty_catalog_lists_nothing() {
    use stockroom_core::ProductRepository;

    let repo = InMemoryProductRepository::new();
    assert!(repo.read_all().await.unwrap().is_empty());
}
