//! Behaviour every `ProductRepository` implementation must share.

use rust_decimal::Decimal;
use stockroom_catalog::{validate_price, validate_stock, Product};
use stockroom_core::{CreateOutcome, ProductRepository, WriteOutcome};

async fn forget(repo: &dyn ProductRepository, names: &[&str]) {
    for name in names {
        repo.delete(name).await.expect("cleanup delete");
    }
}

async fn count_named(repo: &dyn ProductRepository, name: &str) -> usize {
    repo.read_all()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.name == name)
        .count()
}

pub async fn duplicate_name_is_rejected(repo: &dyn ProductRepository) {
    forget(repo, &["Milk"]).await;

    let milk = Product::perishable("Milk", "4.20", "12", "Chile", "2025-01-01").unwrap();
    assert_eq!(repo.create(&milk).await.unwrap(), CreateOutcome::Created);

    let again = Product::manufactured("milk", "9.99", "1", "Peru", "2020-06-01").unwrap();
    assert_eq!(repo.create(&again).await.unwrap(), CreateOutcome::DuplicateName);

    assert_eq!(count_named(repo, "Milk").await, 1);
    let stored = repo.read("Milk").await.unwrap().unwrap();
    assert_eq!(stored.price, Decimal::new(420, 2));
    assert_eq!(stored.kind_label(), "Perishable");
    assert_eq!(stored.manufacture_date, None);

    forget(repo, &["Milk"]).await;
}

pub async fn records_round_trip(repo: &dyn ProductRepository) {
    forget(repo, &["Yogurt", "Toaster", "Bolt"]).await;

    let products = [
        Product::perishable("yogurt", "1.25", "30", "france", "2025-03-15").unwrap(),
        Product::manufactured("Toaster", "49.90", "4", "germany", "2023-11-02").unwrap(),
        Product::plain("bolt", "0.05", "0", "taiwan").unwrap(),
    ];

    for product in &products {
        assert_eq!(repo.create(product).await.unwrap(), CreateOutcome::Created);

        let stored = repo.read(&product.name()).await.unwrap().expect("stored row");
        let expected = product.to_record();
        let actual = stored.to_record();
        for (key, value) in &expected {
            assert_eq!(&actual[key], value, "{} field {key}", product.name());
        }
        assert_eq!(stored.kind_label(), product.kind().label());
        assert_eq!(stored.into_product().unwrap().to_record(), expected);
    }

    forget(repo, &["Yogurt", "Toaster", "Bolt"]).await;
}

pub async fn missing_names_report_not_found(repo: &dyn ProductRepository) {
    forget(repo, &["Ghost"]).await;

    assert_eq!(repo.read("Ghost").await.unwrap(), None);
    assert_eq!(repo.delete("Ghost").await.unwrap(), WriteOutcome::NotFound);
    assert_eq!(
        repo.update_price("Ghost", validate_price("1.0").unwrap()).await.unwrap(),
        WriteOutcome::NotFound
    );
    assert_eq!(
        repo.update_stock("Ghost", validate_stock("3").unwrap()).await.unwrap(),
        WriteOutcome::NotFound
    );
    assert_eq!(count_named(repo, "Ghost").await, 0);
}

pub async fn updates_touch_only_the_named_row(repo: &dyn ProductRepository) {
    forget(repo, &["Milk", "Bread"]).await;

    let milk = Product::perishable("Milk", "4.20", "12", "Chile", "2025-01-01").unwrap();
    let bread = Product::perishable("Bread", "2.00", "8", "Chile", "2024-12-20").unwrap();
    repo.create(&milk).await.unwrap();
    repo.create(&bread).await.unwrap();

    let outcome = repo.update_price("Milk", validate_price("5.50").unwrap()).await.unwrap();
    assert!(outcome.is_applied());
    let outcome = repo.update_stock("milk", validate_stock("0").unwrap()).await.unwrap();
    assert!(outcome.is_applied());

    let stored = repo.read("Milk").await.unwrap().unwrap();
    assert_eq!(stored.price, Decimal::new(550, 2));
    assert_eq!(stored.stock, 0);
    assert_eq!(stored.expiration_date, milk.expiration_date());

    let untouched = repo.read("Bread").await.unwrap().unwrap();
    assert_eq!(untouched.price, Decimal::new(200, 2));
    assert_eq!(untouched.stock, 8);

    forget(repo, &["Milk", "Bread"]).await;
}

pub async fn delete_removes_extension_rows(repo: &dyn ProductRepository) {
    forget(repo, &["Milk"]).await;

    let milk = Product::perishable("Milk", "4.20", "12", "Chile", "2025-01-01").unwrap();
    repo.create(&milk).await.unwrap();

    assert_eq!(repo.delete("Milk").await.unwrap(), WriteOutcome::Applied);
    assert_eq!(repo.read("Milk").await.unwrap(), None);
    assert_eq!(repo.delete("Milk").await.unwrap(), WriteOutcome::NotFound);

    // A plain product under the same name must not pick up the old date.
    let plain = Product::plain("Milk", "3", "1", "Chile").unwrap();
    repo.create(&plain).await.unwrap();
    let stored = repo.read("Milk").await.unwrap().unwrap();
    assert_eq!(stored.expiration_date, None);
    assert_eq!(stored.kind_label(), "Plain");

    forget(repo, &["Milk"]).await;
}

pub async fn names_are_canonicalized(repo: &dyn ProductRepository) {
    forget(repo, &["Green Tea"]).await;

    let tea = Product::plain("  green   TEA ", "3.10", "5", "china").unwrap();
    repo.create(&tea).await.unwrap();

    let stored = repo.read("GREEN TEA").await.unwrap().expect("canonical lookup");
    assert_eq!(stored.name, "Green Tea");
    assert_eq!(stored.origin, "China");

    forget(repo, &["green tea"]).await;
    assert_eq!(repo.read("Green Tea").await.unwrap(), None);
}

pub async fn read_all_is_ordered_by_name(repo: &dyn ProductRepository) {
    forget(repo, &["Zucchini", "Apple"]).await;

    repo.create(&Product::plain("zucchini", "1", "1", "italy").unwrap()).await.unwrap();
    repo.create(&Product::plain("apple", "1", "1", "chile").unwrap()).await.unwrap();

    let names: Vec<String> = repo.read_all().await.unwrap().into_iter().map(|r| r.name).collect();
    assert!(names.contains(&"Apple".to_string()));
    assert!(names.contains(&"Zucchini".to_string()));
    assert!(names.windows(2).all(|pair| pair[0] <= pair[1]));

    forget(repo, &["Zucchini", "Apple"]).await;
}
