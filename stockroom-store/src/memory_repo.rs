use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use stockroom_catalog::{title_case, Price, Product, ProductKind, ProductRecord, Stock};
use stockroom_core::{CreateOutcome, ProductRepository, RepositoryResult, WriteOutcome};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

struct BaseRow {
    price: Decimal,
    stock: i32,
    origin: String,
}

/// Same three-table layout as the PostgreSQL schema.
#[derive(Default)]
struct Tables {
    products: BTreeMap<String, BaseRow>,
    perishable_extension: BTreeMap<String, NaiveDate>,
    manufactured_extension: BTreeMap<String, NaiveDate>,
}

impl Tables {
    fn joined(&self, name: &str, base: &BaseRow) -> ProductRecord {
        ProductRecord {
            name: name.to_string(),
            price: base.price,
            stock: base.stock,
            origin: base.origin.clone(),
            expiration_date: self.perishable_extension.get(name).copied(),
            manufacture_date: self.manufactured_extension.get(name).copied(),
        }
    }
}

/// Process-local catalog with the same outcome semantics as
/// [`PgProductRepository`](crate::PgProductRepository). Contents vanish with
/// the value.
#[derive(Default)]
pub struct InMemoryProductRepository {
    tables: Mutex<Tables>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: &Product) -> RepositoryResult<CreateOutcome> {
        let name = product.name();
        let mut tables = self.tables.lock().await;

        if tables.products.contains_key(&name) {
            warn!(product = %name, "product already exists, nothing written");
            return Ok(CreateOutcome::DuplicateName);
        }

        tables.products.insert(
            name.clone(),
            BaseRow {
                price: product.price().value(),
                stock: product.stock().value(),
                origin: product.origin(),
            },
        );
        match *product.kind() {
            ProductKind::Plain => {}
            ProductKind::Perishable { expiration_date } => {
                tables.perishable_extension.insert(name.clone(), expiration_date);
            }
            ProductKind::Manufactured { manufacture_date } => {
                tables.manufactured_extension.insert(name.clone(), manufacture_date);
            }
        }

        info!(product = %name, kind = product.kind().label(), "product created");
        Ok(CreateOutcome::Created)
    }

    async fn read(&self, name: &str) -> RepositoryResult<Option<ProductRecord>> {
        let name = title_case(name);
        let tables = self.tables.lock().await;
        let record = tables
            .products
            .get(&name)
            .map(|base| tables.joined(&name, base));
        if record.is_none() {
            debug!(product = %name, "product not found");
        }
        Ok(record)
    }

    async fn read_all(&self) -> RepositoryResult<Vec<ProductRecord>> {
        let tables = self.tables.lock().await;
        let records: Vec<_> = tables
            .products
            .iter()
            .map(|(name, base)| tables.joined(name, base))
            .collect();
        debug!(count = records.len(), "listed products");
        Ok(records)
    }

    async fn update_price(&self, name: &str, price: Price) -> RepositoryResult<WriteOutcome> {
        let name = title_case(name);
        let mut tables = self.tables.lock().await;
        match tables.products.get_mut(&name) {
            Some(base) => {
                base.price = price.value();
                info!(product = %name, %price, "price updated");
                Ok(WriteOutcome::Applied)
            }
            None => {
                warn!(product = %name, "price not updated, no such product");
                Ok(WriteOutcome::NotFound)
            }
        }
    }

    async fn update_stock(&self, name: &str, stock: Stock) -> RepositoryResult<WriteOutcome> {
        let name = title_case(name);
        let mut tables = self.tables.lock().await;
        match tables.products.get_mut(&name) {
            Some(base) => {
                base.stock = stock.value();
                info!(product = %name, %stock, "stock updated");
                Ok(WriteOutcome::Applied)
            }
            None => {
                warn!(product = %name, "stock not updated, no such product");
                Ok(WriteOutcome::NotFound)
            }
        }
    }

    async fn delete(&self, name: &str) -> RepositoryResult<WriteOutcome> {
        let name = title_case(name);
        let mut tables = self.tables.lock().await;
        if tables.products.remove(&name).is_none() {
            warn!(product = %name, "nothing deleted, no such product");
            return Ok(WriteOutcome::NotFound);
        }
        tables.manufactured_extension.remove(&name);
        tables.perishable_extension.remove(&name);

        info!(product = %name, "product deleted");
        Ok(WriteOutcome::Applied)
    }
}
