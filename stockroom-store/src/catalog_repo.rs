use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::PgConnection;
use sqlx::Connection;
use stockroom_catalog::{title_case, Price, Product, ProductKind, ProductRecord, Stock};
use stockroom_core::{
    CreateOutcome, ProductRepository, RepositoryError, RepositoryResult, WriteOutcome,
};
use tracing::{debug, error, info, warn};

use crate::app_config::DatabaseConfig;
use crate::database::Database;

const SELECT_ONE: &str = r#"
    SELECT p.name, p.price, p.stock, p.origin, pe.expiration_date, me.manufacture_date
    FROM products p
    LEFT JOIN perishable_extension pe ON p.name = pe.name
    LEFT JOIN manufactured_extension me ON p.name = me.name
    WHERE p.name = $1
"#;

const SELECT_ALL: &str = r#"
    SELECT p.name, p.price, p.stock, p.origin, pe.expiration_date, me.manufacture_date
    FROM products p
    LEFT JOIN perishable_extension pe ON p.name = pe.name
    LEFT JOIN manufactured_extension me ON p.name = me.name
    ORDER BY p.name COLLATE "C"
"#;

/// PostgreSQL-backed catalog. Each operation opens a connection, runs, and
/// closes it again before returning.
pub struct PgProductRepository {
    db: Database,
}

impl PgProductRepository {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            db: Database::new(config),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn acquire(&self, op: &'static str) -> RepositoryResult<PgConnection> {
        self.db.connect().await.map_err(|e| {
            error!(op, error = %e, "failed to connect to product store");
            RepositoryError::Connection(e.to_string())
        })
    }
}

fn storage_fault(op: &'static str, e: sqlx::Error) -> RepositoryError {
    error!(op, error = %e, "product store operation failed");
    RepositoryError::Storage(e.to_string())
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct ProductRow {
    name: String,
    price: Decimal,
    stock: i32,
    origin: String,
    expiration_date: Option<NaiveDate>,
    manufacture_date: Option<NaiveDate>,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        ProductRecord {
            name: row.name,
            price: row.price,
            stock: row.stock,
            origin: row.origin,
            expiration_date: row.expiration_date,
            manufacture_date: row.manufacture_date,
        }
    }
}

async fn insert_product(
    conn: &mut PgConnection,
    product: &Product,
) -> Result<CreateOutcome, sqlx::Error> {
    let name = product.name();
    let mut tx = conn.begin().await?;

    let existing: Option<String> = sqlx::query_scalar("SELECT name FROM products WHERE name = $1")
        .bind(&name)
        .fetch_optional(&mut *tx)
        .await?;
    if existing.is_some() {
        return Ok(CreateOutcome::DuplicateName);
    }

    sqlx::query("INSERT INTO products (name, price, stock, origin) VALUES ($1, $2, $3, $4)")
        .bind(&name)
        .bind(product.price().value())
        .bind(product.stock().value())
        .bind(product.origin())
        .execute(&mut *tx)
        .await?;

    match *product.kind() {
        ProductKind::Plain => {}
        ProductKind::Perishable { expiration_date } => {
            sqlx::query("INSERT INTO perishable_extension (name, expiration_date) VALUES ($1, $2)")
                .bind(&name)
                .bind(expiration_date)
                .execute(&mut *tx)
                .await?;
        }
        ProductKind::Manufactured { manufacture_date } => {
            sqlx::query(
                "INSERT INTO manufactured_extension (name, manufacture_date) VALUES ($1, $2)",
            )
            .bind(&name)
            .bind(manufacture_date)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(CreateOutcome::Created)
}

async fn delete_product(conn: &mut PgConnection, name: &str) -> Result<WriteOutcome, sqlx::Error> {
    let mut tx = conn.begin().await?;

    let existing: Option<String> = sqlx::query_scalar("SELECT name FROM products WHERE name = $1")
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?;
    if existing.is_none() {
        return Ok(WriteOutcome::NotFound);
    }

    sqlx::query("DELETE FROM manufactured_extension WHERE name = $1")
        .bind(name)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM perishable_extension WHERE name = $1")
        .bind(name)
        .execute(&mut *tx)
        .await?;
    let deleted = sqlx::query("DELETE FROM products WHERE name = $1")
        .bind(name)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted != 1 {
        tx.rollback().await?;
        return Ok(WriteOutcome::NotFound);
    }
    tx.commit().await?;
    Ok(WriteOutcome::Applied)
}

fn single_row(rows_affected: u64) -> WriteOutcome {
    if rows_affected == 1 {
        WriteOutcome::Applied
    } else {
        WriteOutcome::NotFound
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: &Product) -> RepositoryResult<CreateOutcome> {
        let mut conn = self.acquire("create").await?;
        let result = insert_product(&mut conn, product).await;
        self.db.release(conn).await;

        let outcome = result.map_err(|e| storage_fault("create", e))?;
        match outcome {
            CreateOutcome::Created => {
                info!(product = %product.name(), kind = product.kind().label(), "product created")
            }
            CreateOutcome::DuplicateName => {
                warn!(product = %product.name(), "product already exists, nothing written")
            }
        }
        Ok(outcome)
    }

    async fn read(&self, name: &str) -> RepositoryResult<Option<ProductRecord>> {
        let name = title_case(name);
        let mut conn = self.acquire("read").await?;
        let result = sqlx::query_as::<_, ProductRow>(SELECT_ONE)
            .bind(&name)
            .fetch_optional(&mut conn)
            .await;
        self.db.release(conn).await;

        let row = result.map_err(|e| storage_fault("read", e))?;
        if row.is_none() {
            debug!(product = %name, "product not found");
        }
        Ok(row.map(ProductRecord::from))
    }

    async fn read_all(&self) -> RepositoryResult<Vec<ProductRecord>> {
        let mut conn = self.acquire("read_all").await?;
        let result = sqlx::query_as::<_, ProductRow>(SELECT_ALL)
            .fetch_all(&mut conn)
            .await;
        self.db.release(conn).await;

        let rows = result.map_err(|e| storage_fault("read_all", e))?;
        debug!(count = rows.len(), "listed products");
        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    async fn update_price(&self, name: &str, price: Price) -> RepositoryResult<WriteOutcome> {
        let name = title_case(name);
        let mut conn = self.acquire("update_price").await?;
        let result = sqlx::query("UPDATE products SET price = $1 WHERE name = $2")
            .bind(price.value())
            .bind(&name)
            .execute(&mut conn)
            .await;
        self.db.release(conn).await;

        let updated = result.map_err(|e| storage_fault("update_price", e))?;
        let outcome = single_row(updated.rows_affected());
        match outcome {
            WriteOutcome::Applied => info!(product = %name, %price, "price updated"),
            WriteOutcome::NotFound => warn!(product = %name, "price not updated, no such product"),
        }
        Ok(outcome)
    }

    async fn update_stock(&self, name: &str, stock: Stock) -> RepositoryResult<WriteOutcome> {
        let name = title_case(name);
        let mut conn = self.acquire("update_stock").await?;
        let result = sqlx::query("UPDATE products SET stock = $1 WHERE name = $2")
            .bind(stock.value())
            .bind(&name)
            .execute(&mut conn)
            .await;
        self.db.release(conn).await;

        let updated = result.map_err(|e| storage_fault("update_stock", e))?;
        let outcome = single_row(updated.rows_affected());
        match outcome {
            WriteOutcome::Applied => info!(product = %name, %stock, "stock updated"),
            WriteOutcome::NotFound => warn!(product = %name, "stock not updated, no such product"),
        }
        Ok(outcome)
    }

    async fn delete(&self, name: &str) -> RepositoryResult<WriteOutcome> {
        let name = title_case(name);
        let mut conn = self.acquire("delete").await?;
        let result = delete_product(&mut conn, &name).await;
        self.db.release(conn).await;

        let outcome = result.map_err(|e| storage_fault("delete", e))?;
        match outcome {
            WriteOutcome::Applied => info!(product = %name, "product deleted"),
            WriteOutcome::NotFound => warn!(product = %name, "nothing deleted, no such product"),
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_row_outcome() {
        assert_eq!(single_row(1), WriteOutcome::Applied);
        assert_eq!(single_row(0), WriteOutcome::NotFound);
        assert_eq!(single_row(2), WriteOutcome::NotFound);
    }

    #[test]
    fn test_row_maps_to_record() {
        let row = ProductRow {
            name: "Radio".into(),
            price: Decimal::new(2000, 2),
            stock: 3,
            origin: "Japan".into(),
            expiration_date: None,
            manufacture_date: NaiveDate::from_ymd_opt(2024, 5, 1),
        };
        let record = ProductRecord::from(row);
        assert_eq!(record.kind_label(), "Manufactured");
        assert_eq!(record.price, Decimal::new(20, 0));
    }
}
