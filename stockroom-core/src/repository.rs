use async_trait::async_trait;
use stockroom_catalog::{Price, Product, ProductRecord, Stock};

use crate::RepositoryResult;

/// Result of inserting a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// A product with the same name already exists; nothing was written.
    DuplicateName,
}

/// Result of an update or delete addressed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Exactly one base row was affected.
    Applied,
    NotFound,
}

impl WriteOutcome {
    pub fn is_applied(self) -> bool {
        self == WriteOutcome::Applied
    }
}

/// Repository trait for product catalog access.
///
/// Names passed in are canonicalized (title-cased) before lookup, the same
/// way `Product::name` exposes them.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> RepositoryResult<CreateOutcome>;

    async fn read(&self, name: &str) -> RepositoryResult<Option<ProductRecord>>;

    /// Every product ordered by name.
    async fn read_all(&self) -> RepositoryResult<Vec<ProductRecord>>;

    async fn update_price(&self, name: &str, price: Price) -> RepositoryResult<WriteOutcome>;

    async fn update_stock(&self, name: &str, stock: Stock) -> RepositoryResult<WriteOutcome>;

    /// Removes the base row and any extension rows for `name`.
    async fn delete(&self, name: &str) -> RepositoryResult<WriteOutcome>;
}
