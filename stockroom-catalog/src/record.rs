use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::product::{Product, ProductKind, EXPIRATION_DATE, MANUFACTURE_DATE};
use crate::validation::{format_money, Price, Stock, ValidationError, DATE_FORMAT};

/// One row of the base table joined with both extension tables.
///
/// Either date may be absent; a plain product has neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub origin: String,
    pub expiration_date: Option<NaiveDate>,
    pub manufacture_date: Option<NaiveDate>,
}

impl ProductRecord {
    /// The row a repository stores for `product`.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name(),
            price: product.price().value(),
            stock: product.stock().value(),
            origin: product.origin(),
            expiration_date: product.expiration_date(),
            manufacture_date: product.manufacture_date(),
        }
    }

    /// Variant implied by the joined date columns. Expiration wins if a row
    /// somehow carries both.
    pub fn kind(&self) -> ProductKind {
        match (self.expiration_date, self.manufacture_date) {
            (Some(expiration_date), _) => ProductKind::Perishable { expiration_date },
            (None, Some(manufacture_date)) => ProductKind::Manufactured { manufacture_date },
            (None, None) => ProductKind::Plain,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        self.kind().label()
    }

    pub fn to_record(&self) -> Map<String, Value> {
        let date = |d: Option<NaiveDate>| match d {
            Some(d) => json!(d.format(DATE_FORMAT).to_string()),
            None => Value::Null,
        };

        let mut record = Map::new();
        record.insert("name".into(), json!(self.name));
        record.insert("price".into(), json!(self.price.normalize().to_string()));
        record.insert("stock".into(), json!(self.stock));
        record.insert("origin".into(), json!(self.origin));
        record.insert(EXPIRATION_DATE.into(), date(self.expiration_date));
        record.insert(MANUFACTURE_DATE.into(), date(self.manufacture_date));
        record
    }

    /// Rebuild a validated entity from the stored row.
    pub fn into_product(self) -> Result<Product, ValidationError> {
        let kind = self.kind();
        Product::from_parts(
            &self.name,
            Price::new(self.price)?,
            Stock::new(i64::from(self.stock))?,
            &self.origin,
            kind,
        )
    }

    /// Human-readable block used by the menu.
    pub fn render(&self) -> String {
        let mut out = format!(
            "Name: {}\nPrice: ${}\nStock: {}\nOrigin: {}\n",
            self.name,
            format_money(self.price),
            self.stock,
            self.origin
        );
        match self.kind() {
            ProductKind::Perishable { expiration_date } => {
                let date = expiration_date.format(DATE_FORMAT);
                out.push_str(&format!("Expiration date: {date}\n"));
            }
            ProductKind::Manufactured { manufacture_date } => {
                let date = manufacture_date.format(DATE_FORMAT);
                out.push_str(&format!("Manufacture date: {date}\n"));
            }
            ProductKind::Plain => {}
        }
        out.push_str(&format!("Type: {}", self.kind_label()));
        out
    }
}
