use std::fmt;

use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use crate::validation::{
    require_non_empty, title_case, validate_date, validate_price, validate_stock, Price, Stock,
    ValidationError, DATE_FORMAT,
};

/// Record key of the perishable variant's date.
pub const EXPIRATION_DATE: &str = "expiration_date";
/// Record key of the manufactured variant's date.
pub const MANUFACTURE_DATE: &str = "manufacture_date";

/// Product variants. Each dated variant owns exactly one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    Plain,
    Perishable { expiration_date: NaiveDate },
    Manufactured { manufacture_date: NaiveDate },
}

impl ProductKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProductKind::Plain => "Plain",
            ProductKind::Perishable { .. } => "Perishable",
            ProductKind::Manufactured { .. } => "Manufactured",
        }
    }

    /// The variant's date together with its record key.
    pub fn date_field(&self) -> Option<(&'static str, NaiveDate)> {
        match *self {
            ProductKind::Plain => None,
            ProductKind::Perishable { expiration_date } => Some((EXPIRATION_DATE, expiration_date)),
            ProductKind::Manufactured { manufacture_date } => {
                Some((MANUFACTURE_DATE, manufacture_date))
            }
        }
    }
}

/// A catalog entry, validated on construction and on every mutation.
///
/// Name and origin are kept as entered (trimmed) and exposed title-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    name: String,
    price: Price,
    stock: Stock,
    origin: String,
    kind: ProductKind,
}

impl Product {
    pub fn plain(
        name: &str,
        price: &str,
        stock: &str,
        origin: &str,
    ) -> Result<Self, ValidationError> {
        let price = validate_price(price)?;
        let stock = validate_stock(stock)?;
        Self::from_parts(name, price, stock, origin, ProductKind::Plain)
    }

    pub fn perishable(
        name: &str,
        price: &str,
        stock: &str,
        origin: &str,
        expiration_date: &str,
    ) -> Result<Self, ValidationError> {
        let price = validate_price(price)?;
        let stock = validate_stock(stock)?;
        let expiration_date = validate_date(expiration_date)?;
        Self::from_parts(name, price, stock, origin, ProductKind::Perishable { expiration_date })
    }

    pub fn manufactured(
        name: &str,
        price: &str,
        stock: &str,
        origin: &str,
        manufacture_date: &str,
    ) -> Result<Self, ValidationError> {
        let price = validate_price(price)?;
        let stock = validate_stock(stock)?;
        let manufacture_date = validate_date(manufacture_date)?;
        Self::from_parts(name, price, stock, origin, ProductKind::Manufactured { manufacture_date })
    }

    /// Build from already-validated values.
    pub fn from_parts(
        name: &str,
        price: Price,
        stock: Stock,
        origin: &str,
        kind: ProductKind,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_non_empty("name", name)?,
            price,
            stock,
            origin: require_non_empty("origin", origin)?,
            kind,
        })
    }

    pub fn name(&self) -> String {
        title_case(&self.name)
    }

    pub fn origin(&self) -> String {
        title_case(&self.origin)
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn stock(&self) -> Stock {
        self.stock
    }

    pub fn kind(&self) -> &ProductKind {
        &self.kind
    }

    pub fn expiration_date(&self) -> Option<NaiveDate> {
        match self.kind {
            ProductKind::Perishable { expiration_date } => Some(expiration_date),
            _ => None,
        }
    }

    pub fn manufacture_date(&self) -> Option<NaiveDate> {
        match self.kind {
            ProductKind::Manufactured { manufacture_date } => Some(manufacture_date),
            _ => None,
        }
    }

    pub fn set_price(&mut self, raw: &str) -> Result<(), ValidationError> {
        self.price = validate_price(raw)?;
        Ok(())
    }

    pub fn set_stock(&mut self, raw: &str) -> Result<(), ValidationError> {
        self.stock = validate_stock(raw)?;
        Ok(())
    }

    /// Replace the variant's date.
    pub fn set_date(&mut self, raw: &str) -> Result<(), ValidationError> {
        match &mut self.kind {
            ProductKind::Plain => Err(ValidationError::NoDateField),
            ProductKind::Perishable { expiration_date } => {
                *expiration_date = validate_date(raw)?;
                Ok(())
            }
            ProductKind::Manufactured { manufacture_date } => {
                *manufacture_date = validate_date(raw)?;
                Ok(())
            }
        }
    }

    /// Flat key/value view of every field, dates as `YYYY-MM-DD`.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("name".into(), json!(self.name()));
        record.insert("price".into(), json!(self.price.value().normalize().to_string()));
        record.insert("stock".into(), json!(self.stock.value()));
        record.insert("origin".into(), json!(self.origin()));
        if let Some((key, date)) = self.kind.date_field() {
            record.insert(key.into(), json!(date.format(DATE_FORMAT).to_string()));
        }
        record
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        match self.kind {
            ProductKind::Plain => Ok(()),
            ProductKind::Perishable { expiration_date } => {
                write!(f, " - Expiration date: {}", expiration_date.format(DATE_FORMAT))
            }
            ProductKind::Manufactured { manufacture_date } => {
                write!(f, " - Manufacture date: {}", manufacture_date.format(DATE_FORMAT))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_perishable_construction() {
        let milk = Product::perishable("milk", "5.50", "10", "chile", "2025-01-01").unwrap();

        assert_eq!(milk.name(), "Milk");
        assert_eq!(milk.origin(), "Chile");
        assert_eq!(milk.price().value(), Decimal::new(550, 2));
        assert_eq!(milk.stock().value(), 10);
        assert_eq!(milk.kind().label(), "Perishable");
        assert_eq!(milk.expiration_date(), NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(milk.manufacture_date(), None);
    }

    #[test]
    fn test_construction_rejects_bad_fields() {
        assert!(matches!(
            Product::plain("Bolt", "0", "1", "Peru"),
            Err(ValidationError::InvalidPrice { .. })
        ));
        assert!(matches!(
            Product::plain("Bolt", "1", "-1", "Peru"),
            Err(ValidationError::InvalidStock { .. })
        ));
        assert!(matches!(
            Product::plain("  ", "1", "1", "Peru"),
            Err(ValidationError::EmptyField("name"))
        ));
        assert!(matches!(
            Product::plain("Bolt", "1", "1", ""),
            Err(ValidationError::EmptyField("origin"))
        ));
        assert!(matches!(
            Product::manufactured("Radio", "20", "3", "Japan", "2024/05/01"),
            Err(ValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_mutation_revalidates() {
        let mut radio = Product::manufactured("radio", "20", "3", "japan", "2024-05-01").unwrap();

        radio.set_price("25.75").unwrap();
        assert_eq!(radio.price().value(), Decimal::new(2575, 2));
        assert!(radio.set_price("-1").is_err());
        assert_eq!(radio.price().value(), Decimal::new(2575, 2));

        radio.set_stock("0").unwrap();
        assert_eq!(radio.stock().value(), 0);
        assert!(radio.set_stock("1.5").is_err());
        assert_eq!(radio.stock().value(), 0);

        radio.set_date("2023-12-31").unwrap();
        assert_eq!(radio.manufacture_date(), NaiveDate::from_ymd_opt(2023, 12, 31));
        assert!(radio.set_date("31-12-2023").is_err());

        let mut bolt = Product::plain("bolt", "1", "1", "peru").unwrap();
        assert_eq!(bolt.set_date("2023-12-31"), Err(ValidationError::NoDateField));
    }

    #[test]
    fn test_to_record_shape() {
        let milk = Product::perishable("milk", "5.50", "10", "chile", "2025-01-01").unwrap();
        let record = milk.to_record();

        assert_eq!(record.len(), 5);
        assert_eq!(record["name"], "Milk");
        assert_eq!(record["price"], "5.5");
        assert_eq!(record["stock"], 10);
        assert_eq!(record["origin"], "Chile");
        assert_eq!(record[EXPIRATION_DATE], "2025-01-01");
        assert!(!record.contains_key(MANUFACTURE_DATE));

        let radio = Product::manufactured("radio", "20", "3", "japan", "2024-05-01").unwrap();
        let record = radio.to_record();
        assert_eq!(record[MANUFACTURE_DATE], "2024-05-01");
        assert!(!record.contains_key(EXPIRATION_DATE));

        let bolt = Product::plain("bolt", "1", "1", "peru").unwrap();
        assert_eq!(bolt.to_record().len(), 4);
    }

    #[test]
    fn test_display() {
        let milk = Product::perishable("milk", "5.50", "10", "chile", "2025-01-01").unwrap();
        assert_eq!(milk.to_string(), "Milk - Expiration date: 2025-01-01");

        let radio = Product::manufactured("radio", "20", "3", "japan", "2024-05-01").unwrap();
        assert_eq!(radio.to_string(), "Radio - Manufacture date: 2024-05-01");

        let bolt = Product::plain("bolt", "1", "1", "peru").unwrap();
        assert_eq!(bolt.to_string(), "Bolt");
    }
}
