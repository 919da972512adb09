pub mod product;
pub mod record;
pub mod validation;

pub use product::{Product, ProductKind, EXPIRATION_DATE, MANUFACTURE_DATE};
pub use record::ProductRecord;
pub use validation::{
    format_money, title_case, validate_date, validate_price, validate_stock, Price, Stock,
    ValidationError, DATE_FORMAT,
};
