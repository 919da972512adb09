use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use rust_decimal::Decimal;
use stockroom_catalog::{
    format_money, validate_date, validate_price, validate_stock, Price, Product, ProductKind,
    ProductRecord, Stock, ValidationError,
};
use stockroom_core::{CreateOutcome, ProductRepository, RepositoryError, WriteOutcome};

const RULE: &str = "-------------------------------------------------------";

/// Which dated variant the add action builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewProduct {
    Manufactured,
    Perishable,
}

/// Text menu over any repository. Reads answers line by line from `input`;
/// end of input ends the session.
pub struct Menu<'a, R: ?Sized, I, O> {
    repo: &'a R,
    input: I,
    output: O,
}

impl<'a, R, I, O> Menu<'a, R, I, O>
where
    R: ProductRepository + ?Sized,
    I: BufRead,
    O: Write,
{
    pub fn new(repo: &'a R, input: I, output: O) -> Self {
        Self { repo, input, output }
    }

    pub fn into_output(self) -> O {
        self.output
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.show_menu()?;
            let Some(choice) = self.prompt("Select an option: ")? else {
                break;
            };
            match choice.as_str() {
                "1" => self.add_product(NewProduct::Manufactured).await?,
                "2" => self.add_product(NewProduct::Perishable).await?,
                "3" => self.look_up().await?,
                "4" => self.update_price().await?,
                "5" => self.update_stock().await?,
                "6" => self.delete().await?,
                "7" => self.list_all().await?,
                "8" => {
                    writeln!(self.output, "Exiting...")?;
                    break;
                }
                _ => writeln!(self.output, "Invalid option")?,
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn show_menu(&mut self) -> std::io::Result<()> {
        writeln!(self.output, " =============== Product Catalog =============== ")?;
        writeln!(self.output, " 1. Add manufactured product")?;
        writeln!(self.output, " 2. Add perishable product")?;
        writeln!(self.output, " 3. Look up product")?;
        writeln!(self.output, " 4. Update product price")?;
        writeln!(self.output, " 5. Update product stock")?;
        writeln!(self.output, " 6. Delete product")?;
        writeln!(self.output, " 7. List all products")?;
        writeln!(self.output, " 8. Exit")?;
        writeln!(self.output, " ===============================================")
    }

    // ========================================================================
    // Input helpers
    // ========================================================================

    /// One trimmed line, or `None` at end of input.
    fn prompt(&mut self, label: &str) -> std::io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Re-prompts until `parse` accepts the answer.
    fn prompt_until<T, E: Display>(
        &mut self,
        label: &str,
        parse: impl Fn(&str) -> Result<T, E>,
    ) -> std::io::Result<Option<T>> {
        loop {
            let Some(answer) = self.prompt(label)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "Error: {e}")?,
            }
        }
    }

    fn report_failure(&mut self, e: RepositoryError) -> std::io::Result<()> {
        writeln!(self.output, "Could not complete the operation: {e}")
    }

    /// Shows the named product, or says it is missing.
    async fn fetch_and_show(&mut self, name: &str) -> anyhow::Result<Option<ProductRecord>> {
        match self.repo.read(name).await {
            Ok(Some(record)) => {
                writeln!(self.output, "\nProduct information:\n{}", record.render())?;
                Ok(Some(record))
            }
            Ok(None) => {
                writeln!(self.output, "Product {name} not found")?;
                Ok(None)
            }
            Err(e) => {
                self.report_failure(e)?;
                Ok(None)
            }
        }
    }

    // ========================================================================
    // Actions
    // ========================================================================

    async fn add_product(&mut self, variant: NewProduct) -> anyhow::Result<()> {
        let Some(name) = self.prompt_until("Product name: ", |s| non_empty("name", s))? else {
            return Ok(());
        };
        let Some(price) = self.prompt_until("Price: ", validate_price)? else {
            return Ok(());
        };
        let Some(stock) = self.prompt_until("Stock: ", validate_stock)? else {
            return Ok(());
        };
        let Some(origin) = self.prompt_until("Country of origin: ", |s| non_empty("origin", s))?
        else {
            return Ok(());
        };
        let kind = match variant {
            NewProduct::Manufactured => {
                let Some(manufacture_date) =
                    self.prompt_until("Manufacture date (YYYY-MM-DD): ", validate_date)?
                else {
                    return Ok(());
                };
                ProductKind::Manufactured { manufacture_date }
            }
            NewProduct::Perishable => {
                let Some(expiration_date) =
                    self.prompt_until("Expiration date (YYYY-MM-DD): ", validate_date)?
                else {
                    return Ok(());
                };
                ProductKind::Perishable { expiration_date }
            }
        };

        let product = match Product::from_parts(&name, price, stock, &origin, kind) {
            Ok(product) => product,
            Err(e) => {
                writeln!(self.output, "Error: {e}")?;
                return Ok(());
            }
        };

        match self.repo.create(&product).await {
            Ok(CreateOutcome::Created) => {
                writeln!(self.output, "Product {} created", product.name())?
            }
            Ok(CreateOutcome::DuplicateName) => {
                writeln!(self.output, "Error: product {} already exists", product.name())?
            }
            Err(e) => self.report_failure(e)?,
        }
        Ok(())
    }

    async fn look_up(&mut self) -> anyhow::Result<()> {
        let Some(name) = self.prompt("Product name: ")? else {
            return Ok(());
        };
        self.fetch_and_show(&name).await?;
        Ok(())
    }

    async fn update_price(&mut self) -> anyhow::Result<()> {
        let Some(name) = self.prompt("Name of the product to update: ")? else {
            return Ok(());
        };
        let Some(record) = self.fetch_and_show(&name).await? else {
            return Ok(());
        };
        let current = record.price;
        writeln!(self.output, "\nCurrent price of {}: ${}", record.name, format_money(current))?;

        let Some(mode) = self.prompt("Set a new price (1) or change it by percentage (2)? ")? else {
            return Ok(());
        };
        let new_price = match mode.as_str() {
            "1" => match self.prompt_until("New price: ", validate_price)? {
                Some(price) => price,
                None => return Ok(()),
            },
            "2" => {
                let Some(percent) = self.prompt_until(
                    "Percentage change (positive to raise, negative to lower): ",
                    parse_number::<Decimal>,
                )?
                else {
                    return Ok(());
                };
                match apply_percentage(current, percent) {
                    Ok(price) => price,
                    Err(e) => {
                        writeln!(self.output, "Error: {e}")?;
                        return Ok(());
                    }
                }
            }
            _ => {
                writeln!(self.output, "Invalid option")?;
                return Ok(());
            }
        };

        match self.repo.update_price(&record.name, new_price).await {
            Ok(WriteOutcome::Applied) => {
                let difference = new_price.value() - current;
                if difference > Decimal::ZERO {
                    writeln!(
                        self.output,
                        "The price of {} increased by ${}.",
                        record.name,
                        format_money(difference)
                    )?;
                } else if difference < Decimal::ZERO {
                    writeln!(
                        self.output,
                        "The price of {} decreased by ${}.",
                        record.name,
                        format_money(-difference)
                    )?;
                } else {
                    writeln!(self.output, "The price of {} did not change.", record.name)?;
                }
            }
            Ok(WriteOutcome::NotFound) => {
                writeln!(self.output, "Could not update the price of {}", record.name)?
            }
            Err(e) => self.report_failure(e)?,
        }
        Ok(())
    }

    async fn update_stock(&mut self) -> anyhow::Result<()> {
        let Some(name) = self.prompt("Name of the product to update: ")? else {
            return Ok(());
        };
        let Some(record) = self.fetch_and_show(&name).await? else {
            return Ok(());
        };
        let current = record.stock;
        writeln!(self.output, "\nCurrent stock of {}: {}", record.name, current)?;

        let Some(mode) = self.prompt("Set a new value (1) or adjust by a quantity (2)? ")? else {
            return Ok(());
        };
        let new_stock = match mode.as_str() {
            "1" => match self.prompt_until("New stock: ", validate_stock)? {
                Some(stock) => stock,
                None => return Ok(()),
            },
            "2" => {
                let Some(delta) = self.prompt_until(
                    "Quantity to add (positive) or remove (negative): ",
                    parse_number::<i64>,
                )?
                else {
                    return Ok(());
                };
                match adjust_stock(current, delta) {
                    Ok(stock) => stock,
                    Err(e) => {
                        writeln!(self.output, "Error: {e}")?;
                        return Ok(());
                    }
                }
            }
            _ => {
                writeln!(self.output, "Invalid option")?;
                return Ok(());
            }
        };

        match self.repo.update_stock(&record.name, new_stock).await {
            Ok(WriteOutcome::Applied) => {
                let difference = i64::from(new_stock.value()) - i64::from(current);
                if difference > 0 {
                    writeln!(
                        self.output,
                        "The stock of {} increased by {} units.",
                        record.name, difference
                    )?;
                } else if difference < 0 {
                    writeln!(
                        self.output,
                        "The stock of {} decreased by {} units.",
                        record.name, -difference
                    )?;
                } else {
                    writeln!(self.output, "The stock of {} did not change.", record.name)?;
                }
            }
            Ok(WriteOutcome::NotFound) => {
                writeln!(self.output, "Could not update the stock of {}", record.name)?
            }
            Err(e) => self.report_failure(e)?,
        }
        Ok(())
    }

    async fn delete(&mut self) -> anyhow::Result<()> {
        let Some(name) = self.prompt("Name of the product to delete: ")? else {
            return Ok(());
        };
        let Some(record) = self.fetch_and_show(&name).await? else {
            return Ok(());
        };

        let question = format!("\nDelete product '{}'? (y/n): ", record.name);
        let Some(answer) = self.prompt(&question)? else {
            return Ok(());
        };
        if !matches!(answer.to_lowercase().as_str(), "y" | "yes") {
            writeln!(self.output, "Deletion cancelled.")?;
            return Ok(());
        }

        match self.repo.delete(&record.name).await {
            Ok(WriteOutcome::Applied) => {
                writeln!(self.output, "Product '{}' deleted.", record.name)?
            }
            Ok(WriteOutcome::NotFound) => {
                writeln!(self.output, "Could not delete product '{}'.", record.name)?
            }
            Err(e) => self.report_failure(e)?,
        }
        Ok(())
    }

    async fn list_all(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "\n=========== All products ================")?;
        match self.repo.read_all().await {
            Ok(records) if records.is_empty() => {
                writeln!(self.output, "No products found.")?
            }
            Ok(records) => {
                for record in records {
                    writeln!(self.output, "{}\n{RULE}", record.render())?;
                }
            }
            Err(e) => self.report_failure(e)?,
        }
        Ok(())
    }
}

fn non_empty(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(raw.trim().to_string())
}

fn parse_number<T: FromStr>(raw: &str) -> Result<T, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", raw.trim()))
}

/// `current * (1 + percent / 100)`, rounded to cents.
fn apply_percentage(current: Decimal, percent: Decimal) -> Result<Price, ValidationError> {
    let adjusted = percent
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|fraction| Decimal::ONE.checked_add(fraction))
        .and_then(|factor| current.checked_mul(factor))
        .ok_or_else(|| ValidationError::InvalidPrice {
            input: format!("{current} changed by {percent}%"),
            reason: "out of range",
        })?;
    Price::new(adjusted.round_dp(2))
}

/// `current + delta`, which must still be a valid stock.
fn adjust_stock(current: i32, delta: i64) -> Result<Stock, ValidationError> {
    let adjusted = i64::from(current)
        .checked_add(delta)
        .ok_or_else(|| ValidationError::InvalidStock {
            input: format!("{current} adjusted by {delta}"),
            reason: "out of range",
        })?;
    Stock::new(adjusted)
}
