//! The medicine batch record and its line encoding.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

use crate::error::{ParseError, ParseResult};
use crate::expiry::parse_expiry_date;

/// Number of comma-separated fields in an encoded record line.
pub const FIELD_COUNT: usize = 6;

/// A single stock lot of a medicine.
///
/// The batch number is the lookup key. Neither uniqueness of batch numbers
/// nor `quantity <= original_quantity` is enforced: the original quantity is
/// a snapshot taken at creation or restock, not a cap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MedicineRecord {
    name: String,
    batch_number: String,
    expiry_date: String,
    quantity: i64,
    price: f64,
    original_quantity: i64,
}

impl MedicineRecord {
    /// Create a record whose original quantity equals its starting quantity.
    pub fn new(
        name: impl Into<String>,
        batch_number: impl Into<String>,
        expiry_date: impl Into<String>,
        quantity: i64,
        price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            batch_number: batch_number.into(),
            expiry_date: expiry_date.into(),
            quantity,
            price,
            original_quantity: quantity,
        }
    }

    /// Override the original quantity snapshot.
    #[must_use]
    pub fn with_original_quantity(mut self, original_quantity: i64) -> Self {
        self.original_quantity = original_quantity;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn batch_number(&self) -> &str {
        &self.batch_number
    }

    /// The expiry date exactly as stored.
    pub fn expiry_date(&self) -> &str {
        &self.expiry_date
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Price per unit.
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn original_quantity(&self) -> i64 {
        self.original_quantity
    }

    /// Set the quantity without any validation.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
    }

    /// Replace the expiry text without any validation.
    pub fn set_expiry_date(&mut self, expiry_date: impl Into<String>) {
        self.expiry_date = expiry_date.into();
    }

    /// Parse the stored expiry text.
    pub fn parse_expiry(&self) -> ParseResult<Date> {
        parse_expiry_date(&self.expiry_date)
    }

    /// Whether the batch expired before `now`.
    ///
    /// The expiry date counts from midnight, so a batch expiring today is
    /// expired for any `now` after 00:00:00. An unparseable expiry date is
    /// never expired.
    pub fn is_expired(&self, now: PrimitiveDateTime) -> bool {
        match self.parse_expiry() {
            Ok(date) => date.midnight() < now,
            Err(_) => false,
        }
    }

    /// Whether the quantity is strictly below `threshold`.
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.quantity < threshold
    }

    /// Remove `quantity` units from stock.
    ///
    /// Returns `false` and leaves the record untouched when `quantity` is not
    /// positive or exceeds the available stock.
    pub fn sell(&mut self, quantity: i64) -> bool {
        if quantity <= 0 || quantity > self.quantity {
            return false;
        }
        self.quantity -= quantity;
        true
    }

    /// Add stock, optionally replacing the expiry date.
    ///
    /// The original quantity is reset to the new total, since it records the
    /// stock level as of the last restock. Returns `false` and leaves the
    /// record untouched if the new total would overflow.
    pub fn restock(&mut self, added: i64, expiry_date: Option<String>) -> bool {
        let Some(total) = self.quantity.checked_add(added) else {
            return false;
        };
        self.quantity = total;
        self.original_quantity = total;
        if let Some(expiry_date) = expiry_date {
            self.expiry_date = expiry_date;
        }
        true
    }

    /// Cost of `quantity` units at this record's price.
    pub fn cost_of(&self, quantity: i64) -> f64 {
        quantity as f64 * self.price
    }

    /// Encode as one `name,batch,expiry,quantity,price,original` line,
    /// without the trailing newline.
    ///
    /// Fields are written verbatim; a comma inside a field is not escaped.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.name,
            self.batch_number,
            self.expiry_date,
            self.quantity,
            self.price,
            self.original_quantity
        )
    }

    /// Decode a line written by [`to_line`](Self::to_line).
    ///
    /// Missing trailing fields read as empty. An empty quantity or price is
    /// zero, and an empty original quantity defaults to the quantity. A
    /// non-numeric value in any numeric field is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use medstock_types::MedicineRecord;
    ///
    /// let record = MedicineRecord::from_line("Paracetamol,B1,2099-01-01,40,2.5,50").unwrap();
    /// assert_eq!(record.quantity(), 40);
    /// assert_eq!(record.original_quantity(), 50);
    ///
    /// let short = MedicineRecord::from_line("Aspirin,B2,2099-01-01,12,1.25").unwrap();
    /// assert_eq!(short.original_quantity(), 12);
    ///
    /// assert!(MedicineRecord::from_line("Aspirin,B2,2099-01-01,lots,1.25").is_err());
    /// ```
    pub fn from_line(line: &str) -> ParseResult<Self> {
        let fields = RawFields::split(line);
        let quantity = parse_field::<i64>("quantity", fields.quantity)?;
        let price = parse_field::<f64>("price", fields.price)?;
        let original_quantity = parse_optional_field::<i64>("original quantity", fields.original)?;
        Ok(fields.into_record(quantity, price, original_quantity.unwrap_or(quantity)))
    }

    /// Decode a line, recovering from malformed numbers.
    ///
    /// If the quantity or price is malformed both are zeroed; a malformed
    /// original quantity falls back to the quantity. The first error is
    /// returned alongside the recovered record so callers can report it.
    pub fn from_line_lossy(line: &str) -> (Self, Option<ParseError>) {
        let fields = RawFields::split(line);
        let mut first_error = None;

        let numbers = parse_field::<i64>("quantity", fields.quantity)
            .and_then(|q| parse_field::<f64>("price", fields.price).map(|p| (q, p)));
        let (quantity, price) = match numbers {
            Ok(pair) => pair,
            Err(e) => {
                first_error = Some(e);
                (0, 0.0)
            }
        };

        let original = parse_optional_field::<i64>("original quantity", fields.original);
        let original_quantity = match original {
            Ok(value) => value.unwrap_or(quantity),
            Err(e) => {
                first_error.get_or_insert(e);
                quantity
            }
        };

        (
            fields.into_record(quantity, price, original_quantity),
            first_error,
        )
    }
}

impl fmt::Display for MedicineRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.batch_number)
    }
}

struct RawFields<'a> {
    name: &'a str,
    batch: &'a str,
    expiry: &'a str,
    quantity: &'a str,
    price: &'a str,
    original: &'a str,
}

impl<'a> RawFields<'a> {
    fn split(line: &'a str) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut parts = line.split(',');
        let mut next = || parts.next().unwrap_or("");
        Self {
            name: next(),
            batch: next(),
            expiry: next(),
            quantity: next(),
            price: next(),
            original: next(),
        }
    }

    fn into_record(self, quantity: i64, price: f64, original_quantity: i64) -> MedicineRecord {
        MedicineRecord {
            name: self.name.to_string(),
            batch_number: self.batch.to_string(),
            expiry_date: self.expiry.to_string(),
            quantity,
            price,
            original_quantity,
        }
    }
}

fn parse_field<T: std::str::FromStr + Default>(field: &'static str, raw: &str) -> ParseResult<T> {
    Ok(parse_optional_field(field, raw)?.unwrap_or_default())
}

fn parse_optional_field<T: std::str::FromStr>(
    field: &'static str,
    raw: &str,
) -> ParseResult<Option<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ParseError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}
