//! Purchase requests and the receipt produced by a multi-item sale.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// One item of a purchase: a batch number and the units wanted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaleRequest {
    pub batch: String,
    pub quantity: i64,
}

impl SaleRequest {
    pub fn new(batch: impl Into<String>, quantity: i64) -> Self {
        Self {
            batch: batch.into(),
            quantity,
        }
    }
}

impl FromStr for SaleRequest {
    type Err = ParseError;

    /// Parse `BATCH:QUANTITY`.
    ///
    /// The split happens at the last colon, so batch numbers may themselves
    /// contain colons.
    ///
    /// ```
    /// use medstock_types::SaleRequest;
    ///
    /// let request: SaleRequest = "B1:10".parse().unwrap();
    /// assert_eq!(request, SaleRequest::new("B1", 10));
    /// assert!("B1".parse::<SaleRequest>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidSaleRequest(s.to_string());
        let (batch, quantity) = s.rsplit_once(':').ok_or_else(invalid)?;
        let batch = batch.trim();
        if batch.is_empty() {
            return Err(invalid());
        }
        let quantity = quantity.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(batch, quantity))
    }
}

impl fmt::Display for SaleRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.batch, self.quantity)
    }
}

/// One itemized entry of a bill.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BillLine {
    /// Medicine name.
    pub name: String,
    /// Batch the units were taken from.
    pub batch: String,
    /// Units sold.
    pub quantity: i64,
    /// `quantity * price` at the time of sale.
    pub cost: f64,
}

/// What happened to a single [`SaleRequest`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "outcome", rename_all = "snake_case"))]
pub enum SaleOutcome {
    /// The units were sold and billed.
    Sold(BillLine),
    /// No record carries the requested batch number.
    NotFound { batch: String },
    /// The quantity was not positive or exceeded the stock on hand.
    InsufficientStock {
        batch: String,
        requested: i64,
        available: i64,
    },
}

impl SaleOutcome {
    pub fn is_sold(&self) -> bool {
        matches!(self, SaleOutcome::Sold(_))
    }
}

/// Result of a best-effort multi-item sale.
///
/// `outcomes` has one entry per request, in request order. Failed items do
/// not roll back earlier successes, and `total` only counts billed lines.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Receipt {
    pub lines: Vec<BillLine>,
    pub total: f64,
    pub outcomes: Vec<SaleOutcome>,
}

impl Receipt {
    /// Record a successful line and add its cost to the total.
    pub fn push_sold(&mut self, line: BillLine) {
        self.total += line.cost;
        self.lines.push(line.clone());
        self.outcomes.push(SaleOutcome::Sold(line));
    }

    /// Record a failed request.
    pub fn push_failure(&mut self, outcome: SaleOutcome) {
        debug_assert!(!outcome.is_sold());
        self.outcomes.push(outcome);
    }

    /// Whether nothing was billed.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of requests that failed.
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_sold()).count()
    }
}
