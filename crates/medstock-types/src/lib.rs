//! Core types for the medstock medical inventory tracker.
//!
//! This crate holds the data model shared by the store and the CLI: the
//! [`MedicineRecord`] batch record with its expiry and sale rules, the
//! request/receipt types of a multi-item sale, and the [`ParseError`]
//! raised for malformed dates and numbers.
//!
//! # Features
//!
//! - Lenient `YYYY-MM-DD` expiry parsing with calendar normalization
//! - Bounds-checked selling
//! - One-line comma-separated record encoding
//! - Optional `serde` support (enabled by default)
//!
//! # Example
//!
//! ```
//! use medstock_types::MedicineRecord;
//! use time::macros::datetime;
//!
//! let mut record = MedicineRecord::new("Paracetamol", "B1", "2099-01-01", 50, 2.5);
//! assert!(record.sell(10));
//! assert_eq!(record.quantity(), 40);
//! assert!(!record.is_expired(datetime!(2025-01-01 0:00)));
//! assert_eq!(record.to_line(), "Paracetamol,B1,2099-01-01,40,2.5,50");
//! ```

pub mod error;
pub mod expiry;
pub mod record;
pub mod sale;

pub use error::{ParseError, ParseResult};
pub use record::MedicineRecord;
pub use sale::{BillLine, Receipt, SaleOutcome, SaleRequest};
