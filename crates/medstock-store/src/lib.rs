//! File-backed persistence for the medstock inventory.
//!
//! The inventory lives in a plain text file with one comma-separated record
//! per line. Every change can also be recorded in an append-only history
//! file with local timestamps.
//!
//! # Features
//!
//! - Load and save the inventory file, recovering from malformed numbers
//! - Look up, update, restock and sell by batch number
//! - Low-stock and expiry reports
//! - Timestamped action history
//! - CSV export and validated CSV import with automatic backup
//!
//! # Example
//!
//! ```no_run
//! use medstock_store::{Dispensary, HistoryLog, SaveMode};
//! use medstock_types::SaleRequest;
//!
//! let mut dispensary = Dispensary::open(medstock_store::default_inventory_path())?
//!     .with_history(HistoryLog::new(medstock_store::default_history_path()))
//!     .with_save_mode(SaveMode::Immediate);
//!
//! let receipt = dispensary.sell(&[SaleRequest::new("B1", 2)])?;
//! println!("total: {:.2}", receipt.total);
//! # Ok::<(), medstock_store::Error>(())
//! ```

mod dispensary;
mod error;
mod history;
mod store;
pub mod transfer;

pub use dispensary::{Dispensary, ImportResult, SaveMode, backup_stamp};
pub use error::{Error, Result};
pub use history::{HistoryEntry, HistoryLog, format_entry, local_now};
pub use store::{InventoryStore, LOW_STOCK_THRESHOLD, LoadReport};

/// Directory holding the default data files.
///
/// - Linux: `~/.local/share/medstock`
/// - macOS: `~/Library/Application Support/medstock`
/// - Windows: `C:\Users\<user>\AppData\Local\medstock`
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("medstock")
}

/// Default inventory file path following platform conventions.
pub fn default_inventory_path() -> std::path::PathBuf {
    default_data_dir().join("inventory.txt")
}

/// Default history file path following platform conventions.
pub fn default_history_path() -> std::path::PathBuf {
    default_data_dir().join("history.txt")
}
