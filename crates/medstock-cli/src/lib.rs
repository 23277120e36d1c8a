//! Command-line interface for the medstock medical inventory tracker.
//!
//! Keeps a list of medicine batches in a plain text file, sells from them,
//! reports on low and expired stock, and records every change in a
//! timestamped history file.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `menu` | Interactive menu (default when no command is given) |
//! | `add` | Add a new medicine batch |
//! | `update` | Overwrite quantity and expiry of a batch |
//! | `restock` | Add stock to a batch |
//! | `remove-expired` | Remove every expired batch |
//! | `low-stock` | Batches with fewer than 10 units |
//! | `expired` | Batches past their expiry date |
//! | `list` | The whole inventory |
//! | `show` | A single batch |
//! | `buy` | Sell items and print the bill |
//! | `history` | Show or copy the action history |
//! | `export` / `import` | CSV backup and restore |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Configuration
//!
//! The CLI stores configuration in `~/.config/medstock/config.toml` (or platform
//! equivalent). Options:
//!
//! - `inventory_file`, `history_file`: data file locations
//! - `history`: record actions (default `true`)
//! - `save_mode`: `immediate` or `on-exit` for the interactive menu
//! - `no_color`: disable colored output
//! - `format`: default output format (`text` or `json`)
//!
//! # Environment Variables
//!
//! - `MEDSTOCK_INVENTORY`, `MEDSTOCK_HISTORY`: data file locations
//! - `MEDSTOCK_CONFIG`: configuration file location
//! - `MEDSTOCK_STYLE`: output style (`rich`, `minimal`, `plain`)
//! - `NO_COLOR`: disable colored output when set
//!
//! # Examples
//!
//! ```bash
//! medstock add Paracetamol B1 2099-01-01 50 2.5
//! medstock buy B1:10 B2:3
//! medstock low-stock --format json
//! medstock export -o backup.csv
//! ```

// This crate is primarily a binary CLI application.
// The command implementations live in main.rs and its modules.

// Re-export core dependencies for convenience
pub use medstock_store;
pub use medstock_types;
