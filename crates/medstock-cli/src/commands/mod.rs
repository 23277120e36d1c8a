//! Command implementations for the CLI.

mod buy;
mod configure;
mod history;
mod menu;
mod report;
mod stock;
mod transfer;

pub use buy::cmd_buy;
pub use configure::cmd_config;
pub use history::cmd_history;
pub use menu::cmd_menu;
pub use report::{Report, cmd_remove_expired, cmd_report, cmd_show};
pub use stock::{cmd_add, cmd_restock, cmd_update};
pub use transfer::{cmd_export, cmd_import};
