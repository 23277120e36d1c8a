//! Visual styling utilities for the CLI.
//!
//! Consistent highlighting for stock levels, expiry state, status messages
//! and tables across every command.

use owo_colors::OwoColorize;
use time::PrimitiveDateTime;

use medstock_store::LOW_STOCK_THRESHOLD;
use medstock_types::MedicineRecord;

use crate::cli::StyleMode;

// ============================================================================
// Colored Value Formatting
// ============================================================================

/// Format a stock quantity, red when below the low-stock threshold.
pub fn format_quantity_colored(quantity: i64, no_color: bool) -> String {
    if no_color {
        return quantity.to_string();
    }

    if quantity <= 0 {
        format!("{}", quantity.red().bold())
    } else if quantity < LOW_STOCK_THRESHOLD {
        format!("{}", quantity.yellow())
    } else {
        format!("{}", quantity.green())
    }
}

/// Format an expiry date, red once expired and dimmed when unparseable.
pub fn format_expiry_colored(
    record: &MedicineRecord,
    now: PrimitiveDateTime,
    no_color: bool,
) -> String {
    let date = record.expiry_date();
    if no_color {
        return date.to_string();
    }

    if record.parse_expiry().is_err() {
        format!("{}", date.dimmed())
    } else if record.is_expired(now) {
        format!("{}", date.red())
    } else {
        date.to_string()
    }
}

/// Format a money amount with two decimals.
pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}

// ============================================================================
// Status Messages
// ============================================================================

/// Format a success message.
pub fn format_success(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[OK] {}", message)
    } else {
        format!("{} {}", "[OK]".green(), message)
    }
}

/// Format an info message.
pub fn format_info(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[--] {}", message)
    } else {
        format!("{} {}", "[--]".cyan(), message)
    }
}

/// Format a warning message.
pub fn format_warning(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[!!] {}", message)
    } else {
        format!("{} {}", "[!!]".yellow(), message)
    }
}

// ============================================================================
// Section Headers
// ============================================================================

/// Format a title header.
pub fn format_title(title: &str, no_color: bool) -> String {
    if no_color {
        format!("{}\n{}", title, "━".repeat(title.chars().count()))
    } else {
        format!(
            "{}\n{}",
            title.bold(),
            "━".repeat(title.chars().count()).dimmed()
        )
    }
}

/// Apply table style based on StyleMode.
pub fn apply_table_style(table: &mut tabled::Table, style: StyleMode) {
    use tabled::settings::Style;
    match style {
        StyleMode::Rich => {
            table.with(Style::rounded());
        }
        StyleMode::Minimal => {
            table.with(Style::psql());
        }
        StyleMode::Plain => {
            table.with(Style::blank());
        }
    }
}
