//! Output formatting utilities for text and JSON output.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use time::PrimitiveDateTime;

use medstock_store::{HistoryEntry, LOW_STOCK_THRESHOLD};
use medstock_types::{MedicineRecord, Receipt, SaleOutcome};

use crate::cli::StyleMode;
use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
    /// Visual styling mode.
    pub style: StyleMode,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            no_color: false,
            compact: false,
            style: StyleMode::Rich,
        }
    }
}

impl FormatOptions {
    pub fn new(no_color: bool, style: StyleMode) -> Self {
        // Plain mode automatically disables colors for pipe-friendliness
        let effective_no_color = no_color || style == StyleMode::Plain;
        Self {
            no_color: effective_no_color,
            compact: false,
            style,
        }
    }

    /// Check if rich styling is enabled.
    pub fn is_rich(&self) -> bool {
        self.style == StyleMode::Rich
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }

    fn title(&self, title: &str) -> String {
        if self.is_rich() {
            format!("{}\n\n", style::format_title(title, self.no_color))
        } else {
            format!("=== {} ===\n", title)
        }
    }
}

// ============================================================================
// Inventory formatting
// ============================================================================

#[derive(Serialize)]
struct RecordJson<'a> {
    #[serde(flatten)]
    record: &'a MedicineRecord,
    expired: bool,
    low_stock: bool,
}

impl<'a> RecordJson<'a> {
    fn new(record: &'a MedicineRecord, now: PrimitiveDateTime) -> Self {
        Self {
            record,
            expired: record.is_expired(now),
            low_stock: record.is_low_stock(LOW_STOCK_THRESHOLD),
        }
    }
}

/// Render records as a table under `title`; `empty` is shown when there are none.
#[must_use]
pub fn format_records_text(
    records: &[&MedicineRecord],
    title: &str,
    empty: &str,
    now: PrimitiveDateTime,
    opts: &FormatOptions,
) -> String {
    use tabled::builder::Builder;

    let mut output = opts.title(title);
    if records.is_empty() {
        output.push_str(empty);
        output.push('\n');
        return output;
    }

    let mut builder = Builder::default();
    builder.push_record(["Name", "Batch", "Expiry", "Quantity", "Price"]);
    for record in records {
        let name = if opts.no_color {
            record.name().to_string()
        } else {
            format!("{}", record.name().cyan())
        };
        builder.push_record([
            name,
            record.batch_number().to_string(),
            style::format_expiry_colored(record, now, opts.no_color),
            style::format_quantity_colored(record.quantity(), opts.no_color),
            style::format_money(record.price()),
        ]);
    }

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.style);
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

pub fn format_records_json(
    records: &[&MedicineRecord],
    now: PrimitiveDateTime,
    opts: &FormatOptions,
) -> Result<String> {
    let rows: Vec<RecordJson<'_>> = records.iter().map(|r| RecordJson::new(r, now)).collect();
    opts.as_json(&rows)
}

/// Property table for a single batch.
#[must_use]
pub fn format_record_detail_text(
    record: &MedicineRecord,
    now: PrimitiveDateTime,
    opts: &FormatOptions,
) -> String {
    use tabled::builder::Builder;

    let status = if record.parse_expiry().is_err() {
        "unreadable expiry date"
    } else if record.is_expired(now) {
        "expired"
    } else if record.is_low_stock(LOW_STOCK_THRESHOLD) {
        "low stock"
    } else {
        "ok"
    };

    let mut builder = Builder::default();
    builder.push_record(["Property", "Value"]);
    builder.push_record(["Name", record.name()]);
    builder.push_record(["Batch", record.batch_number()]);
    builder.push_record([
        "Expiry".to_string(),
        style::format_expiry_colored(record, now, opts.no_color),
    ]);
    builder.push_record([
        "Quantity".to_string(),
        style::format_quantity_colored(record.quantity(), opts.no_color),
    ]);
    builder.push_record(["Original quantity".to_string(), record.original_quantity().to_string()]);
    builder.push_record(["Price".to_string(), style::format_money(record.price())]);
    builder.push_record(["Status", status]);

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.style);
    format!("{}{}\n", opts.title("Medicine Details"), table)
}

pub fn format_record_json(
    record: &MedicineRecord,
    now: PrimitiveDateTime,
    opts: &FormatOptions,
) -> Result<String> {
    opts.as_json(&RecordJson::new(record, now))
}

// ============================================================================
// Receipt formatting
// ============================================================================

/// One line per failed request, in request order.
#[must_use]
pub fn format_sale_failures(receipt: &Receipt, opts: &FormatOptions) -> String {
    let mut output = String::new();
    for outcome in &receipt.outcomes {
        let message = match outcome {
            SaleOutcome::Sold(_) => continue,
            SaleOutcome::NotFound { batch } => format!("{}: Medicine not found.", batch),
            SaleOutcome::InsufficientStock {
                batch,
                requested,
                available,
            } => format!(
                "{}: Not enough stock available (requested {}, available {}).",
                batch, requested, available
            ),
        };
        output.push_str(&style::format_warning(&message, opts.no_color));
        output.push('\n');
    }
    output
}

#[must_use]
pub fn format_receipt_text(receipt: &Receipt, opts: &FormatOptions) -> String {
    use tabled::builder::Builder;

    let mut output = format_sale_failures(receipt, opts);
    if receipt.is_empty() {
        output.push_str("No items purchased.\n");
        return output;
    }

    if !output.is_empty() {
        output.push('\n');
    }
    output.push_str(&opts.title("Final Bill"));

    let mut builder = Builder::default();
    builder.push_record(["Medicine", "Batch", "Qty", "Cost"]);
    for line in &receipt.lines {
        builder.push_record([
            line.name.clone(),
            line.batch.clone(),
            line.quantity.to_string(),
            style::format_money(line.cost),
        ]);
    }
    builder.push_record([
        "TOTAL".to_string(),
        String::new(),
        String::new(),
        style::format_money(receipt.total),
    ]);

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.style);
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

pub fn format_receipt_json(receipt: &Receipt, opts: &FormatOptions) -> Result<String> {
    opts.as_json(receipt)
}

// ============================================================================
// History formatting
// ============================================================================

#[must_use]
pub fn format_history_text(entries: &[HistoryEntry], opts: &FormatOptions) -> String {
    use tabled::builder::Builder;

    let mut output = opts.title("Action History");
    let mut builder = Builder::default();
    builder.push_record(["Time", "Action"]);
    for entry in entries {
        let time = entry.timestamp.clone().unwrap_or_else(|| "-".to_string());
        let time = if opts.no_color {
            time
        } else {
            format!("{}", time.dimmed())
        };
        builder.push_record([time, entry.message.clone()]);
    }

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.style);
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

pub fn format_history_json(entries: &[HistoryEntry], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&entries)
}
