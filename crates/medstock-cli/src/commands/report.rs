//! Inventory listing and reports.

use anyhow::{Context as _, Result, bail};
use medstock_store::{InventoryStore, LOW_STOCK_THRESHOLD, SaveMode};
use medstock_types::MedicineRecord;
use time::PrimitiveDateTime;

use crate::cli::{OutputArgs, OutputFormat};
use crate::format::{
    FormatOptions, format_record_detail_text, format_record_json, format_records_json,
    format_records_text,
};
use crate::style;
use crate::util::{Context, local_now};

/// Read-only views over the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    /// Every record in file order
    Inventory,
    /// Records below the low-stock threshold
    LowStock,
    /// Records past their expiry date
    Expired,
}

impl Report {
    fn title(self) -> &'static str {
        match self {
            Report::Inventory => "Inventory List",
            Report::LowStock => "Low Stock Report",
            Report::Expired => "Expired Medicines Report",
        }
    }

    fn empty_message(self) -> String {
        match self {
            Report::Inventory => "No medicines in inventory.".to_string(),
            Report::LowStock => format!("No medicines below {} units.", LOW_STOCK_THRESHOLD),
            Report::Expired => "No expired medicines.".to_string(),
        }
    }

    /// Records selected by this report, in inventory order.
    pub fn select(self, store: &InventoryStore, now: PrimitiveDateTime) -> Vec<&MedicineRecord> {
        match self {
            Report::Inventory => store.records().iter().collect(),
            Report::LowStock => store.low_stock(),
            Report::Expired => store.expired(now),
        }
    }

    /// Render this report in the requested format.
    pub fn render(
        self,
        store: &InventoryStore,
        now: PrimitiveDateTime,
        format: OutputFormat,
        opts: &FormatOptions,
    ) -> Result<String> {
        let records = self.select(store, now);
        match format {
            OutputFormat::Json => format_records_json(&records, now, opts),
            OutputFormat::Text => Ok(format_records_text(
                &records,
                self.title(),
                &self.empty_message(),
                now,
                opts,
            )),
        }
    }
}

fn open_store(ctx: &Context) -> Result<InventoryStore> {
    let path = ctx.inventory_path();
    InventoryStore::open(&path)
        .with_context(|| format!("Failed to open inventory: {}", path.display()))
}

pub fn cmd_report(ctx: &Context, report: Report, output: &OutputArgs) -> Result<()> {
    let store = open_store(ctx)?;
    let (format, opts) = ctx.output(output);
    print!("{}", report.render(&store, local_now(), format, &opts)?);
    Ok(())
}

pub fn cmd_show(ctx: &Context, batch: &str, output: &OutputArgs) -> Result<()> {
    let store = open_store(ctx)?;
    let Some(record) = store.find_by_batch(batch) else {
        bail!("Medicine not found: no batch '{}'", batch);
    };

    let (format, opts) = ctx.output(output);
    let now = local_now();
    let rendered = match format {
        OutputFormat::Json => format_record_json(record, now, &opts)?,
        OutputFormat::Text => format_record_detail_text(record, now, &opts),
    };
    print!("{}", rendered);
    Ok(())
}

pub fn cmd_remove_expired(ctx: &Context, output: &OutputArgs) -> Result<()> {
    let mut dispensary = ctx.open_dispensary(SaveMode::Immediate)?;
    let now = local_now();
    let removed = dispensary.remove_expired(now)?;

    let (format, opts) = ctx.output(output);
    match format {
        OutputFormat::Json => {
            let refs: Vec<_> = removed.iter().collect();
            print!("{}", format_records_json(&refs, now, &opts)?);
        }
        OutputFormat::Text => ctx.report(&removal_summary(&removed, ctx.no_color)),
    }
    Ok(())
}

/// Human summary of an expired-stock sweep.
pub fn removal_summary(removed: &[MedicineRecord], no_color: bool) -> String {
    if removed.is_empty() {
        return style::format_info("No expired medicines to remove.", no_color);
    }
    let mut lines = vec![style::format_success(
        &format!("Expired medicines removed: {}", removed.len()),
        no_color,
    )];
    lines.extend(removed.iter().map(|r| format!("  - {} expired {}", r, r.expiry_date())));
    lines.join("\n")
}
