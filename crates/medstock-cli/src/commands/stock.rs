//! Add, update and restock commands.

use anyhow::Result;
use medstock_store::SaveMode;
use medstock_types::MedicineRecord;

use crate::style;
use crate::util::Context;

pub fn cmd_add(
    ctx: &Context,
    name: String,
    batch: String,
    expiry: String,
    quantity: i64,
    price: f64,
) -> Result<()> {
    let mut dispensary = ctx.open_dispensary(SaveMode::Immediate)?;
    let record = MedicineRecord::new(name, batch, expiry, quantity, price);
    if record.parse_expiry().is_err() {
        eprintln!(
            "{}",
            style::format_warning(
                &format!(
                    "Expiry date '{}' is not YYYY-MM-DD; this batch will never count as expired.",
                    record.expiry_date()
                ),
                ctx.no_color
            )
        );
    }
    dispensary.add(record)?;
    ctx.report(&style::format_success("Medicine added successfully!", ctx.no_color));
    Ok(())
}

pub fn cmd_update(ctx: &Context, batch: &str, quantity: i64, expiry: &str) -> Result<()> {
    let mut dispensary = ctx.open_dispensary(SaveMode::Immediate)?;
    let record = dispensary.update(batch, quantity, expiry)?;
    ctx.report(&style::format_success(
        &format!("Medicine updated successfully! {} now has {} units.", record, record.quantity()),
        ctx.no_color,
    ));
    Ok(())
}

pub fn cmd_restock(
    ctx: &Context,
    batch: &str,
    quantity: i64,
    expiry: Option<String>,
) -> Result<()> {
    let mut dispensary = ctx.open_dispensary(SaveMode::Immediate)?;
    let record = dispensary.restock(batch, quantity, expiry)?;
    ctx.report(&style::format_success(
        &format!(
            "Restocked {}: {} units, expires {}.",
            record,
            record.quantity(),
            record.expiry_date()
        ),
        ctx.no_color,
    ));
    Ok(())
}
