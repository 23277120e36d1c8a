//! Buy command: sell several items and print the bill.

use anyhow::Result;
use medstock_store::SaveMode;
use medstock_types::SaleRequest;

use crate::cli::{OutputArgs, OutputFormat};
use crate::format::{format_receipt_json, format_receipt_text};
use crate::util::Context;

pub fn cmd_buy(ctx: &Context, items: &[SaleRequest], output: &OutputArgs) -> Result<()> {
    let mut dispensary = ctx.open_dispensary(SaveMode::Immediate)?;
    let receipt = dispensary.sell(items)?;

    let (format, opts) = ctx.output(output);
    match format {
        OutputFormat::Json => print!("{}", format_receipt_json(&receipt, &opts)?),
        OutputFormat::Text => print!("{}", format_receipt_text(&receipt, &opts)),
    }
    Ok(())
}
