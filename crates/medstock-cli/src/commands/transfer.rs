//! CSV export and import commands.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use medstock_store::SaveMode;

use crate::style;
use crate::util::{Context, default_export_path};

pub fn cmd_export(ctx: &Context, output: Option<PathBuf>) -> Result<()> {
    let dispensary = ctx.open_dispensary(SaveMode::Immediate)?;
    let dest = output.unwrap_or_else(default_export_path);
    let count = dispensary
        .export_csv(&dest)
        .with_context(|| format!("Failed to export to {}", dest.display()))?;
    ctx.report(&style::format_success(
        &format!("Exported {} medicines to {}", count, dest.display()),
        ctx.no_color,
    ));
    Ok(())
}

pub fn cmd_import(ctx: &Context, input: &Path) -> Result<()> {
    let mut dispensary = ctx.open_dispensary(SaveMode::Immediate)?;
    let result = dispensary
        .import_csv(input)
        .with_context(|| format!("Failed to import {}", input.display()))?;
    ctx.report(&style::format_success(
        &format!(
            "Imported {} medicines. Previous inventory saved as {}",
            result.imported,
            result.backup_path.display()
        ),
        ctx.no_color,
    ));
    Ok(())
}
