//! History command: show or copy the action history.

use std::path::Path;

use anyhow::{Result, bail};

use crate::cli::{OutputArgs, OutputFormat};
use crate::format::{format_history_json, format_history_text};
use crate::style;
use crate::util::Context;

pub fn cmd_history(ctx: &Context, export: Option<&Path>, output: &OutputArgs) -> Result<()> {
    let Some(history) = ctx.history_log() else {
        bail!("History is disabled (--no-history or 'history = false' in config)");
    };

    if let Some(dest) = export {
        let bytes = history.export_to(dest)?;
        ctx.report(&style::format_success(
            &format!("History copied to {} ({} bytes)", dest.display(), bytes),
            ctx.no_color,
        ));
        return Ok(());
    }

    let (format, opts) = ctx.output(output);
    let entries = history.entries()?;
    match (format, entries) {
        (OutputFormat::Json, entries) => {
            print!("{}", format_history_json(&entries.unwrap_or_default(), &opts)?);
        }
        (OutputFormat::Text, Some(entries)) => print!("{}", format_history_text(&entries, &opts)),
        (OutputFormat::Text, None) => println!("No history found."),
    }
    Ok(())
}
