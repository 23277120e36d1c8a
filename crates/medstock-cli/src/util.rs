//! Utility functions for CLI operations.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use medstock_store::{Dispensary, HistoryLog, SaveMode};
use time::PrimitiveDateTime;

use crate::cli::{DataArgs, OutputArgs, OutputFormat, StyleMode};
use crate::config::{Config, resolve_format, resolve_history_path, resolve_inventory_path};
use crate::format::FormatOptions;

/// Everything a command needs from the global flags and the config file.
#[derive(Debug, Clone)]
pub struct Context {
    pub data: DataArgs,
    pub config: Config,
    pub config_path: PathBuf,
    pub no_color: bool,
    pub style: StyleMode,
    pub quiet: bool,
}

impl Context {
    pub fn new(data: DataArgs, no_color: bool, style: StyleMode, quiet: bool) -> Self {
        let config_path = Config::path(&data);
        let config = Config::load(&config_path);
        let no_color = no_color || config.no_color || style == StyleMode::Plain;
        Self {
            data,
            config,
            config_path,
            no_color,
            style,
            quiet,
        }
    }

    /// Text formatting options for commands without an output flag.
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions::new(self.no_color, self.style)
    }

    /// Resolve the output format and formatting options for a command.
    pub fn output(&self, output: &OutputArgs) -> (OutputFormat, FormatOptions) {
        let format = resolve_format(output.format, &self.config);
        let opts = self.format_options().with_compact(output.compact);
        (format, opts)
    }

    pub fn inventory_path(&self) -> PathBuf {
        resolve_inventory_path(&self.data, &self.config)
    }

    /// History log, unless disabled by flag or config.
    pub fn history_log(&self) -> Option<HistoryLog> {
        resolve_history_path(&self.data, &self.config).map(HistoryLog::new)
    }

    /// Open the inventory with history attached.
    pub fn open_dispensary(&self, save_mode: SaveMode) -> Result<Dispensary> {
        let path = self.inventory_path();
        let dispensary = Dispensary::open(&path)
            .with_context(|| format!("Failed to open inventory: {}", path.display()))?
            .with_save_mode(save_mode);
        Ok(match self.history_log() {
            Some(history) => dispensary.with_history(history),
            None => dispensary,
        })
    }

    /// Print a status line unless in quiet mode.
    pub fn report(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }
}

/// Current local wall-clock time, used as "now" for expiry checks.
pub fn local_now() -> PrimitiveDateTime {
    let now = medstock_store::local_now();
    PrimitiveDateTime::new(now.date(), now.time())
}

/// Default file name for a CSV export: `inventory_backup_<YYYYmmdd_HHMMSS>.csv`.
pub fn default_export_path() -> PathBuf {
    let stamp = medstock_store::backup_stamp(medstock_store::local_now());
    PathBuf::from(format!("inventory_backup_{}.csv", stamp))
}

/// Fail with a helpful message unless stdin and stdout are a terminal.
pub fn require_terminal() -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        bail!(
            "The interactive menu needs a terminal.\n\
             Use a subcommand instead, e.g. 'medstock list' or 'medstock buy B1:2'.\n\
             See 'medstock --help'."
        );
    }
    Ok(())
}
