//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use medstock_store::SaveMode;
use medstock_types::SaleRequest;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Visual styling mode for output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StyleMode {
    /// Standard styling with colors
    Minimal,
    /// Rich styling with tables and headers (default)
    #[default]
    Rich,
    /// Plain text with no decorations (for scripting)
    Plain,
}

/// When the interactive menu writes the inventory file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SaveModeArg {
    /// Save after every change
    Immediate,
    /// Save only when leaving the menu with "Save and exit"
    OnExit,
}

impl From<SaveModeArg> for SaveMode {
    fn from(arg: SaveModeArg) -> Self {
        match arg {
            SaveModeArg::Immediate => SaveMode::Immediate,
            SaveModeArg::OnExit => SaveMode::OnExit,
        }
    }
}

/// Locations of the data files
#[derive(Debug, Clone, Default, Args)]
pub struct DataArgs {
    /// Inventory file (overrides config)
    #[arg(long, global = true, env = "MEDSTOCK_INVENTORY")]
    pub inventory: Option<PathBuf>,

    /// History file (overrides config)
    #[arg(long, global = true, env = "MEDSTOCK_HISTORY")]
    pub history_file: Option<PathBuf>,

    /// Do not record actions in the history file
    #[arg(long, global = true)]
    pub no_history: bool,

    /// Configuration file to use instead of the default
    #[arg(long, global = true, env = "MEDSTOCK_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Reusable output format arguments
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Output format (defaults to the configured format, then text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output compact JSON (no pretty-printing)
    #[arg(long)]
    pub compact: bool,
}

#[derive(Parser)]
#[command(name = "medstock")]
#[command(author, version, long_about = None)]
#[command(about = "Track medicine stock, expiry dates and sales")]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Visual styling mode (minimal, rich, plain)
    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "rich",
        env = "MEDSTOCK_STYLE"
    )]
    pub style: StyleMode,

    #[command(flatten)]
    pub data: DataArgs,

    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive menu
    Menu {
        /// When to write the inventory file (overrides config)
        #[arg(long, value_enum)]
        save_mode: Option<SaveModeArg>,
    },

    /// Add a new medicine batch
    Add {
        /// Medicine name
        name: String,

        /// Batch number
        batch: String,

        /// Expiry date (YYYY-MM-DD)
        expiry: String,

        /// Units in stock
        #[arg(allow_negative_numbers = true)]
        quantity: i64,

        /// Price per unit
        #[arg(allow_negative_numbers = true)]
        price: f64,
    },

    /// Overwrite quantity and expiry date of a batch
    Update {
        /// Batch number
        batch: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,

        /// New expiry date (YYYY-MM-DD)
        expiry: String,
    },

    /// Add stock to an existing batch
    Restock {
        /// Batch number
        batch: String,

        /// Units to add
        #[arg(allow_negative_numbers = true)]
        quantity: i64,

        /// Replace the expiry date (YYYY-MM-DD)
        #[arg(short, long)]
        expiry: Option<String>,
    },

    /// Remove every expired batch
    RemoveExpired {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Batches with fewer than 10 units
    LowStock {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Batches past their expiry date
    Expired {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the whole inventory
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show a single batch
    Show {
        /// Batch number
        batch: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Sell one or more items and print the bill
    Buy {
        /// Items to sell as BATCH:QTY
        #[arg(required = true, value_name = "BATCH:QTY")]
        items: Vec<SaleRequest>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the action history
    History {
        /// Copy the history file here instead of printing it
        #[arg(short, long)]
        export: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Export the inventory as CSV
    Export {
        /// Destination file (default: inventory_backup_<timestamp>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the inventory with a CSV export
    Import {
        /// CSV file to import
        input: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// Inventory file path
    InventoryFile,
    /// History file path
    HistoryFile,
    /// Record actions in the history file
    History,
    /// When the interactive menu saves (immediate, on-exit)
    SaveMode,
    /// Disable colored output
    NoColor,
    /// Default output format (text, json)
    Format,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        value: String,
    },

    /// Unset (remove) a configuration value
    Unset {
        /// Configuration key to remove
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}

/// Parse boolean argument with flexible input
pub fn parse_bool_arg(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "enable" | "enabled" => Ok(true),
        "false" | "no" | "off" | "0" | "disable" | "disabled" => Ok(false),
        _ => Err(format!(
            "Invalid boolean value '{}'. Use: true/false, yes/no, on/off, 1/0",
            s
        )),
    }
}
