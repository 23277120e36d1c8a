use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod format;
mod style;
mod util;

use cli::{Cli, Commands};
use commands::Report;
use util::Context;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "medstock", &mut io::stdout());
        return Ok(());
    }

    // Logs go to stderr so stdout stays machine-readable
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let ctx = Context::new(cli.data, cli.no_color, cli.style, cli.quiet);
    tracing::debug!("Using inventory {}", ctx.inventory_path().display());

    match cli.command {
        None => commands::cmd_menu(&ctx, ctx.config.save_mode),
        Some(Commands::Menu { save_mode }) => {
            let mode = save_mode.map(Into::into).unwrap_or(ctx.config.save_mode);
            commands::cmd_menu(&ctx, mode)
        }
        Some(Commands::Add {
            name,
            batch,
            expiry,
            quantity,
            price,
        }) => commands::cmd_add(&ctx, name, batch, expiry, quantity, price),
        Some(Commands::Update {
            batch,
            quantity,
            expiry,
        }) => commands::cmd_update(&ctx, &batch, quantity, &expiry),
        Some(Commands::Restock {
            batch,
            quantity,
            expiry,
        }) => commands::cmd_restock(&ctx, &batch, quantity, expiry),
        Some(Commands::RemoveExpired { output }) => commands::cmd_remove_expired(&ctx, &output),
        Some(Commands::LowStock { output }) => {
            commands::cmd_report(&ctx, Report::LowStock, &output)
        }
        Some(Commands::Expired { output }) => commands::cmd_report(&ctx, Report::Expired, &output),
        Some(Commands::List { output }) => commands::cmd_report(&ctx, Report::Inventory, &output),
        Some(Commands::Show { batch, output }) => commands::cmd_show(&ctx, &batch, &output),
        Some(Commands::Buy { items, output }) => commands::cmd_buy(&ctx, &items, &output),
        Some(Commands::History { export, output }) => {
            commands::cmd_history(&ctx, export.as_deref(), &output)
        }
        Some(Commands::Export { output }) => commands::cmd_export(&ctx, output),
        Some(Commands::Import { input }) => commands::cmd_import(&ctx, &input),
        Some(Commands::Config { action }) => commands::cmd_config(&ctx, action),
        Some(Commands::Completions { .. }) => {
            // Already handled above
            unreachable!()
        }
    }
}
