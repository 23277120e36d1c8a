//! Config command implementation.

use anyhow::{Result, bail};
use tabled::builder::Builder;

use crate::cli::{ConfigAction, ConfigKey};
use crate::config::{Config, resolve_history_path};
use crate::style;
use crate::util::Context;

const ALL_KEYS: [(ConfigKey, &str); 6] = [
    (ConfigKey::InventoryFile, "inventory_file"),
    (ConfigKey::HistoryFile, "history_file"),
    (ConfigKey::History, "history"),
    (ConfigKey::SaveMode, "save_mode"),
    (ConfigKey::NoColor, "no_color"),
    (ConfigKey::Format, "format"),
];

pub fn cmd_config(ctx: &Context, action: ConfigAction) -> Result<()> {
    let path = &ctx.config_path;
    let mut config = ctx.config.clone();

    match action {
        ConfigAction::Show => {
            if !path.exists() && !ctx.quiet {
                println!("No config file at {} (showing defaults)\n", path.display());
            }
            let mut builder = Builder::default();
            builder.push_record(["Key", "Value"]);
            for (key, name) in ALL_KEYS {
                let value = config.get(key).unwrap_or_else(|| "(unset)".to_string());
                builder.push_record([name.to_string(), value]);
            }
            let mut table = builder.build();
            style::apply_table_style(&mut table, ctx.style);
            println!("{}", table);

            if !ctx.quiet {
                println!();
                println!("Inventory file: {}", ctx.inventory_path().display());
                match resolve_history_path(&ctx.data, &config) {
                    Some(history) => println!("History file:   {}", history.display()),
                    None => println!("History file:   (disabled)"),
                }
            }
        }
        ConfigAction::Get { key } => match config.get(key) {
            Some(value) => println!("{}", value),
            None => {
                if !ctx.quiet {
                    eprintln!("{} is not set", key_name(key));
                }
            }
        },
        ConfigAction::Set { key, value } => {
            config.set(key, &value)?;
            config.save(path)?;
            ctx.report(&style::format_success(
                &format!("Set {} = {}", key_name(key), value),
                ctx.no_color,
            ));
        }
        ConfigAction::Unset { key } => {
            config.unset(key);
            config.save(path)?;
            ctx.report(&style::format_success(
                &format!("Unset {}", key_name(key)),
                ctx.no_color,
            ));
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Init => {
            if path.exists() {
                bail!("Config file already exists: {}", path.display());
            }
            Config::default().save(path)?;
            ctx.report(&style::format_success(
                &format!("Created {}", path.display()),
                ctx.no_color,
            ));
        }
    }

    Ok(())
}

fn key_name(key: ConfigKey) -> &'static str {
    ALL_KEYS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, name)| *name)
        .unwrap_or("unknown")
}
