//! Interactive menu.
//!
//! Drives the same [`Dispensary`] operations as the subcommands through
//! `dialoguer` prompts. In on-exit save mode nothing reaches the inventory
//! file until the user leaves the menu.

use std::fmt;

use anyhow::{Context as _, Result};
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Confirm, Input, Select};
use medstock_store::{Dispensary, SaveMode};
use medstock_types::{MedicineRecord, SaleRequest};

use crate::cli::OutputFormat;
use crate::commands::report::{Report, removal_summary};
use crate::format::format_receipt_text;
use crate::style;
use crate::util::{Context, local_now, require_terminal};

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Add,
    Update,
    Restock,
    RemoveExpired,
    LowStock,
    Expired,
    ShowInventory,
    Buy,
    History,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 10] = [
        MenuAction::Add,
        MenuAction::Update,
        MenuAction::Restock,
        MenuAction::RemoveExpired,
        MenuAction::LowStock,
        MenuAction::Expired,
        MenuAction::ShowInventory,
        MenuAction::Buy,
        MenuAction::History,
        MenuAction::Exit,
    ];

    fn label(self, save_mode: SaveMode) -> &'static str {
        match self {
            MenuAction::Add => "Add New Medicine",
            MenuAction::Update => "Update Medicine",
            MenuAction::Restock => "Restock Medicine",
            MenuAction::RemoveExpired => "Remove Expired Medicines",
            MenuAction::LowStock => "Generate Low Stock Report",
            MenuAction::Expired => "Generate Expired Report",
            MenuAction::ShowInventory => "Show Inventory",
            MenuAction::Buy => "Buy Medicines (Generate Bill)",
            MenuAction::History => "Show History Log",
            MenuAction::Exit => match save_mode {
                SaveMode::Immediate => "Exit",
                SaveMode::OnExit => "Save and Exit",
            },
        }
    }
}

struct MenuItem {
    action: MenuAction,
    save_mode: SaveMode,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action.label(self.save_mode))
    }
}

fn menu_items(save_mode: SaveMode) -> Vec<MenuItem> {
    MenuAction::ALL
        .iter()
        .map(|&action| MenuItem { action, save_mode })
        .collect()
}

pub fn cmd_menu(ctx: &Context, save_mode: SaveMode) -> Result<()> {
    require_terminal()?;

    let mut dispensary = ctx.open_dispensary(save_mode)?;
    let theme: Box<dyn Theme> = if ctx.no_color {
        Box::new(SimpleTheme)
    } else {
        Box::new(ColorfulTheme::default())
    };
    let theme = theme.as_ref();
    let items = menu_items(save_mode);

    loop {
        println!();
        let selection = Select::with_theme(theme)
            .with_prompt("Medical Inventory System")
            .items(&items)
            .default(0)
            .interact()
            .context("Failed to get menu selection")?;

        let action = items[selection].action;
        if action == MenuAction::Exit {
            break;
        }

        // A failed action is reported and the menu continues.
        if let Err(e) = run_action(ctx, theme, &mut dispensary, action) {
            eprintln!("{}", style::format_warning(&format!("{:#}", e), ctx.no_color));
        }
    }

    if dispensary.is_dirty() {
        dispensary.save()?;
        println!("{}", style::format_success("Inventory saved.", ctx.no_color));
    }
    println!("Exiting...");
    Ok(())
}

fn run_action(
    ctx: &Context,
    theme: &dyn Theme,
    dispensary: &mut Dispensary,
    action: MenuAction,
) -> Result<()> {
    let opts = ctx.format_options();
    let now = local_now();

    match action {
        MenuAction::Add => {
            let name: String = prompt(theme, "Enter medicine name")?;
            let batch: String = prompt(theme, "Enter batch number")?;
            let expiry: String = prompt(theme, "Enter expiry date (YYYY-MM-DD)")?;
            let quantity: i64 = prompt(theme, "Enter quantity")?;
            let price: f64 = prompt(theme, "Enter price per unit")?;
            dispensary.add(MedicineRecord::new(name, batch, expiry, quantity, price))?;
            println!("{}", style::format_success("Medicine added successfully!", ctx.no_color));
        }
        MenuAction::Update => {
            let batch: String = prompt(theme, "Enter batch number to update")?;
            if !require_batch(dispensary, &batch) {
                return Ok(());
            }
            let quantity: i64 = prompt(theme, "Enter new quantity")?;
            let expiry: String = prompt(theme, "Enter new expiry date (YYYY-MM-DD)")?;
            dispensary.update(&batch, quantity, &expiry)?;
            println!("{}", style::format_success("Medicine updated successfully!", ctx.no_color));
        }
        MenuAction::Restock => {
            let batch: String = prompt(theme, "Enter batch number to restock")?;
            if !require_batch(dispensary, &batch) {
                return Ok(());
            }
            let quantity: i64 = prompt(theme, "Enter quantity to add")?;
            let expiry: String = Input::with_theme(theme)
                .with_prompt("Enter new expiry date (YYYY-MM-DD, blank to keep)")
                .allow_empty(true)
                .interact_text()?;
            let expiry = Some(expiry.trim().to_string()).filter(|e| !e.is_empty());
            let record = dispensary.restock(&batch, quantity, expiry)?;
            println!(
                "{}",
                style::format_success(
                    &format!("Restocked {}: {} units.", record, record.quantity()),
                    ctx.no_color
                )
            );
        }
        MenuAction::RemoveExpired => {
            let removed = dispensary.remove_expired(now)?;
            println!("{}", removal_summary(&removed, ctx.no_color));
        }
        MenuAction::LowStock => print_report(dispensary, Report::LowStock, now, ctx)?,
        MenuAction::Expired => print_report(dispensary, Report::Expired, now, ctx)?,
        MenuAction::ShowInventory => print_report(dispensary, Report::Inventory, now, ctx)?,
        MenuAction::Buy => {
            let mut requests = Vec::new();
            loop {
                let batch: String = prompt(theme, "Enter batch number to purchase")?;
                if require_batch(dispensary, &batch) {
                    let quantity: i64 = prompt(theme, "Enter quantity to buy")?;
                    requests.push(SaleRequest::new(batch, quantity));
                }

                let again = Confirm::with_theme(theme)
                    .with_prompt("Do you want to buy another medicine?")
                    .default(false)
                    .interact()?;
                if !again {
                    break;
                }
            }
            let receipt = dispensary.sell(&requests)?;
            print!("{}", format_receipt_text(&receipt, &opts));
        }
        MenuAction::History => match dispensary.history().map(|h| h.entries()).transpose()? {
            Some(Some(entries)) => {
                print!("{}", crate::format::format_history_text(&entries, &opts))
            }
            Some(None) => println!("No history found."),
            None => println!("History is disabled."),
        },
        MenuAction::Exit => {}
    }

    Ok(())
}

/// Print "Medicine not found." and return `false` unless `batch` exists.
fn require_batch(dispensary: &Dispensary, batch: &str) -> bool {
    let found = dispensary.store().find_by_batch(batch).is_some();
    if !found {
        println!("Medicine not found.");
    }
    found
}

fn print_report(
    dispensary: &Dispensary,
    report: Report,
    now: time::PrimitiveDateTime,
    ctx: &Context,
) -> Result<()> {
    let text = report.render(
        dispensary.store(),
        now,
        OutputFormat::Text,
        &ctx.format_options(),
    )?;
    print!("{}", text);
    Ok(())
}

fn prompt<T>(theme: &dyn Theme, message: &str) -> Result<T>
where
    T: Clone + ToString + std::str::FromStr,
    <T as std::str::FromStr>::Err: ToString,
{
    Ok(Input::<T>::with_theme(theme)
        .with_prompt(message)
        .interact_text()?)
}
