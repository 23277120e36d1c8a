//! CLI Integration Tests
//!
//! These tests run the `medstock` binary against an isolated inventory,
//! history and config in a temporary directory.
//!
//! ```
//! cargo test --package medstock-cli --test cli_integration
//! ```

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const CSV_HEADER: &str = "Medicine Name,Batch Number,Expiry Date,Quantity,Price,Original Quantity";

/// Temporary data directory plus helpers to run the binary against it.
struct Sandbox {
    dir: tempfile::TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn inventory(&self) -> PathBuf {
        self.path("inventory.txt")
    }

    fn history(&self) -> PathBuf {
        self.path("history.txt")
    }

    /// Run medstock with the sandbox paths and return output
    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_medstock"))
            .arg("--inventory")
            .arg(self.inventory())
            .arg("--history-file")
            .arg(self.history())
            .arg("--config")
            .arg(self.path("config.toml"))
            .arg("--style")
            .arg("plain")
            .args(args)
            .env_remove("RUST_LOG")
            .env_remove("MEDSTOCK_INVENTORY")
            .env_remove("MEDSTOCK_HISTORY")
            .env_remove("MEDSTOCK_CONFIG")
            .env_remove("NO_COLOR")
            .env_remove("MEDSTOCK_STYLE")
            .output()
            .expect("Failed to run medstock binary")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "medstock {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let mut full = args.to_vec();
        full.extend(["--format", "json"]);
        serde_json::from_str(&self.run_ok(&full)).expect("Output should be valid JSON")
    }

    fn write_inventory(&self, content: &str) {
        std::fs::write(self.inventory(), content).expect("Failed to write inventory");
    }

    fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path).unwrap_or_default()
    }

    fn history_lines(&self) -> Vec<String> {
        self.read(&self.history()).lines().map(str::to_string).collect()
    }
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let sandbox = Sandbox::new();
    let stdout = sandbox.run_ok(&["--help"]);
    for cmd in [
        "add",
        "update",
        "restock",
        "remove-expired",
        "low-stock",
        "expired",
        "list",
        "buy",
        "history",
    ] {
        assert!(stdout.contains(cmd), "Help should list {} command", cmd);
    }
}

#[test]
fn test_version_command() {
    let sandbox = Sandbox::new();
    let stdout = sandbox.run_ok(&["--version"]);
    assert!(stdout.contains("medstock"), "Version should contain medstock");
}

#[test]
fn test_subcommand_help() {
    let sandbox = Sandbox::new();
    for cmd in ["add", "update", "restock", "buy", "show", "export", "import", "config", "menu"] {
        let stdout = sandbox.run_ok(&[cmd, "--help"]);
        assert!(!stdout.is_empty(), "{} --help should produce output", cmd);
    }
}

// =============================================================================
// Inventory Workflow
// =============================================================================

#[test]
fn test_list_missing_inventory_is_empty() {
    let sandbox = Sandbox::new();
    let stdout = sandbox.run_ok(&["list"]);
    assert!(stdout.contains("No medicines in inventory."));
    assert_eq!(sandbox.json(&["list"]), serde_json::json!([]));
}

#[test]
fn test_add_then_reload() {
    let sandbox = Sandbox::new();
    sandbox.run_ok(&["add", "Paracetamol", "B1", "2099-01-01", "50", "2.5"]);

    assert_eq!(sandbox.read(&sandbox.inventory()), "Paracetamol,B1,2099-01-01,50,2.5,50\n");

    let list = sandbox.json(&["list"]);
    assert_eq!(list[0]["name"], "Paracetamol");
    assert_eq!(list[0]["original_quantity"], 50);

    let history = sandbox.history_lines();
    assert_eq!(history.len(), 1);
    assert!(history[0].ends_with("] Added medicine: Paracetamol (B1), qty=50, price=2.5"));
}

#[test]
fn test_buy_scenario() {
    let sandbox = Sandbox::new();
    sandbox.write_inventory("Paracetamol,B1,2099-01-01,50,2.5,50\n");

    let receipt = sandbox.json(&["buy", "B1:10"]);
    assert_eq!(receipt["total"], 25.0);
    assert_eq!(receipt["lines"][0]["name"], "Paracetamol");
    assert_eq!(receipt["lines"][0]["quantity"], 10);
    assert_eq!(sandbox.json(&["show", "B1"])["quantity"], 40);

    let receipt = sandbox.json(&["buy", "B1:1000"]);
    assert_eq!(receipt["lines"], serde_json::json!([]));
    assert_eq!(receipt["outcomes"][0]["outcome"], "insufficient_stock");
    assert_eq!(sandbox.json(&["show", "B1"])["quantity"], 40);

    let history = sandbox.history_lines();
    assert_eq!(history.len(), 1);
    assert!(history[0].ends_with("Bought 10 of Paracetamol (B1), total=25"));
}

#[test]
fn test_buy_partial_failure_text() {
    let sandbox = Sandbox::new();
    sandbox.write_inventory("Paracetamol,B1,2099-01-01,50,2.5,50\n");

    let stdout = sandbox.run_ok(&["buy", "B1:2", "B9:1"]);
    assert!(stdout.contains("B9: Medicine not found."));
    assert!(stdout.contains("TOTAL"));
    assert!(stdout.contains("5.00"));
}

#[test]
fn test_update_and_not_found() {
    let sandbox = Sandbox::new();
    sandbox.write_inventory("Paracetamol,B1,2099-01-01,50,2.5,50\n");

    sandbox.run_ok(&["update", "B1", "7", "2100-12-31"]);
    let record = sandbox.json(&["show", "B1"]);
    assert_eq!(record["quantity"], 7);
    assert_eq!(record["expiry_date"], "2100-12-31");
    assert_eq!(record["low_stock"], true);

    let output = sandbox.run(&["update", "B404", "1", "2100-01-01"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("B404"));
}

#[test]
fn test_restock() {
    let sandbox = Sandbox::new();
    sandbox.write_inventory("Paracetamol,B1,2099-01-01,5,2.5,50\n");

    sandbox.run_ok(&["restock", "B1", "20", "--expiry", "2101-01-01"]);
    let record = sandbox.json(&["show", "B1"]);
    assert_eq!(record["quantity"], 25);
    assert_eq!(record["original_quantity"], 25);
    assert_eq!(record["expiry_date"], "2101-01-01");
}

#[test]
fn test_expired_report_and_removal() {
    let sandbox = Sandbox::new();
    sandbox.write_inventory(
        "Paracetamol,B1,2099-01-01,50,2.5,50\n\
         Old Syrup,B2,2000-01-01,30,1,30\n\
         Mystery,B3,someday,2,0.1,2\n",
    );

    let expired = sandbox.json(&["expired"]);
    assert_eq!(expired.as_array().map(Vec::len), Some(1));
    assert_eq!(expired[0]["batch_number"], "B2");

    let low = sandbox.json(&["low-stock"]);
    assert_eq!(low[0]["batch_number"], "B3");

    let stdout = sandbox.run_ok(&["remove-expired"]);
    assert!(stdout.contains("Old Syrup (B2)"));
    assert_eq!(
        sandbox.read(&sandbox.inventory()),
        "Paracetamol,B1,2099-01-01,50,2.5,50\nMystery,B3,someday,2,0.1,2\n"
    );

    // Second sweep changes nothing
    let stdout = sandbox.run_ok(&["remove-expired"]);
    assert!(stdout.contains("No expired medicines to remove."));
    assert_eq!(sandbox.history_lines().len(), 1);
}

#[test]
fn test_malformed_numbers_are_recovered() {
    let sandbox = Sandbox::new();
    sandbox.write_inventory(
        "Paracetamol,B1,2099-01-01,lots,2.5,50\n\nAspirin,A1,2099-01-01,20,0.5,20\n",
    );

    let list = sandbox.json(&["list"]);
    assert_eq!(list.as_array().map(Vec::len), Some(2));
    assert_eq!(list[0]["quantity"], 0);
    assert_eq!(list[0]["price"], 0.0);
}

// =============================================================================
// History
// =============================================================================

#[test]
fn test_history_empty_and_disabled() {
    let sandbox = Sandbox::new();
    assert!(sandbox.run_ok(&["history"]).contains("No history found."));

    sandbox.run_ok(&["--no-history", "add", "Aspirin", "A1", "2099-01-01", "5", "1"]);
    assert!(!sandbox.history().exists());
}

#[test]
fn test_history_export() {
    let sandbox = Sandbox::new();
    sandbox.run_ok(&["add", "Aspirin", "A1", "2099-01-01", "5", "1"]);

    let dest = sandbox.path("history_copy.txt");
    sandbox.run_ok(&["history", "--export", dest.to_str().unwrap()]);
    assert_eq!(sandbox.read(&dest), sandbox.read(&sandbox.history()));

    let entries = sandbox.json(&["history"]);
    assert_eq!(entries[0]["message"], "Added medicine: Aspirin (A1), qty=5, price=1");
}

// =============================================================================
// CSV Export / Import
// =============================================================================

#[test]
fn test_export_import_round_trip() {
    let sandbox = Sandbox::new();
    sandbox.write_inventory("Paracetamol,B1,2099-01-01,40,2.5,50\n");

    let csv = sandbox.path("backup.csv");
    sandbox.run_ok(&["export", "-o", csv.to_str().unwrap()]);
    assert!(sandbox.read(&csv).starts_with(CSV_HEADER));

    sandbox.write_inventory("Other,X1,2099-01-01,1,1,1\n");
    sandbox.run_ok(&["import", csv.to_str().unwrap()]);
    assert_eq!(sandbox.read(&sandbox.inventory()), "Paracetamol,B1,2099-01-01,40,2.5,50\n");

    let backups: Vec<_> = std::fs::read_dir(sandbox.dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("inventory_backup_") && n.ends_with(".txt"))
        .collect();
    assert_eq!(backups.len(), 1);
}

#[test]
fn test_import_invalid_csv_keeps_inventory() {
    let sandbox = Sandbox::new();
    sandbox.write_inventory("Paracetamol,B1,2099-01-01,40,2.5,50\n");

    let csv = sandbox.path("bad.csv");
    std::fs::write(
        &csv,
        format!("{}\nA,B1,2025-02-30,1,1,1\n", CSV_HEADER),
    )
    .unwrap();

    let output = sandbox.run(&["import", csv.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("row 2"));
    assert_eq!(sandbox.read(&sandbox.inventory()), "Paracetamol,B1,2099-01-01,40,2.5,50\n");
}

// =============================================================================
// Config Commands
// =============================================================================

#[test]
fn test_config_path_and_set() {
    let sandbox = Sandbox::new();
    let stdout = sandbox.run_ok(&["config", "path"]);
    assert!(stdout.trim().ends_with("config.toml"));

    sandbox.run_ok(&["config", "set", "format", "json"]);
    assert_eq!(sandbox.run_ok(&["config", "get", "format"]).trim(), "json");

    // Configured format applies without --format
    let list: serde_json::Value = serde_json::from_str(&sandbox.run_ok(&["list"])).unwrap();
    assert_eq!(list, serde_json::json!([]));
}

#[test]
fn test_config_show_without_file() {
    let sandbox = Sandbox::new();
    let stdout = sandbox.run_ok(&["config", "show"]);
    assert!(stdout.contains("save_mode"));
    assert!(stdout.contains("immediate"));
}

// =============================================================================
// Error Handling
// =============================================================================

#[test]
fn test_invalid_subcommand() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["invalid-command-xyz"]);
    assert!(!output.status.success(), "Invalid command should fail");
}

#[test]
fn test_missing_required_args() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["add", "Paracetamol"]);
    assert!(!output.status.success(), "Missing args should fail");
}

#[test]
fn test_menu_requires_terminal() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("terminal"));
}
