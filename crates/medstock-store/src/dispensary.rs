//! An inventory session: a store bound to its file, its history and a save policy.
//!
//! [`Dispensary`] is what a shell talks to. Each mutating method changes the
//! [`InventoryStore`], then either saves straight away or marks the session
//! dirty, depending on [`SaveMode`], and only then appends the matching
//! history entries. If an immediate save fails the store is rolled back, so
//! neither memory nor history records a change the file does not have.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, PrimitiveDateTime};
use tracing::info;

use medstock_types::{MedicineRecord, Receipt, SaleOutcome, SaleRequest};

use crate::error::Result;
use crate::history::{HistoryLog, local_now};
use crate::store::{InventoryStore, LoadReport, ensure_parent_dir};
use crate::transfer;

/// When changes reach the inventory file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaveMode {
    /// Save after every change.
    #[default]
    Immediate,
    /// Keep changes in memory until [`Dispensary::save`] is called.
    OnExit,
}

/// Outcome of [`Dispensary::import_csv`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    /// Number of records now in the inventory.
    pub imported: usize,
    /// Where the previous inventory was copied.
    pub backup_path: PathBuf,
}

/// A loaded inventory together with where and how it is persisted.
#[derive(Debug)]
pub struct Dispensary {
    store: InventoryStore,
    inventory_path: PathBuf,
    history: Option<HistoryLog>,
    save_mode: SaveMode,
    dirty: bool,
}

impl Dispensary {
    /// Load the inventory at `inventory_path`. A missing file starts empty.
    pub fn open(inventory_path: impl Into<PathBuf>) -> Result<Self> {
        let inventory_path = inventory_path.into();
        let mut store = InventoryStore::new();
        let report = store.load(&inventory_path)?;
        log_load(&inventory_path, &report);

        Ok(Self {
            store,
            inventory_path,
            history: None,
            save_mode: SaveMode::default(),
            dirty: false,
        })
    }

    /// Record actions in `history`.
    #[must_use]
    pub fn with_history(mut self, history: HistoryLog) -> Self {
        self.history = Some(history);
        self
    }

    #[must_use]
    pub fn with_save_mode(mut self, save_mode: SaveMode) -> Self {
        self.save_mode = save_mode;
        self
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    pub fn inventory_path(&self) -> &Path {
        &self.inventory_path
    }

    pub fn history(&self) -> Option<&HistoryLog> {
        self.history.as_ref()
    }

    pub fn save_mode(&self) -> SaveMode {
        self.save_mode
    }

    /// Whether there are changes not yet written to the inventory file.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the inventory file and clear the dirty flag.
    pub fn save(&mut self) -> Result<()> {
        self.store.save(&self.inventory_path)?;
        self.dirty = false;
        Ok(())
    }

    /// Append a new batch.
    pub fn add(&mut self, record: MedicineRecord) -> Result<()> {
        let message = format!(
            "Added medicine: {}, qty={}, price={}",
            record,
            record.quantity(),
            record.price()
        );
        let previous = self.store.clone();
        self.store.push(record);
        self.commit(previous)?;
        self.log(&message);
        Ok(())
    }

    /// Overwrite quantity and expiry of a batch.
    ///
    /// Fails with [`Error::BatchNotFound`](crate::Error::BatchNotFound) and
    /// changes nothing if no record matches.
    pub fn update(
        &mut self,
        batch: &str,
        quantity: i64,
        expiry_date: &str,
    ) -> Result<MedicineRecord> {
        let previous = self.store.clone();
        let record = self
            .store
            .update_by_batch(batch, quantity, expiry_date)?
            .clone();
        self.commit(previous)?;
        self.log(&format!("Updated medicine: {}, new qty={}", record, quantity));
        Ok(record)
    }

    /// Add stock to a batch, optionally with a new expiry date.
    pub fn restock(
        &mut self,
        batch: &str,
        added: i64,
        expiry_date: Option<String>,
    ) -> Result<MedicineRecord> {
        let new_expiry = expiry_date.clone();
        let previous = self.store.clone();
        let record = self
            .store
            .restock_by_batch(batch, added, expiry_date)?
            .clone();
        self.commit(previous)?;
        self.log(&format!(
            "Restocked medicine: {}, added qty={}, new total={}, new expiry={}",
            record,
            added,
            record.quantity(),
            new_expiry.as_deref().unwrap_or("unchanged")
        ));
        Ok(record)
    }

    /// Remove every batch expired at `now`, returning what was removed.
    pub fn remove_expired(&mut self, now: PrimitiveDateTime) -> Result<Vec<MedicineRecord>> {
        let previous = self.store.clone();
        let removed = self.store.remove_expired(now);
        if removed.is_empty() {
            return Ok(removed);
        }

        self.commit(previous)?;
        for record in &removed {
            self.log(&format!("Removed expired medicine: {}", record));
        }
        info!("Removed {} expired batches", removed.len());
        Ok(removed)
    }

    /// Sell a list of items, best-effort. See [`InventoryStore::sell_across_batches`].
    pub fn sell(&mut self, requests: &[SaleRequest]) -> Result<Receipt> {
        let previous = self.store.clone();
        let receipt = self.store.sell_across_batches(requests);
        if receipt.is_empty() {
            return Ok(receipt);
        }

        self.commit(previous)?;
        for outcome in &receipt.outcomes {
            if let SaleOutcome::Sold(line) = outcome {
                self.log(&format!(
                    "Bought {} of {} ({}), total={}",
                    line.quantity, line.name, line.batch, line.cost
                ));
            }
        }
        Ok(receipt)
    }

    /// Write the current inventory as CSV to `dest`.
    pub fn export_csv(&self, dest: &Path) -> Result<usize> {
        ensure_parent_dir(dest)?;
        let file = File::create(dest)?;
        let count = transfer::write_csv(file, self.store.records())?;
        info!("Exported {} records to {}", count, dest.display());
        self.log(&format!("Inventory backup exported - {} medicines exported", count));
        Ok(count)
    }

    /// Replace the inventory with the contents of a CSV export.
    ///
    /// The CSV is fully validated first; on any error the inventory is left
    /// untouched. Otherwise the current inventory is copied to a timestamped
    /// backup beside the inventory file before being replaced.
    pub fn import_csv(&mut self, source: &Path) -> Result<ImportResult> {
        let records = transfer::read_csv(File::open(source)?)?;

        let backup_path = self.backup_path();
        self.store.save(&backup_path)?;

        let imported = records.len();
        let previous = self.store.clone();
        self.store.replace_all(records);
        self.commit(previous)?;
        info!("Imported {} records from {}", imported, source.display());
        self.log(&format!(
            "Inventory restored from CSV - {} medicines imported (backup saved as {})",
            imported,
            backup_path.display()
        ));

        Ok(ImportResult {
            imported,
            backup_path,
        })
    }

    fn backup_path(&self) -> PathBuf {
        let name = format!("inventory_backup_{}.txt", backup_stamp(local_now()));
        match self.inventory_path.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }

    fn log(&self, message: &str) {
        if let Some(history) = &self.history {
            history.append(message);
        }
    }

    /// Persist a change according to the save mode.
    ///
    /// On a failed immediate save the store is reset to `previous` and the
    /// dirty flag is left as it was.
    fn commit(&mut self, previous: InventoryStore) -> Result<()> {
        match self.save_mode {
            SaveMode::Immediate => {
                if let Err(e) = self.save() {
                    self.store = previous;
                    return Err(e);
                }
            }
            SaveMode::OnExit => self.dirty = true,
        }
        Ok(())
    }
}

/// `YYYYmmdd_HHMMSS` stamp used in backup file names.
pub fn backup_stamp(at: OffsetDateTime) -> String {
    let format = time::macros::format_description!("[year][month][day]_[hour][minute][second]");
    at.format(&format)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

fn log_load(path: &Path, report: &LoadReport) {
    if !report.recovered_lines.is_empty() {
        tracing::warn!(
            "{} line(s) in {} had malformed numbers: {:?}",
            report.recovered_lines.len(),
            path.display(),
            report.recovered_lines
        );
    }
}
