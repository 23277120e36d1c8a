//! Main store implementation.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use time::PrimitiveDateTime;
use tracing::{debug, warn};

use medstock_types::{BillLine, MedicineRecord, Receipt, SaleOutcome, SaleRequest};

use crate::error::{Error, Result};

/// Records with a quantity strictly below this are reported as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Summary of a [`InventoryStore::load`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of records loaded.
    pub records: usize,
    /// 1-based line numbers whose numeric fields were malformed and replaced
    /// with fallback values.
    pub recovered_lines: Vec<usize>,
}

/// In-memory list of medicine batches, kept in file order.
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    records: Vec<MedicineRecord>,
}

impl InventoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records` in the given order.
    pub fn from_records(records: Vec<MedicineRecord>) -> Self {
        Self { records }
    }

    /// Open a store from an inventory file. A missing file yields an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut store = Self::new();
        store.load(path)?;
        Ok(store)
    }

    /// Replace the contents with the records in `path`.
    ///
    /// Blank lines are skipped. A line with malformed numbers is still
    /// loaded, with quantity and price zeroed, and reported in the returned
    /// [`LoadReport`]. A missing file clears the store without error.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadReport> {
        let path = path.as_ref();
        self.records.clear();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No inventory at {}, starting empty", path.display());
                return Ok(LoadReport::default());
            }
            Err(source) => {
                return Err(Error::ReadInventory {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut report = LoadReport::default();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| Error::ReadInventory {
                path: path.to_path_buf(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let (record, error) = MedicineRecord::from_line_lossy(&line);
            if let Some(e) = error {
                warn!("{}:{}: {}; using fallback values", path.display(), index + 1, e);
                report.recovered_lines.push(index + 1);
            }
            self.records.push(record);
        }

        report.records = self.records.len();
        debug!("Loaded {} records from {}", report.records, path.display());
        Ok(report)
    }

    /// Overwrite `path` with every record, one per line, in current order.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;

        let write_err = |source: std::io::Error| Error::WriteInventory {
            path: path.to_path_buf(),
            source,
        };

        let mut out = BufWriter::new(File::create(path).map_err(write_err)?);
        for record in &self.records {
            writeln!(out, "{}", record.to_line()).map_err(write_err)?;
        }
        out.flush().map_err(write_err)?;

        debug!("Saved {} records to {}", self.records.len(), path.display());
        Ok(())
    }

    /// All records in order.
    pub fn records(&self) -> &[MedicineRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record. Duplicate batch numbers are accepted.
    pub fn push(&mut self, record: MedicineRecord) {
        self.records.push(record);
    }

    /// Replace every record.
    pub fn replace_all(&mut self, records: Vec<MedicineRecord>) {
        self.records = records;
    }

    /// First record whose batch number equals `batch`.
    pub fn find_by_batch(&self, batch: &str) -> Option<&MedicineRecord> {
        self.records.iter().find(|r| r.batch_number() == batch)
    }

    /// Mutable access to the first record whose batch number equals `batch`.
    pub fn find_by_batch_mut(&mut self, batch: &str) -> Option<&mut MedicineRecord> {
        self.records.iter_mut().find(|r| r.batch_number() == batch)
    }

    /// Overwrite the quantity and expiry of the first matching batch.
    ///
    /// No validation is applied to either value.
    pub fn update_by_batch(
        &mut self,
        batch: &str,
        quantity: i64,
        expiry_date: impl Into<String>,
    ) -> Result<&MedicineRecord> {
        let record = self
            .find_by_batch_mut(batch)
            .ok_or_else(|| Error::BatchNotFound(batch.to_string()))?;
        record.set_quantity(quantity);
        record.set_expiry_date(expiry_date);
        Ok(record)
    }

    /// Add stock to the first matching batch, optionally replacing its expiry.
    ///
    /// Fails with [`Error::QuantityOverflow`] and changes nothing if the new
    /// total does not fit in an `i64`.
    pub fn restock_by_batch(
        &mut self,
        batch: &str,
        added: i64,
        expiry_date: Option<String>,
    ) -> Result<&MedicineRecord> {
        let record = self
            .find_by_batch_mut(batch)
            .ok_or_else(|| Error::BatchNotFound(batch.to_string()))?;
        if !record.restock(added, expiry_date) {
            return Err(Error::QuantityOverflow {
                batch: batch.to_string(),
                added,
            });
        }
        Ok(record)
    }

    /// Remove every record expired at `now`, keeping survivors in order.
    ///
    /// Returns the removed records in their original order.
    pub fn remove_expired(&mut self, now: PrimitiveDateTime) -> Vec<MedicineRecord> {
        let (expired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|r| r.is_expired(now));
        self.records = kept;
        expired
    }

    /// Sell each request in order against the first matching batch.
    ///
    /// This is best-effort: a missing batch or a request the stock cannot
    /// cover is recorded in the receipt and skipped, and earlier successful
    /// sales are kept.
    pub fn sell_across_batches(&mut self, requests: &[SaleRequest]) -> Receipt {
        let mut receipt = Receipt::default();

        for request in requests {
            let Some(record) = self.find_by_batch_mut(&request.batch) else {
                receipt.push_failure(SaleOutcome::NotFound {
                    batch: request.batch.clone(),
                });
                continue;
            };

            let available = record.quantity();
            if record.sell(request.quantity) {
                receipt.push_sold(BillLine {
                    name: record.name().to_string(),
                    batch: record.batch_number().to_string(),
                    quantity: request.quantity,
                    cost: record.cost_of(request.quantity),
                });
            } else {
                receipt.push_failure(SaleOutcome::InsufficientStock {
                    batch: request.batch.clone(),
                    requested: request.quantity,
                    available,
                });
            }
        }

        receipt
    }

    /// Records below [`LOW_STOCK_THRESHOLD`].
    pub fn low_stock(&self) -> Vec<&MedicineRecord> {
        self.records
            .iter()
            .filter(|r| r.is_low_stock(LOW_STOCK_THRESHOLD))
            .collect()
    }

    /// Records expired at `now`, without removing them.
    pub fn expired(&self, now: PrimitiveDateTime) -> Vec<&MedicineRecord> {
        self.records.iter().filter(|r| r.is_expired(now)).collect()
    }
}

/// Create the parent directory of `path` if it does not exist yet.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: PrimitiveDateTime = datetime!(2025-01-01 0:00);

    fn paracetamol() -> MedicineRecord {
        MedicineRecord::new("Paracetamol", "B1", "2099-01-01", 50, 2.5)
    }

    fn sample_store() -> InventoryStore {
        InventoryStore::from_records(vec![
            paracetamol(),
            MedicineRecord::new("Amoxicillin", "B2", "2000-01-01", 5, 8.0),
            MedicineRecord::new("Ibuprofen", "B3", "2030-06-15", 9, 3.75),
            MedicineRecord::new("Cough Syrup", "B4", "2024-12-31", 30, 4.0),
            MedicineRecord::new("Vitamin C", "B5", "not-a-date", 100, 0.5),
        ])
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = InventoryStore::open(dir.path().join("inventory.txt")).unwrap();
        assert!(store.is_empty());
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_save_and_reload_single_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.txt");

        let mut store = InventoryStore::new();
        store.push(paracetamol());
        store.save(&path).unwrap();

        let reloaded = InventoryStore::open(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.records()[0], paracetamol());
        assert_eq!(reloaded.records()[0].original_quantity(), 50);
    }

    #[test]
    fn test_save_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.txt");
        sample_store().save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Paracetamol,B1,2099-01-01,50,2.5,50");
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("inventory.txt");
        sample_store().save(&path).unwrap();
        assert_eq!(InventoryStore::open(&path).unwrap().len(), 5);
    }

    #[test]
    fn test_load_skips_blank_lines_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.txt");
        std::fs::write(
            &path,
            "A,B1,2099-01-01,1,1,1\n\n   \nB,B2,2099-01-01,2,2,2\nC,B3,2099-01-01,3,3,3\n",
        )
        .unwrap();

        let mut store = InventoryStore::new();
        let report = store.load(&path).unwrap();
        assert_eq!(report.records, 3);
        assert!(report.recovered_lines.is_empty());
        let names: Vec<_> = store.records().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn test_load_replaces_existing_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.txt");
        std::fs::write(&path, "A,B1,2099-01-01,1,1,1\n").unwrap();

        let mut store = sample_store();
        store.load(&path).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_recovers_malformed_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.txt");
        std::fs::write(&path, "A,B1,2099-01-01,1,1,1\nB,B2,2099-01-01,many,2,7\n").unwrap();

        let mut store = InventoryStore::new();
        let report = store.load(&path).unwrap();
        assert_eq!(report.recovered_lines, vec![2]);
        let recovered = store.find_by_batch("B2").unwrap();
        assert_eq!(recovered.quantity(), 0);
        assert_eq!(recovered.price(), 0.0);
        assert_eq!(recovered.original_quantity(), 7);
    }

    #[test]
    fn test_find_by_batch_first_match_wins() {
        let mut store = sample_store();
        store.push(MedicineRecord::new("Duplicate", "B1", "2099-01-01", 1, 1.0));
        assert_eq!(store.find_by_batch("B1").unwrap().name(), "Paracetamol");
        assert!(store.find_by_batch("b1").is_none());
        assert!(store.find_by_batch("B99").is_none());
    }

    #[test]
    fn test_update_by_batch() {
        let mut store = sample_store();
        let updated = store.update_by_batch("B3", 120, "2031-01-01").unwrap();
        assert_eq!(updated.quantity(), 120);
        assert_eq!(updated.expiry_date(), "2031-01-01");
        assert_eq!(updated.original_quantity(), 9);
    }

    #[test]
    fn test_update_by_batch_accepts_invalid_values() {
        let mut store = sample_store();
        store.update_by_batch("B1", -4, "garbage").unwrap();
        let record = store.find_by_batch("B1").unwrap();
        assert_eq!(record.quantity(), -4);
        assert!(!record.is_expired(NOW));
    }

    #[test]
    fn test_update_by_batch_not_found() {
        let mut store = sample_store();
        let err = store.update_by_batch("NOPE", 1, "2099-01-01").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_restock_by_batch() {
        let mut store = sample_store();
        let record = store.restock_by_batch("B3", 41, None).unwrap();
        assert_eq!(record.quantity(), 50);
        assert_eq!(record.original_quantity(), 50);
        assert!(store.restock_by_batch("NOPE", 1, None).unwrap_err().is_not_found());
    }

    #[test]
    fn test_restock_by_batch_overflow() {
        let mut store = sample_store();
        let err = store.restock_by_batch("B3", i64::MAX, None).unwrap_err();
        assert!(matches!(
            err,
            Error::QuantityOverflow { ref batch, added } if batch == "B3" && added == i64::MAX
        ));
        assert_eq!(store.find_by_batch("B3").unwrap().quantity(), 9);
    }

    #[test]
    fn test_expired_query_does_not_mutate() {
        let store = sample_store();
        let expired: Vec<_> = store.expired(NOW).iter().map(|r| r.batch_number()).collect();
        assert_eq!(expired, ["B2", "B4"]);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_remove_expired_preserves_survivor_order() {
        let mut store = sample_store();
        let removed = store.remove_expired(NOW);
        let removed: Vec<_> = removed.iter().map(|r| r.batch_number()).collect();
        assert_eq!(removed, ["B2", "B4"]);

        let kept: Vec<_> = store.records().iter().map(|r| r.batch_number()).collect();
        assert_eq!(kept, ["B1", "B3", "B5"]);
    }

    #[test]
    fn test_remove_expired_is_idempotent() {
        let mut store = sample_store();
        store.remove_expired(NOW);
        let after_first = store.records().to_vec();
        assert!(store.remove_expired(NOW).is_empty());
        assert_eq!(store.records(), after_first.as_slice());
    }

    #[test]
    fn test_low_stock_threshold() {
        let store = sample_store();
        let low: Vec<_> = store.low_stock().iter().map(|r| r.batch_number()).collect();
        assert_eq!(low, ["B2", "B3"]);
    }

    #[test]
    fn test_sell_single_item() {
        let mut store = InventoryStore::from_records(vec![paracetamol()]);
        let receipt = store.sell_across_batches(&[SaleRequest::new("B1", 10)]);

        assert_eq!(
            receipt.lines,
            vec![BillLine {
                name: "Paracetamol".to_string(),
                batch: "B1".to_string(),
                quantity: 10,
                cost: 25.0,
            }]
        );
        assert_eq!(receipt.total, 25.0);
        assert_eq!(store.find_by_batch("B1").unwrap().quantity(), 40);
    }

    #[test]
    fn test_sell_insufficient_stock() {
        let mut store = InventoryStore::from_records(vec![paracetamol()]);
        store.sell_across_batches(&[SaleRequest::new("B1", 10)]);

        let receipt = store.sell_across_batches(&[SaleRequest::new("B1", 1000)]);
        assert!(receipt.is_empty());
        assert_eq!(receipt.total, 0.0);
        assert_eq!(
            receipt.outcomes,
            vec![SaleOutcome::InsufficientStock {
                batch: "B1".to_string(),
                requested: 1000,
                available: 40,
            }]
        );
        assert_eq!(store.find_by_batch("B1").unwrap().quantity(), 40);
    }

    #[test]
    fn test_sell_partial_failure_keeps_successes() {
        let mut store = sample_store();
        let receipt = store.sell_across_batches(&[
            SaleRequest::new("B1", 4),
            SaleRequest::new("MISSING", 1),
            SaleRequest::new("B3", 0),
            SaleRequest::new("B5", 10),
            SaleRequest::new("B1", 50),
        ]);

        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.total, 4.0 * 2.5 + 10.0 * 0.5);
        assert_eq!(receipt.outcomes.len(), 5);
        assert!(matches!(receipt.outcomes[1], SaleOutcome::NotFound { .. }));
        assert!(matches!(
            receipt.outcomes[2],
            SaleOutcome::InsufficientStock { requested: 0, .. }
        ));
        assert!(matches!(
            receipt.outcomes[4],
            SaleOutcome::InsufficientStock {
                requested: 50,
                available: 46,
                ..
            }
        ));
        assert_eq!(store.find_by_batch("B1").unwrap().quantity(), 46);
        assert_eq!(store.find_by_batch("B5").unwrap().quantity(), 90);
    }

    #[test]
    fn test_sell_repeated_batch_draws_down_sequentially() {
        let mut store = InventoryStore::from_records(vec![paracetamol()]);
        let receipt = store.sell_across_batches(&[
            SaleRequest::new("B1", 30),
            SaleRequest::new("B1", 30),
            SaleRequest::new("B1", 20),
        ]);
        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.failures(), 1);
        assert_eq!(store.find_by_batch("B1").unwrap().quantity(), 0);
    }
}
