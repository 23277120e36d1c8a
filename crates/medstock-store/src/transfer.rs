//! CSV export and import of the whole inventory.
//!
//! Unlike the inventory file, these CSV files carry a header row and use
//! proper quoting, so they are safe to open in a spreadsheet and to edit by
//! hand. Import validates every row before anything is replaced.

use std::io::{Read, Write};

use medstock_types::MedicineRecord;
use medstock_types::expiry::parse_calendar_date;

use crate::error::{Error, Result};

/// Column headers of an exported inventory.
pub const CSV_HEADER: [&str; 6] = [
    "Medicine Name",
    "Batch Number",
    "Expiry Date",
    "Quantity",
    "Price",
    "Original Quantity",
];

/// Write `records` as CSV with a header row. Returns the number of rows.
pub fn write_csv<W: Write>(writer: W, records: &[MedicineRecord]) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for record in records {
        csv.write_record([
            record.name().to_string(),
            record.batch_number().to_string(),
            record.expiry_date().to_string(),
            record.quantity().to_string(),
            record.price().to_string(),
            record.original_quantity().to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(records.len())
}

/// Read and validate an exported inventory.
///
/// The header must match [`CSV_HEADER`] exactly. Every row needs six
/// columns, whole-number quantities, a decimal price, a real calendar date,
/// and no negative numbers. The first invalid row aborts the read; its
/// number counts the header as row 1.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<MedicineRecord>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = csv.records();
    let header = rows.next().transpose()?;
    let header_ok = header
        .as_ref()
        .is_some_and(|h| h.iter().map(str::trim).eq(CSV_HEADER.iter().copied()));
    if !header_ok {
        return Err(Error::InvalidHeader {
            expected: CSV_HEADER.join(", "),
        });
    }

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        let row_number = index + 2;
        let row = row?;
        records.push(parse_row(&row).map_err(|reason| Error::InvalidRow {
            row: row_number,
            reason,
        })?);
    }

    if records.is_empty() {
        return Err(Error::EmptyImport);
    }
    Ok(records)
}

fn parse_row(row: &csv::StringRecord) -> std::result::Result<MedicineRecord, String> {
    if row.len() != CSV_HEADER.len() {
        return Err(format!(
            "expected {} columns, got {}",
            CSV_HEADER.len(),
            row.len()
        ));
    }

    let field = |i: usize| row.get(i).unwrap_or("").trim();
    let name = field(0);
    let batch = field(1);
    let expiry = field(2);

    parse_calendar_date(expiry).map_err(|e| e.to_string())?;
    let quantity: i64 = field(3)
        .parse()
        .map_err(|_| format!("invalid quantity '{}'", field(3)))?;
    let price: f64 = field(4)
        .parse()
        .map_err(|_| format!("invalid price '{}'", field(4)))?;
    let original: i64 = field(5)
        .parse()
        .map_err(|_| format!("invalid original quantity '{}'", field(5)))?;

    if quantity < 0 || price < 0.0 || original < 0 {
        return Err("negative values not allowed".to_string());
    }

    Ok(MedicineRecord::new(name, batch, expiry, quantity, price).with_original_quantity(original))
}
