//! Address upload and route export as CSV.

use std::io::{Read, Write};

use crate::error::TableError;
use crate::model::{AddressRecord, RouteRow};

pub const NAME_COLUMN: &str = "name";
pub const ADDRESS_COLUMN: &str = "address";
pub const DEFAULT_EXPORT_NAME: &str = "optimized_route.csv";

/// Reads an uploaded table with at least `name` and `address` columns.
///
/// Header matching ignores case and surrounding whitespace; other columns
/// are ignored. Data row order defines `original_index`.
pub fn read_addresses<R: Read>(reader: R) -> Result<Vec<AddressRecord>, TableError> {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    let column = |wanted: &'static str| {
        headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(wanted))
            .ok_or(TableError::MissingColumn { column: wanted })
    };
    let name_column = column(NAME_COLUMN)?;
    let address_column = column(ADDRESS_COLUMN)?;

    let mut records = Vec::new();
    for (original_index, row) in csv.records().enumerate() {
        let row = row?;
        records.push(AddressRecord::new(
            original_index,
            row.get(name_column).unwrap_or_default(),
            row.get(address_column).unwrap_or_default(),
        ));
    }

    Ok(records)
}

/// Writes the route as `name,address` rows in visiting order.
///
/// The header is written even when the route is empty.
pub fn write_route<W: Write>(writer: W, rows: &[RouteRow]) -> Result<(), TableError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([NAME_COLUMN, ADDRESS_COLUMN])?;
    for row in rows {
        csv.write_record([row.name.as_str(), row.address_text.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}
