//! CSV tables: source pages and reference types in, links and failures out

use crate::error::TableError;
use crate::reference::ReferenceTable;
use crate::schema::{FailedFetch, LinkRecord, ReferenceEntry, SourcePage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const SOURCE_COLUMNS: [&str; 2] = ["reference", "documentation-url"];
pub const REFERENCE_COLUMNS: [&str; 2] = ["name", "reference"];
pub const LINK_COLUMNS: [&str; 6] = [
    "reference",
    "plan",
    "name",
    "document-url",
    "documentation-url",
    "document-types",
];
pub const FAILED_COLUMNS: [&str; 2] = ["reference", "documentation-url"];

type TableResult<T> = std::result::Result<T, TableError>;

/// Load the pages to crawl, in file order
pub fn read_source_pages(path: &Path) -> TableResult<Vec<SourcePage>> {
    read_rows(path, &SOURCE_COLUMNS)
}

/// Load the document-type lookup
pub fn read_reference_table(path: &Path) -> TableResult<ReferenceTable> {
    let entries: Vec<ReferenceEntry> = read_rows(path, &REFERENCE_COLUMNS)?;
    Ok(ReferenceTable::new(entries))
}

/// Write the result table; the header is written even with no rows
pub fn write_links(path: &Path, records: &[LinkRecord]) -> TableResult<()> {
    write_rows(path, &LINK_COLUMNS, records)
}

pub fn write_failures(path: &Path, failures: &[FailedFetch]) -> TableResult<()> {
    write_rows(path, &FAILED_COLUMNS, failures)
}

fn read_rows<T: DeserializeOwned>(path: &Path, required: &[&'static str]) -> TableResult<Vec<T>> {
    let file = File::open(path).map_err(|source| TableError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rows(file, required).map_err(|e| e.at(path))
}

fn write_rows<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> TableResult<()> {
    let file = File::create(path).map_err(|source| TableError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    serialize_rows(file, columns, rows).map_err(|source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse failure before the file path is known
#[derive(Debug)]
enum ParseFailure {
    MissingColumn(&'static str),
    Csv(csv::Error),
}

impl From<csv::Error> for ParseFailure {
    fn from(e: csv::Error) -> Self {
        ParseFailure::Csv(e)
    }
}

impl ParseFailure {
    fn at(self, path: &Path) -> TableError {
        match self {
            ParseFailure::MissingColumn(column) => TableError::MissingColumn {
                path: path.to_path_buf(),
                column,
            },
            ParseFailure::Csv(source) => TableError::Csv {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

fn parse_rows<T: DeserializeOwned, R: Read>(
    reader: R,
    required: &[&'static str],
) -> std::result::Result<Vec<T>, ParseFailure> {
    let mut reader = csv::Reader::from_reader(reader);

    let headers = reader.headers()?.clone();
    if let Some(missing) = required
        .iter()
        .copied()
        .find(|column| !headers.iter().any(|h| h == *column))
    {
        return Err(ParseFailure::MissingColumn(missing));
    }

    let mut rows = Vec::new();
    for record in reader.deserialize::<T>() {
        rows.push(record?);
    }
    Ok(rows)
}

fn serialize_rows<T: Serialize, W: Write>(
    writer: W,
    columns: &[&str],
    rows: &[T],
) -> std::result::Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
