use super::parser::{Parser, ReadError};
use crate::lookup_table::LookupTable;
use crate::records::lookup_record::LookupRecord;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{info, warn};
use std::fs::File;
use std::path::Path;

/// Reads `port,protocol,tag` lookup tables.
///
/// The first row is a header and is skipped. Columns are read by position,
/// so the header spelling does not matter.
pub struct LookupParser;

fn to_record(row: u64, record: &StringRecord) -> Result<LookupRecord, ReadError> {
    let invalid = |reason: String| ReadError::InvalidRow { row, reason };

    if record.len() < 3 {
        return Err(invalid(format!(
            "expected 3 fields, found {}",
            record.len()
        )));
    }

    let dstport = record[0]
        .parse::<u16>()
        .map_err(|e| invalid(format!("invalid port {:?}: {}", &record[0], e)))?;

    let protocol = record[1].to_lowercase();
    if protocol.is_empty() {
        return Err(invalid("empty protocol".to_string()));
    }

    let tag = record[2].to_string();
    if tag.is_empty() {
        return Err(invalid("empty tag".to_string()));
    }

    Ok(LookupRecord {
        dstport,
        protocol,
        tag,
    })
}

impl Parser for LookupParser {
    type Record = LookupRecord;

    fn parse(
        &self,
        file_path: &Path,
    ) -> Result<Box<dyn Iterator<Item = Result<LookupRecord, ReadError>>>, ReadError> {
        let file = File::open(file_path)?;
        let rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(file);

        let iter = rdr.into_records().zip(1u64..).map(|(result, row)| match result {
            Ok(record) => to_record(row, &record),
            Err(err) if err.is_io_error() => Err(ReadError::Csv(err)),
            Err(err) => Err(ReadError::InvalidRow {
                row,
                reason: err.to_string(),
            }),
        });

        Ok(Box::new(iter))
    }
}

impl LookupParser {
    /// Builds a [`LookupTable`] from a CSV file.
    ///
    /// Unusable rows are logged and skipped. Only I/O failures are returned.
    pub fn load(&self, file_path: &Path) -> Result<LookupTable, ReadError> {
        let mut table = LookupTable::new();
        let mut skipped = 0usize;

        for result in self.parse(file_path)? {
            match result {
                Ok(record) => {
                    table.insert(record.dstport, &record.protocol, &record.tag);
                }
                Err(err) if err.is_recoverable() => {
                    warn!("Skipping lookup row in {}: {}", file_path.display(), err);
                    skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            "Loaded {} tag mappings from {} ({} rows skipped, {} duplicates replaced)",
            table.len(),
            file_path.display(),
            skipped,
            table.overridden()
        );
        Ok(table)
    }
}
