use super::parser::{Parser, ReadError};
use crate::flow_counts::FlowCounts;
use crate::lookup_table::LookupTable;
use crate::protocol_map::ProtocolMap;
use crate::records::flow_log_record::FlowLogRecord;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

/// Streams whitespace-delimited flow log lines as [`FlowLogRecord`]s.
///
/// Only one line is held in memory at a time. Blank lines are dropped,
/// unusable lines surface as [`ReadError::MalformedLine`].
pub struct FlowLogParser;

fn to_record(line_number: u64, bytes: &[u8]) -> Option<Result<FlowLogRecord, ReadError>> {
    let malformed = |reason: String| ReadError::MalformedLine {
        line_number,
        reason,
    };

    let line = match std::str::from_utf8(bytes) {
        Ok(line) => line,
        Err(e) => return Some(Err(malformed(format!("not valid UTF-8: {}", e)))),
    };

    if line.trim().is_empty() {
        return None;
    }

    Some(FlowLogRecord::from_line(line_number, line).map_err(malformed))
}

impl Parser for FlowLogParser {
    type Record = FlowLogRecord;

    fn parse(
        &self,
        file_path: &Path,
    ) -> Result<Box<dyn Iterator<Item = Result<FlowLogRecord, ReadError>>>, ReadError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);

        let iter = reader
            .split(b'\n')
            .zip(1u64..)
            .filter_map(|(result, line_number)| match result {
                Ok(bytes) => to_record(line_number, &bytes),
                Err(err) => Some(Err(ReadError::Io(err))),
            });

        Ok(Box::new(iter))
    }
}

/// Tags every line of a flow log and returns the aggregated counts.
///
/// Malformed lines are logged and skipped. Failing to open or read the file
/// is returned as an error and no counts are produced.
pub fn process(
    log_path: &Path,
    lookup_table: &LookupTable,
    protocol_map: &ProtocolMap,
) -> Result<FlowCounts, ReadError> {
    debug!("Reading the flow log: {} ...", log_path.display());
    let start = Instant::now();
    let mut counts = FlowCounts::new();

    for result in FlowLogParser.parse(log_path)? {
        match result {
            Ok(record) => {
                let protocol = protocol_map.resolve(record.protocol);
                let tag = lookup_table.tag_for(record.dst_port, protocol);
                debug!(
                    "Line {}: {}/{} tagged {:?}",
                    record.line_number, record.dst_port, protocol, tag
                );
                counts.record(tag, record.dst_port, protocol);
            }
            Err(err) if err.is_recoverable() => {
                warn!("Skipping flow log line in {}: {}", log_path.display(), err);
                counts.record_malformed();
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        "Parsed {} flow records from {} ({} malformed lines skipped) in {:.4} seconds",
        counts.stats().records,
        log_path.display(),
        counts.stats().malformed,
        start.elapsed().as_secs_f64()
    );
    Ok(counts)
}
