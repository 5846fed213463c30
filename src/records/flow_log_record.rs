/// The fields of a flow log line that take part in tagging.
///
/// Field positions follow the AWS VPC flow log version 2 layout:
///
/// ```text
/// version account-id interface-id srcaddr dstaddr srcport dstport protocol ...
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowLogRecord {
    pub line_number: u64,
    pub dst_port: u16,
    pub protocol: u32,
}

/// Index of the destination port among the whitespace-separated fields.
pub const DST_PORT_FIELD: usize = 6;

/// Index of the protocol number among the whitespace-separated fields.
pub const PROTOCOL_FIELD: usize = 7;

/// Minimum number of fields a line needs to be counted.
pub const MIN_FIELDS: usize = PROTOCOL_FIELD + 1;

impl FlowLogRecord {
    /// Extracts the destination port and protocol number from a line.
    ///
    /// Returns a description of the problem when the line has too few fields
    /// or either field is not a number.
    pub fn from_line(line_number: u64, line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_FIELDS {
            return Err(format!(
                "expected at least {} fields, found {}",
                MIN_FIELDS,
                fields.len()
            ));
        }

        let dst_port = fields[DST_PORT_FIELD]
            .parse::<u16>()
            .map_err(|e| format!("invalid destination port {:?}: {}", fields[DST_PORT_FIELD], e))?;
        let protocol = fields[PROTOCOL_FIELD]
            .parse::<u32>()
            .map_err(|e| format!("invalid protocol {:?}: {}", fields[PROTOCOL_FIELD], e))?;

        Ok(FlowLogRecord {
            line_number,
            dst_port,
            protocol,
        })
    }
}
