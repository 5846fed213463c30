use serde::{Deserialize, Serialize};

/// One row of the lookup table CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecord {
    pub dstport: u16,
    pub protocol: String,
    pub tag: String,
}
