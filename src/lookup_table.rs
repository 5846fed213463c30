use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use csv::WriterBuilder;
use log::{debug, warn};

use crate::records::lookup_record::LookupRecord;

/// Tag given to flows whose (port, protocol) pair has no lookup entry.
pub const UNTAGGED: &str = "Untagged";

/// `LookupTable` maps a (destination port, protocol name) pair to a tag.
///
/// Protocol names are stored lowercase so lookups are case-insensitive.
/// When the same pair is inserted twice the last insertion wins; the number
/// of replaced entries is reported by [`LookupTable::overridden`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    // port -> protocol -> tag, so lookups can borrow the protocol name
    tags: HashMap<u16, HashMap<String, String>>,
    overridden: usize,
}

/// Lowercases `protocol`, borrowing when it already is.
fn normalize(protocol: &str) -> Cow<'_, str> {
    if protocol.chars().any(char::is_uppercase) {
        Cow::Owned(protocol.to_lowercase())
    } else {
        Cow::Borrowed(protocol)
    }
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mapping, replacing any earlier tag for the same pair.
    ///
    /// Returns the replaced tag, if there was one.
    pub fn insert(&mut self, port: u16, protocol: &str, tag: &str) -> Option<String> {
        let protocol = normalize(protocol).into_owned();
        let previous = self
            .tags
            .entry(port)
            .or_default()
            .insert(protocol.clone(), tag.to_string());
        if let Some(previous) = &previous {
            self.overridden += 1;
            warn!(
                "Duplicate lookup entry for {}/{}: {:?} replaced by {:?}",
                port, protocol, previous, tag
            );
        }
        previous
    }

    /// Returns the tag for the pair, if one is mapped.
    pub fn get(&self, port: u16, protocol: &str) -> Option<&str> {
        self.tags
            .get(&port)?
            .get(normalize(protocol).as_ref())
            .map(String::as_str)
    }

    /// Returns the tag for the pair, or [`UNTAGGED`].
    pub fn tag_for(&self, port: u16, protocol: &str) -> &str {
        self.get(port, protocol).unwrap_or(UNTAGGED)
    }

    pub fn len(&self) -> usize {
        self.tags.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Number of inserts that replaced an existing pair.
    pub fn overridden(&self) -> usize {
        self.overridden
    }

    /// Returns every mapping ordered by port, then protocol.
    pub fn records(&self) -> Vec<LookupRecord> {
        let mut records: Vec<LookupRecord> = self
            .tags
            .iter()
            .flat_map(|(port, protocols)| {
                protocols.iter().map(move |(protocol, tag)| LookupRecord {
                    dstport: *port,
                    protocol: protocol.clone(),
                    tag: tag.clone(),
                })
            })
            .collect();
        records.sort_by(|a, b| (a.dstport, &a.protocol).cmp(&(b.dstport, &b.protocol)));
        records
    }

    /// Writes the table as a `dstport,protocol,tag` CSV file.
    pub fn save(&self, path: &Path) -> Result<(), csv::Error> {
        debug!("Saving {} lookup entries to {}", self.len(), path.display());
        let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
        for record in self.records() {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}
