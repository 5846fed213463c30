use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::parsers::parser::ReadError;

/// IANA protocol-numbers registry, keyed by decimal protocol number.
const BUNDLED_PROTOCOL_MAP: &str = include_str!("../resources/protocol_map.json");

/// Name returned for protocol numbers missing from the registry.
pub const UNKNOWN_PROTOCOL: &str = "unknown";

/// `ProtocolMap` resolves IANA protocol numbers to lowercase protocol names.
///
/// The map is built once before any flow log line is read and is never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct ProtocolMap {
    names: HashMap<u32, String>,
}

impl ProtocolMap {
    /// Loads the registry embedded in the binary.
    pub fn bundled() -> Result<Self, ReadError> {
        let map = Self::from_json(BUNDLED_PROTOCOL_MAP)?;
        debug!("Loaded {} bundled protocol names", map.len());
        Ok(map)
    }

    /// Loads a registry from a JSON file shaped like `{"6": "tcp", ...}`.
    pub fn from_path(path: &Path) -> Result<Self, ReadError> {
        let contents = fs::read_to_string(path)?;
        let map = Self::from_json(&contents)?;
        info!(
            "Loaded {} protocol names from {}",
            map.len(),
            path.display()
        );
        Ok(map)
    }

    /// Parses a registry from JSON text.
    ///
    /// Every key must be a non-negative integer and every name non-empty.
    pub fn from_json(json: &str) -> Result<Self, ReadError> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;

        let mut names = HashMap::with_capacity(raw.len());
        for (key, name) in raw {
            let number = key
                .trim()
                .parse::<u32>()
                .map_err(|e| ReadError::InvalidProtocolMap {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;

            let name = name.trim().to_lowercase();
            if name.is_empty() {
                return Err(ReadError::InvalidProtocolMap {
                    key,
                    reason: "empty protocol name".to_string(),
                });
            }
            names.insert(number, name);
        }

        Ok(ProtocolMap { names })
    }

    /// Returns the protocol name for `protocol_number`, or [`UNKNOWN_PROTOCOL`].
    pub fn resolve(&self, protocol_number: u32) -> &str {
        self.names
            .get(&protocol_number)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_PROTOCOL)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
