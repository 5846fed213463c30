use std::collections::HashMap;

use serde::Serialize;

/// Line totals gathered while reading a flow log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Lines that were tagged and counted.
    pub records: u64,
    /// Lines skipped because they could not be parsed.
    pub malformed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinationCount {
    pub port: u16,
    pub protocol: String,
    pub count: u64,
}

/// Per-tag and per-(port, protocol) match counts.
///
/// Every counted line increments exactly one tag and one combination, so
/// both maps always sum to `stats().records`.
#[derive(Debug, Clone, Default)]
pub struct FlowCounts {
    tag_counts: HashMap<String, u64>,
    // port -> protocol -> count
    combination_counts: HashMap<u16, HashMap<String, u64>>,
    stats: ParseStats,
}

/// Adds one to `counts[key]`, allocating the key only on first sight.
fn increment(counts: &mut HashMap<String, u64>, key: &str) {
    match counts.get_mut(key) {
        Some(count) => *count += 1,
        None => {
            counts.insert(key.to_string(), 1);
        }
    }
}

impl FlowCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tag: &str, port: u16, protocol: &str) {
        increment(&mut self.tag_counts, tag);
        increment(self.combination_counts.entry(port).or_default(), protocol);
        self.stats.records += 1;
    }

    pub fn record_malformed(&mut self) {
        self.stats.malformed += 1;
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    #[cfg(test)]
    pub fn tag_count(&self, tag: &str) -> u64 {
        self.tag_counts.get(tag).copied().unwrap_or(0)
    }

    #[cfg(test)]
    pub fn combination_count(&self, port: u16, protocol: &str) -> u64 {
        self.combination_counts
            .get(&port)
            .and_then(|protocols| protocols.get(protocol))
            .copied()
            .unwrap_or(0)
    }

    pub fn tag_counts(&self) -> &HashMap<String, u64> {
        &self.tag_counts
    }

    /// Number of distinct (port, protocol) pairs seen.
    pub fn combination_len(&self) -> usize {
        self.combination_counts.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tag_counts.is_empty() && self.combination_counts.is_empty()
    }

    /// Tag counts, highest count first, ties broken by tag name.
    pub fn sorted_tag_counts(&self) -> Vec<TagCount> {
        let mut sorted: Vec<TagCount> = self
            .tag_counts
            .iter()
            .map(|(tag, &count)| TagCount {
                tag: tag.clone(),
                count,
            })
            .collect();
        sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        sorted
    }

    /// Combination counts ordered by port, then protocol name.
    pub fn sorted_combination_counts(&self) -> Vec<CombinationCount> {
        let mut sorted: Vec<CombinationCount> = self
            .combination_counts
            .iter()
            .flat_map(|(port, protocols)| {
                protocols.iter().map(move |(protocol, &count)| CombinationCount {
                    port: *port,
                    protocol: protocol.clone(),
                    count,
                })
            })
            .collect();
        sorted.sort_by(|a, b| (a.port, &a.protocol).cmp(&(b.port, &b.protocol)));
        sorted
    }
}
