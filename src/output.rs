use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::{
    args::{ExportMethodType, ReportFormat},
    flow_counts::{CombinationCount, FlowCounts, ParseStats, TagCount},
};
use log::{debug, info};
use serde::Serialize;

#[derive(Serialize)]
struct Report {
    tag_counts: Vec<TagCount>,
    combination_counts: Vec<CombinationCount>,
    stats: ParseStats,
}

pub struct ReportWriter {
    format: ReportFormat,
    writer: BufWriter<Box<dyn Write>>,
}

impl ReportWriter {
    pub fn new(
        export_type: ExportMethodType,
        format: ReportFormat,
        file_path: &Path,
    ) -> io::Result<Self> {
        let writer: BufWriter<Box<dyn Write>> = match export_type {
            ExportMethodType::File => {
                debug!("Creating report file {}", file_path.display());
                let file = File::create(file_path)?;
                BufWriter::new(Box::new(file))
            }
            ExportMethodType::Print => BufWriter::new(Box::new(io::stdout())),
        };

        Ok(ReportWriter { format, writer })
    }

    /// Writes the full report and flushes the underlying writer.
    pub fn write_report(&mut self, counts: &FlowCounts) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => write_text(&mut self.writer, counts)?,
            ReportFormat::Json => write_json(&mut self.writer, counts)?,
        }
        self.writer.flush()?;
        info!(
            "Generated report with {} tags and {} port/protocol combinations",
            counts.tag_counts().len(),
            counts.combination_len()
        );
        Ok(())
    }
}

/// Writes the tag table followed by the port/protocol table, tab separated.
pub fn write_text<W: Write>(writer: &mut W, counts: &FlowCounts) -> io::Result<()> {
    writeln!(writer, "Tag Counts:")?;
    writeln!(writer)?;
    writeln!(writer, "Tag\t\tCount")?;
    for entry in counts.sorted_tag_counts() {
        writeln!(writer, "{}\t\t{}", entry.tag, entry.count)?;
    }

    writeln!(writer)?;
    writeln!(writer, "Port/Protocol Combination Counts:")?;
    writeln!(writer)?;
    writeln!(writer, "Port\tProtocol\tCount")?;
    for entry in counts.sorted_combination_counts() {
        writeln!(writer, "{}\t{}\t{}", entry.port, entry.protocol, entry.count)?;
    }
    Ok(())
}

pub fn write_json<W: Write>(writer: &mut W, counts: &FlowCounts) -> io::Result<()> {
    let report = Report {
        tag_counts: counts.sorted_tag_counts(),
        combination_counts: counts.sorted_combination_counts(),
        stats: counts.stats(),
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)
}
