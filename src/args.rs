use clap::{Args, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default file the report is written to.
pub const DEFAULT_EXPORT_PATH: &str = "output.txt";

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    /// The flow log file to tag
    pub flowlog_path: PathBuf,

    /// The lookup table CSV with port, protocol and tag columns
    pub lookup_path: PathBuf,

    /// JSON file mapping protocol numbers to names
    /// (default: the bundled IANA registry)
    #[clap(long)]
    pub protocol_map: Option<PathBuf>,

    /// Write the normalized lookup table (lowercase protocols, duplicates
    /// resolved) to this CSV file
    #[clap(long)]
    pub dump_lookup: Option<PathBuf>,

    /// Configuration file with the output options
    #[clap(short, long)]
    pub config_file: Option<PathBuf>,

    /// Output method
    #[clap(flatten)]
    pub output: OutputConfig,
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output method
    #[clap(short, long, value_enum, default_value = "file")]
    pub output: ExportMethodType,

    /// File path for output (used if method is File)
    #[clap(long, default_value = DEFAULT_EXPORT_PATH)]
    pub export_path: PathBuf,

    /// Report layout
    #[clap(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            output: ExportMethodType::File,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            format: ReportFormat::Text,
        }
    }
}

/// Layout of a configuration file loaded with `--config-file`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub output: OutputConfig,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMethodType {
    /// The report will be printed to the console
    Print,

    /// The report will be written to a file
    File,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Tab separated tables, one for tags and one for port/protocol pairs
    Text,

    /// A single JSON document
    Json,
}
