//! CLI argument definitions for `qbload`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use qb_model::FieldId;
use qb_output::{DEFAULT_MAX_BYTES, DEFAULT_MAX_RECORDS};
use qb_transform::ErrorPolicy;

#[derive(Parser)]
#[command(
    name = "qbload",
    version,
    about = "Pack tables into record upload payloads",
    long_about = "Pack a CSV table into JSON payloads for a record upload API.\n\n\
                  A schema file maps each column to a destination field id and \n\
                  field type; values are validated and encoded per type, then \n\
                  grouped into payloads under a byte and record limit."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Pack a table into payload files.
    Pack(PackArgs),

    /// Validate a schema file without reading a table.
    Check(CheckArgs),

    /// List the known field types.
    Types,
}

#[derive(Parser)]
pub struct PackArgs {
    /// CSV file with a header row.
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Schema file mapping columns to destination fields.
    #[arg(long = "schema", short = 's', value_name = "FILE")]
    pub schema: PathBuf,

    /// Destination table id (default: the schema's `_DBID_`).
    #[arg(long = "table-id", value_name = "ID")]
    pub table_id: Option<String>,

    /// Directory for payload files (default: <TABLE dir>/payloads).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Byte limit per payload.
    #[arg(long = "max-bytes", value_name = "N", default_value_t = DEFAULT_MAX_BYTES)]
    pub max_bytes: usize,

    /// Record limit per payload.
    #[arg(long = "max-records", value_name = "N", default_value_t = DEFAULT_MAX_RECORDS)]
    pub max_records: usize,

    /// Field ids the service should return, comma separated.
    #[arg(long = "fields-to-return", value_name = "IDS", value_delimiter = ',')]
    pub fields_to_return: Option<Vec<FieldId>>,

    /// Field id used to match existing records (upsert).
    #[arg(long = "merge-field-id", value_name = "ID")]
    pub merge_field_id: Option<FieldId>,

    /// Fail when the table has columns the schema does not map.
    #[arg(long = "reject-unmapped")]
    pub reject_unmapped: bool,

    /// What to send when some cells fail to pack.
    #[arg(long = "on-error", value_enum, default_value = "abort")]
    pub on_error: OnErrorArg,

    /// Read every column as text instead of inferring types.
    #[arg(long = "all-text")]
    pub all_text: bool,

    /// Pack and batch without writing payload files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Schema file to validate.
    #[arg(long = "schema", short = 's', value_name = "FILE")]
    pub schema: PathBuf,
}

/// CLI choices for rows with packing errors.
#[derive(Clone, Copy, ValueEnum)]
pub enum OnErrorArg {
    /// Send nothing.
    Abort,
    /// Send only records without errors.
    Skip,
    /// Send every record, leaving failed fields out.
    Partial,
}

impl From<OnErrorArg> for ErrorPolicy {
    fn from(arg: OnErrorArg) -> Self {
        match arg {
            OnErrorArg::Abort => ErrorPolicy::Abort,
            OnErrorArg::Skip => ErrorPolicy::SkipRecords,
            OnErrorArg::Partial => ErrorPolicy::SendPartial,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
