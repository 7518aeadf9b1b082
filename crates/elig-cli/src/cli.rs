//! CLI argument definitions for the eligibility screener.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use elig_ingest::SourceLayout;

#[derive(Parser)]
#[command(
    name = "elig",
    version,
    about = "Clinical trial eligibility screener",
    long_about = "Screen patients against a trial protocol's inclusion/exclusion criteria.\n\n\
                  Patients come from a narrative note dataset or from per-patient\n\
                  CSV source folders. Each rule is reported as passed, failed or\n\
                  missing, and unknown data never counts as a pass."
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

    /// Log output format (pretty for human, json for machine parsing).
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

    /// Allow patient data (notes, extracted values) in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Screen every note of a narrative dataset.
    Notes(NotesArgs),

    /// Screen patients from a folder of per-patient CSV sources.
    Patients(PatientsArgs),

    /// List the rules of a protocol.
    Rules(RulesArgs),
}

#[derive(Parser)]
pub struct NotesArgs {
    /// Tab-separated dataset with `patient_id` and `note` columns.
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// Protocol JSON file.
    #[arg(long = "protocol", value_name = "FILE")]
    pub protocol: PathBuf,

    /// Only screen rows of this trial.
    #[arg(long = "trial-id", value_name = "ID")]
    pub trial_id: Option<String>,

    /// Only screen this patient.
    #[arg(long = "patient", value_name = "ID")]
    pub patient: Option<String>,

    /// Print reports as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct PatientsArgs {
    /// Folder holding `<PATIENT_ID>_<source>.csv` files.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Protocol JSON file.
    #[arg(long = "protocol", value_name = "FILE")]
    pub protocol: PathBuf,

    /// Patients to screen (default: every patient found in DIR).
    #[arg(value_name = "PATIENT_ID")]
    pub patient_ids: Vec<String>,

    /// Reviewer assessment shared by every patient in DIR (e.g. "eligible").
    #[arg(long = "assessment", value_name = "LABEL")]
    pub assessment: Option<String>,

    /// Print reports as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,

    #[command(flatten)]
    pub sources: SourceArgs,
}

/// Overrides for the per-patient source file suffixes.
#[derive(Args)]
pub struct SourceArgs {
    /// Note source suffixes, highest priority first.
    #[arg(long = "note-source", value_name = "SUFFIX", value_delimiter = ',')]
    pub note_sources: Vec<String>,

    /// Lab source suffixes, highest priority first.
    #[arg(long = "lab-source", value_name = "SUFFIX", value_delimiter = ',')]
    pub lab_sources: Vec<String>,

    /// Urinalysis source suffixes, highest priority first.
    #[arg(long = "urinalysis-source", value_name = "SUFFIX", value_delimiter = ',')]
    pub urinalysis_sources: Vec<String>,

    /// Column holding the free-text note in note sources.
    #[arg(long = "note-column", value_name = "COLUMN")]
    pub note_column: Option<String>,
}

impl SourceArgs {
    /// Default layout with any given overrides applied.
    pub fn layout(&self) -> SourceLayout {
        let mut layout = SourceLayout::default();
        if !self.note_sources.is_empty() {
            layout.note_sources.clone_from(&self.note_sources);
        }
        if !self.lab_sources.is_empty() {
            layout.lab_sources.clone_from(&self.lab_sources);
        }
        if !self.urinalysis_sources.is_empty() {
            layout.urinalysis_sources.clone_from(&self.urinalysis_sources);
        }
        if let Some(column) = &self.note_column {
            layout.note_column.clone_from(column);
        }
        layout
    }
}

#[derive(Parser)]
pub struct RulesArgs {
    /// Protocol JSON file.
    #[arg(long = "protocol", value_name = "FILE")]
    pub protocol: PathBuf,
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
