//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use prodtrace_model::DepartmentCode;

#[derive(Parser)]
#[command(
    name = "prodtrace",
    version,
    about = "Supplier traceability for food production audit trails",
    long_about = "Resolve recipe ingredients to suppliers, record compliance audits when \
                  production runs are confirmed, and backfill unknown suppliers on \
                  existing audit records."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: $PRODTRACE_CONFIG, then ./prodtrace.toml).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

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
}

#[derive(Subcommand)]
pub enum Command {
    /// List configured departments and their supplier exports.
    Departments,

    /// Print the supplier records loaded for one department.
    Suppliers {
        #[arg(value_name = "DEPARTMENT")]
        department: DepartmentCode,
    },

    /// Resolve an ingredient to its supplier.
    Resolve(ResolveArgs),

    /// Write per-department supplier mapping exports.
    ExportMapping(ExportArgs),

    /// Show scaled ingredient quantities for a scheduled run.
    Usage {
        #[arg(value_name = "SCHEDULE_ID")]
        schedule_id: String,
    },

    /// Confirm a scheduled run and record its audit entry.
    Confirm(ConfirmArgs),

    /// Fill unknown suppliers on stored audit records.
    Backfill {
        /// Report what would change without saving.
        #[arg(long = "dry-run")]
        dry_run: bool,
    },

    /// Delete every audit record tied to a schedule.
    PurgeAudits {
        #[arg(value_name = "SCHEDULE_ID")]
        schedule_id: String,

        /// Report the count without saving.
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
}

#[derive(Args)]
pub struct ResolveArgs {
    #[arg(value_name = "DEPARTMENT")]
    pub department: DepartmentCode,

    #[arg(long = "prod-code", value_name = "CODE")]
    pub prod_code: Option<String>,

    #[arg(long = "description", value_name = "TEXT")]
    pub description: Option<String>,

    /// Fall back to every department when the department has no match.
    #[arg(long = "any-department")]
    pub any_department: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Export only this department.
    #[arg(long = "department", value_name = "DEPARTMENT")]
    pub department: Option<DepartmentCode>,
}

#[derive(Args)]
pub struct ConfirmArgs {
    #[arg(value_name = "SCHEDULE_ID")]
    pub schedule_id: String,

    /// Department manager signing off the run.
    #[arg(long = "manager", value_name = "NAME")]
    pub manager: String,

    /// Food handler responsible (default: the scheduled handler).
    #[arg(long = "handler", value_name = "NAME")]
    pub handler: Option<String>,

    /// Confirmation date, YYYY-MM-DD (default: today).
    #[arg(long = "date", value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// JSON array of per-ingredient details (batch_code, sell_by_date,
    /// receiving_date, country_of_origin), one entry per recipe ingredient.
    #[arg(long = "details", value_name = "FILE")]
    pub details: Option<PathBuf>,

    /// Build and print the record without saving.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
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
