//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rule Manager CLI - check thresholds and work with rule definitions.
///
/// Run without a command to evaluate the built-in sample check.
#[derive(Debug, Parser)]
#[command(name = "rule-manager")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "RULE_MANAGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Human readable text and tables (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether a value meets a threshold
    Check(CheckArgs),

    /// Validate a rule tree against the field catalog
    Validate(RuleFileArgs),

    /// Print the template description of a rule tree
    Describe(DescribeArgs),

    /// Validate a draft rule version and settle its description
    Draft(RuleFileArgs),

    /// List the field catalog
    Fields,

    /// Validate a ruleset version and list its entries in run order
    Ruleset(RuleFileArgs),
}

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Measured value
    #[arg(allow_negative_numbers = true)]
    pub value: String,

    /// Threshold the value must meet
    #[arg(allow_negative_numbers = true)]
    pub threshold: String,
}

/// Arguments naming a JSON input.
#[derive(Debug, Parser)]
pub struct RuleFileArgs {
    /// JSON file, or `-` for stdin
    pub file: String,
}

/// Arguments for the describe command.
#[derive(Debug, Parser)]
pub struct DescribeArgs {
    /// Rule tree JSON file, or `-` for stdin
    pub file: String,

    /// Decision action (e.g. BLOCK)
    #[arg(short, long, default_value = "BLOCK")]
    pub action: String,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
