//! CLI struct definitions for the oskar command-line interface.
//!
//! All clap-derived types live here. Dispatch logic lives in `lib.rs`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::filter::{FilterState, RawFilter, RawToken};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[clap(
    name = "oskar",
    version = env!("CARGO_PKG_VERSION"),
    about = "Filter, navigate and roll up an ambitions / quarterly objectives / key results / actions tree.",
    disable_version_flag = true
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

/// Filter flags; repeat a flag to select several values (OR inside a field).
#[derive(clap::Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Ambition id.
    #[clap(long = "ambition", value_name = "ID")]
    pub ambitions: Vec<String>,
    /// Quarter: Q1, Q2, Q3 or Q4.
    #[clap(long = "quarter", value_name = "QUARTER")]
    pub quarters: Vec<String>,
    /// Year of the quarterly objective.
    #[clap(long = "year", value_name = "YEAR")]
    pub years: Vec<String>,
    /// Quarterly objective id.
    #[clap(long = "objective", value_name = "ID")]
    pub objectives: Vec<String>,
    /// Action priority: low, medium, high or critical.
    #[clap(long = "priority", value_name = "PRIORITY")]
    pub priorities: Vec<String>,
    /// Action status: todo, in_progress or done.
    #[clap(long = "status", value_name = "STATUS")]
    pub statuses: Vec<String>,
    /// Action label.
    #[clap(long = "label", value_name = "LABEL")]
    pub labels: Vec<String>,
}

impl FilterArgs {
    /// Flags in the same wire form a config `[filter]` table loads from.
    pub fn to_raw_filter(&self) -> RawFilter {
        let tokens = |values: &[String]| -> Vec<RawToken> {
            values.iter().cloned().map(RawToken::Text).collect()
        };
        RawFilter {
            ambition_ids: tokens(&self.ambitions),
            quarters: tokens(&self.quarters),
            years: tokens(&self.years),
            objective_ids: tokens(&self.objectives),
            priorities: tokens(&self.priorities),
            statuses: tokens(&self.statuses),
            labels: tokens(&self.labels),
        }
    }

    /// Repeated values collapse; unknown values are logged and match nothing.
    pub fn to_filter_state(&self) -> FilterState {
        FilterState::from(self.to_raw_filter())
    }
}

#[derive(clap::Args, Debug)]
pub struct ScopeArgs {
    /// Config file (defaults to `.oskar/config.toml` when present).
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Snapshot JSON file; overrides the config's `snapshot`.
    #[clap(long)]
    pub snapshot: Option<PathBuf>,
    /// Output format.
    #[clap(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
    /// Ignore the `[filter]` table of the config file.
    #[clap(long)]
    pub no_config_filter: bool,
    #[clap(flatten)]
    pub filter: FilterArgs,
}

#[derive(clap::Args, Debug)]
pub struct TreeCli {
    #[clap(flatten)]
    pub scope: ScopeArgs,
    /// Flip the disclosure of a node after the first-load expansion (repeatable).
    #[clap(long = "toggle", value_name = "ID")]
    pub toggles: Vec<String>,
    /// Start fully collapsed instead of expanding the first two levels.
    #[clap(long)]
    pub collapsed: bool,
}

#[derive(clap::Args, Debug)]
pub struct DashboardCli {
    #[clap(flatten)]
    pub scope: ScopeArgs,
    /// Reference date (YYYY-MM-DD); defaults to today.
    #[clap(long)]
    pub today: Option<String>,
    /// Days ahead counted as upcoming; overrides the config.
    #[clap(long)]
    pub horizon: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the filtered tree
    Tree(TreeCli),
    /// Print the filtered projections and their counts
    Filter(ScopeArgs),
    /// Describe the active filters
    Summary(ScopeArgs),
    /// List the label and year values available for filtering
    Facets(ScopeArgs),
    /// Dashboard metrics and upcoming deadlines
    Dashboard(DashboardCli),
    /// Print version
    Version,
}
