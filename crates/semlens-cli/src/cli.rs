//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "semlens",
    version,
    about = "Explore tabular data through semantic schemas, joins and lineage",
    long_about = "Explore tabular data through semantic schemas.\n\n\
                  Map CSV/JSON columns to schema roles, render them as hierarchy, network,\n\
                  timeline, treemap, heatmap, map or flow views, join bundles on roles and\n\
                  trace lineage between datasets."
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
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the built-in schemas and their roles.
    Schemas,

    /// Profile every column of a CSV or JSON file.
    Profile(ProfileArgs),

    /// Create an empty project file.
    Init(InitArgs),

    /// Load a file into a project as a new bundle.
    Add(AddArgs),

    /// Render a bundle or virtual bundle as JSON view data.
    View(ViewArgs),

    /// Execute a join and print the joined rows as JSON.
    Join(JoinArgs),

    /// Export the project's lineage graph as JSON.
    Lineage(LineageArgs),
}

#[derive(Args)]
pub struct ProjectArg {
    /// Project file (JSON).
    #[arg(long = "project", short = 'p', value_name = "FILE")]
    pub project: PathBuf,
}

#[derive(Args)]
pub struct ProfileArgs {
    /// CSV or JSON file to profile.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number of most frequent values to keep per column.
    #[arg(long = "top", default_value_t = 5)]
    pub top: usize,

    /// Print profiles as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,

    /// Keep every cell as text instead of inferring numbers and booleans.
    #[arg(long = "no-infer")]
    pub no_infer: bool,
}

#[derive(Args)]
pub struct InitArgs {
    /// Path of the project file to create.
    #[arg(value_name = "FILE")]
    pub project: PathBuf,

    /// Project display name.
    #[arg(long = "name", default_value = "Untitled")]
    pub name: String,

    /// Overwrite an existing file.
    #[arg(long = "force")]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub project: ProjectArg,

    /// CSV or JSON file to load.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Schema id the bundle uses (see `semlens schemas`).
    #[arg(long = "schema", default_value = "builtin-tabular")]
    pub schema: String,

    /// Bundle id (default: file stem).
    #[arg(long = "id")]
    pub id: Option<String>,

    /// Column to role mapping as COLUMN=ROLE; repeatable.
    #[arg(long = "map", value_name = "COLUMN=ROLE")]
    pub mappings: Vec<String>,
}

#[derive(Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub project: ProjectArg,

    /// Bundle or virtual bundle id.
    #[arg(long = "bundle", short = 'b')]
    pub bundle: String,

    /// Number of most frequent values to keep per column in tabular views.
    #[arg(long = "top", default_value_t = 5)]
    pub top: usize,
}

#[derive(Args)]
pub struct JoinArgs {
    #[command(flatten)]
    pub project: ProjectArg,

    /// Join id.
    #[arg(long = "join", short = 'j')]
    pub join: String,

    /// Print flat rows with `left_`/`right_` prefixed columns.
    #[arg(long = "flat")]
    pub flat: bool,
}

#[derive(Args)]
pub struct LineageArgs {
    #[command(flatten)]
    pub project: ProjectArg,

    /// Export shape.
    #[arg(long = "format", value_enum, default_value = "viz")]
    pub format: LineageFormatArg,

    /// Print the deletion impact of a bundle instead of the whole graph.
    #[arg(long = "impact", value_name = "BUNDLE")]
    pub impact: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LineageFormatArg {
    /// Nodes and edges for graph rendering.
    Viz,
    /// Entities and relationships for knowledge-graph tools.
    Kg,
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
