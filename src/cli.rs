//! CLI argument definitions
//!
//! Subcommands for building, querying and appending to a line index.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// lineseek CLI
#[derive(Parser)]
#[command(name = "lineseek")]
#[command(about = "Staged fuzzy search over a line-oriented text corpus", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Index directory
    #[arg(short = 'd', long, global = true, env = "LINESEEK_INDEX", default_value = "lineseek-index")]
    pub index_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a fresh index from a line file
    Index(IndexArgs),
    /// Run a staged search against the index
    Search(SearchArgs),
    /// Append every line of a file to an existing index
    AppendFile(AppendFileArgs),
    /// Append a single line to an existing index
    AppendLine(AppendLineArgs),
}

/// Index build arguments
#[derive(Parser, Debug)]
pub struct IndexArgs {
    /// Line file to index (one document per line, numbered from 1)
    pub file: PathBuf,
}

/// Search arguments
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Query text
    pub query: String,

    /// Match precision, 0-100 (100 is near-exact)
    #[arg(short, long, default_value_t = 90)]
    pub precision: u32,

    /// Single-pass short search (no narrowing stages)
    #[arg(short, long)]
    pub short: bool,

    /// Emit results as JSON instead of tab-separated lines
    #[arg(long)]
    pub json: bool,

    /// Maximum number of results to print
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// File append arguments
#[derive(Parser, Debug)]
pub struct AppendFileArgs {
    /// Line file whose lines continue the existing numbering
    pub file: PathBuf,
}

/// Single-line append arguments
#[derive(Parser, Debug)]
pub struct AppendLineArgs {
    /// Line text to append
    pub text: String,
}
