//! lineseek CLI
//!
//! Builds, appends to and queries a durable line index from the command
//! line. Logs go to stderr; stdout carries only results.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use lineseek::cli::{Cli, Commands};
use lineseek::{ingest, LineIndex, LineSearcher, SearchConfig, SearchError};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();

    match run(cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            match e.downcast_ref::<SearchError>() {
                Some(search_err) => eprintln!("Error [{}]: {search_err}", search_err.code()),
                None => eprintln!("Error: {e}"),
            }
            std::process::exit(exit_code(&e));
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let config = SearchConfig::default();
    match cli.command {
        Commands::Index(args) => {
            let records = ingest::read_lines(&args.file)?;
            let index = LineIndex::create(&cli.index_dir, &config)?;
            index.build(&records, true)?;
            info!(count = records.len(), dir = %cli.index_dir.display(), "index built");
            Ok(format!("indexed {} lines", records.len()))
        }
        Commands::Search(args) => {
            let searcher = LineSearcher::open(&cli.index_dir, config)?;
            let mut hits = if args.short {
                searcher.search_short(&args.query, args.precision)?
            } else {
                searcher.search_multi_stage(&args.query, args.precision)?
            };
            if let Some(limit) = args.limit {
                hits.truncate(limit);
            }
            if args.json {
                Ok(serde_json::to_string_pretty(&hits)?)
            } else {
                Ok(hits
                    .iter()
                    .map(|r| format!("{}\t{:.3}\t{}", r.line_number, r.score, r.line_text))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
        Commands::AppendFile(args) => {
            let searcher = LineSearcher::open(&cli.index_dir, config)?;
            let count = searcher.append_file(&args.file)?;
            Ok(format!("index now holds {count} lines"))
        }
        Commands::AppendLine(args) => {
            let searcher = LineSearcher::open(&cli.index_dir, config)?;
            let count = searcher.append_line(&args.text)?;
            Ok(format!("appended line {count}"))
        }
    }
}

/// Stable exit codes per error class, for scripting around the CLI.
fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<SearchError>() {
        Some(SearchError::QuerySyntax(_)) => 2,
        Some(SearchError::IndexUnavailable { .. }) => 3,
        Some(SearchError::EmptyIndexAppend) => 4,
        Some(SearchError::Index(_)) => 5,
        Some(SearchError::Io(_)) => 6,
        None => 1,
    }
}
