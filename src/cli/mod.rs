//! Command-line surface
//!
//! Without a subcommand the interactive browser starts. `list` prints the
//! collection and exits; `version` and `--version` print build metadata.

pub mod tree;

use crate::models::{FileStore, SnippetStore};
use crate::search::SearchMode;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::Path;

/// `snipster <version> (<commit> <date>)`, omitting metadata not supplied at build time
pub fn version_string() -> String {
    let meta: Vec<&str> = [option_env!("SNIPSTER_COMMIT"), option_env!("SNIPSTER_BUILD_DATE")]
        .into_iter()
        .flatten()
        .filter(|value| !value.is_empty())
        .collect();

    if meta.is_empty() {
        format!("snipster {}", env!("CARGO_PKG_VERSION"))
    } else {
        format!("snipster {} ({})", env!("CARGO_PKG_VERSION"), meta.join(" "))
    }
}

#[derive(Debug, Parser)]
#[command(name = "snipster", about = "Terminal snippet manager", disable_version_flag = true)]
pub struct Cli {
    /// Print version information and exit
    #[arg(short = 'V', long = "version", visible_short_alias = 'v')]
    pub version: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print version information and exit
    Version,
    /// Print the snippet tree, or the snippets matching a query
    #[command(visible_alias = "ls")]
    List {
        #[arg(short, long)]
        query: Option<String>,
        /// Use fuzzy matching for the query
        #[arg(short, long)]
        fuzzy: bool,
    },
}

impl Cli {
    /// Accepts the single-dash `-version` spelling before handing off to clap
    pub fn parse_lenient() -> Self {
        let args = std::env::args_os().map(|arg| {
            if arg == "-version" {
                "--version".into()
            } else {
                arg
            }
        });
        Self::parse_from(args)
    }

    pub fn wants_version(&self) -> bool {
        self.version || matches!(self.command, Some(Command::Version))
    }
}

/// Runs a non-interactive command against the storage root
pub fn execute(command: &Command, root: &Path) -> Result<()> {
    match command {
        Command::Version => println!("{}", version_string()),
        Command::List { query, fuzzy } => {
            let store = FileStore::new(root.to_path_buf());
            let snippets = store
                .load_all()
                .with_context(|| format!("Failed to load snippets from {}", root.display()))?;

            let query = query.as_deref().map(str::trim).unwrap_or_default();
            let lines = if query.is_empty() {
                tree::render_tree(&snippets)
            } else {
                let mode = if *fuzzy {
                    SearchMode::Fuzzy
                } else {
                    SearchMode::Substring
                };
                tree::render_matches(&snippets, query, mode)
            };

            if lines.is_empty() {
                println!("{}  No snippets found", "┃".bright_magenta());
            }
            for line in lines {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
