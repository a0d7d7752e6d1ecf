use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use content_retriever::SortOrder;

/// Fetch, sort and print a remote content list
#[derive(Parser)]
#[command(name = "content-retriever")]
#[command(about = "A CLI tool for fetching and sorting content lists", long_about = None)]
pub struct Cli {
    /// Settings file (defaults to config.toml in the platform config directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the content list from the server
    Fetch {
        /// Override the base address (scheme and host)
        #[arg(long)]
        base: Option<String>,
        /// Override the relative path of the list endpoint
        #[arg(long)]
        path: Option<String>,
        /// Sort the list by id before printing
        #[arg(short, long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Print the bundled sample list
    Sample {
        /// Sort the list by id before printing
        #[arg(short, long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Show the resolved settings
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Asc => SortOrder::Ascending,
            SortArg::Desc => SortOrder::Descending,
        }
    }
}
