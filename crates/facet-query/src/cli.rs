//! Command-line interface definitions using clap.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Faceted-search criteria over taxonomy vocabularies
///
/// Classifies taxonomy vocabularies, restores criteria from RQL queries,
/// and serializes edited criteria back into RQL.
///
/// Exit Codes:
///   0  - Command succeeded
///   1  - Generic error occurred
///   2  - Invalid arguments or query text
///   3  - Vocabulary or file not found
///  10  - File system failure
#[derive(Parser)]
#[command(name = "facet-query")]
#[command(about = "Faceted-search criteria to RQL and back", long_about = None)]
pub struct Cli {
    /// Suppress non-essential output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output JSON envelopes instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: ./facet-query.toml)
    #[arg(long, global = true, env = "FACET_QUERY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every vocabulary of a taxonomy with its criterion kind
    Classify {
        /// Taxonomy JSON file
        taxonomy: PathBuf,
    },

    /// Flatten an RQL query into its leaf comparisons
    Walk {
        /// RQL text, e.g. "and(in(Mica.sex,(male)),ge(Mica.age,18))"
        query: String,
    },

    /// Show the criterion a query holds for one vocabulary
    Show {
        /// Taxonomy JSON file
        taxonomy: PathBuf,

        /// Vocabulary name
        vocabulary: String,

        /// Existing RQL query to restore the criterion from
        #[arg(long)]
        query: Option<String>,

        /// Field path prefix (default: config or taxonomy name)
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Edit one criterion and print the resulting query node
    ///
    /// Values are term ids for terms vocabularies, `LOW HIGH` for numeric
    /// ones (use "" for an open side), and the searched text for match ones.
    Set {
        /// Taxonomy JSON file
        taxonomy: PathBuf,

        /// Vocabulary name
        vocabulary: String,

        /// Operator to set (in, out, exists, missing, between, match, ...)
        #[arg(long)]
        operator: Option<String>,

        /// Value to set (repeatable)
        #[arg(long = "value")]
        values: Vec<String>,

        /// Existing RQL query to start from
        #[arg(long)]
        query: Option<String>,

        /// Field path prefix (default: config or taxonomy name)
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Restore every criterion from a query and rebuild the combined query
    Build {
        /// Taxonomy JSON file
        taxonomy: PathBuf,

        /// Existing RQL query
        #[arg(long)]
        query: Option<String>,

        /// Field path prefix (default: config or taxonomy name)
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Print the JSON Schema of the taxonomy file format
    Schema,
}
