//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Browser history analytics.
///
/// Reads Firefox, Chrome, and Safari history stores read-only and derives
/// categorization, session, and productivity insights. Output is JSON on
/// stdout.
#[derive(Debug, Parser)]
#[command(name = "bh", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Probe which browser history stores are readable right now.
    Detect,

    /// Fetch normalized history entries.
    Fetch {
        /// How many days back to read.
        #[arg(long)]
        days: Option<u32>,

        /// Read a single source (firefox, chrome, safari).
        #[arg(long, conflicts_with = "all")]
        source: Option<String>,

        /// Merge every available source instead of auto-detecting one.
        #[arg(long)]
        all: bool,
    },

    /// Segment history into enriched browsing sessions.
    Sessions {
        /// How many days back to read.
        #[arg(long)]
        days: Option<u32>,

        /// Inactivity gap, in hours, that closes a session.
        #[arg(long)]
        max_gap_hours: Option<f64>,
    },

    /// Build the full insight report.
    Insights {
        /// How many days back to read.
        #[arg(long)]
        days: Option<u32>,

        /// How many domains to keep in the frequency table.
        #[arg(long)]
        top_domains: Option<usize>,
    },

    /// Search fetched history by URL or title substring.
    Search {
        /// Case-insensitive query.
        query: String,
    },

    /// List URLs that no category rule matched.
    Suggest,
}
