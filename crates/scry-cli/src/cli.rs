//! Command-line definitions.

use clap::{Args, Parser, Subcommand};

use scry_core::enums::Period;

#[derive(Parser)]
#[command(name = "scry", about = "Research digest service", version)]
pub struct Cli {
    /// Only log errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Debug logging.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Produce a digest for a topic (served from cache when fresh).
    Digest(DigestArgs),
    /// Show the latest stored digest for a topic and window.
    Latest(LatestArgs),
    /// Print citation context for paper ids.
    Graph(GraphArgs),
    /// Refresh citation data for explicit paper ids.
    Sync(SyncArgs),
}

#[derive(Args)]
pub struct DigestArgs {
    /// Research topic to digest.
    pub topic: String,

    /// Paper-search window in days.
    #[arg(long, default_value_t = 7)]
    pub days: i64,

    /// Papers highlighted in the brief.
    #[arg(long = "top-k", default_value_t = 5)]
    pub top_k: i64,

    /// Digest cadence: weekly or monthly.
    #[arg(long, default_value = "weekly")]
    pub period: Period,

    /// Request speech synthesis for the summary.
    #[arg(long)]
    pub voice: bool,
}

#[derive(Args)]
pub struct LatestArgs {
    /// Research topic.
    pub topic: String,

    /// Paper-search window in days.
    #[arg(long, default_value_t = 7)]
    pub days: i64,
}

#[derive(Args)]
pub struct GraphArgs {
    /// Paper ids (arXiv ids or URLs) to use as roots.
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Outbound edges per root.
    #[arg(long, default_value_t = scry_citations::DEFAULT_MAX_NEIGHBORS)]
    pub max_neighbors: usize,
}

#[derive(Args)]
pub struct SyncArgs {
    /// Paper ids (arXiv ids or URLs) to refresh.
    #[arg(required = true)]
    pub ids: Vec<String>,
}
