//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "courtside")]
#[command(about = "AI shot feedback for basketball videos", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a video and print the detected shots
    Analyze {
        /// Video file to analyze
        video: PathBuf,

        /// Print the full report as JSON
        #[arg(long, default_value = "false")]
        json: bool,

        /// Print the URL-safe shot payload for `replay --shots`
        #[arg(long, default_value = "false")]
        payload: bool,
    },

    /// Play back a shot list and print feedback as it appears
    Replay {
        /// URL-encoded shot payload (example feedback when omitted)
        #[arg(long, conflicts_with = "shots_file")]
        shots: Option<String>,

        /// File containing a shot payload
        #[arg(long)]
        shots_file: Option<PathBuf>,

        /// Length of the simulated video in seconds
        #[arg(long, default_value = "30")]
        duration: f64,

        /// Start at this position instead of the beginning
        #[arg(long)]
        start: Option<f64>,

        /// Jump to this shot (by index) before playing
        #[arg(long)]
        select: Option<usize>,
    },

    /// Extract shots from a saved model response ("-" reads stdin)
    Parse {
        /// Response text file
        response: PathBuf,

        /// Print the shots as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
}
