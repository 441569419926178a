//! Command-line harness for the Friend Points module.
//!
//! `fp demo` runs a scripted two-player session against the in-memory
//! sandbox host and prints the resulting chat log, notifications, and
//! point pools. `fp pips` renders a single pip row.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "fp",
    about = "Demo harness for the Friend Points tabletop module",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// How the scripted point owner answers the reroll request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Answer {
    /// Spend the point and let the die be rerolled.
    Accept,
    /// Refuse the request.
    Decline,
    /// Never answer, so the request times out.
    Ignore,
}

impl Answer {
    fn label(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Decline => "decline",
            Self::Ignore => "ignore",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted two-player session end to end
    Demo {
        /// Seed for the host's dice server
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// How the point owner answers the request
        #[arg(short, long, default_value = "accept")]
        answer: Answer,

        /// Seconds to wait for the owner's answer
        #[arg(long, default_value = "30")]
        timeout_secs: u64,

        /// Write the sandbox event log to this file as JSON
        #[arg(short, long)]
        transcript: Option<PathBuf>,

        /// Print module and host logging to stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// Render a pip row for a point value and cap
    Pips {
        /// Current points
        #[arg(short, long)]
        value: u8,

        /// Point cap
        #[arg(short, long, default_value = "3")]
        max: u8,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Demo {
            seed,
            answer,
            timeout_secs,
            transcript,
            verbose,
        } => commands::demo::run(seed, answer, timeout_secs, transcript.as_deref(), verbose).await,
        Commands::Pips { value, max } => commands::pips::run(value, max),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
