use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Viewer/maintenance CLI для кольца nablog
#[derive(Parser, Debug)]
#[command(name = "nablog", version, about = "nablog ring log CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Drain the ring and print decoded events
    Tail {
        #[arg(long, default_value = "nabang.blog")]
        path: PathBuf,
        /// Keep polling after the ring runs dry
        #[arg(long, default_value_t = false)]
        follow: bool,
        /// Poll interval in follow mode, ms
        #[arg(long, default_value_t = 50)]
        poll_ms: u64,
    },
    /// Print per-page headers, totals and process-local metrics
    Status {
        #[arg(long, default_value = "nabang.blog")]
        path: PathBuf,
    },
    /// Emit demo traffic (writer side; truncates the target ring)
    Emit {
        /// Directory for the log file
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// How many trace records to emit
        #[arg(long, default_value_t = 100)]
        traces: u32,
    },
    /// Answer a pending validation checkpoint
    Respond {
        /// Directory the writer polls for command files
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Checkpoint key from the `<valid:K>` line
        #[arg(long)]
        key: i32,
        /// break | continue | ignore
        #[arg(long)]
        command: String,
    },
}
