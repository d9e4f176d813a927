use anyhow::Result;
use clap::Parser;

mod cli;
mod cmd_emit;
mod cmd_respond;
mod cmd_status;
mod cmd_tail;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Tail {
            path,
            follow,
            poll_ms,
        } => cmd_tail::exec(path, follow, poll_ms),

        cli::Cmd::Status { path } => cmd_status::exec(path),

        cli::Cmd::Emit { dir, traces } => cmd_emit::exec(dir, traces),

        cli::Cmd::Respond { dir, key, command } => cmd_respond::exec(dir, key, command),
    }
}
