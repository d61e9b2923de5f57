use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ci-listener",
    version,
    about = "Live progress markers and issue files for fuzzing campaigns"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a JSON Lines event log through the listener
    Replay(ReplayArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Event log, one JSON event per line ('-' or omitted reads stdin)
    pub events: Option<PathBuf>,

    /// Listener config (YAML)
    #[arg(long, env = "CI_LISTENER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Issue file pattern with an {id} placeholder; overrides the config
    #[arg(long)]
    pub issue_file_pattern: Option<String>,
}
