use super::args::*;

pub mod events;
pub mod replay;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Replay(args) => replay::run(args),
    }
}
