use clap::{Parser, Subcommand};

use self::{blocks::BlocksArg, compile::CompileArg};

mod blocks;
mod compile;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compile per-participant exports into the aggregate summary tables
    Compile(#[clap(flatten)] CompileArg),
    /// Segment one export into blocks and report per-block summaries
    Blocks(#[clap(flatten)] BlocksArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match &args.mode {
        Mode::Compile(arg) => compile::run(arg)?,
        Mode::Blocks(arg) => blocks::run(arg)?,
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_writer(std::io::stderr)
        .init();
}
