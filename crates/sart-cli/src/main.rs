mod command;
mod export;
mod io;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
