use clap::Parser;

use paperbox::cli::{self, Cli};
use paperbox::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging()?;

    cli::run(cli)
}
