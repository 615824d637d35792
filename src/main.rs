use anyhow::Result;
use clap::Parser;

use vartext::cli::{self, CliArgs};

fn main() -> Result<()> {
    vartext::tracing::init();

    let args = CliArgs::parse();
    cli::run(args)
}
