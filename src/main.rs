use anyhow::Result;
use clap::Parser;

use pairgit::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
