use clap::Parser;
use prettylog::cli::Cli;
use prettylog::runtime::{boot, run};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    boot::init_logging();
    let opts = boot::boot(&cli)?;
    run::run(&opts)?;
    Ok(())
}
