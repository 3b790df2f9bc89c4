//! picdigest CLI: print the distinct content digests of every image under a directory.

use anyhow::Result;
use clap::Parser;
use picdigest::engine::{Cli, handle_run};
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
