//! Run: drives stdin through the pipeline onto stdout.

use std::io;

use tracing::info;

use crate::error::{Error, Result};
use crate::render::RenderOptions;
use crate::scanner;

pub fn run(opts: &RenderOptions) -> Result<()> {
    info!("reading stdin...");

    let stdin = io::stdin();
    let stdout = io::stdout();

    match scanner::process(stdin.lock(), stdout.lock(), opts) {
        // A closed pipe downstream (`| head`) is a normal way to stop
        Err(Error::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
