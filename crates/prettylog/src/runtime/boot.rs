//! Boot: logging init, config load, option resolution.

use std::io::IsTerminal;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use signal_hook::consts::signal::SIGINT;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::conf::{Config, ConfigSource};
use crate::error::{Error, Result};
use crate::render::{ColorMode, RenderOptions};

/// Initialise the tracing / logging subsystem.
///
/// Diagnostics go to stderr; stdout carries only rendered log lines.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prettylog=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load config, apply flags and resolve the color mode for stdout.
pub fn boot(cli: &Cli) -> Result<RenderOptions> {
    let source = ConfigSource::locate(cli.config.as_deref());
    let mut config = Config::load(&source)?;

    cli.apply(&mut config);
    config.validate().map_err(Error::InvalidConfig)?;

    if config.ignore_interrupts {
        ignore_interrupts()?;
        info!("Ignoring interrupts, reading until stdin closes");
    }

    let requested = config.color().map_err(Error::InvalidConfig)?;
    let color = resolve_color(requested);
    info!("Color mode: requested={}, resolved={}", requested, color);

    let opts = config.render_options(color).map_err(Error::InvalidConfig)?;
    debug!(
        "Render options: sort_longest={}, skip_unchanged={}, truncate={} ({}), light_bg={}, time_format={:?}",
        opts.sort_longest, opts.skip_unchanged, opts.truncate, opts.truncate_length, opts.light_bg, opts.time_format
    );
    debug!(
        "Field candidates: time={:?}, message={:?}, level={:?}",
        opts.time_fields, opts.message_fields, opts.level_fields
    );

    Ok(opts)
}

/// Replace the default SIGINT action so Ctrl-C no longer stops the process.
///
/// The producer upstream still gets the signal and exits; whatever it wrote
/// before that is drained and rendered.
pub fn ignore_interrupts() -> Result<()> {
    signal_hook::flag::register(SIGINT, Arc::new(AtomicBool::new(false)))?;
    Ok(())
}

/// Settle `auto` against stdout once, before any line is read.
pub fn resolve_color(requested: ColorMode) -> ColorMode {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    requested.resolve(std::io::stdout().is_terminal(), no_color)
}
