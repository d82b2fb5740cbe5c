use chrono::Local;
use eyre::Result;
use fern::Dispatch;

/// Sets up the application logger with console output on stderr.
///
/// Results go to stdout, so logs stay out of the way of `--json` output.
///
/// # Errors
/// * If a logger is already installed
pub fn setup_logger() -> Result<()> {
    Dispatch::new()
        // Set logging level from RUST_LOG env var or default to Info
        .level(
            std::env::var("RUST_LOG")
                .map(|level| level.parse().unwrap_or(log::LevelFilter::Info))
                .unwrap_or(log::LevelFilter::Info),
        )
        .chain(std::io::stderr())
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ));
        })
        .apply()?;
    Ok(())
}
