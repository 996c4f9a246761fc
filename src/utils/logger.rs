use chrono::Local;
use eyre::Result;
use fern::Dispatch;

/// Sets up the application logger with console output.
///
/// # Returns
/// * `Result<()>` - Success or failure of logger setup
///
/// # Errors
/// * If a logger has already been installed
pub fn setup_logger() -> Result<()> {
    Dispatch::new()
        // Set logging level from RUST_LOG env var or default to Info
        .level(level_from_env(std::env::var("RUST_LOG").ok().as_deref()))
        // Connection internals are only interesting when debugging them
        .level_for("lapin", log::LevelFilter::Warn)
        .level_for("hyper", log::LevelFilter::Warn)
        .chain(std::io::stdout())
        // Format log messages with time and log level
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

/// Level named by `RUST_LOG`, Info when unset or unparseable
fn level_from_env(value: Option<&str>) -> log::LevelFilter {
    value
        .and_then(|level| level.parse().ok())
        .unwrap_or(log::LevelFilter::Info)
}
