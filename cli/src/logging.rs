//! A minimal stderr logger for the CLI.
//!
//! Progress messages are logged at `info`, library diagnostics at `debug`
//! and `trace`. The level follows the `-v` and `-q` flags.

use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Writes log records to stderr, one line per record.
#[derive(Debug)]
pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    /// Creates a logger that emits records up to `level`.
    #[must_use]
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Returns the most verbose level emitted.
    #[must_use]
    pub const fn level(&self) -> LevelFilter {
        self.level
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let line = format_record(record.level(), record.target(), &record.args().to_string());
            if write_line(&mut std::io::stderr().lock(), &line).is_err() {
                // Nowhere left to report a failing stderr.
            }
        }
    }

    fn flush(&self) {
        if std::io::stderr().flush().is_err() {
            // Nothing left to flush into.
        }
    }
}

/// Maps the CLI verbosity flags to a level filter.
///
/// # Examples
///
/// ```
/// use log::LevelFilter;
/// use warden_cli::logging::level_for;
///
/// assert_eq!(level_for(0, false), LevelFilter::Info);
/// assert_eq!(level_for(0, true), LevelFilter::Error);
/// assert_eq!(level_for(2, false), LevelFilter::Trace);
/// ```
#[must_use]
pub const fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs a [`StderrLogger`] as the global logger.
///
/// # Errors
///
/// Returns [`SetLoggerError`] when a logger is already installed.
pub fn init(verbosity: u8, quiet: bool) -> Result<(), SetLoggerError> {
    let level = level_for(verbosity, quiet);
    log::set_boxed_logger(Box::new(StderrLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}

fn write_line(writer: &mut dyn Write, line: &str) -> std::io::Result<()> {
    writeln!(writer, "{line}")
}

fn format_record(level: Level, target: &str, message: &str) -> String {
    match level {
        Level::Info => message.to_owned(),
        Level::Error | Level::Warn => format!("{}: {message}", level.as_str().to_lowercase()),
        Level::Debug | Level::Trace => format!("[{level} {target}] {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::MetadataBuilder;
    use rstest::rstest;

    #[rstest]
    #[case(0, false, LevelFilter::Info)]
    #[case(1, false, LevelFilter::Debug)]
    #[case(3, false, LevelFilter::Trace)]
    #[case(0, true, LevelFilter::Error)]
    fn verbosity_flags_select_the_level(
        #[case] verbosity: u8,
        #[case] quiet: bool,
        #[case] expected: LevelFilter,
    ) {
        assert_eq!(level_for(verbosity, quiet), expected);
    }

    #[rstest]
    #[case(Level::Error, true)]
    #[case(Level::Info, true)]
    #[case(Level::Debug, false)]
    fn enabled_respects_the_level(#[case] level: Level, #[case] expected: bool) {
        let logger = StderrLogger::new(LevelFilter::Info);
        let metadata = MetadataBuilder::new().level(level).target("warden").build();

        assert_eq!(logger.enabled(&metadata), expected);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }
    }

    #[rstest]
    fn write_failures_are_reported_to_the_caller() {
        let mut sink = Vec::new();
        write_line(&mut sink, "loaded").expect("buffer accepts the line");
        assert_eq!(sink, b"loaded\n");

        assert!(write_line(&mut BrokenPipe, "loaded").is_err());
    }

    #[rstest]
    fn records_are_written_to_stderr() {
        let logger = StderrLogger::new(LevelFilter::Trace);
        let record = Record::builder()
            .level(Level::Info)
            .target("warden")
            .args(format_args!("loaded 2 definitions"))
            .build();

        logger.log(&record);
        logger.flush();
    }

    #[rstest]
    #[case(Level::Info, "loaded 2 definitions")]
    #[case(Level::Warn, "warn: loaded 2 definitions")]
    #[case(Level::Debug, "[DEBUG warden_suite::registry] loaded 2 definitions")]
    fn records_are_prefixed_by_severity(#[case] level: Level, #[case] expected: &str) {
        assert_eq!(
            format_record(level, "warden_suite::registry", "loaded 2 definitions"),
            expected
        );
    }
}
