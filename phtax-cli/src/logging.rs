use anyhow::{Context, Result};
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal},
    path::Path,
    sync::Mutex,
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Event formatter: local time, level, emitting crate, then the fields.
///
/// Stderr only needs the time of day; the log file also gets the date.
pub struct LocalFmt {
    time_format: &'static str,
}

impl LocalFmt {
    pub const TERMINAL: Self = Self {
        time_format: "%H:%M:%S%.3f",
    };
    pub const FILE: Self = Self {
        time_format: "%Y-%m-%d %H:%M:%S%.3f",
    };
}

/// Warnings and errors are highlighted; other levels print plain.
fn level_style(level: Level) -> Option<&'static str> {
    match level {
        Level::ERROR => Some("\x1b[1;31m"),
        Level::WARN => Some("\x1b[1;33m"),
        _ => None,
    }
}

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let source = meta.target().split("::").next().unwrap_or_default();

        write!(writer, "{} ", Local::now().format(self.time_format))?;
        match level_style(*meta.level()).filter(|_| writer.has_ansi_escapes()) {
            Some(style) => write!(writer, "{style}{:>5}\x1b[0m ", meta.level())?,
            None => write!(writer, "{:>5} ", meta.level())?,
        }
        write!(writer, "{source}: ")?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Builds the level filter. `RUST_LOG` takes precedence over `level`,
/// which may be a bare level ("warn") or any `EnvFilter` directive.
pub fn level_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level '{level}'")),
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))
}

/// Installs the global subscriber. Call once at startup.
///
/// - Stderr: coloured when attached to a terminal, plain when piped. Stdout
///   is left to command output.
/// - File: appended to when `file` is given, never coloured.
pub fn init_logging(
    level: &str,
    file: Option<&Path>,
) -> Result<()> {
    let filter = level_filter(level)?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt::TERMINAL)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = match file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .event_format(LocalFmt::FILE)
                .with_ansi(false)
                .with_writer(Mutex::new(open_log_file(path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialised")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture(
        format: LocalFmt,
        ansi: bool,
        f: impl FnOnce(),
    ) -> String {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(ansi)
            .event_format(format)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, f);
        buffer.contents()
    }

    #[test]
    fn formats_level_source_and_fields() {
        let output = capture(LocalFmt::TERMINAL, false, || {
            tracing::warn!(amount = 5, "negative salary")
        });

        assert!(output.contains(" WARN phtax_cli: "), "{output}");
        assert!(output.ends_with("negative salary amount=5\n"), "{output}");
        assert!(!output.contains("logging.rs"), "{output}");
    }

    #[test]
    fn plain_output_has_no_escapes() {
        let output = capture(LocalFmt::TERMINAL, false, || tracing::error!("boom"));

        assert!(!output.contains('\x1b'), "{output}");
    }

    #[test]
    fn only_problems_are_coloured() {
        let warn = capture(LocalFmt::TERMINAL, true, || tracing::warn!("careful"));
        let info = capture(LocalFmt::TERMINAL, true, || tracing::info!("fine"));

        assert!(warn.contains("\x1b[1;33m WARN\x1b[0m"), "{warn:?}");
        assert!(info.contains(" INFO phtax_cli: fine"), "{info:?}");
        assert!(!info.contains("\x1b[1;"), "{info:?}");
    }

    #[test]
    fn file_lines_carry_the_date() {
        let output = capture(LocalFmt::FILE, false, || tracing::info!("saved"));
        let line = regex::Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}  INFO phtax_cli: saved\n$").unwrap();

        assert!(line.is_match(&output), "{output}");
    }

    #[test]
    fn bare_level_is_a_valid_filter() {
        assert!(EnvFilter::try_new("debug").is_ok());
        assert!(EnvFilter::try_new("warn,phtax_core=debug").is_ok());
    }

    #[test]
    fn log_file_is_opened_for_append() {
        let path = std::env::temp_dir().join(format!("phtax-log-{}.log", std::process::id()));
        std::fs::write(&path, "existing\n").unwrap();

        {
            use std::io::Write;
            let mut file = open_log_file(&path).unwrap();
            writeln!(file, "appended").unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(contents, "existing\nappended\n");
    }
}
