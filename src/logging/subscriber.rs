//! Console formatter, log-file layer, and subscriber installation.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

use super::utils::{HEADER_TIME, LINE_TIME, log_file_path, timestamp};

const STAGE_TARGET: &str = "dotfiler::stage";
const PLAN_TARGET: &str = "dotfiler::dry_run";
const PROMPT_TARGET: &str = "dotfiler::prompt";

/// The kinds of line [`Logger`](super::Logger) produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    Plan,
    Prompt,
    Info,
    Debug,
    Warn,
    Error,
}

impl Kind {
    fn of(metadata: &tracing::Metadata<'_>) -> Self {
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE_TARGET) => Self::Stage,
            (Level::INFO, PLAN_TARGET) => Self::Plan,
            (Level::INFO, PROMPT_TARGET) => Self::Prompt,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Plain-text form written to the log file.
    fn plain(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("==> {msg}"),
            Self::Plan => format!("    [plan] {msg}"),
            Self::Prompt => format!("    [prompt] {msg}"),
            Self::Info => format!("    {msg}"),
            Self::Debug => format!("    [debug] {msg}"),
            Self::Warn => format!("    [warn] {msg}"),
            Self::Error => format!("    [error] {msg}"),
        }
    }

    /// Colored form written to the terminal.
    fn colored(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::Plan => format!("  \x1b[33m[PLAN]\x1b[0m {msg}"),
            Self::Prompt => format!("\x1b[36m{msg}\x1b[0m"),
            Self::Info => format!("  {msg}"),
            Self::Debug => format!("  \x1b[2m{msg}\x1b[0m"),
            Self::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
            Self::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
        }
    }
}

/// Pulls the `message` field out of an event.
#[derive(Default)]
struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.0);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

fn message_of(event: &tracing::Event<'_>) -> String {
    let mut visitor = MessageVisitor::default();
    event.record(&mut visitor);
    visitor.0
}

/// Appends every event to the run's log file with a timestamp.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Log file for `command` under the cache directory.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::at(&log_file_path(command)?)
    }

    /// Truncate `path`, write a run header, and append to it from then on.
    pub(super) fn at(path: &Path) -> Option<Self> {
        let version =
            option_env!("DOTFILER_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        fs::write(
            path,
            format!("# dotfiler {version} {}\n", timestamp(HEADER_TIME)),
        )
        .ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let line = Kind::of(event.metadata()).plain(&message_of(event));
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "[{}] {line}", timestamp(LINE_TIME)).ok();
        }
    }
}

/// Console event format: one colored line per event, no span context.
struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        writeln!(
            writer,
            "{}",
            Kind::of(event.metadata()).colored(&message_of(event))
        )
    }
}

/// Install the global subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout; debug lines
/// reach the console only when `verbose`.  The log file always gets debug
/// and above.  Call once, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .event_format(ConsoleFormat)
                .with_writer(writer)
                .with_filter(console_level),
        )
        .with(FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG)))
        .init();
}
