use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const TRACE_ENV: &str = "ALLOT_TRACE";
const FORMAT_ENV: &str = "ALLOT_LOG_FORMAT";
const FILE_ENV: &str = "ALLOT_LOG_FILE";
const DEFAULT_LEVEL: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

fn parse_format(value: Option<&str>) -> Result<LogFormat, String> {
    match value.map(str::trim) {
        None | Some("") | Some("pretty") => Ok(LogFormat::Pretty),
        Some("json") => Ok(LogFormat::Json),
        Some(other) => Err(format!(
            "{FORMAT_ENV} must be 'json' or 'pretty', got '{other}'"
        )),
    }
}

fn resolve_level(level: Option<&str>) -> String {
    level
        .map(str::to_string)
        .or_else(|| std::env::var(TRACE_ENV).ok())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

fn build_filter(level: &str) -> Result<EnvFilter, String> {
    if level.eq_ignore_ascii_case("off") {
        return Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()));
    }
    EnvFilter::try_new(level).map_err(|err| format!("invalid log filter '{level}': {err}"))
}

fn stderr_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    match format {
        LogFormat::Json => fmt::layer().with_writer(io::stderr).json().boxed(),
        LogFormat::Pretty => fmt::layer().with_writer(io::stderr).pretty().boxed(),
    }
}

/// Install the global subscriber.
///
/// Level comes from `level`, else `ALLOT_TRACE`, else `warn`. Does nothing
/// when a subscriber is already installed.
pub fn init(level: Option<&str>) -> Result<(), String> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = build_filter(&resolve_level(level))?;
    let format = parse_format(std::env::var(FORMAT_ENV).ok().as_deref())?;

    let file_layer = match std::env::var(FILE_ENV) {
        Ok(path) if !path.trim().is_empty() => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|err| format!("failed to open log file '{path}': {err}"))?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer(format))
        .with(file_layer)
        .try_init()
        .map_err(|err| format!("failed to install log subscriber: {err}"))
}
