//! Logging initialization using `tracing` and `tracing-subscriber`.
//!
//! - [`EnvFilter`] controls level filtering, read from `RUST_LOG`
//! - [`LogFormat`] controls the output format, read from `SNAPMAP_LOG_FORMAT`

use std::str::FromStr;

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Log output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, single-line logs.
    Full,

    /// A variant of the full format, optimized for short line lengths.
    Compact,

    /// Short lines without timestamps, targets or ANSI colors. Replay output stays diffable.
    Bare,

    /// Multi-line logs for local debugging.
    Pretty,

    /// Newline-delimited JSON logs.
    Json,
}

impl LogFormat {
    /// Installs the global subscriber. Panics if one is already installed.
    pub fn init(self, env_filter: EnvFilter) {
        // logs go to stderr, stdout carries replay events and generated GeoJSON
        let dispatch = match self {
            Self::Full => tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::NONE)
                .with_env_filter(env_filter)
                .finish()
                .into(),
            Self::Compact => tracing_subscriber::fmt()
                .compact()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::NONE)
                .with_env_filter(env_filter)
                .finish()
                .into(),
            Self::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter)
                .finish()
                .into(),
            Self::Bare => tracing_subscriber::fmt()
                .compact()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::NONE)
                .without_time()
                .with_target(false)
                .with_ansi(false)
                .with_env_filter(env_filter)
                .finish()
                .into(),
            Self::Json => tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::NONE)
                .with_env_filter(env_filter)
                .finish()
                .into(),
        };
        // `SubscriberInitExt::init()` would install its own `LogTracer` and clash with `init_log_bridge`
        tracing::dispatcher::set_global_default(dispatch)
            .expect("failed to set global default subscriber");
    }
}

impl Default for LogFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Compact
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            "pretty" | "verbose" => Ok(Self::Pretty),
            "bare" => Ok(Self::Bare),
            "json" | "jsonl" => Ok(Self::Json),
            _ => Err(format!(
                "Invalid log format '{s}'. Valid options: json, full, compact, bare or pretty"
            )),
        }
    }
}

/// Bridges `log` records into `tracing`. Call once, before installing the subscriber.
fn init_log_bridge(env_filter: &EnvFilter) {
    let mut log_builder = tracing_log::LogTracer::builder()
        .with_interest_cache(tracing_log::InterestCacheConfig::default());
    if let Some(Some(max_level)) = env_filter.max_level_hint().map(LevelFilter::into_level) {
        let max_level = match max_level {
            Level::DEBUG => log::LevelFilter::Debug,
            Level::INFO => log::LevelFilter::Info,
            Level::WARN => log::LevelFilter::Warn,
            Level::ERROR => log::LevelFilter::Error,
            Level::TRACE => log::LevelFilter::Trace,
        };
        log_builder = log_builder.with_max_level(max_level);
    }
    log_builder
        .init()
        .expect("failed to initialize log -> tracing bridge: LogTracer already set");
}

/// Initializes the global tracing subscriber for the given filter and format.
///
/// An invalid filter falls back to `debug`, an invalid format to [`LogFormat::default`].
pub fn init_tracing(filter: &str, format: Option<String>) {
    let env_filter = EnvFilter::from_str(filter).unwrap_or_else(|_| {
        eprintln!("Warning: Invalid filter string '{filter}' passed, falling back to debug logging");
        EnvFilter::new("debug")
    });

    let log_format = format
        .and_then(|s| {
            s.parse::<LogFormat>()
                .map_err(|e| {
                    eprintln!("Warning: {e}");
                    eprintln!(
                        "Falling back to default format ({:?})",
                        LogFormat::default()
                    );
                })
                .ok()
        })
        .unwrap_or_default();

    init_log_bridge(&env_filter);
    log_format.init(env_filter);
}

/// Mirrors the `snapmap=` level onto `snapmap_core` unless the latter is set explicitly.
#[must_use]
pub fn ensure_core_log_level_matches(env_filter: Option<String>, replacement: &'static str) -> String {
    let Some(rust_log) = env_filter else {
        return format!("{replacement}info,snapmap_core=info");
    };
    if !rust_log.contains(replacement) || rust_log.contains("snapmap_core=") {
        return rust_log;
    }
    match rust_log
        .split(',')
        .find_map(|s| s.strip_prefix(replacement))
    {
        Some(level) => format!("{rust_log},snapmap_core={level}"),
        None => rust_log,
    }
}
