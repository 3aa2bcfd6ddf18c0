use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Arguments which control logging. Logs are always written to stderr,
/// because stdout carries the result reported back to the host.
#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    /// The minimum level of logs to emit.
    #[clap(
        long = "log.level",
        value_enum,
        default_value_t = LogLevel::Warn,
        env = "LOG_LEVEL",
        global = true
    )]
    pub level: LogLevel,
    /// The format of emitted logs. Defaults to `color` if stderr is a terminal,
    /// and `text` otherwise.
    #[clap(long = "log.format", value_enum, env = "LOG_FORMAT", global = true)]
    pub format: Option<LogFormat>,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON lines.
    Json,
    /// Plain text without colors.
    Text,
    /// Text with ANSI colors.
    Color,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Install a global tracing subscriber per `args`.
/// Directives of `RUST_LOG`, if set, refine the configured level.
pub fn init_logging(args: &LogArgs) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(args.level).into())
        .from_env_lossy();

    let format = args.format.unwrap_or_else(|| {
        if atty::is(atty::Stream::Stderr) {
            LogFormat::Color
        } else {
            LogFormat::Text
        }
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
        LogFormat::Text => builder.with_ansi(false).try_init(),
        LogFormat::Color => builder.with_ansi(true).try_init(),
    };

    if let Err(error) = result {
        eprintln!("failed to initialize logging: {error}");
    }
}
