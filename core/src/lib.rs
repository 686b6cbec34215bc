use anyhow::Context;
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::{Encode, pattern::PatternEncoder},
    filter::threshold::ThresholdFilter,
};
use std::{backtrace, env};

pub mod action;
pub mod constants;
pub mod names;
pub mod types;

const LOGGING_PATTERN: &str = "{d} {l} {t} - {m}\n";

/// Pattern encoder that appends a captured backtrace to error records when
/// `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` is set.
#[derive(Debug)]
struct BacktracePatternEncoder {
    inner: PatternEncoder,
    with_backtrace: bool,
}

impl BacktracePatternEncoder {
    fn new(pattern: &str) -> Self {
        BacktracePatternEncoder {
            inner: PatternEncoder::new(pattern),
            with_backtrace: env::var("RUST_BACKTRACE").is_ok()
                || env::var("RUST_LIB_BACKTRACE").is_ok(),
        }
    }
}

impl Encode for BacktracePatternEncoder {
    fn encode(
        &self,
        w: &mut dyn log4rs::encode::Write,
        record: &log::Record<'_>,
    ) -> anyhow::Result<()> {
        if record.level() != log::Level::Error || !self.with_backtrace {
            return self.inner.encode(w, record);
        }

        let args = format_args!(
            "{}\nBacktrace:\n{}",
            record.args(),
            backtrace::Backtrace::capture()
        );
        let with_trace = log::Record::builder()
            .args(args)
            .level(record.level())
            .target(record.target())
            .module_path(record.module_path())
            .file(record.file())
            .line(record.line())
            .build();
        self.inner.encode(w, &with_trace)
    }
}

/// Installs the process-wide logger.
///
/// Records at `log_level` and above go to stderr. When `file_path` is given
/// every record at `log_level` and above is also appended to that file.
pub fn initialize_logger(log_level: LevelFilter, file_path: Option<&str>) -> anyhow::Result<()> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(BacktracePatternEncoder::new(LOGGING_PATTERN)))
        .build();

    let mut config_builder = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(log_level)))
            .build("stderr", Box::new(stderr)),
    );
    let mut root = Root::builder().appender("stderr");

    if let Some(path) = file_path {
        let logfile = FileAppender::builder()
            .encoder(Box::new(BacktracePatternEncoder::new(LOGGING_PATTERN)))
            .build(path)
            .with_context(|| format!("failed to open log file {path}"))?;
        config_builder =
            config_builder.appender(Appender::builder().build("logfile", Box::new(logfile)));
        root = root.appender("logfile");
    }

    let config = config_builder
        .build(root.build(log_level))
        .context("invalid logger configuration")?;
    log4rs::init_config(config).context("logger already initialized")?;

    Ok(())
}
