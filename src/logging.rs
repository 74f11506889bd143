use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;
use crate::errors::ConfigError;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} - {m}{n}";
const LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;
const LOG_FILE_COUNT: u32 = 3;

/// Sets up the global logger with a rolling log file and optionally stdout
///
/// # Arguments
///
/// * 'log_path' - path to the log file, rolled files get a numeric suffix
/// * 'level' - max level to log
/// * 'log_to_stdout' - whether to also log to stdout
pub fn setup_logger(log_path: &str, level: LevelFilter, log_to_stdout: bool) -> Result<Handle, ConfigError> {
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}.{{}}", log_path), LOG_FILE_COUNT)
        .map_err(|e| ConfigError(e.to_string()))?;
    let trigger = SizeTrigger::new(LOG_FILE_SIZE);
    let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

    let logfile = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(log_path, Box::new(policy))?;

    let mut builder = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)));
    let mut root = Root::builder().appender("logfile");

    if log_to_stdout {
        let stdout = ConsoleAppender::builder()
            .target(Target::Stdout)
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        builder = builder.appender(Appender::builder().build("stdout", Box::new(stdout)));
        root = root.appender("stdout");
    }

    let config = builder.build(root.build(level))?;

    Ok(log4rs::init_config(config)?)
}
