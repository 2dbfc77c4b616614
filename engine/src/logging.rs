use anyhow::Context;
use log4rs::{
    append::{console::ConsoleAppender, file::FileAppender},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    Handle,
};
use once_cell::sync::OnceCell;

use crate::config::LogConfig;

const CONSOLE_PATTERN: &str = "[{d(%H:%M:%S)} {h({l})}]: {m}{n}";
const FILE_PATTERN: &str = "[{d(%Y-%m-%d %H:%M:%S)} {l} {M}]: {m}{n}";

static LOGGER: OnceCell<Handle> = OnceCell::new();

/// Installs the logger. Calling it again swaps in the new configuration.
pub fn init_logger(config: &LogConfig) -> anyhow::Result<()> {
    let log_config = build_config(config)?;

    if let Some(handle) = LOGGER.get() {
        handle.set_config(log_config);
        return Ok(());
    }

    let handle = log4rs::init_config(log_config).context("Error installing logger")?;
    // Losing this race means another thread just installed a logger, which is fine
    let _ = LOGGER.set(handle);
    Ok(())
}

fn build_config(config: &LogConfig) -> anyhow::Result<Config> {
    let level = config.level_filter()?;

    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();
    let mut builder =
        Config::builder().appender(Appender::builder().build("console", Box::new(console)));
    let mut root = Root::builder().appender("console");

    if let Some(path) = &config.file {
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
            .build(path)
            .with_context(|| format!("Error opening log file {}", path.display()))?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file)));
        root = root.appender("file");
    }

    builder
        .build(root.build(level))
        .context("Error building logger config")
}
