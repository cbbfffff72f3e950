use crate::err;
use crate::result::UiResult;
use tracing::Level;

pub fn init_logging() -> UiResult<()> {
    init_logging_with_level(Level::DEBUG)
}

pub fn init_logging_with_level(level: Level) -> UiResult<()> {
    tracing_subscriber::fmt()
        .with_thread_names(true)
        .with_max_level(level)
        .try_init()
        .map_err(|error| err!(General, "Failed to install subscriber: {}", error))?;
    Ok(())
}
