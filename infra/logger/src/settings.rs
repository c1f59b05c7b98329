use crate::builder::{Logger, LoggerBuilder, NoFile, WithName};
use crate::error::{LoggerError, LoggerErrorExt};
use keel_domain::config::LoggerSettings;
use tracing::level_filters::LevelFilter;

impl Logger {
    /// Initializes the global subscriber from deserialized settings.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidSetting`] for an unknown level, plus everything
    /// [`LoggerBuilder::init`] can return.
    pub fn from_settings(settings: &LoggerSettings) -> Result<Self, LoggerError> {
        let builder = builder_from(settings)?;
        match &settings.path {
            Some(path) => {
                let builder = builder.path(path).max_files(settings.max_files);
                if settings.json { builder.json().init() } else { builder.init() }
            },
            None => builder.init(),
        }
    }
}

/// Applies the settings that do not depend on file output.
pub(crate) fn builder_from(
    settings: &LoggerSettings,
) -> Result<LoggerBuilder<WithName, NoFile>, LoggerError> {
    let level = settings
        .level
        .parse::<LevelFilter>()
        .map_err(|e| LoggerError::invalid("level", format!("'{}': {e}", settings.level)))
        .context("logger.level")?;

    let builder = Logger::builder().name(&settings.name).console(settings.console).level(level);
    Ok(match &settings.env_filter {
        Some(filter) => builder.env_filter(filter),
        None => builder,
    })
}
