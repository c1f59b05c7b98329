use std::borrow::Cow;

/// Errors raised while installing the global subscriber.
#[keel_derive::keel_error]
pub enum LoggerError {
    /// A builder or settings value was rejected before anything was installed.
    #[error("Invalid logger setting `{setting}`{}: {message}", format_context(.context))]
    InvalidSetting {
        setting: &'static str,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// The log directory could not be created.
    #[error("Log directory unavailable{}: {source}", format_context(.context))]
    LogDirectory { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The rolling file appender refused its configuration.
    #[error("Rolling file appender error{}: {source}", format_context(.context))]
    Appender { source: tracing_appender::rolling::InitError, context: Option<Cow<'static, str>> },

    /// Another global subscriber owns the process; only one logger can be installed.
    #[error("Global subscriber already installed{}: {source}", format_context(.context))]
    AlreadyInstalled {
        source: tracing_subscriber::util::TryInitError,
        context: Option<Cow<'static, str>>,
    },
}

impl LoggerError {
    pub(crate) fn invalid(setting: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidSetting { setting, message: message.into(), context: None }
    }
}
