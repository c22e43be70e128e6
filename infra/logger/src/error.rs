use std::borrow::Cow;

/// Errors raised while installing the global subscriber.
#[folio_derive::folio_error]
pub enum LoggerError {
    /// The rolling file appender could not be created (e.g., unwritable path).
    #[error("Rolling file appender error{}: {source}", format_context(context))]
    Appender { source: tracing_appender::rolling::InitError, context: Option<Cow<'static, str>> },

    /// A global tracing subscriber is already installed in this process.
    #[error("Tracing subscriber error{}: {source}", format_context(context))]
    Subscriber {
        source: tracing_subscriber::util::TryInitError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal logger error{}: {message}", format_context(context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Invalid builder settings.
    #[error("Invalid logger configuration{}: {message}", format_context(context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
