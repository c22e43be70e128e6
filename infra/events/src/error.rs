use std::borrow::Cow;

/// Errors that can occur during event bus operations.
#[folio_derive::folio_error]
pub enum EventBusError {
    /// An internal downcast failed; the type registry is inconsistent.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
