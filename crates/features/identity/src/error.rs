use std::borrow::Cow;

/// A specialized [`IdentityError`] enum of this crate.
#[folio_derive::folio_error]
pub enum IdentityError {
    /// Malformed identity configuration.
    #[error("Identity config error{}: {message}", format_context(.context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal identity error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
