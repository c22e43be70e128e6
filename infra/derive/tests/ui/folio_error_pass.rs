use folio_derive::folio_error;
use std::borrow::Cow;

#[folio_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Conflict{}: expected {expected}, found {actual}", format_context(.context))]
    Conflict { expected: u64, actual: u64, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    Err::<(), _>(std::io::Error::other("disk")).context("Reading layout")?;
    Ok(())
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.kind(), "Io");
    assert!(err.to_string().contains("(Reading layout)"));

    let conflict = DemoError::Conflict { expected: 1, actual: 2, context: None };
    assert_eq!(conflict.kind(), "Conflict");

    let internal: DemoError = "boom".into();
    assert_eq!(internal.kind(), "Internal");
}
