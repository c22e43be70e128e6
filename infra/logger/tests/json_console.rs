use folio_logger::{LevelFilter, LogFormat, Logger, LoggerError};

#[test]
fn console_logger_is_global_and_installed_once() {
    let logger = Logger::builder()
        .name("folio-console")
        .console_format(LogFormat::Json)
        .env_filter("folio=debug")
        .level(LevelFilter::WARN)
        .init()
        .expect("json console logger should initialize");

    tracing::warn!(version = 7, "layout committed");
    assert!(logger.guard().is_none(), "console output keeps no writer guard");

    let err = Logger::builder()
        .name("folio-console-again")
        .console(true)
        .init()
        .expect_err("a second global subscriber is refused");
    assert!(matches!(err, LoggerError::Subscriber { .. }));
}
