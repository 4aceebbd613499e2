//! Narrow leveled logging interface used by the bootstrap sequence.
//!
//! Any backend can be plugged in by implementing [`Logger`]. The default,
//! [`TracingLogger`], forwards every call to `tracing`.

use std::fmt::{self, Display, Write as _};

/// Structured key/value attributes attached to a log call.
pub type Fields<'a> = &'a [(&'a str, &'a dyn Display)];

/// Leveled, structured logging sink.
///
/// Log calls never influence control flow.
pub trait Logger: Send + Sync + fmt::Debug {
    /// Non-critical diagnostics.
    fn debug(&self, message: &str, fields: Fields<'_>);

    /// Informational events.
    fn info(&self, message: &str, fields: Fields<'_>);

    /// Recoverable anomalies.
    fn warn(&self, message: &str, fields: Fields<'_>);

    /// Failures.
    fn error(&self, message: &str, fields: Fields<'_>);
}

/// Forwards log calls to `tracing` events under the `aws_secrets_bootstrap` target.
///
/// `tracing` field names are fixed at compile time, so the caller's key/value
/// pairs are recorded as one `fields` value rendered as `key=value key=value`.
/// Subscribers that need the pairs individually should implement [`Logger`]
/// directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

/// Discards every log call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

/// Render fields as `key=value` pairs separated by spaces.
pub(crate) fn render_fields(fields: Fields<'_>) -> String {
    let mut out = String::new();
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "{key}={value}");
    }
    out
}

macro_rules! forward_to_tracing {
    ($($method:ident => $macro:ident),* $(,)?) => {
        impl Logger for TracingLogger {
            $(
                fn $method(&self, message: &str, fields: Fields<'_>) {
                    if fields.is_empty() {
                        tracing::$macro!("{message}");
                    } else {
                        tracing::$macro!(fields = %render_fields(fields), "{message}");
                    }
                }
            )*
        }
    };
}

forward_to_tracing!(debug => debug, info => info, warn => warn, error => error);

impl Logger for NoopLogger {
    fn debug(&self, _message: &str, _fields: Fields<'_>) {}
    fn info(&self, _message: &str, _fields: Fields<'_>) {}
    fn warn(&self, _message: &str, _fields: Fields<'_>) {}
    fn error(&self, _message: &str, _fields: Fields<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fields() {
        let attempts = 5;
        let fields: Fields<'_> = &[("maxAttempts", &attempts), ("mode", &"adaptive")];
        assert_eq!(render_fields(fields), "maxAttempts=5 mode=adaptive");
    }

    #[test]
    fn test_render_no_fields() {
        assert_eq!(render_fields(&[]), "");
    }

    #[test]
    fn test_loggers_accept_calls() {
        let loggers: [&dyn Logger; 2] = [&TracingLogger, &NoopLogger];
        for logger in loggers {
            logger.debug("debug", &[("k", &1)]);
            logger.info("info", &[]);
            logger.warn("warn", &[]);
            logger.error("error", &[("k", &"v")]);
        }
    }
}
