//! Retry mode selection.

use std::fmt;
use std::str::FromStr;

use aws_smithy_types::retry::RetryMode as SdkRetryMode;

/// Retry strategy requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RetryMode {
    /// Defer to the provider default.
    #[default]
    Unspecified,
    /// Standard exponential backoff with a retry quota.
    Standard,
    /// Standard plus client-side rate limiting.
    Adaptive,
    /// Legacy-compatible retries. Served by the standard strategy.
    Legacy,
}

impl RetryMode {
    /// Whether the caller asked for anything other than the provider default.
    pub fn is_specified(self) -> bool {
        self != RetryMode::Unspecified
    }

    /// SDK retry strategy serving this mode, or `None` when unspecified.
    pub(crate) fn sdk_mode(self) -> Option<SdkRetryMode> {
        match self {
            RetryMode::Unspecified => None,
            RetryMode::Standard | RetryMode::Legacy => Some(SdkRetryMode::Standard),
            RetryMode::Adaptive => Some(SdkRetryMode::Adaptive),
        }
    }
}

impl fmt::Display for RetryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryMode::Unspecified => write!(f, ""),
            RetryMode::Standard => write!(f, "standard"),
            RetryMode::Adaptive => write!(f, "adaptive"),
            RetryMode::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for RetryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Ok(RetryMode::Unspecified),
            "standard" => Ok(RetryMode::Standard),
            "adaptive" => Ok(RetryMode::Adaptive),
            "legacy" => Ok(RetryMode::Legacy),
            _ => Err(format!(
                "unknown retry mode: {} (expected standard, adaptive, or legacy)",
                s
            )),
        }
    }
}
