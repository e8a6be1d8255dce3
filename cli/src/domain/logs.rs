//! Log message types and the staging-log filter.

use chrono::{DateTime, Utc};

/// Component that emitted a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    /// Staging output (`STG`): buildpack compile, droplet upload.
    Staging,
    /// Anything else: `App`, `RTR`, `DEA`, `API`, ...
    Runtime(String),
}

impl LogSource {
    /// Tag used by the platform for staging output.
    pub const STAGING_TAG: &'static str = "STG";

    /// Build a source from the platform's `source_name`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        if tag == Self::STAGING_TAG {
            Self::Staging
        } else {
            Self::Runtime(tag.to_string())
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Staging => Self::STAGING_TAG,
            Self::Runtime(tag) => tag,
        }
    }

    #[must_use]
    pub fn is_staging(&self) -> bool {
        matches!(self, Self::Staging)
    }
}

/// One streamed log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub source: LogSource,
    pub timestamp: DateTime<Utc>,
    /// `true` when written to stderr.
    pub is_error: bool,
    pub text: String,
}

impl LogMessage {
    /// Render as `HH:MM:SS [STG] OUT text`.
    #[must_use]
    pub fn render(&self) -> String {
        let stream = if self.is_error { "ERR" } else { "OUT" };
        format!(
            "{} [{}] {stream} {}",
            self.timestamp.format("%H:%M:%S"),
            self.source.tag(),
            self.text.trim_end()
        )
    }
}

/// Whether a streamed message belongs to the current start attempt.
///
/// Only staging output emitted at or after `cutoff` is relevant; the stream
/// also carries history and runtime output from other instances.
#[must_use]
pub fn is_relevant(message: &LogMessage, cutoff: DateTime<Utc>) -> bool {
    message.source.is_staging() && message.timestamp >= cutoff
}
