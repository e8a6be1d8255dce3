//! Application and instance domain types.

use std::fmt;

use serde::Serialize;

// ── Application ───────────────────────────────────────────────────────────────

/// Desired lifecycle state recorded on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    Pending,
    Started,
    Stopped,
}

impl DesiredState {
    /// Parse the platform's state string (case-insensitive).
    ///
    /// Anything unrecognised is treated as `Pending`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "started" => Self::Started,
            "stopped" => Self::Stopped,
            _ => Self::Pending,
        }
    }

    /// Wire representation used in update requests.
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Started => "STARTED",
            Self::Stopped => "STOPPED",
        }
    }
}

/// A route bound to an application: `host` on `domain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteBinding {
    pub host: String,
    pub domain: String,
}

impl RouteBinding {
    /// Fully qualified hostname; a blank host maps to the bare domain.
    #[must_use]
    pub fn url(&self) -> String {
        if self.host.is_empty() {
            self.domain.clone()
        } else {
            format!("{}.{}", self.host, self.domain)
        }
    }
}

/// An application as seen by the start command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub name: String,
    pub guid: String,
    pub state: DesiredState,
    pub instance_count: u32,
    pub routes: Vec<RouteBinding>,
}

impl Application {
    /// Comma-separated list of route URLs, empty when unrouted.
    #[must_use]
    pub fn urls(&self) -> String {
        self.routes
            .iter()
            .map(RouteBinding::url)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ── Instances ─────────────────────────────────────────────────────────────────

/// State of one application instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceState {
    Starting,
    Running,
    Down,
    Flapping,
    Crashed,
    Unknown,
}

impl InstanceState {
    /// Parse the platform's state string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "starting" => Self::Starting,
            "running" => Self::Running,
            "down" => Self::Down,
            "flapping" => Self::Flapping,
            "crashed" => Self::Crashed,
            _ => Self::Unknown,
        }
    }

    /// Whether this instance will never converge on its own.
    #[must_use]
    pub fn is_failing(self) -> bool {
        matches!(self, Self::Flapping | Self::Crashed)
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Down => "down",
            Self::Flapping => "flapping",
            Self::Crashed => "crashed",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// The per-instance states returned by one poll, ordered by instance index.
///
/// Each poll produces a fresh snapshot; snapshots are never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceSnapshot {
    states: Vec<InstanceState>,
}

impl InstanceSnapshot {
    #[must_use]
    pub fn new(states: Vec<InstanceState>) -> Self {
        Self { states }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = InstanceState> + '_ {
        self.states.iter().copied()
    }
}

impl FromIterator<InstanceState> for InstanceSnapshot {
    fn from_iter<T: IntoIterator<Item = InstanceState>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
