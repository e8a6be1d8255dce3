//! Instance status classification.
//!
//! Maps a poll snapshot onto counts and a single verdict that drives the
//! start state machine. Pure; no I/O.

use serde::Serialize;

use crate::domain::app::{InstanceSnapshot, InstanceState};

/// Overall judgement on a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// Every instance runs and the requested count is reached.
    AllRunning,
    /// At least one instance is flapping or crashed.
    Flapping,
    /// Nothing failing, something not running yet.
    StillStarting,
    /// No instances reported yet.
    Empty,
}

/// Per-state counts for one snapshot plus its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Counts {
    pub running: usize,
    pub starting: usize,
    pub down: usize,
    pub flapping: usize,
    pub crashed: usize,
    pub unknown: usize,
}

impl Counts {
    /// Flapping plus crashed.
    #[must_use]
    pub fn failing(&self) -> usize {
        self.flapping + self.crashed
    }
}

/// Summary of an [`InstanceSnapshot`] against the requested instance count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateStatus {
    pub counts: Counts,
    pub requested: u32,
    pub verdict: Verdict,
}

impl AggregateStatus {
    /// Operator-facing progress line, e.g.
    /// `0 of 2 instances running, 1 starting, 1 failing`.
    #[must_use]
    pub fn progress_line(&self) -> String {
        let c = &self.counts;
        let mut line = format!("{} of {} instances running", c.running, self.requested);
        if c.starting > 0 {
            line.push_str(&format!(", {} starting", c.starting));
        }
        if c.down > 0 {
            line.push_str(&format!(", {} down", c.down));
        }
        if c.failing() > 0 {
            line.push_str(&format!(", {} failing", c.failing()));
        }
        line
    }
}

/// Classify a snapshot.
///
/// `Flapping` is decided before any count comparison: a failing instance
/// never reaches the target, so waiting longer is pointless.
#[must_use]
pub fn classify(snapshot: &InstanceSnapshot, requested: u32) -> AggregateStatus {
    let mut counts = Counts::default();
    for state in snapshot.iter() {
        match state {
            InstanceState::Running => counts.running += 1,
            InstanceState::Starting => counts.starting += 1,
            InstanceState::Down => counts.down += 1,
            InstanceState::Flapping => counts.flapping += 1,
            InstanceState::Crashed => counts.crashed += 1,
            InstanceState::Unknown => counts.unknown += 1,
        }
    }

    let all_running = counts.running == snapshot.len();
    let target_reached = counts.running >= usize::try_from(requested).unwrap_or(usize::MAX);

    let verdict = if counts.failing() > 0 {
        Verdict::Flapping
    } else if requested == 0 || (all_running && target_reached) {
        Verdict::AllRunning
    } else if snapshot.is_empty() {
        Verdict::Empty
    } else {
        Verdict::StillStarting
    };

    AggregateStatus {
        counts,
        requested,
        verdict,
    }
}
