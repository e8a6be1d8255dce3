//! Application service: app start use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! Phases: `Updating → Staging → Monitoring → <outcome>`. The polling loop
//! is the only thing that changes state and the only writer to the reporter;
//! the log tailer feeds it lines over a channel.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::application::ports::{
    ApplicationRepository, InstanceRepository, LogsRepository, ProgressReporter,
};
use crate::application::services::instance_poller::{InstancePoller, Poll};
use crate::application::services::log_tailer::{LogTailer, TailEvent};
use crate::domain::{Application, DesiredState, StartSettings, Verdict};

/// Final result of one start invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum StartOutcome {
    /// All requested instances are running.
    Started { app: Application },
    /// Desired state was already `started`; nothing was changed.
    AlreadyStarted,
    /// The desired-state update was rejected.
    UpdateFailed { message: String },
    /// Staging failed or did not finish in time.
    StagingFailed { message: String },
    /// An instance is flapping or crashed.
    StartUnsuccessful,
    /// Instances did not reach running before the startup timeout.
    TimedOut,
}

impl StartOutcome {
    /// Whether the process should exit successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Started { .. } | Self::AlreadyStarted)
    }

    /// Operator-facing summary of a failed outcome.
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Started { .. } | Self::AlreadyStarted => None,
            Self::UpdateFailed { message } | Self::StagingFailed { message } => Some(message),
            Self::StartUnsuccessful => Some("Start unsuccessful"),
            Self::TimedOut => Some("Start app timeout"),
        }
    }
}

/// Who is starting the app, for the opening banner.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartTarget<'a> {
    pub org: Option<&'a str>,
    pub space: Option<&'a str>,
    pub user: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Staging,
    Monitoring,
}

/// Starts an application and supervises it until a terminal outcome.
pub struct AppStarter<'a, A, I, L> {
    apps: &'a A,
    instances: &'a I,
    logs: &'a L,
    settings: StartSettings,
}

impl<'a, A, I, L> AppStarter<'a, A, I, L>
where
    A: ApplicationRepository,
    I: InstanceRepository,
    L: LogsRepository,
{
    #[must_use]
    pub fn new(apps: &'a A, instances: &'a I, logs: &'a L, settings: StartSettings) -> Self {
        Self {
            apps,
            instances,
            logs,
            settings,
        }
    }

    /// Start `name` and wait for it to come up.
    ///
    /// Every outcome is reported through `reporter` before returning; the log
    /// tailer is stopped on every path that started it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the application cannot be read. Everything
    /// after that is expressed as a [`StartOutcome`].
    pub async fn start(
        &self,
        name: &str,
        target: StartTarget<'_>,
        reporter: &impl ProgressReporter,
    ) -> Result<StartOutcome> {
        let app = self
            .apps
            .read(name)
            .await
            .with_context(|| format!("reading app {name}"))?;

        if app.state == DesiredState::Started {
            tracing::info!(app = %app.name, "already started");
            reporter.warn(&format!("App {} is already started", app.name));
            return Ok(StartOutcome::AlreadyStarted);
        }

        reporter.step(&banner(&app, target));

        tracing::debug!(app = %app.name, "updating desired state");
        let app = match self.apps.update(&app.guid, DesiredState::Started).await {
            Ok(updated) => updated,
            Err(e) => {
                let outcome = StartOutcome::UpdateFailed {
                    message: format!("Error updating app.\n{e:#}"),
                };
                report(&outcome, reporter);
                return Ok(outcome);
            }
        };
        reporter.success("OK");

        let started_at = Instant::now();
        let cutoff = Utc::now();
        let mut tailer = LogTailer::start(self.logs, &app.guid, cutoff);

        let outcome = self.supervise(&app, started_at, &mut tailer, reporter).await;

        for event in tailer.stop().await {
            render_event(event, reporter);
        }
        tracing::info!(app = %app.name, ?outcome, "start finished");
        report(&outcome, reporter);
        Ok(outcome)
    }

    /// The polling loop. Returns on the first terminal condition.
    async fn supervise(
        &self,
        app: &Application,
        started_at: Instant,
        tailer: &mut LogTailer<'_>,
        reporter: &impl ProgressReporter,
    ) -> StartOutcome {
        let poller = InstancePoller::new(self.instances, &app.guid, app.instance_count);
        let staging_deadline = started_at.checked_add(self.settings.staging_timeout);
        let startup_deadline = started_at.checked_add(self.settings.startup_timeout);
        let mut phase = Phase::Staging;

        loop {
            match poller.poll().await {
                Poll::NotStaged => {
                    if expired(staging_deadline) {
                        return StartOutcome::StagingFailed {
                            message: format!(
                                "Error staging app: staging did not finish within {}",
                                humanize(self.settings.staging_timeout)
                            ),
                        };
                    }
                    reporter.progress("Staging app...");
                }
                Poll::Failed { message } => {
                    return StartOutcome::StagingFailed {
                        message: format!("Error staging app: {message}"),
                    };
                }
                Poll::Instances(status) => {
                    if phase == Phase::Staging {
                        tracing::debug!(app = %app.name, "staging complete");
                        phase = Phase::Monitoring;
                    }
                    match status.verdict {
                        Verdict::AllRunning => {
                            reporter.progress(&status.progress_line());
                            return StartOutcome::Started { app: app.clone() };
                        }
                        Verdict::Flapping => {
                            reporter.progress(&status.progress_line());
                            return StartOutcome::StartUnsuccessful;
                        }
                        Verdict::StillStarting | Verdict::Empty => {
                            if expired(startup_deadline) {
                                return StartOutcome::TimedOut;
                            }
                            reporter.progress(&status.progress_line());
                        }
                    }
                }
            }

            self.wait_for_next_tick(tailer, reporter).await;
        }
    }

    /// Sleep one ping throttle, rendering log lines as they arrive.
    async fn wait_for_next_tick(
        &self,
        tailer: &mut LogTailer<'_>,
        reporter: &impl ProgressReporter,
    ) {
        let pause = tokio::time::sleep(self.settings.ping_throttle);
        tokio::pin!(pause);
        loop {
            tokio::select! {
                () = &mut pause => return,
                Some(event) = tailer.next_event() => render_event(event, reporter),
            }
        }
    }
}

fn banner(app: &Application, target: StartTarget<'_>) -> String {
    let mut line = format!("Starting app {}", app.name);
    if let (Some(org), Some(space)) = (target.org, target.space) {
        line.push_str(&format!(" in org {org} / space {space}"));
    }
    if let Some(user) = target.user {
        line.push_str(&format!(" as {user}"));
    }
    line.push_str("...");
    line
}

fn render_event(event: TailEvent, reporter: &impl ProgressReporter) {
    match event {
        TailEvent::Line(message) => reporter.log_line(&message.render()),
        TailEvent::Failed(cause) => reporter.warn(&format!("error tailing logs: {cause}")),
    }
}

fn report(outcome: &StartOutcome, reporter: &impl ProgressReporter) {
    match outcome.failure_message() {
        None => reporter.success("Started"),
        Some(message) => reporter.failed(message),
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

fn humanize(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{secs}s")
    }
}
