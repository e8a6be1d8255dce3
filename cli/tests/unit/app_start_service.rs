//! Scenario tests for the `app_start` application service.
//!
//! Every port is faked; timings are shrunk to milliseconds.

#![allow(clippy::expect_used)]

use std::time::Duration;

use liftoff_cli::application::services::app_start::{AppStarter, StartOutcome, StartTarget};
use liftoff_cli::domain::InstanceState::{Down, Flapping, Running, Starting};
use liftoff_cli::domain::{DesiredState, StartSettings};

use crate::mocks::{
    Event, FakeApps, FakeLog, FakeLogs, RecordingReporter, ScriptedInstances, app, fast_settings,
    not_staged, snapshot, staging_error,
};

async fn run(
    apps: &FakeApps,
    instances: &ScriptedInstances,
    logs: &FakeLogs,
    settings: StartSettings,
    reporter: &RecordingReporter,
) -> StartOutcome {
    AppStarter::new(apps, instances, logs, settings)
        .start("my-app", StartTarget::default(), reporter)
        .await
        .expect("app is readable")
}

// ── Happy paths ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn started_once_all_instances_run() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 2));
    let instances = ScriptedInstances::new(vec![
        snapshot(&[Starting, Starting]),
        snapshot(&[Starting, Starting]),
        snapshot(&[Running, Running]),
    ]);
    let logs = FakeLogs::empty();
    let reporter = RecordingReporter::default();

    let outcome = run(&apps, &instances, &logs, fast_settings(), &reporter).await;

    assert!(matches!(outcome, StartOutcome::Started { .. }));
    assert_eq!(apps.update_calls(), 1);
    assert_eq!(instances.calls(), 3);
    assert!(
        reporter
            .of(Event::Progress)
            .contains(&"0 of 2 instances running, 2 starting".to_string())
    );
    let events = reporter.events();
    assert_eq!(events[0], (Event::Step, "Starting app my-app...".to_string()));
    assert_eq!(events[1], (Event::Success, "OK".to_string()));
    assert_eq!(reporter.last(), (Event::Success, "Started".to_string()));
}

#[tokio::test]
async fn staging_then_started_shows_only_fresh_staging_logs() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 2));
    let instances = ScriptedInstances::new(vec![
        not_staged(),
        not_staged(),
        snapshot(&[Down, Starting]),
        snapshot(&[Starting, Starting]),
        snapshot(&[Running, Running]),
    ]);
    let logs = FakeLogs::new(vec![
        FakeLog::Stale("STG", "from a previous push"),
        FakeLog::Line("App", "runtime output"),
        FakeLog::Line("STG", "Downloading buildpack"),
        FakeLog::Line("STG", "Uploading droplet"),
    ]);
    let reporter = RecordingReporter::default();

    let outcome = run(&apps, &instances, &logs, fast_settings(), &reporter).await;

    assert!(matches!(outcome, StartOutcome::Started { .. }));
    assert!(reporter.of(Event::Progress).contains(&"Staging app...".to_string()));
    assert!(
        reporter
            .of(Event::Progress)
            .contains(&"0 of 2 instances running, 1 starting, 1 down".to_string())
    );

    let lines = reporter.of(Event::Log);
    assert_eq!(lines.len(), 2, "only fresh staging lines: {lines:?}");
    assert!(lines.iter().all(|l| l.contains("[STG] OUT")));
    assert!(lines[0].ends_with("Downloading buildpack"));
    assert!(lines[1].ends_with("Uploading droplet"));
    assert_eq!(reporter.last(), (Event::Success, "Started".to_string()));
}

#[tokio::test]
async fn zero_requested_instances_start_immediately() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 0));
    let instances = ScriptedInstances::new(vec![snapshot(&[])]);
    let logs = FakeLogs::empty();
    let reporter = RecordingReporter::default();

    let outcome = run(&apps, &instances, &logs, fast_settings(), &reporter).await;

    assert!(matches!(outcome, StartOutcome::Started { .. }));
    assert_eq!(instances.calls(), 1);
}

#[tokio::test]
async fn started_outcome_carries_updated_app() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 1));
    let instances = ScriptedInstances::new(vec![snapshot(&[Running])]);
    let logs = FakeLogs::empty();
    let reporter = RecordingReporter::default();

    let outcome = run(&apps, &instances, &logs, fast_settings(), &reporter).await;

    let StartOutcome::Started { app } = outcome else {
        panic!("expected Started, got {outcome:?}");
    };
    assert_eq!(app.state, DesiredState::Started);
    assert_eq!(app.urls(), "my-app.apps.example.com");
}

// ── Already started ──────────────────────────────────────────────────────────

#[tokio::test]
async fn already_started_makes_no_further_calls() {
    let apps = FakeApps::new(app("my-app", DesiredState::Started, 2));
    let instances = ScriptedInstances::new(vec![snapshot(&[Running, Running])]);
    let logs = FakeLogs::empty();
    let reporter = RecordingReporter::default();

    let outcome = run(&apps, &instances, &logs, fast_settings(), &reporter).await;

    assert_eq!(outcome, StartOutcome::AlreadyStarted);
    assert!(outcome.is_success());
    assert_eq!(apps.update_calls(), 0);
    assert_eq!(instances.calls(), 0);
    assert_eq!(
        reporter.events(),
        vec![(Event::Warn, "App my-app is already started".to_string())]
    );
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_failure_is_reported_without_polling() {
    let apps = FakeApps::failing_update(app("my-app", DesiredState::Stopped, 1), "quota exceeded");
    let instances = ScriptedInstances::new(vec![snapshot(&[Running])]);
    let logs = FakeLogs::empty();
    let reporter = RecordingReporter::default();

    let outcome = run(&apps, &instances, &logs, fast_settings(), &reporter).await;

    let StartOutcome::UpdateFailed { message } = &outcome else {
        panic!("expected UpdateFailed, got {outcome:?}");
    };
    assert!(message.starts_with("Error updating app."));
    assert!(message.contains("quota exceeded"));
    assert_eq!(instances.calls(), 0);
    assert_eq!(reporter.last().0, Event::Failed);
}

#[tokio::test]
async fn staging_error_code_fails_with_backend_message() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 2));
    let instances = ScriptedInstances::new(vec![not_staged(), staging_error()]);
    let logs = FakeLogs::empty();
    let reporter = RecordingReporter::default();

    let outcome = run(&apps, &instances, &logs, fast_settings(), &reporter).await;

    let StartOutcome::StagingFailed { message } = &outcome else {
        panic!("expected StagingFailed, got {outcome:?}");
    };
    assert!(message.contains("Error staging app"));
    assert!(message.contains("cannot get instances since staging failed"));
    let (kind, last) = reporter.last();
    assert_eq!(kind, Event::Failed);
    assert!(last.contains("Error staging app"));
    assert!(!outcome.is_success());
}

#[tokio::test]
async fn staging_error_beats_expired_deadlines_on_the_same_tick() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 2));
    let instances = ScriptedInstances::new(vec![staging_error()]);
    let logs = FakeLogs::empty();
    let reporter = RecordingReporter::default();
    let settings = StartSettings {
        staging_timeout: Duration::ZERO,
        startup_timeout: Duration::ZERO,
        ..fast_settings()
    };

    let outcome = run(&apps, &instances, &logs, settings, &reporter).await;

    let StartOutcome::StagingFailed { message } = &outcome else {
        panic!("expected StagingFailed, got {outcome:?}");
    };
    assert!(message.contains("cannot get instances since staging failed"));
    assert!(!message.contains("staging did not finish"));
    assert_eq!(instances.calls(), 1);
}

#[tokio::test]
async fn not_staged_on_an_expired_deadline_times_out_before_a_later_error() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 2));
    let instances = ScriptedInstances::new(vec![not_staged(), staging_error()]);
    let logs = FakeLogs::empty();
    let reporter = RecordingReporter::default();
    let settings = StartSettings {
        staging_timeout: Duration::ZERO,
        startup_timeout: Duration::ZERO,
        ..fast_settings()
    };

    let outcome = run(&apps, &instances, &logs, settings, &reporter).await;

    let StartOutcome::StagingFailed { message } = &outcome else {
        panic!("expected StagingFailed, got {outcome:?}");
    };
    assert!(message.contains("staging did not finish"));
    assert_eq!(instances.calls(), 1, "the error is never fetched");
}

#[tokio::test]
async fn transport_error_during_poll_is_fatal() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 1));
    let instances = ScriptedInstances::new(vec![Err(
        liftoff_cli::domain::ApiError::Transport("connection refused".into()),
    )]);
    let logs = FakeLogs::empty();
    let reporter = RecordingReporter::default();

    let outcome = run(&apps, &instances, &logs, fast_settings(), &reporter).await;

    assert_eq!(
        outcome,
        StartOutcome::StagingFailed {
            message: "Error staging app: connection refused".into()
        }
    );
}

#[tokio::test]
async fn staging_timeout_ends_the_wait() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 1));
    let instances = ScriptedInstances::new(vec![not_staged()]);
    let logs = FakeLogs::empty();
    let reporter = RecordingReporter::default();
    let settings = StartSettings {
        staging_timeout: Duration::ZERO,
        ..fast_settings()
    };

    let outcome = run(&apps, &instances, &logs, settings, &reporter).await;

    let StartOutcome::StagingFailed { message } = &outcome else {
        panic!("expected StagingFailed, got {outcome:?}");
    };
    assert!(message.contains("staging did not finish"));
    assert!(reporter.of(Event::Progress).is_empty());
}

#[tokio::test]
async fn startup_timeout_reports_no_progress_after_deadline() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 2));
    let instances = ScriptedInstances::new(vec![snapshot(&[Starting, Starting])]);
    let logs = FakeLogs::empty();
    let reporter = RecordingReporter::default();
    let settings = StartSettings {
        startup_timeout: Duration::ZERO,
        ..fast_settings()
    };

    let outcome = run(&apps, &instances, &logs, settings, &reporter).await;

    assert_eq!(outcome, StartOutcome::TimedOut);
    assert!(
        !reporter
            .of(Event::Progress)
            .iter()
            .any(|l| l.contains("instances running"))
    );
    assert_eq!(reporter.last(), (Event::Failed, "Start app timeout".to_string()));
}

#[tokio::test]
async fn flapping_instance_fails_on_first_sighting() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 2));
    let instances = ScriptedInstances::new(vec![
        snapshot(&[Starting, Flapping]),
        snapshot(&[Running, Running]),
    ]);
    let logs = FakeLogs::empty();
    let reporter = RecordingReporter::default();

    let outcome = run(&apps, &instances, &logs, fast_settings(), &reporter).await;

    assert_eq!(outcome, StartOutcome::StartUnsuccessful);
    assert_eq!(instances.calls(), 1);
    assert_eq!(
        reporter.of(Event::Progress),
        vec!["0 of 2 instances running, 1 starting, 1 failing".to_string()]
    );
    assert_eq!(reporter.last(), (Event::Failed, "Start unsuccessful".to_string()));
}

#[tokio::test]
async fn unknown_app_is_an_error() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 1));
    let instances = ScriptedInstances::new(vec![snapshot(&[Running])]);
    let logs = FakeLogs::empty();
    let reporter = RecordingReporter::default();

    let err = AppStarter::new(&apps, &instances, &logs, fast_settings())
        .start("other-app", StartTarget::default(), &reporter)
        .await
        .expect_err("unknown app must fail");

    assert!(format!("{err:#}").contains("App other-app not found"));
    assert!(reporter.events().is_empty());
}

// ── Log tailing ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn log_stream_open_failure_is_only_a_warning() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 2));
    let instances = ScriptedInstances::new(vec![
        snapshot(&[Starting, Starting]),
        snapshot(&[Running, Running]),
    ]);
    let logs = FakeLogs::failing_open("Ooops");
    let reporter = RecordingReporter::default();

    let outcome = run(&apps, &instances, &logs, fast_settings(), &reporter).await;

    assert!(matches!(outcome, StartOutcome::Started { .. }));
    assert_eq!(
        reporter.of(Event::Warn),
        vec!["error tailing logs: Ooops".to_string()]
    );
}

#[tokio::test]
async fn unanswered_log_endpoint_does_not_hold_up_the_start() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 1));
    let instances = ScriptedInstances::new(vec![
        snapshot(&[Starting]),
        snapshot(&[Starting]),
        snapshot(&[Running]),
    ]);
    let logs = FakeLogs::hanging();
    let reporter = RecordingReporter::default();

    let outcome = tokio::time::timeout(
        Duration::from_secs(2),
        run(&apps, &instances, &logs, fast_settings(), &reporter),
    )
    .await
    .expect("start must finish without the log stream");

    assert!(matches!(outcome, StartOutcome::Started { .. }));
    assert_eq!(instances.calls(), 3);
    assert!(reporter.of(Event::Warn).is_empty());
    assert_eq!(reporter.last(), (Event::Success, "Started".to_string()));
}

#[tokio::test]
async fn log_stream_break_is_only_a_warning() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 1));
    let instances = ScriptedInstances::new(vec![
        snapshot(&[Starting]),
        snapshot(&[Starting]),
        snapshot(&[Running]),
    ]);
    let logs = FakeLogs::new(vec![
        FakeLog::Line("STG", "Compiling"),
        FakeLog::Error("connection reset"),
        FakeLog::Line("STG", "never seen"),
    ]);
    let reporter = RecordingReporter::default();

    let outcome = run(&apps, &instances, &logs, fast_settings(), &reporter).await;

    assert!(matches!(outcome, StartOutcome::Started { .. }));
    assert_eq!(reporter.of(Event::Log).len(), 1);
    assert_eq!(
        reporter.of(Event::Warn),
        vec!["error tailing logs: connection reset".to_string()]
    );
}

#[tokio::test]
async fn final_line_comes_after_every_log_line() {
    let apps = FakeApps::new(app("my-app", DesiredState::Stopped, 1));
    let instances = ScriptedInstances::new(vec![snapshot(&[Starting]), snapshot(&[Running])]);
    let logs = FakeLogs::delayed(
        vec![
            FakeLog::Line("STG", "one"),
            FakeLog::Line("STG", "two"),
            FakeLog::Line("STG", "three"),
            FakeLog::Line("STG", "four"),
        ],
        Duration::from_millis(7),
    );
    let reporter = RecordingReporter::default();

    let outcome = run(&apps, &instances, &logs, fast_settings(), &reporter).await;

    assert!(matches!(outcome, StartOutcome::Started { .. }));
    assert_eq!(reporter.last(), (Event::Success, "Started".to_string()));
}
