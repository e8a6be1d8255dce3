//! Background log tailing for the start use-case.
//!
//! Opening the tail is lazy: the open future is driven by [`LogTailer::opened`]
//! and [`LogTailer::next_event`], which the caller only awaits alongside other
//! work. A log endpoint that never answers therefore never holds up polling.
//!
//! Once open, a spawned task reads the stream, keeps only staging lines
//! emitted at or after the cutoff, and sends them over a one-way channel. The
//! caller is the only writer to the UI: it drains the channel while it waits
//! between polls.
//!
//! [`LogTailer::stop`] abandons a pending open, cancels the task, joins it,
//! hands back whatever was already buffered and closes the channel. Nothing
//! can be received after it returns.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use chrono::{DateTime, Utc};
use futures_util::StreamExt as _;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{LogStream, LogsRepository};
use crate::domain::{LogMessage, is_relevant};

type Opening<'a> = Pin<Box<dyn Future<Output = Result<LogStream>> + 'a>>;

/// What the tailer task reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailEvent {
    /// A relevant log line, in arrival order.
    Line(LogMessage),
    /// The stream could not be opened or broke; tailing has ended.
    Failed(String),
}

/// Handle to a running tail.
pub struct LogTailer<'a> {
    cutoff: DateTime<Utc>,
    cancel: CancellationToken,
    opening: Option<Opening<'a>>,
    tx: Option<mpsc::UnboundedSender<TailEvent>>,
    task: Option<JoinHandle<()>>,
    events: mpsc::UnboundedReceiver<TailEvent>,
}

impl<'a> LogTailer<'a> {
    /// Prepare a tail for `app_guid`. Nothing is sent to the log endpoint
    /// until the tailer is awaited.
    ///
    /// Never fails: an open error is delivered as [`TailEvent::Failed`].
    #[must_use]
    pub fn start<L>(logs: &'a L, app_guid: &'a str, cutoff: DateTime<Utc>) -> Self
    where
        L: LogsRepository + 'a,
    {
        let (tx, events) = mpsc::unbounded_channel();
        Self {
            cutoff,
            cancel: CancellationToken::new(),
            opening: Some(Box::pin(logs.tail(app_guid))),
            tx: Some(tx),
            task: None,
            events,
        }
    }

    /// Wait until the stream is open (or failed to open) and forwarding.
    ///
    /// Cancel-safe: dropping this future leaves the open pending for the next
    /// call. Returns immediately once the open has resolved or after `stop`.
    pub async fn opened(&mut self) {
        if let Some(opening) = self.opening.as_mut() {
            let result = opening.await;
            self.opening = None;
            self.attach(result);
        }
    }

    /// Wait for the next event. Returns `None` once the tail has ended and
    /// everything buffered has been received.
    pub async fn next_event(&mut self) -> Option<TailEvent> {
        self.opened().await;
        self.events.recv().await
    }

    /// Stop tailing and return the events buffered before the task ended.
    ///
    /// Idempotent; later calls return an empty list.
    pub async fn stop(&mut self) -> Vec<TailEvent> {
        self.cancel.cancel();
        if self.opening.take().is_some() {
            tracing::debug!("log tail abandoned before it opened");
        }
        self.tx = None;
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::debug!(error = %e, "log tail task ended abnormally");
            }
        }

        let mut pending = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            pending.push(event);
        }
        self.events.close();
        pending
    }

    fn attach(&mut self, result: Result<LogStream>) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        match result {
            Ok(stream) => {
                tracing::debug!(cutoff = %self.cutoff, "log tail opened");
                self.task = Some(tokio::spawn(forward(
                    stream,
                    self.cutoff,
                    tx,
                    self.cancel.clone(),
                )));
            }
            Err(e) => {
                tracing::debug!(error = %e, "log tail failed to open");
                let _ = tx.send(TailEvent::Failed(format!("{e:#}")));
            }
        }
    }
}

impl Drop for LogTailer<'_> {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn forward(
    mut stream: LogStream,
    cutoff: DateTime<Utc>,
    tx: mpsc::UnboundedSender<TailEvent>,
    cancel: CancellationToken,
) {
    loop {
        let item = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            item = stream.next() => item,
        };

        match item {
            Some(Ok(message)) => {
                if is_relevant(&message, cutoff) && tx.send(TailEvent::Line(message)).is_err() {
                    break;
                }
            }
            Some(Err(e)) => {
                let _ = tx.send(TailEvent::Failed(format!("{e:#}")));
                break;
            }
            None => break,
        }
    }
    tracing::debug!("log tail closed");
}
