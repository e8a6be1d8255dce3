//! Newline-delimited JSON decoding for the log tail endpoint.

use std::collections::VecDeque;
use std::pin::Pin;

use anyhow::{Context as _, Result};
use futures_util::stream::{self, Stream, StreamExt as _};
use liftoff_common::{LogEnvelope, MessageType};

use crate::application::ports::LogStream;
use crate::domain::{LogMessage, LogSource};

struct Decoder<S> {
    inner: Pin<Box<S>>,
    buf: Vec<u8>,
    ready: VecDeque<Result<LogMessage>>,
    done: bool,
}

impl<S> Decoder<S> {
    fn drain_lines(&mut self) {
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            self.push_line(&line);
        }
    }

    fn push_line(&mut self, line: &[u8]) {
        let line = line.trim_ascii();
        if line.is_empty() {
            return;
        }
        match serde_json::from_slice::<LogEnvelope>(line) {
            Ok(envelope) => self.ready.push_back(Ok(to_message(envelope))),
            Err(e) => tracing::debug!(error = %e, "skipping malformed log line"),
        }
    }
}

/// Decode a byte stream of NDJSON log envelopes into log messages.
///
/// Chunks may split lines anywhere. Blank and malformed lines are skipped; a
/// read error is yielded once and ends the stream.
pub fn decode_lines<S, B, E>(bytes: S) -> LogStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let decoder = Decoder {
        inner: Box::pin(bytes),
        buf: Vec::new(),
        ready: VecDeque::new(),
        done: false,
    };

    Box::pin(stream::unfold(decoder, |mut st| async move {
        loop {
            if let Some(item) = st.ready.pop_front() {
                return Some((item, st));
            }
            if st.done {
                return None;
            }
            match st.inner.next().await {
                Some(Ok(chunk)) => {
                    st.buf.extend_from_slice(chunk.as_ref());
                    st.drain_lines();
                }
                Some(Err(e)) => {
                    st.done = true;
                    st.ready.push_back(Err(e).context("reading log stream"));
                }
                None => {
                    st.done = true;
                    let rest = std::mem::take(&mut st.buf);
                    st.push_line(&rest);
                }
            }
        }
    }))
}

fn to_message(envelope: LogEnvelope) -> LogMessage {
    LogMessage {
        source: LogSource::from_tag(&envelope.source_name),
        timestamp: envelope.timestamp,
        is_error: envelope.message_type == MessageType::Err,
        text: envelope.message,
    }
}
