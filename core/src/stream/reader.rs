//! Live reader over a plan log that is still being written.
//!
//! Each `read` pulls the next chunk at the current offset. When nothing new is
//! available the reader asks its `CompletionOracle` whether the plan has reached
//! a terminal status: if so it fetches once more and ends the stream when that
//! fetch is empty too, otherwise it sleeps with backoff and fetches again.
//! Bytes are always delivered before completion is considered, so output
//! written just before the status flip is never dropped.

use bytes::Bytes;
use futures::Stream;
use std::fmt;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::PlanError;
use crate::plan::{CompletionOracle, LogSource};

use super::types::{PollBackoff, ReaderState};

/// ASCII start-of-text marker some log services prepend to the log.
const STX: u8 = 0x02;
/// ASCII end-of-text marker appended once the log is complete.
const ETX: u8 = 0x03;

pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

pub struct LogStreamReader {
    log_url: Url,
    source: Arc<dyn LogSource>,
    oracle: Box<dyn CompletionOracle>,
    cancel: CancellationToken,
    backoff: PollBackoff,
    state: ReaderState,
    offset: u64,
    empty_polls: u32,
    start_of_text: bool,
    end_of_text: bool,
}

impl fmt::Debug for LogStreamReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogStreamReader")
            .field("log_url", &self.log_url.as_str())
            .field("state", &self.state)
            .field("offset", &self.offset)
            .field("empty_polls", &self.empty_polls)
            .finish_non_exhaustive()
    }
}

impl LogStreamReader {
    pub fn new(
        log_url: Url,
        source: Arc<dyn LogSource>,
        oracle: Box<dyn CompletionOracle>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            log_url,
            source,
            oracle,
            cancel,
            backoff: PollBackoff::default(),
            state: ReaderState::Fetching,
            offset: 0,
            empty_polls: 0,
            start_of_text: false,
            end_of_text: false,
        }
    }

    pub fn with_backoff(mut self, backoff: PollBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn log_url(&self) -> &Url {
        &self.log_url
    }

    /// Raw bytes of the remote log consumed so far, framing markers included.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == ReaderState::Done
    }

    /// Read the next available log bytes into `buf`.
    ///
    /// Waits until at least one byte is available or the plan has finished.
    /// `Ok(0)` with a non-empty `buf` is end of stream, and every later call
    /// returns `Ok(0)` without touching the network. After an error the reader
    /// is spent and later calls fail with `PlanError::ReaderFailed`.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, PlanError> {
        match self.state {
            ReaderState::Done => return Ok(0),
            ReaderState::Errored => return Err(PlanError::ReaderFailed),
            ReaderState::Fetching | ReaderState::AwaitingCompletion => {}
        }
        if buf.is_empty() {
            return Ok(0);
        }

        match self.poll_until_ready(buf).await {
            Ok(n) => Ok(n),
            Err(err) => {
                self.state = ReaderState::Errored;
                tracing::debug!(
                    target: "planlog.stream",
                    stage = "stream.error",
                    url = %self.log_url,
                    offset = self.offset,
                    error = %err
                );
                Err(err)
            }
        }
    }

    async fn poll_until_ready(&mut self, buf: &mut [u8]) -> Result<usize, PlanError> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(PlanError::Cancelled);
            }

            self.state = ReaderState::Fetching;
            let chunk = self.fetch(buf.len()).await?;
            if !chunk.is_empty() {
                let written = self.deliver(&chunk, buf);
                if written > 0 {
                    self.empty_polls = 0;
                    return Ok(written);
                }
                // Only framing markers arrived; the next chunk may already be there.
                continue;
            }

            self.state = ReaderState::AwaitingCompletion;
            if self.check_done().await? {
                // Output flushed between the empty fetch and the status flip is
                // still on the server; end the stream only once it is drained.
                self.state = ReaderState::Fetching;
                let tail = self.fetch(buf.len()).await?;
                if !tail.is_empty() {
                    let written = self.deliver(&tail, buf);
                    if written > 0 {
                        self.empty_polls = 0;
                        return Ok(written);
                    }
                    continue;
                }
                self.state = ReaderState::Done;
                tracing::debug!(
                    target: "planlog.stream",
                    stage = "stream.eof",
                    url = %self.log_url,
                    offset = self.offset,
                    end_of_text = self.end_of_text
                );
                return Ok(0);
            }

            let delay = self.backoff.delay(self.empty_polls);
            self.empty_polls = self.empty_polls.saturating_add(1);
            tracing::trace!(
                target: "planlog.stream",
                stage = "stream.wait",
                offset = self.offset,
                polls = self.empty_polls,
                delay_ms = delay.as_millis() as u64
            );
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(PlanError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    async fn fetch(&self, limit: usize) -> Result<Bytes, PlanError> {
        let fetch = self.source.fetch_chunk(&self.log_url, self.offset, limit);
        let chunk = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(PlanError::Cancelled),
            res = fetch => res?,
        };
        tracing::trace!(
            target: "planlog.stream",
            stage = "stream.fetch.out",
            offset = self.offset,
            limit,
            received = chunk.len()
        );
        Ok(chunk)
    }

    async fn check_done(&self) -> Result<bool, PlanError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(PlanError::Cancelled),
            res = self.oracle.is_done() => res,
        }
    }

    /// Copy a fetched chunk into `buf`, stripping framing markers. Returns the
    /// number of log bytes written; the offset advances by raw bytes consumed.
    fn deliver(&mut self, chunk: &[u8], buf: &mut [u8]) -> usize {
        let take = chunk.len().min(buf.len());
        let mut data = &chunk[..take];
        let at_start = self.offset == 0;
        self.offset += take as u64;

        if at_start && !self.start_of_text && data.first() == Some(&STX) {
            self.start_of_text = true;
            data = &data[1..];
        }
        // A chunk cut short to fit `buf` may end on an in-log 0x03.
        let whole_chunk = take == chunk.len();
        if whole_chunk && self.start_of_text && !self.end_of_text && data.last() == Some(&ETX) {
            self.end_of_text = true;
            data = &data[..data.len() - 1];
        }

        buf[..data.len()].copy_from_slice(data);
        data.len()
    }

    /// Drain the whole stream into `out`, returning the number of bytes appended.
    pub async fn read_to_end(&mut self, out: &mut Vec<u8>) -> Result<usize, PlanError> {
        let mut buf = vec![0u8; DEFAULT_CHUNK_SIZE];
        let mut total = 0;
        loop {
            let n = self.read(&mut buf).await?;
            if n == 0 {
                return Ok(total);
            }
            out.extend_from_slice(&buf[..n]);
            total += n;
        }
    }

    /// Drain the stream into `writer`, flushing after every chunk so output shows
    /// up while the plan is still running.
    pub async fn copy_to<W>(&mut self, writer: &mut W) -> Result<u64, PlanError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut buf = vec![0u8; DEFAULT_CHUNK_SIZE];
        let mut total = 0u64;
        loop {
            let n = self.read(&mut buf).await?;
            if n == 0 {
                writer.flush().await?;
                return Ok(total);
            }
            writer.write_all(&buf[..n]).await?;
            writer.flush().await?;
            total += n as u64;
        }
    }

    /// Turn the reader into a stream of chunks of at most `chunk_size` bytes.
    pub fn into_stream(
        mut self,
        chunk_size: usize,
    ) -> impl Stream<Item = Result<Bytes, PlanError>> + Send {
        async_stream::try_stream! {
            let mut buf = vec![0u8; chunk_size.max(1)];
            loop {
                let n = self.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                yield Bytes::copy_from_slice(&buf[..n]);
            }
        }
    }
}
