//! Command/response engine
//!
//! Sends escape-prefixed commands over a [`Transport`] and collects the
//! device's reply under a deadline. One command is in flight at a time;
//! every method takes `&mut self`.

use std::time::Duration;

use bytes::BytesMut;
use tokio::time::{Instant, sleep, timeout_at};
use tracing::{debug, trace, warn};

use msr605_core::{
    Request, Response,
    constants::{DEFAULT_TIMEOUT, ESCAPE, POLL_INTERVAL_MS, READ_CHUNK_SIZE, SETTLE_DELAY_MS},
};
use msr605_transport::Transport;

use crate::error::{Error, Result};

/// Upper bound on reads spent discarding stale input before a command
const MAX_DRAIN_READS: usize = 64;

/// Engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No command in progress
    Idle,

    /// Writing a command
    Sending,

    /// Collecting a reply
    AwaitingResponse,

    /// Last command completed
    Done,

    /// Last command got no reply before the deadline
    TimedOut,
}

/// Command/response engine
///
/// Owns the transport for its whole lifetime.
pub struct Engine {
    transport: Box<dyn Transport>,
    timeout: Duration,
    settle_delay: Duration,
    poll_interval: Duration,
    state: EngineState,
}

impl Engine {
    /// Create a new engine with default timings
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            settle_delay: Duration::from_millis(SETTLE_DELAY_MS),
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            state: EngineState::Idle,
        }
    }

    /// Set response timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set delay imposed after every write
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set wait between empty reads
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub fn port_name(&self) -> String {
        self.transport.port_name()
    }

    /// Open the transport
    pub async fn open(&mut self) -> Result<()> {
        self.transport.connect().await?;
        self.transport.set_read_timeout(self.poll_interval)?;
        self.state = EngineState::Idle;
        Ok(())
    }

    /// Close the transport
    pub async fn close(&mut self) -> Result<()> {
        self.transport.disconnect().await?;
        self.state = EngineState::Idle;
        Ok(())
    }

    /// Run a command, waiting for a reply only if the command produces one
    ///
    /// Returns `None` for fire-and-forget commands such as reset.
    pub async fn dispatch(&mut self, request: &Request) -> Result<Option<Response>> {
        if request.command.expects_response() {
            self.execute_wait(request).await.map(Some)
        } else {
            self.execute(request).await.map(|()| None)
        }
    }

    /// Send a command that gets no reply
    pub async fn execute(&mut self, request: &Request) -> Result<()> {
        self.send(request).await?;
        self.state = EngineState::Done;
        Ok(())
    }

    /// Send a command and wait for the device's reply
    ///
    /// # Errors
    ///
    /// - Transport errors are returned as is
    /// - [`msr605_core::Error::Timeout`] if nothing arrives before the deadline
    /// - [`msr605_core::Error::InvalidResponseFormat`] /
    ///   [`msr605_core::Error::IncompleteResponse`] for replies that can't be split
    pub async fn execute_wait(&mut self, request: &Request) -> Result<Response> {
        self.drain().await;
        self.send(request).await?;

        self.state = EngineState::AwaitingResponse;
        let raw = match self.collect().await {
            Ok(raw) => raw,
            Err(e) => {
                self.state = EngineState::Idle;
                return Err(e);
            }
        };

        if raw.is_empty() {
            warn!(
                "No response to {} within {:?}",
                request.command, self.timeout
            );
            self.state = EngineState::TimedOut;
            return Err(msr605_core::Error::Timeout {
                millis: self.timeout.as_millis() as u64,
            }
            .into());
        }

        self.state = EngineState::Done;

        let response = Response::parse(raw.freeze())?;
        trace!("Received: {:?}", response);

        Ok(response)
    }

    async fn send(&mut self, request: &Request) -> Result<()> {
        self.state = EngineState::Sending;

        trace!("Sending: {:?}", request);

        let data = request.encode();
        if let Err(e) = self.transport.send(&data).await {
            self.state = EngineState::Idle;
            return Err(e.into());
        }

        // Device needs a gap before it accepts or answers anything
        sleep(self.settle_delay).await;

        Ok(())
    }

    /// Discard input left over from an earlier command
    async fn drain(&mut self) {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let mut discarded = 0;

        for _ in 0..MAX_DRAIN_READS {
            match self.transport.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => {
                    trace!("Stale: {}", hex::encode(&chunk[..n]));
                    discarded += n;
                }
                Err(e) => {
                    debug!("Stopped draining: {}", e);
                    break;
                }
            }
        }

        if discarded > 0 {
            warn!("Discarded {} stale bytes", discarded);
        }
    }

    /// Accumulate reply bytes until an escape code shows up or the deadline passes
    async fn collect(&mut self) -> Result<BytesMut> {
        let deadline = Instant::now() + self.timeout;
        let poll_interval = self.poll_interval;
        let transport = &mut self.transport;

        let mut response = BytesMut::with_capacity(READ_CHUNK_SIZE);
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        let read_loop = async {
            loop {
                let n = match transport.read(&mut chunk).await {
                    Ok(n) => n,
                    Err(e) => return Err::<(), Error>(e.into()),
                };
                if n == 0 {
                    sleep(poll_interval).await;
                    continue;
                }

                response.extend_from_slice(&chunk[..n]);

                if chunk[..n].contains(&ESCAPE) {
                    return Ok::<_, Error>(());
                }
            }
        };

        let outcome = timeout_at(deadline, read_loop).await;
        match outcome {
            Ok(result) => result?,
            Err(_) => debug!("Deadline reached with {} bytes collected", response.len()),
        }

        Ok(response)
    }
}
