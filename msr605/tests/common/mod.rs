//! Scripted in-memory transport standing in for an MSR605

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use msr605::Transport;
use msr605_transport::{Error, Result};

/// Writes recorded by a [`ScriptedTransport`]
#[derive(Clone, Default)]
pub struct SentLog(Arc<Mutex<Vec<Vec<u8>>>>);

impl SentLog {
    pub fn all(&self) -> Vec<Vec<u8>> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Vec<u8> {
        self.all().pop().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

/// Reply queued for the next status-reporting command
pub enum Reply {
    Bytes(Vec<u8>),
    Silent,
    /// The first read after the command fails
    ReadError,
}

/// Fake device: every write except a reset consumes the next queued reply
/// and makes it readable.
pub struct ScriptedTransport {
    connected: bool,
    pending: VecDeque<u8>,
    replies: VecDeque<Reply>,
    sent: SentLog,
    chunk_limit: usize,
    read_timeout: Option<Duration>,
    fail_sends: bool,
    fail_next_read: bool,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            connected: false,
            pending: VecDeque::new(),
            replies: VecDeque::new(),
            sent: SentLog::default(),
            chunk_limit: usize::MAX,
            read_timeout: None,
            fail_sends: false,
            fail_next_read: false,
        }
    }

    /// Queue a reply
    pub fn reply(mut self, bytes: impl AsRef<[u8]>) -> Self {
        self.replies.push_back(Reply::Bytes(bytes.as_ref().to_vec()));
        self
    }

    /// Queue a command that gets no reply at all
    pub fn silent(mut self) -> Self {
        self.replies.push_back(Reply::Silent);
        self
    }

    /// Queue a command whose reply read fails
    pub fn read_error(mut self) -> Self {
        self.replies.push_back(Reply::ReadError);
        self
    }

    /// Fail the very next read, before any command is sent
    pub fn with_read_error(mut self) -> Self {
        self.fail_next_read = true;
        self
    }

    /// Fail every write with a broken pipe
    pub fn with_failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    /// Bytes already waiting in the input buffer
    pub fn with_stale(mut self, bytes: impl AsRef<[u8]>) -> Self {
        self.pending.extend(bytes.as_ref());
        self
    }

    /// Cap the number of bytes returned per read
    pub fn with_chunk_limit(mut self, limit: usize) -> Self {
        self.chunk_limit = limit;
        self
    }

    pub fn sent(&self) -> SentLog {
        self.sent.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Err(Error::AlreadyConnected);
        }
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        if self.fail_sends {
            return Err(Error::Io(io::Error::new(io::ErrorKind::BrokenPipe, "gone")));
        }

        self.sent.0.lock().unwrap().push(data.to_vec());

        if data == b"\x1ba" {
            return Ok(());
        }

        match self.replies.pop_front() {
            Some(Reply::Bytes(bytes)) => self.pending.extend(bytes),
            Some(Reply::ReadError) => self.fail_next_read = true,
            Some(Reply::Silent) | None => {}
        }

        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        if self.fail_next_read {
            self.fail_next_read = false;
            return Err(Error::Io(io::Error::new(io::ErrorKind::Other, "read failed")));
        }

        let n = buf.len().min(self.pending.len()).min(self.chunk_limit);
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }

        Ok(n)
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.read_timeout = Some(timeout);
        Ok(())
    }

    fn port_name(&self) -> String {
        "scripted".to_string()
    }
}
