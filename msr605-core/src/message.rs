//! Command requests and device responses

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    command::Command,
    constants::{ESCAPE, STATUS_OK},
    error::{Error, Result},
};

/// Command sent to the device
///
/// # Wire Format
///
/// ```text
/// ┌─────────┬─────────┬─────────────┐
/// │ Escape  │ Command │   Payload   │
/// │  0x1B   │ 1 byte  │   N bytes   │
/// └─────────┴─────────┴─────────────┘
/// ```
///
/// # Examples
///
/// ```
/// use msr605_core::{Command, Request};
///
/// let request = Request::with_payload(Command::Erase, vec![0x05]);
/// assert_eq!(&request.encode()[..], b"\x1bc\x05");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Request {
    /// Command code
    pub command: Command,

    /// Command-specific payload
    pub payload: Bytes,
}

impl Request {
    /// Create a request with empty payload
    pub fn new(command: Command) -> Self {
        Self {
            command,
            payload: Bytes::new(),
        }
    }

    /// Create a request with payload
    pub fn with_payload(command: Command, payload: impl Into<Bytes>) -> Self {
        Self {
            command,
            payload: payload.into(),
        }
    }

    /// Encode request to bytes
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(2 + self.payload.len());

        buf.put_u8(ESCAPE);
        buf.put_u8(self.command.into());
        buf.put_slice(&self.payload);

        buf
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("command", &self.command)
            .field("payload", &hex::encode(&self.payload))
            .finish()
    }
}

/// Response collected from the device
///
/// The device terminates every reply with `ESC status [result]`. Anything
/// before that final escape code is command data (e.g. a track data block).
#[derive(Clone, PartialEq, Eq)]
pub struct Response {
    /// Status byte, `'0'` on success
    pub status: u8,

    /// Bytes following the status byte
    pub result: Bytes,

    /// Bytes preceding the final escape code
    pub data: Bytes,
}

impl Response {
    /// Split a raw response into status, result and data
    ///
    /// The *last* escape code is the status delimiter, since the data portion
    /// may itself contain escape codes.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidResponseFormat`] if the response has no escape code
    /// - [`Error::IncompleteResponse`] if nothing follows the last escape code
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use msr605_core::Response;
    ///
    /// let response = Response::parse(Bytes::from_static(b"data\x1b0")).unwrap();
    /// assert!(response.is_success());
    /// assert_eq!(&response.data[..], b"data");
    /// ```
    pub fn parse(raw: Bytes) -> Result<Self> {
        let pos = raw
            .iter()
            .rposition(|&b| b == ESCAPE)
            .ok_or(Error::InvalidResponseFormat { len: raw.len() })?;

        if pos + 1 >= raw.len() {
            return Err(Error::IncompleteResponse);
        }

        Ok(Self {
            status: raw[pos + 1],
            result: raw.slice(pos + 2..),
            data: raw.slice(..pos),
        })
    }

    /// Check if the device reported success
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Fail with [`Error::DeviceStatus`] unless the device reported success
    pub fn ensure_success(self, command: Command) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::DeviceStatus {
                command,
                status: self.status,
            })
        }
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &(self.status as char))
            .field("result", &hex::encode(&self.result))
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response[status={}](result={}, data={})",
            self.status as char,
            self.result.len(),
            self.data.len()
        )
    }
}
