//! Error types for msr605-core

use crate::command::Command;

/// Result type alias for msr605 operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Data block does not start with `ESC s ESC 0x01`
    #[error("Bad data block: doesn't start with <ESC>s<ESC>[01] ({len} bytes)")]
    MalformedHeader {
        len: usize,
    },

    /// Data block does not end with `? FS`
    #[error("Bad data block: doesn't end with ?<FS>")]
    MissingTerminator,

    /// A track field delimiter is absent or misplaced
    #[error("Bad data block: missing delimiter {0}")]
    MissingDelimiter(&'static str),

    /// Response contains no escape code
    #[error("Invalid response format: no escape code in {len} bytes")]
    InvalidResponseFormat {
        len: usize,
    },

    /// Response ends with the escape code, no status byte follows
    #[error("Incomplete response: missing status byte")]
    IncompleteResponse,

    /// Device reported a non-success status
    #[error("Device rejected {command}: status 0x{status:02X}")]
    DeviceStatus {
        command: Command,
        status: u8,
    },

    /// Unknown command code
    #[error("Unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Timeout waiting for response
    #[error("Timeout waiting for response after {millis}ms")]
    Timeout {
        millis: u64,
    },

    /// Payload too large
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },
}

impl Error {
    /// Check if error is recoverable (retry might succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::DeviceStatus { .. }
                | Self::InvalidResponseFormat { .. }
                | Self::IncompleteResponse
        )
    }

    /// Check if error comes from a malformed track data block
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            Self::MalformedHeader { .. } | Self::MissingTerminator | Self::MissingDelimiter(_)
        )
    }

    /// Status byte reported by the device, if this is a device failure
    pub fn device_status(&self) -> Option<u8> {
        match self {
            Self::DeviceStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
