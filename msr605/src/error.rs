//! High-level error types

use msr605_core::Command;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] msr605_core::Error),
    
    #[error("Transport error: {0}")]
    Transport(#[from] msr605_transport::Error),
    
    #[error("Type error: {0}")]
    Types(#[from] msr605_types::Error),
    
    #[error("Device not connected")]
    NotConnected,
}

impl Error {
    /// Check if error is a response timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Core(msr605_core::Error::Timeout { .. }))
    }

    /// Command and status byte, if the device reported a failure
    pub fn device_status(&self) -> Option<(Command, u8)> {
        match self {
            Self::Core(msr605_core::Error::DeviceStatus { command, status }) => {
                Some((*command, *status))
            }
            _ => None,
        }
    }

    /// Check if error is recoverable (retry might succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Core(e) => e.is_recoverable(),
            Self::Transport(msr605_transport::Error::Io(_)) => true,
            _ => false,
        }
    }
}
