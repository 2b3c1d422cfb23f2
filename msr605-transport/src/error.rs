//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,
    
    #[error("Already connected")]
    AlreadyConnected,
    
    /// Open/configure failure reported by the serial driver
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
    
    /// Read/write failure on an open port
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    
    #[error("Invalid device path: {0}")]
    InvalidPath(String),
}
