//! Transport layer for the MSR605 protocol
//!
//! Provides serial communication with devices.

pub mod error;
pub mod serial;

pub use error::{Error, Result};
pub use serial::{SerialTransport, normalize_device_path};

use std::time::Duration;

use async_trait::async_trait;

/// Byte-stream transport to a device
///
/// A transport is owned by exactly one device handle; there is no
/// concurrent access.
#[async_trait]
pub trait Transport: Send {
    /// Open the underlying port
    async fn connect(&mut self) -> Result<()>;

    /// Close the underlying port
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Write all bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read whatever is buffered, without waiting
    ///
    /// Returns `0` when no data is available.
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Set the timeout applied to individual port reads
    fn set_read_timeout(&mut self, timeout: Duration) -> Result<()>;

    /// Get port name
    fn port_name(&self) -> String;
}
