//! Serial transport
//!
//! MSR605 devices enumerate as a USB serial adapter running at 9600 baud,
//! 8 data bits, no parity, one stop bit.

use std::io::{self, Read, Write};
use std::time::Duration;

use async_trait::async_trait;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, trace, warn};

use msr605_core::constants::DEFAULT_BAUD_RATE;

use crate::{error::*, Transport};

/// Turn a bare port name into a device path
///
/// Names without a path separator get a `/dev/` prefix, except Windows
/// `COM` ports which are used as is.
///
/// # Examples
///
/// ```
/// use msr605_transport::normalize_device_path;
///
/// assert_eq!(normalize_device_path("ttyUSB0"), "/dev/ttyUSB0");
/// assert_eq!(normalize_device_path("COM3"), "COM3");
/// assert_eq!(normalize_device_path("/dev/ttyACM0"), "/dev/ttyACM0");
/// ```
pub fn normalize_device_path(path: &str) -> String {
    if path.contains('/') || path.contains('\\') || path.contains("COM") {
        path.to_string()
    } else {
        format!("/dev/{}", path)
    }
}

/// Serial transport for MSR605 devices
pub struct SerialTransport {
    path: String,
    baud_rate: u32,
    port: Option<Box<dyn SerialPort>>,
    read_timeout: Duration,
}

impl SerialTransport {
    /// Create new serial transport
    ///
    /// The path is normalized with [`normalize_device_path`].
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            path: normalize_device_path(path.as_ref()),
            baud_rate: DEFAULT_BAUD_RATE,
            port: None,
            read_timeout: Duration::from_millis(100),
        }
    }

    /// Set line speed
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        if self.path.is_empty() {
            return Err(Error::InvalidPath("empty device path".into()));
        }

        debug!("Opening {} at {} baud...", self.path, self.baud_rate);

        let port = serialport::new(&self.path, self.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.read_timeout)
            .open()?;

        debug!("Opened {}", self.path);

        self.port = Some(port);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            debug!("Closed {}", self.path);
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        trace!("Sending {} bytes: {}", data.len(), hex::encode(data));

        port.write_all(data)?;
        port.flush()?;

        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        let available = port.bytes_to_read()? as usize;
        if available == 0 || buf.is_empty() {
            return Ok(0);
        }

        let len = available.min(buf.len());
        let n = match port.read(&mut buf[..len]) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => 0,
            Err(e) => {
                warn!("Read error on {}: {}", self.path, e);
                return Err(Error::Io(e));
            }
        };

        trace!("Received {} bytes: {}", n, hex::encode(&buf[..n]));

        Ok(n)
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.read_timeout = timeout;

        if let Some(port) = self.port.as_mut() {
            port.set_timeout(timeout)?;
        }

        Ok(())
    }

    fn port_name(&self) -> String {
        self.path.clone()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            warn!("Serial transport dropped while still connected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_device_path() {
        assert_eq!(normalize_device_path("ttyUSB0"), "/dev/ttyUSB0");
        assert_eq!(normalize_device_path("/dev/ttyUSB0"), "/dev/ttyUSB0");
        assert_eq!(normalize_device_path("COM1"), "COM1");
        assert_eq!(normalize_device_path(r"\\.\COM12"), r"\\.\COM12");
    }

    #[tokio::test]
    async fn test_serial_transport_create() {
        let transport = SerialTransport::new("ttyUSB0");
        assert!(!transport.is_connected());
        assert_eq!(transport.port_name(), "/dev/ttyUSB0");
    }

    #[tokio::test]
    async fn test_serial_transport_not_connected() {
        let mut transport = SerialTransport::new("/dev/ttyUSB0");
        let mut buf = [0u8; 16];

        assert!(matches!(transport.send(b"\x1ba").await, Err(Error::NotConnected)));
        assert!(matches!(transport.read(&mut buf).await, Err(Error::NotConnected)));
        assert!(transport.set_read_timeout(Duration::from_millis(50)).is_ok());
    }

    #[tokio::test]
    async fn test_serial_transport_invalid_path() {
        // /dev/null is not a tty
        let mut transport = SerialTransport::new("/dev/null");

        let result = transport.connect().await;
        assert!(result.is_err());
        assert!(!transport.is_connected());
    }
}
