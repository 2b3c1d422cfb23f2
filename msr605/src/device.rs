//! High-level device interface

use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, info, warn};

use msr605_core::{Command, Request, Response, constants::bpi, frame};
use msr605_transport::{SerialTransport, Transport};
use msr605_types::{BitsPerChar, BpiMode, Coercivity, TrackData, TrackSelection};

use crate::engine::{Engine, EngineState};
use crate::error::{Error, Result};

/// `(high, low)` BPI mode bytes per track
const BPI_MODES: [(u8, u8); 3] = [
    (bpi::TRACK1_HIGH, bpi::TRACK1_LOW),
    (bpi::TRACK2_HIGH, bpi::TRACK2_LOW),
    (bpi::TRACK3_HIGH, bpi::TRACK3_LOW),
];

/// MSR605 device
///
/// High-level interface for reading, writing and configuring an MSR605
/// magnetic stripe reader/writer.
///
/// A `Device` serves one command at a time. To share it between tasks, wrap
/// it in a [`SharedDevice`](crate::SharedDevice).
///
/// # Examples
///
/// ```no_run
/// use msr605::Device;
///
/// #[tokio::main]
/// async fn main() -> msr605::Result<()> {
///     let mut device = Device::new("/dev/ttyUSB0");
///
///     device.connect().await?;
///
///     let tracks = device.read_tracks().await?;
///     println!("{}", tracks);
///
///     device.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Device {
    engine: Engine,
}

impl Device {
    /// Create a new device instance on a serial port
    ///
    /// Bare port names such as `ttyUSB0` are expanded to `/dev/ttyUSB0`.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self::with_transport(SerialTransport::new(path))
    }

    /// Create a new device instance on any transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            engine: Engine::new(Box::new(transport)),
        }
    }

    /// Set response timeout (default: 10s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.engine = self.engine.with_timeout(timeout);
        self
    }

    /// Set delay after each command write (default: 100ms)
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.engine = self.engine.with_settle_delay(delay);
        self
    }

    /// Set wait between empty reads (default: 10ms)
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.engine = self.engine.with_poll_interval(interval);
        self
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.engine.is_connected()
    }

    /// Get engine state after the last command
    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    /// Connect to device
    ///
    /// Opens the port and resets the device.
    pub async fn connect(&mut self) -> Result<()> {
        info!("Connecting to {}...", self.engine.port_name());

        self.engine.open().await?;

        if let Err(e) = self.reset().await {
            warn!("Reset failed on {}: {}", self.engine.port_name(), e);
            if let Err(close_err) = self.engine.close().await {
                debug!("Close after failed reset: {}", close_err);
            }
            return Err(e);
        }

        info!("Connected to {}", self.engine.port_name());
        Ok(())
    }

    /// Disconnect from device
    ///
    /// Must not be called while another command on this device is pending.
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }

        info!("Disconnecting from {}...", self.engine.port_name());
        self.engine.close().await?;
        info!("Disconnected");

        Ok(())
    }

    /// Reset device
    pub async fn reset(&mut self) -> Result<()> {
        self.ensure_connected()?;

        debug!("Resetting device...");
        self.engine.dispatch(&Request::new(Command::Reset)).await?;

        Ok(())
    }

    /// Read all three tracks in ISO format
    pub async fn read_tracks(&mut self) -> Result<TrackData> {
        debug!("Reading tracks...");

        let response = self.command(Request::new(Command::ReadIso)).await?;
        let tracks = frame::decode(response.data)?;

        Ok(TrackData::from(tracks))
    }

    /// Write all three tracks in ISO format
    ///
    /// Track data must not contain the escape byte `0x1B`.
    pub async fn write_tracks(&mut self, tracks: &TrackData) -> Result<()> {
        debug!("Writing tracks...");

        let block = frame::encode(&tracks.track1, &tracks.track2, &tracks.track3);
        self.command(Request::with_payload(Command::WriteIso, block.freeze()))
            .await?;

        Ok(())
    }

    /// Erase the selected tracks
    pub async fn erase_tracks(&mut self, tracks: TrackSelection) -> Result<()> {
        debug!("Erasing tracks (mask=0x{:02X})...", tracks.bits());

        self.command(Request::with_payload(Command::Erase, vec![tracks.bits()]))
            .await?;

        Ok(())
    }

    /// Select high or low coercivity for writing
    pub async fn set_coercivity(&mut self, coercivity: Coercivity) -> Result<()> {
        debug!("Setting coercivity to {}...", coercivity);

        let command = match coercivity {
            Coercivity::High => Command::SetHighCoercivity,
            Coercivity::Low => Command::SetLowCoercivity,
        };
        self.command(Request::new(command)).await?;

        Ok(())
    }

    /// Set bits per character for each track
    pub async fn set_bpc(
        &mut self,
        track1: BitsPerChar,
        track2: BitsPerChar,
        track3: BitsPerChar,
    ) -> Result<()> {
        debug!("Setting BPC to {}/{}/{}...", track1, track2, track3);

        let payload: Vec<u8> = vec![track1.into(), track2.into(), track3.into()];
        self.command(Request::with_payload(Command::SetBpc, payload))
            .await?;

        Ok(())
    }

    /// Set bits per inch for each track
    ///
    /// Issues one command per track; [`BpiMode::Unset`] tracks are skipped.
    pub async fn set_bpi(
        &mut self,
        track1: BpiMode,
        track2: BpiMode,
        track3: BpiMode,
    ) -> Result<()> {
        for (number, mode) in [track1, track2, track3].into_iter().enumerate() {
            let Some(byte) = bpi_mode_byte(number, mode) else {
                continue;
            };

            debug!("Setting track {} BPI to {:?} (0x{:02X})...", number + 1, mode, byte);

            self.command(Request::with_payload(Command::SetBpi, vec![byte]))
                .await?;
        }

        Ok(())
    }

    /// Read tracks in raw format
    ///
    /// Returns the unprocessed data portion of the reply; no bit unpacking
    /// is performed.
    pub async fn read_raw_tracks(&mut self) -> Result<Bytes> {
        debug!("Reading raw tracks...");

        let response = self.command(Request::new(Command::ReadRaw)).await?;

        Ok(response.data)
    }

    /// Write tracks in raw format
    ///
    /// Each payload is sent as is, preceded by its length byte.
    pub async fn write_raw_tracks(
        &mut self,
        track1: &[u8],
        track2: &[u8],
        track3: &[u8],
    ) -> Result<()> {
        debug!("Writing raw tracks...");

        let block = frame::encode_raw(track1, track2, track3)?;
        self.command(Request::with_payload(Command::WriteRaw, block.freeze()))
            .await?;

        Ok(())
    }

    // Helper methods

    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    /// Run a status-reporting command and check its status byte
    async fn command(&mut self, request: Request) -> Result<Response> {
        self.ensure_connected()?;

        let command = request.command;
        let response = self
            .engine
            .dispatch(&request)
            .await?
            .ok_or(msr605_core::Error::IncompleteResponse)?;

        if !response.is_success() {
            warn!(
                "{} failed with status '{}'",
                command,
                response.status.escape_ascii()
            );
        }

        Ok(response.ensure_success(command)?)
    }
}

/// Mode byte for the zero-based track index, `None` for [`BpiMode::Unset`]
fn bpi_mode_byte(track: usize, mode: BpiMode) -> Option<u8> {
    let (high, low) = BPI_MODES[track];
    match mode {
        BpiMode::Unset => None,
        BpiMode::High => Some(high),
        BpiMode::Low => Some(low),
    }
}
