//! Device handle shared between tasks

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{Mutex, MutexGuard};

use msr605_types::{BitsPerChar, BpiMode, Coercivity, TrackData, TrackSelection};

use crate::device::Device;
use crate::error::Result;

/// Cloneable handle to a single [`Device`]
///
/// Each operation holds the lock for the whole command exchange (drain,
/// write, settle delay and response wait), so replies from different
/// callers never interleave.
#[derive(Clone)]
pub struct SharedDevice {
    inner: Arc<Mutex<Device>>,
}

impl SharedDevice {
    pub fn new(device: Device) -> Self {
        Self {
            inner: Arc::new(Mutex::new(device)),
        }
    }

    /// Lock the device for a sequence of commands
    pub async fn lock(&self) -> MutexGuard<'_, Device> {
        self.inner.lock().await
    }

    pub async fn reset(&self) -> Result<()> {
        self.inner.lock().await.reset().await
    }

    pub async fn read_tracks(&self) -> Result<TrackData> {
        self.inner.lock().await.read_tracks().await
    }

    pub async fn write_tracks(&self, tracks: &TrackData) -> Result<()> {
        self.inner.lock().await.write_tracks(tracks).await
    }

    pub async fn erase_tracks(&self, tracks: TrackSelection) -> Result<()> {
        self.inner.lock().await.erase_tracks(tracks).await
    }

    pub async fn read_raw_tracks(&self) -> Result<Bytes> {
        self.inner.lock().await.read_raw_tracks().await
    }

    pub async fn write_raw_tracks(&self, track1: &[u8], track2: &[u8], track3: &[u8]) -> Result<()> {
        self.inner
            .lock()
            .await
            .write_raw_tracks(track1, track2, track3)
            .await
    }

    pub async fn set_coercivity(&self, coercivity: Coercivity) -> Result<()> {
        self.inner.lock().await.set_coercivity(coercivity).await
    }

    pub async fn set_bpc(
        &self,
        track1: BitsPerChar,
        track2: BitsPerChar,
        track3: BitsPerChar,
    ) -> Result<()> {
        self.inner.lock().await.set_bpc(track1, track2, track3).await
    }

    pub async fn set_bpi(&self, track1: BpiMode, track2: BpiMode, track3: BpiMode) -> Result<()> {
        self.inner.lock().await.set_bpi(track1, track2, track3).await
    }
}

impl From<Device> for SharedDevice {
    fn from(device: Device) -> Self {
        Self::new(device)
    }
}
