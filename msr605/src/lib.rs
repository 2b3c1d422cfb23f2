//! # msr605
//!
//! Rust driver for MSR605 magnetic stripe card reader/writers.
//!
//! ## Features
//!
//! - ISO track read/write/erase
//! - Coercivity, bits-per-character and bits-per-inch configuration
//! - Raw track read/write (unprocessed bytes)
//! - Async/await API using Tokio
//!
//! ## Quick Start
//!
//! ```no_run
//! use msr605::{Device, TrackData};
//!
//! #[tokio::main]
//! async fn main() -> msr605::Result<()> {
//!     // Connect to device
//!     let mut device = Device::new("/dev/ttyUSB0");
//!     device.connect().await?;
//!
//!     // Write, then read back
//!     device
//!         .write_tracks(&TrackData::new("%B123^DOE/JOHN^?", ";123=49?", ""))
//!         .await?;
//!     let tracks = device.read_tracks().await?;
//!     println!("{}", tracks);
//!
//!     // Disconnect
//!     device.disconnect().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod engine;
pub mod error;
pub mod shared;

// Re-exports
pub use device::Device;
pub use engine::{Engine, EngineState};
pub use error::{Error, Result};
pub use shared::SharedDevice;

// Re-export types
pub use msr605_core::{Command, Request, Response};
pub use msr605_transport::{SerialTransport, Transport};
pub use msr605_types::{BitsPerChar, BpiMode, Coercivity, TrackData, TrackSelection};
