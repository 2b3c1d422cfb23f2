//! Type definitions for msr605

pub mod error;
pub mod settings;
pub mod track;

pub use error::{Error, Result};
pub use settings::{BitsPerChar, BpiMode, Coercivity};
pub use track::{TrackData, TrackSelection};
