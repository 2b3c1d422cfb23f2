//! Track data structures

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use bytes::Bytes;

use crate::error::{Error, Result};

/// Data read from (or written to) the three tracks of a card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackData {
    /// Track 1 (alphanumeric)
    pub track1: Bytes,

    /// Track 2 (numeric)
    pub track2: Bytes,

    /// Track 3 (numeric)
    pub track3: Bytes,
}

impl TrackData {
    pub fn new(
        track1: impl Into<Bytes>,
        track2: impl Into<Bytes>,
        track3: impl Into<Bytes>,
    ) -> Self {
        Self {
            track1: track1.into(),
            track2: track2.into(),
            track3: track3.into(),
        }
    }

    /// Get a track by number (1-3)
    pub fn track(&self, number: u8) -> Option<&Bytes> {
        match number {
            1 => Some(&self.track1),
            2 => Some(&self.track2),
            3 => Some(&self.track3),
            _ => None,
        }
    }

    /// Check if every track is empty
    pub fn is_empty(&self) -> bool {
        self.track1.is_empty() && self.track2.is_empty() && self.track3.is_empty()
    }
}

impl From<[Bytes; 3]> for TrackData {
    fn from([track1, track2, track3]: [Bytes; 3]) -> Self {
        Self {
            track1,
            track2,
            track3,
        }
    }
}

impl fmt::Display for TrackData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "1={}", String::from_utf8_lossy(&self.track1))?;
        writeln!(f, "2={}", String::from_utf8_lossy(&self.track2))?;
        write!(f, "3={}", String::from_utf8_lossy(&self.track3))
    }
}

bitflags! {
    /// Set of tracks an operation applies to
    ///
    /// The bit values are the erase command's track mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TrackSelection: u8 {
        const TRACK1 = 0b001;
        const TRACK2 = 0b010;
        const TRACK3 = 0b100;
    }
}

impl TrackSelection {
    /// Build a selection from one flag per track
    pub fn from_flags(track1: bool, track2: bool, track3: bool) -> Self {
        let mut selection = Self::empty();
        selection.set(Self::TRACK1, track1);
        selection.set(Self::TRACK2, track2);
        selection.set(Self::TRACK3, track3);
        selection
    }

    /// Check if a track number (1-3) is selected
    pub fn includes(self, number: u8) -> bool {
        match number {
            1 => self.contains(Self::TRACK1),
            2 => self.contains(Self::TRACK2),
            3 => self.contains(Self::TRACK3),
            _ => false,
        }
    }
}

impl FromStr for TrackSelection {
    type Err = Error;

    /// Parse a track list such as `"123"` or `"13"`
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::Parse("empty track list".into()));
        }

        let mut selection = Self::empty();
        for c in s.chars() {
            let track = match c {
                '1' => Self::TRACK1,
                '2' => Self::TRACK2,
                '3' => Self::TRACK3,
                _ => return Err(Error::Parse(format!("invalid track '{}' in '{}'", c, s))),
            };
            if selection.contains(track) {
                return Err(Error::Parse(format!("duplicate track '{}' in '{}'", c, s)));
            }
            selection |= track;
        }

        Ok(selection)
    }
}
