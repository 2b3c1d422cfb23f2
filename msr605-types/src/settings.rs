//! Device recording settings

use std::fmt;

use crate::error::{Error, Result};

/// Magnetic coercivity of the card stripe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coercivity {
    /// High coercivity (HiCo)
    High,

    /// Low coercivity (LoCo)
    Low,
}

impl fmt::Display for Coercivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.write_str("hi-co"),
            Self::Low => f.write_str("lo-co"),
        }
    }
}

/// Recording density requested for one track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BpiMode {
    /// Leave the track's density unchanged
    #[default]
    Unset,

    /// 210 bits per inch
    High,

    /// 75 bits per inch
    Low,
}

impl BpiMode {
    /// Parse a single `h`/`l` character
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            'h' | 'H' => Ok(Self::High),
            'l' | 'L' => Ok(Self::Low),
            _ => Err(Error::Parse(format!("BPI must be 'h' or 'l', got '{}'", c))),
        }
    }

    /// Parse a three character density string such as `"hhl"`
    pub fn parse_triple(s: &str) -> Result<[Self; 3]> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 3 {
            return Err(Error::Parse(format!(
                "BPI must be 3 characters (e.g. 'hhl'), got '{}'",
                s
            )));
        }

        Ok([
            Self::from_char(chars[0])?,
            Self::from_char(chars[1])?,
            Self::from_char(chars[2])?,
        ])
    }

    pub fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }
}

/// Bits per character used when recording a track (5-8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitsPerChar(u8);

impl BitsPerChar {
    pub const MIN: u8 = 5;
    pub const MAX: u8 = 8;

    pub fn new(value: u8) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(Error::Validation(format!(
                "bits per character must be {}-{}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Parse a three digit string such as `"888"`
    pub fn parse_triple(s: &str) -> Result<[Self; 3]> {
        let digits: Vec<u8> = s
            .chars()
            .map(|c| {
                c.to_digit(10)
                    .map(|d| d as u8)
                    .ok_or_else(|| Error::Parse(format!("invalid BPC digit '{}'", c)))
            })
            .collect::<Result<_>>()?;

        if digits.len() != 3 {
            return Err(Error::Parse(format!(
                "BPC must be 3 digits (e.g. '888'), got '{}'",
                s
            )));
        }

        Ok([
            Self::new(digits[0])?,
            Self::new(digits[1])?,
            Self::new(digits[2])?,
        ])
    }
}

impl Default for BitsPerChar {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<u8> for BitsPerChar {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<BitsPerChar> for u8 {
    fn from(bpc: BitsPerChar) -> u8 {
        bpc.0
    }
}

impl fmt::Display for BitsPerChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
