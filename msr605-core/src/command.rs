//! MSR605 command definitions

use std::fmt;

use crate::error::{Error, Result};

/// Protocol command codes
///
/// Each command is a single ASCII letter sent after the escape code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    Reset = b'a',
    ReadIso = b'r',
    ReadRaw = b'm',
    WriteIso = b'w',
    WriteRaw = b'n',
    Erase = b'c',
    SetHighCoercivity = b'x',
    SetLowCoercivity = b'y',
    SetBpi = b'b',
    SetBpc = b'o',
}

impl Command {
    /// Check if the device answers this command with a status
    pub fn expects_response(self) -> bool {
        !matches!(self, Self::Reset)
    }

    /// Get operation name
    pub fn name(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::ReadIso => "read",
            Self::ReadRaw => "read_raw",
            Self::WriteIso => "write",
            Self::WriteRaw => "write_raw",
            Self::Erase => "erase",
            Self::SetHighCoercivity => "set_hico",
            Self::SetLowCoercivity => "set_loco",
            Self::SetBpi => "set_bpi",
            Self::SetBpc => "set_bpc",
        }
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            b'a' => Ok(Self::Reset),
            b'r' => Ok(Self::ReadIso),
            b'm' => Ok(Self::ReadRaw),
            b'w' => Ok(Self::WriteIso),
            b'n' => Ok(Self::WriteRaw),
            b'c' => Ok(Self::Erase),
            b'x' => Ok(Self::SetHighCoercivity),
            b'y' => Ok(Self::SetLowCoercivity),
            b'b' => Ok(Self::SetBpi),
            b'o' => Ok(Self::SetBpc),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
