//! Errors for user-supplied settings

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Value outside the range the device accepts
    #[error("Validation error: {0}")]
    Validation(String),
    
    /// Malformed settings string (track list, BPI, BPC)
    #[error("Parse error: {0}")]
    Parse(String),
}
