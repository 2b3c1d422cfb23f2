//! # msr605-core
//!
//! Core protocol implementation for MSR605 magnetic stripe reader/writers.
//!
//! This crate provides the low-level protocol primitives:
//! - Command codes and request encoding
//! - ISO track data block encoding/decoding
//! - Response splitting (status / result / data)
//! - Protocol constants

pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod message;

pub use command::Command;
pub use error::{Error, Result};
pub use message::{Request, Response};
