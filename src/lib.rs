//! Baseband encoder for a 433.92 MHz OOK ceiling fan/light remote.
//!
//! A [`TransmitSession`](transmission::TransmitSession) binds one device
//! address and turns each [`Command`](protocol::Command) into a complex
//! sample buffer:
//!
//! ```text
//! Command -> CommandRepeater -> BitFramer -> PulseWidthEncoder -> SampleExpander -> pad
//! ```
//!
//! The buffer is handed to a [`RadioSink`](device::RadioSink).

pub mod config;
pub mod device;
pub mod error;
pub mod phy;
pub mod protocol;
pub mod transmission;
pub mod ui;
pub mod utils;

pub use error::{ConfigError, EncodeError, SinkError, TxError};
