use thiserror::Error;

use crate::protocol::Command;

/// Encoding-pipeline and session errors.
///
/// All of these are structural or configuration faults: retrying the same call
/// with the same inputs fails the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("no device address bound")]
    MissingAddress,
    #[error("device address already bound")]
    AlreadyBound,
    #[error("command {0} is not supported")]
    UnsupportedCommand(Command),
    #[error("invalid bit value {value:#04x} at index {index}")]
    InvalidBit { index: usize, value: u8 },
    #[error("address must be 1..={max} bits, got {len}")]
    InvalidAddressLength { len: usize, max: usize },
    #[error(
        "sample rate {sample_rate} is not a positive integral multiple of baud rate {baud_rate}"
    )]
    InvalidRate { sample_rate: u32, baud_rate: u32 },
    #[error("a transmission is already in flight")]
    TransmissionInProgress,
    #[error("no encoded transmission pending")]
    NoPendingTransmission,
}

/// Radio sink failures, surfaced unchanged to the caller
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAV Error: {0}")]
    Wav(#[from] hound::Error),
    #[error("sink not configured")]
    NotConfigured,
    #[error("sink configured for {configured} S/s, session produces {session} S/s")]
    RateMismatch { configured: u32, session: u32 },
}

/// Errors from a full request: encode then hand off to the sink
#[derive(Error, Debug)]
pub enum TxError {
    #[error("Encode Error: {0}")]
    Encode(#[from] EncodeError),
    #[error("Sink Error: {0}")]
    Sink(#[from] SinkError),
    #[error("radio worker stopped")]
    WorkerStopped,
}

impl TxError {
    /// True when the request was refused because another one is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, TxError::Encode(EncodeError::TransmissionInProgress))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown device '{0}'")]
    UnknownDevice(String),
    #[error("device '{name}': {source}")]
    Address {
        name: String,
        #[source]
        source: EncodeError,
    },
}
