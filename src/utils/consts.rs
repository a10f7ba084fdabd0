/// 日志级别（可被 RUST_LOG 覆盖）
pub const LOG_LEVEL: &str = "info";

/// 进度更新间隔（毫秒）
pub const PROGRESS_UPDATE_INTERVAL_MS: u64 = 50;

// ============================================================================
// Radio Parameters
// ============================================================================

/// Carrier frequency (Hz)
pub const CENTER_FREQ_HZ: f64 = 433.92e6;

/// Sink sample rate (samples/s)
pub const SAMPLE_RATE: u32 = 2_000_000;

/// Protocol symbol (chip) rate
pub const BAUD_RATE: u32 = 2500;

/// RF / IF / baseband sink gain (dB)
pub const RF_GAIN_DB: f64 = 30.0;
pub const IF_GAIN_DB: f64 = 10.0;
pub const BB_GAIN_DB: f64 = 10.0;

// ============================================================================
// Frame Parameters
// ============================================================================

/// 23 alternating bits followed by 15 zeros
pub const PREAMBLE_BITS: &str = "10101010101010101010101000000000000000";

pub const PREAMBLE_LEN: usize = 38;

/// Fixed field between the address and the command payload
pub const SEPARATOR_BITS: &str = "01000";

pub const SEPARATOR_LEN: usize = 5;

/// Command payload width
pub const PAYLOAD_BITS: usize = 22;

/// Zero bits closing every frame
pub const GAP_BITS: usize = 62;

/// Longest device address accepted by the framer
pub const MAX_ADDRESS_BITS: usize = 64;

/// Chips emitted per logical bit
pub const CHIPS_PER_BIT: usize = 3;

/// Zero samples appended after the last frame. The sink needs this many
/// buffered samples before it starts emitting.
pub const PAD_SAMPLES: usize = 4096;
