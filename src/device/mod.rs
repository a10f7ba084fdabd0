/// Radio sink boundary. Real RF emission happens outside this crate; sinks
/// here store the baseband for an SDR tool or for inspection.
pub mod file;
pub mod memory;

pub use file::{FileSink, SampleFormat};
pub use memory::MemorySink;

use crate::error::SinkError;
use crate::transmission::SampleBuffer;
use crate::utils::consts::{
    BB_GAIN_DB, CENTER_FREQ_HZ, IF_GAIN_DB, RF_GAIN_DB, SAMPLE_RATE,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Tuning applied to a sink before the first transmission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadioConfig {
    pub sample_rate: u32,
    pub center_freq_hz: f64,
    pub rf_gain_db: f64,
    pub if_gain_db: f64,
    pub bb_gain_db: f64,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            center_freq_hz: CENTER_FREQ_HZ,
            rf_gain_db: RF_GAIN_DB,
            if_gain_db: IF_GAIN_DB,
            bb_gain_db: BB_GAIN_DB,
        }
    }
}

impl RadioConfig {
    pub fn with_sample_rate(self, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..self
        }
    }
}

pub trait RadioSink: Send {
    fn configure(&mut self, config: &RadioConfig) -> Result<(), SinkError>;

    /// Emit the whole buffer in order. Returns once the sink is done with it.
    fn transmit(&mut self, buffer: &SampleBuffer) -> Result<(), SinkError>;
}

impl<S: RadioSink + ?Sized> RadioSink for Box<S> {
    fn configure(&mut self, config: &RadioConfig) -> Result<(), SinkError> {
        (**self).configure(config)
    }

    fn transmit(&mut self, buffer: &SampleBuffer) -> Result<(), SinkError> {
        (**self).transmit(buffer)
    }
}

pub fn print_radio_config(config: &RadioConfig) {
    info!("Radio Config:");
    info!("  Sample Rate: {} S/s", config.sample_rate);
    info!("  Center Frequency: {:.3} MHz", config.center_freq_hz / 1e6);
    info!(
        "  Gain: RF {} dB, IF {} dB, BB {} dB",
        config.rf_gain_db, config.if_gain_db, config.bb_gain_db
    );
}

/// Rate check shared by sinks
pub(crate) fn check_rate(
    config: Option<&RadioConfig>,
    buffer: &SampleBuffer,
) -> Result<(), SinkError> {
    let config = config.ok_or(SinkError::NotConfigured)?;
    if config.sample_rate != buffer.sample_rate() {
        return Err(SinkError::RateMismatch {
            configured: config.sample_rate,
            session: buffer.sample_rate(),
        });
    }
    Ok(())
}
