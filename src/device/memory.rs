use super::{RadioConfig, RadioSink, check_rate};
use crate::error::SinkError;
use crate::transmission::SampleBuffer;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// Keeps every transmitted buffer. Clones share the same storage, so a test
/// can hand one clone to a transmitter and inspect the other.
#[derive(Clone, Default)]
pub struct MemorySink {
    config: Option<RadioConfig>,
    sent: Arc<Mutex<Vec<SampleBuffer>>>,
    air_time: Option<Duration>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block for `air_time` on every transmission
    pub fn with_air_time(mut self, air_time: Duration) -> Self {
        self.air_time = Some(air_time);
        self
    }

    pub fn config(&self) -> Option<&RadioConfig> {
        self.config.as_ref()
    }

    pub fn transmissions(&self) -> Vec<SampleBuffer> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.sent
            .lock()
            .map(|sent| sent.len())
            .unwrap_or_default()
    }
}

impl RadioSink for MemorySink {
    fn configure(&mut self, config: &RadioConfig) -> Result<(), SinkError> {
        self.config = Some(*config);
        Ok(())
    }

    fn transmit(&mut self, buffer: &SampleBuffer) -> Result<(), SinkError> {
        check_rate(self.config.as_ref(), buffer)?;
        if let Some(air_time) = self.air_time {
            std::thread::sleep(air_time);
        }
        debug!("MemorySink stored {} samples", buffer.len());
        self.sent
            .lock()
            .map_err(|e| SinkError::Io(std::io::Error::other(format!("Lock error: {}", e))))?
            .push(buffer.clone());
        Ok(())
    }
}
