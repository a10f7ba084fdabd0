use crate::protocol::Command;
use crate::transmission::SampleBuffer;
use serde::{Deserialize, Serialize};

/// Summary of one transmission, printed with `--json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionReport {
    pub command: Command,
    pub address: String,
    pub frames: usize,
    pub chips: usize,
    pub samples: usize,
    pub pad_samples: usize,
    pub sample_rate: u32,
    pub duration_secs: f64,
}

impl TransmissionReport {
    pub fn from_buffer(buffer: &SampleBuffer, address: String) -> Self {
        Self {
            command: buffer.command(),
            address,
            frames: buffer.frame_count(),
            chips: buffer.chip_count(),
            samples: buffer.len(),
            pad_samples: buffer.pad_len(),
            sample_rate: buffer.sample_rate(),
            duration_secs: buffer.duration_secs(),
        }
    }
}
