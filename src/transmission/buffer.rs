use crate::protocol::Command;
use num_complex::Complex32;

/// Baseband samples for one command, ready for a radio sink.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<Complex32>,
    command: Command,
    sample_rate: u32,
    frames: usize,
    chips: usize,
    pad: usize,
}

impl SampleBuffer {
    pub(crate) fn new(
        samples: Vec<Complex32>,
        command: Command,
        sample_rate: u32,
        frames: usize,
        chips: usize,
        pad: usize,
    ) -> Self {
        Self {
            samples,
            command,
            sample_rate,
            frames,
            chips,
            pad,
        }
    }

    pub fn samples(&self) -> &[Complex32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Complex32> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frame_count(&self) -> usize {
        self.frames
    }

    pub fn chip_count(&self) -> usize {
        self.chips
    }

    pub fn pad_len(&self) -> usize {
        self.pad
    }

    /// Air time in seconds, pad included
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// True when every sample has a zero imaginary part
    pub fn is_real(&self) -> bool {
        self.samples.iter().all(|s| s.im == 0.0)
    }

    /// Number of zero-amplitude samples at the end of the buffer
    pub fn trailing_zeros(&self) -> usize {
        self.samples
            .iter()
            .rev()
            .take_while(|s| s.re == 0.0 && s.im == 0.0)
            .count()
    }
}
