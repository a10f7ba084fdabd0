use super::expander::SampleExpander;
use super::frame::Frame;
use super::line_coding::PulseWidthEncoder;
use crate::error::EncodeError;
use num_complex::Complex32;
use tracing::{debug, info};

pub struct PhyEncoder {
    expander: SampleExpander,
}

impl PhyEncoder {
    /// Create a new physical layer encoder
    ///
    /// # Arguments
    /// * `sample_rate` - Sink sample rate in samples/s
    /// * `baud_rate` - Chip rate; must divide `sample_rate` exactly
    ///   (2 MS/s at 2500 baud gives 800 samples per chip)
    pub fn new(sample_rate: u32, baud_rate: u32) -> Result<Self, EncodeError> {
        let expander = SampleExpander::from_rates(sample_rate, baud_rate)?;

        info!("PhyEncoder initialized:");
        info!("  - line coding: pulse width (100 / 110)");
        info!("  - sample_rate: {} S/s, baud: {}", sample_rate, baud_rate);
        info!("  - samples_per_symbol: {}", expander.samples_per_symbol());

        Ok(Self { expander })
    }

    /// Encode a frame into baseband samples
    pub fn encode_frame(&self, frame: &Frame) -> Result<Vec<Complex32>, EncodeError> {
        let mut output = Vec::new();
        self.encode_frame_into(frame, &mut output)?;
        Ok(output)
    }

    fn encode_frame_into(
        &self,
        frame: &Frame,
        output: &mut Vec<Complex32>,
    ) -> Result<(), EncodeError> {
        let chips = PulseWidthEncoder::encode(frame.bits())?;

        debug!(
            "Encoding frame: bits={}, chips={}, samples={}",
            frame.len(),
            chips.len(),
            self.expander.samples_for_chips(chips.len())
        );

        self.expander.expand_into(&chips, output)
    }

    /// Encode frames back to back. Frames carry their own trailing gap, so no
    /// extra silence is inserted between them.
    pub fn encode_frames(&self, frames: &[Frame]) -> Result<Vec<Complex32>, EncodeError> {
        let total: usize = frames
            .iter()
            .map(|f| self.samples_for_bits(f.len()))
            .sum();
        let mut output = Vec::with_capacity(total);

        for frame in frames {
            self.encode_frame_into(frame, &mut output)?;
        }

        debug!(
            "Encoded {} frames, total samples: {}",
            frames.len(),
            output.len()
        );
        Ok(output)
    }

    pub fn samples_per_symbol(&self) -> usize {
        self.expander.samples_per_symbol()
    }

    /// Samples produced for `num_bits` logical bits
    pub fn samples_for_bits(&self, num_bits: usize) -> usize {
        self.expander
            .samples_for_chips(PulseWidthEncoder::chips_for_bits(num_bits))
    }
}
