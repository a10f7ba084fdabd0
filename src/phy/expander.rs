use crate::error::EncodeError;
use num_complex::Complex32;

/// Oversampling ratio between the sink clock and the chip rate.
///
/// The receiver only tolerates an integral ratio.
pub fn samples_per_symbol(
    sample_rate: u32,
    baud_rate: u32,
) -> Result<usize, EncodeError> {
    if sample_rate == 0 || baud_rate == 0 || sample_rate % baud_rate != 0 {
        return Err(EncodeError::InvalidRate {
            sample_rate,
            baud_rate,
        });
    }
    Ok((sample_rate / baud_rate) as usize)
}

/// Holds every chip for `samples_per_symbol` samples on a real-valued envelope.
pub struct SampleExpander {
    samples_per_symbol: usize,
}

impl SampleExpander {
    pub fn new(samples_per_symbol: usize) -> Result<Self, EncodeError> {
        if samples_per_symbol == 0 {
            return Err(EncodeError::InvalidRate {
                sample_rate: 0,
                baud_rate: 0,
            });
        }
        Ok(Self { samples_per_symbol })
    }

    pub fn from_rates(sample_rate: u32, baud_rate: u32) -> Result<Self, EncodeError> {
        Self::new(samples_per_symbol(sample_rate, baud_rate)?)
    }

    pub fn samples_per_symbol(&self) -> usize {
        self.samples_per_symbol
    }

    /// chips -> complex samples
    pub fn expand(&self, chips: &[u8]) -> Result<Vec<Complex32>, EncodeError> {
        let mut samples = Vec::with_capacity(self.samples_for_chips(chips.len()));
        self.expand_into(chips, &mut samples)?;
        Ok(samples)
    }

    /// Same as [`expand`](Self::expand) but appends to `out`. Nothing is
    /// appended when a chip is invalid.
    pub fn expand_into(
        &self,
        chips: &[u8],
        out: &mut Vec<Complex32>,
    ) -> Result<(), EncodeError> {
        if let Some((index, &value)) = chips
            .iter()
            .enumerate()
            .find(|&(_, &c)| c > 1)
        {
            return Err(EncodeError::InvalidBit { index, value });
        }

        out.reserve(self.samples_for_chips(chips.len()));
        for &chip in chips {
            let level = Complex32::new(chip as f32, 0.0);
            out.extend(std::iter::repeat_n(level, self.samples_per_symbol));
        }
        Ok(())
    }

    pub fn samples_for_chips(&self, num_chips: usize) -> usize {
        num_chips * self.samples_per_symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_rate() {
        assert_eq!(samples_per_symbol(2_000_000, 2500), Ok(800));
    }

    #[test]
    fn test_invalid_rates() {
        assert!(matches!(
            samples_per_symbol(2_000_001, 2500),
            Err(EncodeError::InvalidRate { .. })
        ));
        assert!(samples_per_symbol(2_000_000, 0).is_err());
        assert!(samples_per_symbol(0, 2500).is_err());
        assert!(samples_per_symbol(1000, 2500).is_err());
        assert!(SampleExpander::new(0).is_err());
    }

    #[test]
    fn test_expand() {
        let expander = SampleExpander::new(4).unwrap();
        let chips = [1, 1, 0];
        let samples = expander.expand(&chips).unwrap();

        assert_eq!(samples.len(), 4 * chips.len());
        assert!(samples[..8].iter().all(|s| *s == Complex32::new(1.0, 0.0)));
        assert!(samples[8..].iter().all(|s| *s == Complex32::new(0.0, 0.0)));
    }

    #[test]
    fn test_invalid_chip_leaves_output_untouched() {
        let expander = SampleExpander::new(2).unwrap();
        let mut out = vec![Complex32::new(1.0, 0.0)];
        let err = expander.expand_into(&[1, 0, 3], &mut out).unwrap_err();

        assert_eq!(err, EncodeError::InvalidBit { index: 2, value: 3 });
        assert_eq!(out.len(), 1);
    }
}
