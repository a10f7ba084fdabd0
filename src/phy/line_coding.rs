use crate::error::EncodeError;

// Pulse-width chips: 0 -> short pulse [1, 0, 0], 1 -> long pulse [1, 1, 0]
pub const ZERO_CHIPS: [u8; 3] = [1, 0, 0];
pub const ONE_CHIPS: [u8; 3] = [1, 1, 0];

/// Maps logical bits to chips, three per bit.
pub struct PulseWidthEncoder;

impl PulseWidthEncoder {
    /// slice of bits -> chip sequence
    pub fn encode(bits: &[u8]) -> Result<Vec<u8>, EncodeError> {
        let mut chips = Vec::with_capacity(Self::chips_for_bits(bits.len()));

        for (index, &bit) in bits.iter().enumerate() {
            match bit {
                0 => chips.extend_from_slice(&ZERO_CHIPS),
                1 => chips.extend_from_slice(&ONE_CHIPS),
                value => return Err(EncodeError::InvalidBit { index, value }),
            }
        }

        Ok(chips)
    }

    pub fn chips_for_bits(num_bits: usize) -> usize {
        num_bits * ZERO_CHIPS.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_bits() {
        assert_eq!(PulseWidthEncoder::encode(&[0]).unwrap(), vec![1, 0, 0]);
        assert_eq!(PulseWidthEncoder::encode(&[1]).unwrap(), vec![1, 1, 0]);
    }

    #[test]
    fn test_length_and_order() {
        let bits = vec![0, 1, 1, 0, 1, 0, 0, 0, 1];
        let chips = PulseWidthEncoder::encode(&bits).unwrap();

        assert_eq!(chips.len(), 3 * bits.len());
        assert_eq!(chips.len(), PulseWidthEncoder::chips_for_bits(bits.len()));
        for (bit, chunk) in bits.iter().zip(chips.chunks(3)) {
            let expected = if *bit == 0 { ZERO_CHIPS } else { ONE_CHIPS };
            assert_eq!(chunk, expected);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(PulseWidthEncoder::encode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_bit() {
        assert_eq!(
            PulseWidthEncoder::encode(&[0, 1, 2, 1]),
            Err(EncodeError::InvalidBit { index: 2, value: 2 })
        );
    }
}
