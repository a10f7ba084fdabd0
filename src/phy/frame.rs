// Frame format: [Preamble:38] [Address:N] [Separator:5] [Payload:22] [Gap:62]

use crate::error::EncodeError;
use crate::protocol::DeviceAddress;
use crate::utils::consts::{
    GAP_BITS, PAYLOAD_BITS, PREAMBLE_BITS, PREAMBLE_LEN, SEPARATOR_BITS,
    SEPARATOR_LEN,
};
use tracing::debug;

/// `"0110"` -> `[0, 1, 1, 0]`
pub fn parse_bits(s: &str) -> Result<Vec<u8>, EncodeError> {
    s.chars()
        .enumerate()
        .map(|(index, c)| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => Err(EncodeError::InvalidBit {
                index,
                value: u8::try_from(other).unwrap_or(u8::MAX),
            }),
        })
        .collect()
}

fn constant_bits(s: &'static str) -> Vec<u8> {
    s.bytes()
        .map(|b| (b == b'1') as u8)
        .collect()
}

/// One logical frame, before line coding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bits: Vec<u8>,
}

impl Frame {
    /// Bit length of any frame sent to an address of `address_len` bits
    pub const fn bit_len(address_len: usize) -> usize {
        PREAMBLE_LEN + address_len + SEPARATOR_LEN + PAYLOAD_BITS + GAP_BITS
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn into_bits(self) -> Vec<u8> {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

/// Assembles the logical bits of one command frame.
pub struct BitFramer {
    preamble: Vec<u8>,
    separator: Vec<u8>,
    gap: Vec<u8>,
}

impl BitFramer {
    pub fn new() -> Self {
        Self {
            preamble: constant_bits(PREAMBLE_BITS),
            separator: constant_bits(SEPARATOR_BITS),
            gap: vec![0; GAP_BITS],
        }
    }

    /// Build `preamble ++ address ++ separator ++ payload ++ gap`.
    ///
    /// # Panics
    /// If `payload` is not exactly 22 characters long. Payloads are protocol
    /// constants, so a wrong length is a bug in the command table.
    pub fn frame(
        &self,
        address: Option<&DeviceAddress>,
        payload: &str,
    ) -> Result<Frame, EncodeError> {
        assert_eq!(
            payload.len(),
            PAYLOAD_BITS,
            "command payload must be {} bits: {:?}",
            PAYLOAD_BITS,
            payload
        );
        let address = address.ok_or(EncodeError::MissingAddress)?;
        let payload_bits = parse_bits(payload)?;

        let mut bits = Vec::with_capacity(Frame::bit_len(address.len()));
        bits.extend_from_slice(&self.preamble);
        bits.extend_from_slice(address.bits());
        bits.extend_from_slice(&self.separator);
        bits.extend(payload_bits);
        bits.extend_from_slice(&self.gap);

        debug!(
            "Framed payload {}: address_bits={}, total_bits={}",
            payload,
            address.len(),
            bits.len()
        );

        Ok(Frame { bits })
    }
}

impl Default for BitFramer {
    fn default() -> Self {
        Self::new()
    }
}
