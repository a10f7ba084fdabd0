use std::fmt;
use std::str::FromStr;

use crate::error::EncodeError;
use crate::phy::frame::parse_bits;
use crate::utils::consts::MAX_ADDRESS_BITS;

/// Bit address of one physical receiver.
///
/// Each remote is paired with a unit through this value; it is sent verbatim
/// after the preamble of every frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceAddress {
    bits: Vec<u8>,
}

impl DeviceAddress {
    /// Parse a `'0'/'1'` string. Whitespace is ignored so long addresses can
    /// be grouped for readability.
    pub fn parse(s: &str) -> Result<Self, EncodeError> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        Self::from_bits(parse_bits(&compact)?)
    }

    pub fn from_bits(bits: Vec<u8>) -> Result<Self, EncodeError> {
        if bits.is_empty() || bits.len() > MAX_ADDRESS_BITS {
            return Err(EncodeError::InvalidAddressLength {
                len: bits.len(),
                max: MAX_ADDRESS_BITS,
            });
        }
        if let Some((index, &value)) = bits
            .iter()
            .enumerate()
            .find(|&(_, &b)| b > 1)
        {
            return Err(EncodeError::InvalidBit { index, value });
        }
        Ok(Self { bits })
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

impl FromStr for DeviceAddress {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            write!(f, "{}", bit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_whitespace() {
        let addr = DeviceAddress::parse("1110 0000 1").unwrap();
        assert_eq!(addr.bits(), &[1, 1, 1, 0, 0, 0, 0, 0, 1]);
        assert_eq!(addr.to_string(), "111000001");
    }

    #[test]
    fn test_rejects_non_binary() {
        let err = DeviceAddress::parse("1102").unwrap_err();
        assert_eq!(
            err,
            EncodeError::InvalidBit {
                index: 3,
                value: b'2'
            }
        );
    }

    #[test]
    fn test_rejects_bad_length() {
        assert!(matches!(
            DeviceAddress::parse(""),
            Err(EncodeError::InvalidAddressLength { len: 0, .. })
        ));
        let long = "1".repeat(MAX_ADDRESS_BITS + 1);
        assert!(matches!(
            DeviceAddress::parse(&long),
            Err(EncodeError::InvalidAddressLength { .. })
        ));
        assert!(matches!(
            DeviceAddress::from_bits(vec![1, 0, 7]),
            Err(EncodeError::InvalidBit { index: 2, value: 7 })
        ));
    }
}
