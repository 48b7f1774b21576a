use core::fmt::{self, Display};

/// A CRC-16/CCITT-FALSE checksum
///
/// EMV QR payloads are terminated by this checksum, rendered as 4
/// uppercase hexadecimal digits (initial register `0xFFFF`,
/// polynomial `0x1021`, MSB-first, no reflection, no final XOR; the
/// `crc` crate calls these parameters `CRC_16_IBM_3740`).
///
/// The checksum is computed over bytes. Reference PromptPay
/// generators hash one character code per step instead, which is
/// only equivalent for ASCII input; every payload this crate builds
/// is ASCII, and callers feeding [`Crc16::compute`] arbitrary text
/// must keep it that way to stay compatible.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Crc16(u16);

const CRC: crc::Crc<u16> = crc::Crc::<u16>::new(&crc::CRC_16_IBM_3740);

impl Crc16 {
    #[must_use]
    pub fn compute(buf: &[u8]) -> Self {
        Self(CRC.checksum(buf))
    }

    /// Decodes a checksum from its 4 uppercase hex digit rendering.
    ///
    /// # Errors
    ///
    /// It returns an error if `hex` is not exactly 4 uppercase
    /// hexadecimal digits.
    pub fn from_hex(hex: &str) -> Result<Self, Crc16FromHexError> {
        if hex.len() != 4 {
            return Err(Crc16FromHexError);
        }

        let mut val = 0u16;
        for b in hex.bytes() {
            let digit = match b {
                b'0'..=b'9' => b - b'0',
                b'A'..=b'F' => b - b'A' + 10,
                _ => return Err(Crc16FromHexError),
            };
            val = val << 4 | u16::from(digit);
        }

        Ok(Self(val))
    }

    #[must_use]
    pub fn to_raw(self) -> u16 {
        self.0
    }
}

impl Display for Crc16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// An error encountered while decoding [`Crc16`] from hex digits
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
#[error("invalid CRC rendering")]
pub struct Crc16FromHexError;

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use claims::{assert_err, assert_ok_eq};

    use super::Crc16;

    #[test]
    fn compute() {
        // Check value of the CRC-16/CCITT-FALSE parameters
        let crc = Crc16::compute(b"123456789");
        assert_eq!(0x29B1, crc.to_raw());
        assert_eq!("29B1", crc.to_string());

        assert_eq!(0xFFFF, Crc16::compute(b"").to_raw());
        assert_eq!(0xB915, Crc16::compute(b"A").to_raw());
    }

    #[test]
    fn compute_is_deterministic() {
        let input = b"00020101021129370016A000000677010111011300668123456785802TH6304";
        let crc = Crc16::compute(input);
        assert_eq!(0x5073, crc.to_raw());
        assert_eq!(crc, Crc16::compute(input));
    }

    #[test]
    fn hex_round_trip() {
        for raw in [0x0000, 0x0001, 0x29B1, 0x74B5, 0xFFFF] {
            let crc = Crc16(raw);
            assert_ok_eq!(Crc16::from_hex(&crc.to_string()), crc);
        }
    }

    #[test]
    fn invalid_hex() {
        for hex in ["", "1", "12345", "29b1", "WXYZ", "29B", "-9B1"] {
            assert_err!(Crc16::from_hex(hex));
        }
    }
}
