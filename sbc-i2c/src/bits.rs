//! Bit-field extraction for decoding register values.
//!
//! Sensor readings often pack several fields into one byte (status flags,
//! the high nibble of a 20-bit sample, ...). [`get_bits`] pulls out an
//! inclusive range of bits and shifts it down to bit 0.

use crate::error::{Error, Result};

/// Highest valid bit index in a byte.
const MAX_BIT: u8 = 7;

/// Extract the inclusive bit range between `bit_hi` and `bit_lo`.
///
/// The two indices may be given in either order. The lower index becomes the
/// least significant bit of the result.
///
/// ```
/// use sbc_i2c::bits::get_bits;
///
/// // 0x5A = 0b0101_1010
/// assert_eq!(get_bits(0x5A, 4, 1).unwrap(), 0b1101);
/// assert_eq!(get_bits(0x5A, 1, 4).unwrap(), 0b1101);
/// ```
pub fn get_bits(value: u8, bit_hi: u8, bit_lo: u8) -> Result<u8> {
    for bit in [bit_hi, bit_lo] {
        if bit > MAX_BIT {
            return Err(Error::InvalidBitIndex(bit));
        }
    }

    let lo = bit_hi.min(bit_lo);
    let hi = bit_hi.max(bit_lo);
    let width = u32::from(hi - lo + 1);

    // Widen so an 8-bit mask doesn't overflow the shift
    let mask = ((1u16 << width) - 1) as u8;
    Ok((value >> lo) & mask)
}

/// Extract a single bit (0 or 1).
pub fn get_bit(value: u8, bit: u8) -> Result<u8> {
    get_bits(value, bit, bit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_bits_of_0x5a() {
        // 0x5A = 0b01011010
        let expected = [0, 1, 0, 1, 1, 0, 1, 0];
        for (bit, want) in (0..=7).rev().zip(expected) {
            assert_eq!(get_bit(0x5A, bit).unwrap(), want, "bit {}", bit);
        }
    }

    #[test]
    fn test_single_bit_matches_shift() {
        for value in 0..=u8::MAX {
            for bit in 0..=7 {
                let got = get_bit(value, bit).unwrap();
                assert!(got <= 1);
                assert_eq!(got, (value >> bit) & 1);
            }
        }
    }

    #[test]
    fn test_order_independent() {
        for value in [0x00, 0x5A, 0xA5, 0xC3, 0xFF] {
            for hi in 0..=7 {
                for lo in 0..=7 {
                    assert_eq!(
                        get_bits(value, hi, lo).unwrap(),
                        get_bits(value, lo, hi).unwrap()
                    );
                }
            }
        }
    }

    #[test]
    fn test_full_byte() {
        assert_eq!(get_bits(0xFF, 7, 0).unwrap(), 0xFF);
        assert_eq!(get_bits(0x00, 7, 0).unwrap(), 0x00);
        assert_eq!(get_bits(0x5A, 0, 7).unwrap(), 0x5A);
    }

    #[test]
    fn test_nibbles() {
        // AHT10-style split byte: humidity low nibble high, temperature high nibble low
        assert_eq!(get_bits(0x9C, 7, 4).unwrap(), 0x9);
        assert_eq!(get_bits(0x9C, 3, 0).unwrap(), 0xC);
    }

    #[test]
    fn test_out_of_range_index() {
        assert!(matches!(get_bit(0x01, 8), Err(Error::InvalidBitIndex(8))));
        assert!(matches!(get_bits(0x01, 2, 9), Err(Error::InvalidBitIndex(9))));
    }
}
