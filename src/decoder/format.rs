//! Format and version information
//!
//! Both are BCH codes small enough to decode by nearest valid codeword: 32
//! format words (15,5) and 34 version words (18,6). Each is stored twice in
//! the symbol; the copy with the closer match wins.

use crate::models::{BitMatrix, ECLevel, MaskPattern, Version};

const FORMAT_GENERATOR: u32 = 0x537;
const FORMAT_MASK: u32 = 0x5412;
const VERSION_GENERATOR: u32 = 0x1f25;

/// Both BCH codes here correct up to three bit errors
const MAX_BIT_ERRORS: u32 = 3;

/// Append the BCH remainder of `data` to it
const fn bch_encode(data: u32, generator: u32, ecc_bits: u32) -> u32 {
    let mut rem = data;
    let mut i = 0;
    while i < ecc_bits {
        rem = (rem << 1) ^ ((rem >> (ecc_bits - 1)) * generator);
        i += 1;
    }
    (data << ecc_bits) | (rem & ((1 << ecc_bits) - 1))
}

/// Masked 15-bit format word for five data bits
pub const fn format_word(data: u8) -> u16 {
    (bch_encode(data as u32, FORMAT_GENERATOR, 10) ^ FORMAT_MASK) as u16
}

/// 18-bit version word for versions 7-40
pub const fn version_word(version: u8) -> u32 {
    bch_encode(version as u32, VERSION_GENERATOR, 12)
}

/// Error correction level and mask read from the format area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub ec_level: ECLevel,
    pub mask: MaskPattern,
}

impl FormatInfo {
    /// Interpret five data bits: two EC indicator bits then three mask bits
    pub fn from_data(data: u8) -> Self {
        Self {
            ec_level: ECLevel::from_format_bits(data >> 3),
            mask: MaskPattern::from_bits(data),
        }
    }

    /// Closest valid format word to `word`, with its bit distance
    pub fn nearest(word: u16) -> (Self, u32) {
        (0u8..32)
            .map(|data| (data, (format_word(data) ^ word).count_ones()))
            .min_by_key(|&(_, distance)| distance)
            .map(|(data, distance)| (Self::from_data(data), distance))
            .unwrap_or((Self::from_data(0), u32::MAX))
    }

    /// Read both copies from a module grid and decode the better one
    pub fn read(modules: &BitMatrix) -> Option<Self> {
        let size = modules.width();
        if size < 21 {
            return None;
        }
        let bit = |x, y| modules.get(x, y) as u16;

        let mut first = 0u16;
        let mut second = 0u16;
        for i in 0..15usize {
            let (x1, y1) = match i {
                0..=5 => (8, i),
                6 => (8, 7),
                7 => (8, 8),
                8 => (7, 8),
                _ => (14 - i, 8),
            };
            let (x2, y2) = if i < 8 {
                (size - 1 - i, 8)
            } else {
                (8, size - 15 + i)
            };
            first |= bit(x1, y1) << i;
            second |= bit(x2, y2) << i;
        }

        let (a, da) = Self::nearest(first);
        let (b, db) = Self::nearest(second);
        let (info, distance) = if da <= db { (a, da) } else { (b, db) };
        log::trace!("format words {first:015b}/{second:015b}, distance {distance}");
        (distance <= MAX_BIT_ERRORS).then_some(info)
    }
}

/// Version stored in the version areas of a symbol of version 7 or above.
pub fn read_version(modules: &BitMatrix) -> Option<Version> {
    let size = modules.width();
    if size < 45 {
        return None;
    }
    let mut upper_right = 0u32;
    let mut lower_left = 0u32;
    for i in 0..18 {
        let a = size - 11 + i % 3;
        let b = i / 3;
        upper_right |= (modules.get(a, b) as u32) << i;
        lower_left |= (modules.get(b, a) as u32) << i;
    }

    let (number, distance) = (7u8..=40)
        .map(|v| {
            let word = version_word(v);
            let d = (word ^ upper_right).count_ones().min((word ^ lower_left).count_ones());
            (v, d)
        })
        .min_by_key(|&(_, d)| d)?;
    log::trace!("version {number} at distance {distance}");
    if distance <= MAX_BIT_ERRORS {
        Version::new(number)
    } else {
        None
    }
}
