/// QR symbol version (1-40)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version(u8);

impl Version {
    /// Create a version, rejecting numbers outside 1-40
    pub fn new(number: u8) -> Option<Self> {
        (1..=40).contains(&number).then_some(Self(number))
    }

    /// Version whose symbol is `width` modules across, if any
    pub fn from_width(width: usize) -> Option<Self> {
        if width < 21 || (width - 17) % 4 != 0 {
            return None;
        }
        u8::try_from((width - 17) / 4).ok().and_then(Self::new)
    }

    /// Get the version number
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Get the size in modules (width = height)
    pub fn width(&self) -> usize {
        17 + 4 * self.0 as usize
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L,
    /// Medium (~15% recovery capacity)
    M,
    /// Quartile (~25% recovery capacity)
    Q,
    /// High (~30% recovery capacity)
    #[default]
    H,
}

impl ECLevel {
    /// Level from the two indicator bits stored in format information
    /// (01=L, 00=M, 11=Q, 10=H)
    pub fn from_format_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }

    /// Row index into the per-level codeword tables
    pub(crate) fn table_index(self) -> usize {
        match self {
            ECLevel::L => 0,
            ECLevel::M => 1,
            ECLevel::Q => 2,
            ECLevel::H => 3,
        }
    }
}

impl std::str::FromStr for ECLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(ECLevel::L),
            "M" => Ok(ECLevel::M),
            "Q" => Ok(ECLevel::Q),
            "H" => Ok(ECLevel::H),
            other => Err(format!("unknown error correction level {other:?}")),
        }
    }
}

impl From<ECLevel> for qrcode::EcLevel {
    fn from(level: ECLevel) -> Self {
        match level {
            ECLevel::L => qrcode::EcLevel::L,
            ECLevel::M => qrcode::EcLevel::M,
            ECLevel::Q => qrcode::EcLevel::Q,
            ECLevel::H => qrcode::EcLevel::H,
        }
    }
}

impl From<qrcode::EcLevel> for ECLevel {
    fn from(level: qrcode::EcLevel) -> Self {
        match level {
            qrcode::EcLevel::L => ECLevel::L,
            qrcode::EcLevel::M => ECLevel::M,
            qrcode::EcLevel::Q => ECLevel::Q,
            qrcode::EcLevel::H => ECLevel::H,
        }
    }
}

/// Data mask pattern (0-7). `row` is i, `col` is j in the formulas below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskPattern {
    /// (i + j) % 2 == 0
    Pattern0 = 0,
    /// i % 2 == 0
    Pattern1 = 1,
    /// j % 3 == 0
    Pattern2 = 2,
    /// (i + j) % 3 == 0
    Pattern3 = 3,
    /// (i/2 + j/3) % 2 == 0
    Pattern4 = 4,
    /// (i*j)%2 + (i*j)%3 == 0
    Pattern5 = 5,
    /// ((i*j)%2 + (i*j)%3) % 2 == 0
    Pattern6 = 6,
    /// ((i+j)%2 + (i*j)%3) % 2 == 0
    Pattern7 = 7,
}

impl MaskPattern {
    /// Mask pattern from the low three bits
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => MaskPattern::Pattern0,
            1 => MaskPattern::Pattern1,
            2 => MaskPattern::Pattern2,
            3 => MaskPattern::Pattern3,
            4 => MaskPattern::Pattern4,
            5 => MaskPattern::Pattern5,
            6 => MaskPattern::Pattern6,
            _ => MaskPattern::Pattern7,
        }
    }

    /// Whether the module at (row, col) is inverted by this mask
    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        let (i, j) = (row, col);
        match self {
            MaskPattern::Pattern0 => (i + j) % 2 == 0,
            MaskPattern::Pattern1 => i % 2 == 0,
            MaskPattern::Pattern2 => j % 3 == 0,
            MaskPattern::Pattern3 => (i + j) % 3 == 0,
            MaskPattern::Pattern4 => (i / 2 + j / 3) % 2 == 0,
            MaskPattern::Pattern5 => ((i * j) % 2 + (i * j) % 3) == 0,
            MaskPattern::Pattern6 => (((i * j) % 2) + ((i * j) % 3)) % 2 == 0,
            MaskPattern::Pattern7 => (((i + j) % 2) + ((i * j) % 3)) % 2 == 0,
        }
    }
}

/// A decoded QR symbol
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedQr {
    /// Raw decoded bytes
    pub data: Vec<u8>,
    /// Decoded content as text
    pub content: String,
    /// Symbol version
    pub version: Version,
    /// Error correction level
    pub ec_level: ECLevel,
    /// Mask pattern used
    pub mask: MaskPattern,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_width() {
        assert_eq!(Version::new(1).map(|v| v.width()), Some(21));
        assert_eq!(Version::new(3).map(|v| v.width()), Some(29));
        assert_eq!(Version::new(40).map(|v| v.width()), Some(177));
        assert_eq!(Version::new(0), None);
        assert_eq!(Version::new(41), None);
    }

    #[test]
    fn test_version_from_width() {
        assert_eq!(Version::from_width(29).map(|v| v.number()), Some(3));
        assert_eq!(Version::from_width(30), None);
        assert_eq!(Version::from_width(17), None);
    }

    #[test]
    fn test_ec_level_format_bits() {
        assert_eq!(ECLevel::from_format_bits(0b01), ECLevel::L);
        assert_eq!(ECLevel::from_format_bits(0b00), ECLevel::M);
        assert_eq!(ECLevel::from_format_bits(0b11), ECLevel::Q);
        assert_eq!(ECLevel::from_format_bits(0b10), ECLevel::H);
    }

    #[test]
    fn test_ec_level_parse() {
        assert_eq!("h".parse::<ECLevel>(), Ok(ECLevel::H));
        assert!("x".parse::<ECLevel>().is_err());
    }

    #[test]
    fn test_mask_pattern() {
        let mask = MaskPattern::Pattern0;
        assert!(mask.is_masked(0, 0));
        assert!(!mask.is_masked(0, 1));
        assert!(mask.is_masked(1, 1));
        assert!(MaskPattern::Pattern2.is_masked(5, 3));
        assert!(!MaskPattern::Pattern2.is_masked(3, 5));
    }
}
