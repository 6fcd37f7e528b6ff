//! Segment decoding of the corrected data codewords

use crate::models::Version;

const ALPHANUMERIC: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// ECI designator for UTF-8
const ECI_UTF8: u32 = 26;
/// ECI designators for ISO-8859-1
const ECI_LATIN1: [u32; 2] = [1, 3];

/// Reads big-endian bit fields from a byte slice.
struct BitReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() * 8 - self.pos
    }

    fn read(&mut self, count: usize) -> Option<u32> {
        if count > self.remaining() {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..count {
            let byte = self.bytes[self.pos / 8];
            let bit = (byte >> (7 - self.pos % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.pos += 1;
        }
        Some(value)
    }
}

/// Segment modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Numeric,
    Alphanumeric,
    Byte,
    Kanji,
}

impl Mode {
    /// Width of the character count field
    fn count_bits(self, version: Version) -> usize {
        let group = match version.number() {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match self {
            Mode::Numeric => [10, 12, 14][group],
            Mode::Alphanumeric => [9, 11, 13][group],
            Mode::Byte => [8, 16, 16][group],
            Mode::Kanji => [8, 10, 12][group],
        }
    }
}

/// Decoded payload: raw segment bytes and their text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Payload {
    pub data: Vec<u8>,
    pub content: String,
}

/// How byte segments should become text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    /// UTF-8 when valid, otherwise Latin-1
    Auto,
    Utf8,
    Latin1,
}

fn bytes_to_text(bytes: &[u8], charset: Charset) -> String {
    let latin1 = || bytes.iter().map(|&b| b as char).collect();
    match charset {
        Charset::Latin1 => latin1(),
        Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Charset::Auto => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_owned(),
            Err(_) => latin1(),
        },
    }
}

/// Decode every segment up to the terminator or the end of the data.
pub fn decode_payload(codewords: &[u8], version: Version) -> Option<Payload> {
    let mut reader = BitReader::new(codewords);
    let mut payload = Payload::default();
    let mut charset = Charset::Auto;
    // Byte and Kanji segments may split one multi-byte character, so their
    // bytes become text together.
    let mut run: Vec<u8> = Vec::new();
    let flush = |run: &mut Vec<u8>, payload: &mut Payload, charset: Charset| {
        if !run.is_empty() {
            payload.content.push_str(&bytes_to_text(run, charset));
            payload.data.append(run);
        }
    };

    while reader.remaining() >= 4 {
        let mode = match reader.read(4)? {
            0b0000 => break,
            0b0001 => Mode::Numeric,
            0b0010 => Mode::Alphanumeric,
            0b0100 => Mode::Byte,
            0b1000 => Mode::Kanji,
            0b0111 => {
                let eci = read_eci(&mut reader)?;
                log::trace!("ECI designator {eci}");
                flush(&mut run, &mut payload, charset);
                charset = match eci {
                    ECI_UTF8 => Charset::Utf8,
                    e if ECI_LATIN1.contains(&e) => Charset::Latin1,
                    _ => Charset::Auto,
                };
                continue;
            }
            // structured append header: sequence + parity
            0b0011 => {
                reader.read(16)?;
                continue;
            }
            0b0101 => continue,
            0b1001 => {
                reader.read(8)?;
                continue;
            }
            other => {
                log::debug!("unknown segment mode {other:04b}");
                return None;
            }
        };

        let count = reader.read(mode.count_bits(version))? as usize;
        match mode {
            Mode::Numeric => {
                let digits = read_numeric(&mut reader, count)?;
                flush(&mut run, &mut payload, charset);
                payload.data.extend_from_slice(digits.as_bytes());
                payload.content.push_str(&digits);
            }
            Mode::Alphanumeric => {
                let text = read_alphanumeric(&mut reader, count)?;
                flush(&mut run, &mut payload, charset);
                payload.data.extend_from_slice(text.as_bytes());
                payload.content.push_str(&text);
            }
            Mode::Byte => {
                let bytes = (0..count)
                    .map(|_| reader.read(8).map(|b| b as u8))
                    .collect::<Option<Vec<u8>>>()?;
                run.extend(bytes);
            }
            Mode::Kanji => run.extend(read_kanji(&mut reader, count)?),
        }
    }
    flush(&mut run, &mut payload, charset);
    Some(payload)
}

fn read_eci(reader: &mut BitReader) -> Option<u32> {
    let first = reader.read(8)?;
    if first & 0x80 == 0 {
        Some(first)
    } else if first & 0xc0 == 0x80 {
        Some(((first & 0x3f) << 8) | reader.read(8)?)
    } else if first & 0xe0 == 0xc0 {
        Some(((first & 0x1f) << 16) | reader.read(16)?)
    } else {
        None
    }
}

fn read_numeric(reader: &mut BitReader, count: usize) -> Option<String> {
    let mut digits = String::with_capacity(count);
    let mut left = count;
    while left > 0 {
        let (n, bits) = match left {
            1 => (1, 4),
            2 => (2, 7),
            _ => (3, 10),
        };
        let value = reader.read(bits)?;
        if value >= 10u32.pow(n as u32) {
            return None;
        }
        digits.push_str(&format!("{value:0width$}", width = n));
        left -= n;
    }
    Some(digits)
}

fn read_alphanumeric(reader: &mut BitReader, count: usize) -> Option<String> {
    let lookup = |i: u32| ALPHANUMERIC.get(i as usize).map(|&c| c as char);
    let mut text = String::with_capacity(count);
    let mut left = count;
    while left >= 2 {
        let value = reader.read(11)?;
        text.push(lookup(value / 45)?);
        text.push(lookup(value % 45)?);
        left -= 2;
    }
    if left == 1 {
        text.push(lookup(reader.read(6)?)?);
    }
    Some(text)
}

/// Kanji characters as Shift JIS byte pairs
fn read_kanji(reader: &mut BitReader, count: usize) -> Option<Vec<u8>> {
    let mut bytes = Vec::with_capacity(count * 2);
    for _ in 0..count {
        let value = reader.read(13)?;
        let packed = ((value / 0xc0) << 8) | (value % 0xc0);
        let sjis = if packed < 0x1f00 {
            packed + 0x8140
        } else {
            packed + 0xc140
        };
        bytes.push((sjis >> 8) as u8);
        bytes.push(sjis as u8);
    }
    Some(bytes)
}
