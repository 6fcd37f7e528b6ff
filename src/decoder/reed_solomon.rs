//! Reed-Solomon error correction over GF(256)
//!
//! QR codes use the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 and a
//! generator whose roots are α^0 .. α^(ecc-1). Codeword 0 is the highest
//! degree coefficient.

const PRIMITIVE: u16 = 0x11d;

const fn build_tables() -> ([u8; 512], [u8; 256]) {
    let mut exp = [0u8; 512];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    // Doubled so products of two logs never need a modulo.
    while i < 512 {
        exp[i] = exp[i - 255];
        i += 1;
    }
    (exp, log)
}

const TABLES: ([u8; 512], [u8; 256]) = build_tables();
static EXP: [u8; 512] = TABLES.0;
static LOG: [u8; 256] = TABLES.1;

/// GF(256) arithmetic
pub struct Gf256;

impl Gf256 {
    /// α^power
    #[inline]
    pub fn exp(power: usize) -> u8 {
        EXP[power % 255]
    }

    /// Product of two field elements
    #[inline]
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        EXP[LOG[a as usize] as usize + LOG[b as usize] as usize]
    }

    /// Multiplicative inverse; `None` for zero
    #[inline]
    pub fn inv(a: u8) -> Option<u8> {
        (a != 0).then(|| EXP[255 - LOG[a as usize] as usize])
    }

    /// a / b; `None` when dividing by zero
    #[inline]
    pub fn div(a: u8, b: u8) -> Option<u8> {
        Self::inv(b).map(|inv| Self::mul(a, inv))
    }
}

/// Evaluate a polynomial given lowest degree first
fn eval_ascending(poly: &[u8], x: u8) -> u8 {
    poly.iter().rev().fold(0, |acc, &c| Gf256::mul(acc, x) ^ c)
}

/// Why a block could not be corrected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsError {
    /// More errors than the ECC codewords can locate
    TooManyErrors,
    /// Correction did not yield a valid codeword
    Uncorrectable,
}

/// Corrects one block of data + ECC codewords in place.
#[derive(Debug, Clone, Copy)]
pub struct ReedSolomonDecoder {
    num_ecc: usize,
}

impl ReedSolomonDecoder {
    pub fn new(num_ecc: usize) -> Self {
        Self { num_ecc }
    }

    /// Correct `block` in place, returning the number of corrected codewords.
    pub fn decode(&self, block: &mut [u8]) -> Result<usize, RsError> {
        let syndromes = self.syndromes(block);
        if syndromes.iter().all(|&s| s == 0) {
            return Ok(0);
        }

        let locator = berlekamp_massey(&syndromes);
        let num_errors = locator.len() - 1;
        if num_errors == 0 || 2 * num_errors > self.num_ecc {
            return Err(RsError::TooManyErrors);
        }

        // Chien search over every position in the block
        let n = block.len();
        let mut positions = Vec::with_capacity(num_errors);
        for j in 0..n {
            let power = n - 1 - j;
            let x_inv = Gf256::exp(255 - power % 255);
            if eval_ascending(&locator, x_inv) == 0 {
                positions.push(j);
            }
        }
        if positions.len() != num_errors {
            return Err(RsError::TooManyErrors);
        }

        // Forney: e = X * Ω(X^-1) / Λ'(X^-1), with Ω = S·Λ mod x^ecc
        let mut omega = vec![0u8; self.num_ecc];
        for (i, &s) in syndromes.iter().enumerate() {
            for (k, &l) in locator.iter().enumerate() {
                if i + k < self.num_ecc {
                    omega[i + k] ^= Gf256::mul(s, l);
                }
            }
        }
        let derivative: Vec<u8> = locator
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &c)| if i % 2 == 1 { c } else { 0 })
            .collect();

        for &j in &positions {
            let x = Gf256::exp(n - 1 - j);
            let x_inv = Gf256::inv(x).ok_or(RsError::Uncorrectable)?;
            let denom = eval_ascending(&derivative, x_inv);
            let num = Gf256::mul(x, eval_ascending(&omega, x_inv));
            block[j] ^= Gf256::div(num, denom).ok_or(RsError::Uncorrectable)?;
        }

        if self.syndromes(block).iter().any(|&s| s != 0) {
            return Err(RsError::Uncorrectable);
        }
        Ok(num_errors)
    }

    fn syndromes(&self, block: &[u8]) -> Vec<u8> {
        (0..self.num_ecc)
            .map(|i| {
                let x = Gf256::exp(i);
                block.iter().fold(0, |acc, &c| Gf256::mul(acc, x) ^ c)
            })
            .collect()
    }
}

/// Error locator polynomial (lowest degree first) from the syndromes
fn berlekamp_massey(syndromes: &[u8]) -> Vec<u8> {
    let mut current = vec![1u8];
    let mut previous = vec![1u8];
    let mut len = 0usize;
    let mut shift = 1usize;
    let mut last_delta = 1u8;

    for n in 0..syndromes.len() {
        let mut delta = syndromes[n];
        for i in 1..=len.min(current.len() - 1) {
            delta ^= Gf256::mul(current[i], syndromes[n - i]);
        }

        if delta == 0 {
            shift += 1;
            continue;
        }

        let scale = Gf256::div(delta, last_delta).unwrap_or(0);
        let snapshot = current.clone();
        if current.len() < previous.len() + shift {
            current.resize(previous.len() + shift, 0);
        }
        for (i, &b) in previous.iter().enumerate() {
            current[i + shift] ^= Gf256::mul(scale, b);
        }

        if 2 * len <= n {
            len = n + 1 - len;
            previous = snapshot;
            last_delta = delta;
            shift = 1;
        } else {
            shift += 1;
        }
    }

    current.resize(len + 1, 0);
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Systematic RS encoder, only needed to build test blocks
    fn encode(data: &[u8], num_ecc: usize) -> Vec<u8> {
        // generator = Π (x - α^i), highest degree first
        let mut generator = vec![1u8];
        for i in 0..num_ecc {
            let root = Gf256::exp(i);
            let mut next = vec![0u8; generator.len() + 1];
            for (k, &g) in generator.iter().enumerate() {
                next[k] ^= g;
                next[k + 1] ^= Gf256::mul(g, root);
            }
            generator = next;
        }

        let mut remainder = vec![0u8; num_ecc];
        for &d in data {
            let factor = d ^ remainder[0];
            remainder.rotate_left(1);
            remainder[num_ecc - 1] = 0;
            for (r, &g) in remainder.iter_mut().zip(&generator[1..]) {
                *r ^= Gf256::mul(g, factor);
            }
        }
        let mut block = data.to_vec();
        block.extend(remainder);
        block
    }

    #[test]
    fn test_field_basics() {
        assert_eq!(Gf256::exp(0), 1);
        assert_eq!(Gf256::exp(8), 29);
        assert_eq!(Gf256::mul(2, 128), 29);
        for a in 1..=255u8 {
            assert_eq!(Gf256::mul(a, Gf256::inv(a).unwrap()), 1);
        }
        assert_eq!(Gf256::inv(0), None);
    }

    #[test]
    fn test_clean_block() {
        let mut block = encode(b"hello world", 10);
        assert_eq!(ReedSolomonDecoder::new(10).decode(&mut block), Ok(0));
        assert_eq!(&block[..11], b"hello world");
    }

    #[test]
    fn test_corrects_up_to_half_the_ecc() {
        let original = encode(b"particles assemble", 16);
        let mut block = original.clone();
        for (i, pos) in [0usize, 5, 9, 17, 20, 25, 30, 33].iter().enumerate() {
            block[*pos] ^= 0x5a + i as u8;
        }
        assert_eq!(ReedSolomonDecoder::new(16).decode(&mut block), Ok(8));
        assert_eq!(block, original);
    }

    #[test]
    fn test_too_many_errors() {
        let original = encode(b"abcdef", 4);
        let mut block = original.clone();
        for b in block.iter_mut().take(4) {
            *b ^= 0xff;
        }
        let result = ReedSolomonDecoder::new(4).decode(&mut block);
        // beyond capacity: either detected or miscorrected, never restored
        assert!(result.is_err() || block != original);
    }
}
