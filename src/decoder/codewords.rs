//! From module grid to corrected data codewords

use super::function_mask::FunctionMask;
use super::reed_solomon::ReedSolomonDecoder;
use super::tables::{EcBlockInfo, ec_block_info};
use crate::models::{BitMatrix, ECLevel, MaskPattern, Version};

/// Read the codeword stream: unmask data modules and walk the two-column
/// zigzag from the bottom-right corner, skipping the vertical timing column.
pub fn read_codewords(
    modules: &BitMatrix,
    version: Version,
    mask: MaskPattern,
    total: usize,
) -> Vec<u8> {
    let size = version.width();
    let function = FunctionMask::new(version);
    let mut codewords = Vec::with_capacity(total);
    let mut current = 0u8;
    let mut bits = 0usize;

    let mut right = size - 1;
    while right >= 1 {
        if right == 6 {
            right = 5;
        }
        let upward = (right + 1) & 2 == 0;
        for vert in 0..size {
            let y = if upward { size - 1 - vert } else { vert };
            for x in [right, right - 1] {
                if function.is_function(x, y) || codewords.len() == total {
                    continue;
                }
                let dark = modules.get(x, y) ^ mask.is_masked(y, x);
                current = (current << 1) | dark as u8;
                bits += 1;
                if bits == 8 {
                    codewords.push(current);
                    current = 0;
                    bits = 0;
                }
            }
        }
        if right < 2 {
            break;
        }
        right -= 2;
    }
    codewords
}

/// Split the interleaved stream back into RS blocks. Short blocks come
/// first and have one data codeword fewer than the long ones.
pub fn deinterleave(codewords: &[u8], info: &EcBlockInfo) -> Vec<Vec<u8>> {
    let num_blocks = info.num_blocks;
    let short_len = info.total_codewords / num_blocks;
    let num_short = num_blocks - info.total_codewords % num_blocks;
    let short_data = short_len - info.ecc_per_block;

    let mut blocks: Vec<Vec<u8>> = (0..num_blocks)
        .map(|_| Vec::with_capacity(short_len + 1))
        .collect();
    let mut stream = codewords.iter().copied();
    for i in 0..=short_len {
        for (j, block) in blocks.iter_mut().enumerate() {
            if i == short_data && j < num_short {
                continue;
            }
            if let Some(codeword) = stream.next() {
                block.push(codeword);
            }
        }
    }
    blocks
}

/// Correct every block and concatenate their data codewords.
/// Returns `None` if any block is beyond repair.
pub fn correct_blocks(
    codewords: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> Option<Vec<u8>> {
    let info = ec_block_info(version, ec_level);
    if codewords.len() < info.total_codewords || info.num_blocks == 0 {
        return None;
    }
    let rs = ReedSolomonDecoder::new(info.ecc_per_block);
    let mut data = Vec::with_capacity(info.data_codewords());
    for (index, mut block) in deinterleave(codewords, &info).into_iter().enumerate() {
        match rs.decode(&mut block) {
            Ok(0) => {}
            Ok(fixed) => log::debug!("block {index}: corrected {fixed} codewords"),
            Err(err) => {
                log::debug!("block {index}: {err:?}");
                return None;
            }
        }
        let data_len = block.len() - info.ecc_per_block;
        data.extend_from_slice(&block[..data_len]);
    }
    Some(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deinterleave_mixed_block_lengths() {
        // version 5-Q: 134 codewords, 2 blocks of 15+18 then 2 of 16+18
        let info = ec_block_info(Version::new(5).unwrap(), ECLevel::Q);
        assert_eq!(info.total_codewords, 134);
        let stream: Vec<u8> = (0..134u32).map(|i| i as u8).collect();
        let blocks = deinterleave(&stream, &info);
        let lens: Vec<usize> = blocks.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![33, 33, 34, 34]);
        // first data codewords round-robin across blocks
        assert_eq!(blocks[0][..2], [0, 4]);
        assert_eq!(blocks[3][..2], [3, 7]);
        // the extra data codeword of long blocks follows the common ones
        assert_eq!(blocks[2][15], 60);
        assert_eq!(blocks[3][15], 61);
        // ECC is interleaved after all data
        assert_eq!(blocks[0][15], 62);
    }

    #[test]
    fn test_single_block() {
        let info = ec_block_info(Version::new(1).unwrap(), ECLevel::L);
        let stream: Vec<u8> = (0..26).collect();
        let blocks = deinterleave(&stream, &info);
        assert_eq!(blocks, vec![stream]);
    }
}
