use crate::models::BitMatrix;

/// Binarize with Otsu's threshold. `true` = dark.
pub fn otsu_binarize(gray: &[u8], width: usize, height: usize) -> BitMatrix {
    threshold_binarize(gray, width, height, otsu_threshold(gray))
}

/// Otsu's optimal threshold: pixels strictly below it form the dark class.
///
/// A single-valued image has no split; 128 is returned so that the lone
/// class lands on the side its value suggests.
pub fn otsu_threshold(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total = gray.len() as f64;
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut dark_count = 0.0;
    let mut dark_sum = 0.0;
    let mut best_variance = 0.0;
    let mut best = 128u8;

    // Threshold t puts intensities 0..t in the dark class.
    for t in 1..=255usize {
        dark_count += histogram[t - 1] as f64;
        dark_sum += (t - 1) as f64 * histogram[t - 1] as f64;
        let light_count = total - dark_count;
        if dark_count == 0.0 || light_count == 0.0 {
            continue;
        }
        let dark_mean = dark_sum / dark_count;
        let light_mean = (total_sum - dark_sum) / light_count;
        let variance = dark_count * light_count * (dark_mean - light_mean).powi(2);
        if variance > best_variance {
            best_variance = variance;
            best = t as u8;
        }
    }
    best
}

/// Simple global threshold binarization
pub fn threshold_binarize(gray: &[u8], width: usize, height: usize, threshold: u8) -> BitMatrix {
    BitMatrix::from_fn(width, height, |x, y| {
        gray.get(y * width + x).is_some_and(|&v| v < threshold)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_binarize() {
        let gray = vec![100, 150, 200, 50];
        let binary = threshold_binarize(&gray, 2, 2, 128);
        assert!(binary.get(0, 0));
        assert!(!binary.get(1, 0));
        assert!(!binary.get(0, 1));
        assert!(binary.get(1, 1));
    }

    #[test]
    fn test_otsu_separates_two_classes() {
        let mut gray = vec![50u8; 50];
        gray.extend(vec![200u8; 50]);
        let t = otsu_threshold(&gray);
        assert!(t > 50 && t <= 200);

        let binary = otsu_binarize(&gray, 10, 10);
        assert!(binary.get(0, 0));
        assert!(!binary.get(0, 7));
    }

    #[test]
    fn test_otsu_low_contrast_colours() {
        // dark blue on light blue, as a themed render would produce
        let mut gray = vec![60u8; 30];
        gray.extend(vec![170u8; 70]);
        let binary = otsu_binarize(&gray, 10, 10);
        assert_eq!(binary.count_set(), 30);
    }

    #[test]
    fn test_uniform_image() {
        assert_eq!(otsu_threshold(&[255; 16]), 128);
        assert_eq!(otsu_binarize(&[255; 16], 4, 4).count_set(), 0);
    }
}
