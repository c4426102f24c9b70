//! Analysis windows

/// Periodic Hann window of length `len`: `0.5 * (1 - cos(2*pi*i/len))`
pub fn hann_window(len: usize) -> Vec<f32> {
    if len == 0 {
        return Vec::new();
    }
    let step = 2.0 * std::f32::consts::PI / len as f32;
    (0..len)
        .map(|i| 0.5 * (1.0 - (step * i as f32).cos()))
        .collect()
}

/// Copy `samples` and taper the copy with a Hann window
pub fn apply_hann(samples: &[f32]) -> Vec<f32> {
    let window = hann_window(samples.len());
    samples
        .iter()
        .zip(window.iter())
        .map(|(&s, &w)| s * w)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_shape() {
        let w = hann_window(8);
        assert_eq!(w.len(), 8);
        assert!(w[0].abs() < 1e-7);
        assert!((w[4] - 1.0).abs() < 1e-6);
        // Periodic window: symmetric around the centre, excluding index 0
        assert!((w[1] - w[7]).abs() < 1e-6);
        assert!((w[3] - w[5]).abs() < 1e-6);
    }

    #[test]
    fn test_apply_hann_leaves_input_untouched() {
        let samples = vec![1.0f32; 16];
        let tapered = apply_hann(&samples);
        assert!(samples.iter().all(|&s| s == 1.0));
        assert!(tapered[0].abs() < 1e-7);
        assert!((tapered[8] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_window() {
        assert!(hann_window(0).is_empty());
    }
}
