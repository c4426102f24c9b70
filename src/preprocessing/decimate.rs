//! Integer-factor decimation by box averaging

/// Integer decimation factor bringing `sample_rate` close to `target_rate`
///
/// `sample_rate / target_rate` rounded down, never below 1.
pub fn decimation_factor(sample_rate: u32, target_rate: u32) -> usize {
    if target_rate == 0 {
        return 1;
    }
    ((sample_rate / target_rate) as usize).max(1)
}

/// Average each run of `factor` samples into one
///
/// A trailing partial run is dropped. A factor of 0 or 1 copies the input.
pub fn decimate(samples: &[f32], factor: usize) -> Vec<f32> {
    if factor <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(factor)
        .map(|chunk| chunk.iter().sum::<f32>() / factor as f32)
        .collect()
}
