//! Chroma normalization

const EPSILON: f32 = 1e-12;

/// Divide every bin by the largest one
///
/// Leaves the vector untouched when every bin is (numerically) zero.
pub fn normalize_by_max(bins: &mut [f32; 12]) {
    let max = bins.iter().copied().fold(0.0f32, f32::max);
    if max <= EPSILON {
        return;
    }
    for v in bins.iter_mut() {
        *v /= max;
    }
}
