//! Channel mixing utilities (multi-channel to mono conversion)
//!
//! Analysis stages expect mono input. Callers holding interleaved or split
//! channels convert first.

use crate::error::AnalysisError;

/// Channel mixing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMixMode {
    /// Arithmetic mean of all channels
    #[default]
    Average,
    /// Keep the channel with the larger magnitude, sample by sample
    Dominant,
}

/// Convert two split channels to mono
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the channels differ in length.
pub fn stereo_to_mono(left: &[f32], right: &[f32], mode: ChannelMixMode) -> Result<Vec<f32>, AnalysisError> {
    if left.len() != right.len() {
        return Err(AnalysisError::InvalidInput(format!(
            "Channel length mismatch: left={}, right={}",
            left.len(),
            right.len()
        )));
    }
    log::debug!("Converting stereo to mono using {:?}", mode);
    Ok(left
        .iter()
        .zip(right)
        .map(|(&l, &r)| mix(&[l, r], mode))
        .collect())
}

/// Convert interleaved samples with `channels` channels to mono
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for zero channels or a buffer whose
/// length is not a multiple of the channel count.
pub fn interleaved_to_mono(samples: &[f32], channels: usize, mode: ChannelMixMode) -> Result<Vec<f32>, AnalysisError> {
    if channels == 0 {
        return Err(AnalysisError::InvalidInput("Channel count must be > 0".to_string()));
    }
    if samples.len() % channels != 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Interleaved length {} is not a multiple of {} channels",
            samples.len(),
            channels
        )));
    }
    if channels == 1 {
        return Ok(samples.to_vec());
    }
    Ok(samples.chunks_exact(channels).map(|frame| mix(frame, mode)).collect())
}

fn mix(frame: &[f32], mode: ChannelMixMode) -> f32 {
    match mode {
        ChannelMixMode::Average => frame.iter().sum::<f32>() / frame.len() as f32,
        ChannelMixMode::Dominant => frame
            .iter()
            .copied()
            .fold(0.0f32, |acc, x| if x.abs() > acc.abs() { x } else { acc }),
    }
}
