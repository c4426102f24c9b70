//! Frequency to note quantization

use super::PitchReading;
use crate::features::tuning::{cents_between, nearest_note};

/// Lowest frequency accepted as a musical pitch (Hz)
pub const MIN_NOTE_FREQUENCY: f32 = 16.0;

/// Highest frequency accepted as a musical pitch (Hz)
pub const MAX_NOTE_FREQUENCY: f32 = 8000.0;

/// Quantize a frequency to the nearest equal-tempered note
///
/// Returns `None` outside [`MIN_NOTE_FREQUENCY`, `MAX_NOTE_FREQUENCY`].
pub fn quantize_frequency(frequency: f32) -> Option<PitchReading> {
    if !frequency.is_finite() || !(MIN_NOTE_FREQUENCY..=MAX_NOTE_FREQUENCY).contains(&frequency) {
        return None;
    }
    let note = nearest_note(frequency)?;
    let cents = cents_between(frequency, note.frequency);
    Some(PitchReading {
        frequency,
        note: note.name.clone(),
        midi: note.midi,
        cents,
        confidence: (1.0 - cents.abs() / 50.0).max(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_exact_note() {
        let reading = quantize_frequency(440.0).unwrap();
        assert_eq!(reading.note, "A4");
        assert_eq!(reading.midi, 69);
        assert!(reading.cents.abs() < 0.01);
        assert!(reading.confidence > 0.99);
    }

    #[test]
    fn test_quantize_sharp_note() {
        // 25 cents sharp of A4
        let f = 440.0 * 2.0f32.powf(25.0 / 1200.0);
        let reading = quantize_frequency(f).unwrap();
        assert_eq!(reading.note, "A4");
        assert!((reading.cents - 25.0).abs() < 0.1);
        assert!((reading.confidence - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_quantize_flat_picks_nearest() {
        // 40 cents flat of C4 stays C4, 60 cents flat becomes B3
        let c4 = 261.6256f32;
        assert_eq!(quantize_frequency(c4 * 2.0f32.powf(-40.0 / 1200.0)).unwrap().note, "C4");
        assert_eq!(quantize_frequency(c4 * 2.0f32.powf(-60.0 / 1200.0)).unwrap().note, "B3");
    }

    #[test]
    fn test_quantize_out_of_range() {
        assert!(quantize_frequency(15.0).is_none());
        assert!(quantize_frequency(9000.0).is_none());
        assert!(quantize_frequency(f32::NAN).is_none());
    }
}
