//! Equal-temperament tuning reference
//!
//! Chroma targets and pitch quantization both derive from the constants in
//! this module, so the 12-TET grid is identical across every component.

use once_cell::sync::Lazy;

/// Reference pitch A4 in Hz
pub const A4_FREQUENCY: f32 = 440.0;

/// C0 in Hz, 57 semitones below A4 (≈ 16.35 Hz)
pub const C0_FREQUENCY: f32 = 16.351_598;

/// Pitch-class names, index 0 = C
pub const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Lowest octave in the note table (C0)
pub const LOWEST_OCTAVE: i32 = 0;

/// Highest octave in the note table (B8)
pub const HIGHEST_OCTAVE: i32 = 8;

/// One entry of the equal-temperament note table
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEntry {
    /// Scientific pitch name, e.g. "A4"
    pub name: String,
    /// MIDI note number (C0 = 12, A4 = 69)
    pub midi: u8,
    /// Pitch class (0 = C)
    pub pitch_class: usize,
    /// Octave number
    pub octave: i32,
    /// Nominal frequency in Hz
    pub frequency: f32,
}

/// Note table spanning C0..=B8 (108 entries, ascending)
pub static NOTE_TABLE: Lazy<Vec<NoteEntry>> = Lazy::new(|| {
    let mut table = Vec::with_capacity(((HIGHEST_OCTAVE - LOWEST_OCTAVE + 1) * 12) as usize);
    for octave in LOWEST_OCTAVE..=HIGHEST_OCTAVE {
        for pitch_class in 0..12 {
            table.push(NoteEntry {
                name: format!("{}{}", PITCH_CLASS_NAMES[pitch_class], octave),
                midi: (12 + octave * 12 + pitch_class as i32) as u8,
                pitch_class,
                octave,
                frequency: note_frequency(pitch_class, octave),
            });
        }
    }
    table
});

/// Frequency of `pitch_class` in `octave`: `C0 * 2^((octave*12 + pc)/12)`
pub fn note_frequency(pitch_class: usize, octave: i32) -> f32 {
    let semitones = octave * 12 + pitch_class as i32;
    C0_FREQUENCY * 2.0f32.powf(semitones as f32 / 12.0)
}

/// Name of a pitch class, wrapping modulo 12
pub fn pitch_class_name(pitch_class: usize) -> &'static str {
    PITCH_CLASS_NAMES[pitch_class % 12]
}

/// Nearest table entry to `frequency` (linear scan)
///
/// Returns `None` for non-finite or non-positive input.
pub fn nearest_note(frequency: f32) -> Option<&'static NoteEntry> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return None;
    }
    NOTE_TABLE.iter().min_by(|a, b| {
        let da = (a.frequency - frequency).abs();
        let db = (b.frequency - frequency).abs();
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Deviation of `frequency` from `reference` in cents
pub fn cents_between(frequency: f32, reference: f32) -> f32 {
    1200.0 * (frequency / reference).log2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c0_consistent_with_a4() {
        let derived = A4_FREQUENCY * 2.0f32.powf(-57.0 / 12.0);
        assert!((derived - C0_FREQUENCY).abs() < 1e-3);
    }

    #[test]
    fn test_note_table_bounds() {
        assert_eq!(NOTE_TABLE.len(), 108);
        assert_eq!(NOTE_TABLE[0].name, "C0");
        assert_eq!(NOTE_TABLE[107].name, "B8");
        assert_eq!(NOTE_TABLE[0].midi, 12);
        assert!(NOTE_TABLE.windows(2).all(|w| w[0].frequency < w[1].frequency));
    }

    #[test]
    fn test_a4_entry() {
        let a4 = NOTE_TABLE.iter().find(|n| n.name == "A4").unwrap();
        assert_eq!(a4.midi, 69);
        assert!((a4.frequency - 440.0).abs() < 0.01, "A4 = {}", a4.frequency);
    }

    #[test]
    fn test_nearest_note() {
        assert_eq!(nearest_note(445.0).unwrap().name, "A4");
        assert_eq!(nearest_note(261.0).unwrap().name, "C4");
        assert_eq!(nearest_note(10.0).unwrap().name, "C0");
        assert!(nearest_note(0.0).is_none());
        assert!(nearest_note(f32::NAN).is_none());
    }

    #[test]
    fn test_cents() {
        assert!(cents_between(440.0, 440.0).abs() < 1e-6);
        assert!((cents_between(880.0, 440.0) - 1200.0).abs() < 1e-3);
        assert!((cents_between(466.1638, 440.0) - 100.0).abs() < 0.01);
    }
}
