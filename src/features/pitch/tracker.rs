//! Per-frame pitch readings to timed note events
//!
//! The tracker is owned by the live consumer. Each call to
//! [`NoteTracker::update`] reports what one frame contained; when the note
//! changes (or the frame has no pitch) the note that was sounding is closed
//! and returned as a [`NoteEvent`].

use super::{NoteEvent, PitchReading};

#[derive(Debug, Clone)]
struct ActiveNote {
    note: String,
    start: f64,
    frequency_sum: f32,
    confidence_sum: f32,
    count: usize,
    peak_level: f32,
}

impl ActiveNote {
    fn start(reading: &PitchReading, timestamp: f64, level: f32) -> Self {
        Self {
            note: reading.note.clone(),
            start: timestamp,
            frequency_sum: reading.frequency,
            confidence_sum: reading.confidence,
            count: 1,
            peak_level: level,
        }
    }

    fn extend(&mut self, reading: &PitchReading, level: f32) {
        self.frequency_sum += reading.frequency;
        self.confidence_sum += reading.confidence;
        self.count += 1;
        self.peak_level = self.peak_level.max(level);
    }

    fn close(self, end: f64) -> NoteEvent {
        let n = self.count as f32;
        NoteEvent {
            timestamp: self.start,
            note: self.note,
            frequency: self.frequency_sum / n,
            duration: (end - self.start).max(0.0),
            velocity: self.peak_level.clamp(0.0, 1.0),
            confidence: self.confidence_sum / n,
        }
    }
}

/// Merges consecutive same-note readings into note events
#[derive(Debug, Clone, Default)]
pub struct NoteTracker {
    active: Option<ActiveNote>,
}

impl NoteTracker {
    /// Empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the note currently sounding, if any
    pub fn current_note(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.note.as_str())
    }

    /// Feed one frame's reading
    ///
    /// `timestamp` is the frame start in seconds and `level` its mean
    /// absolute amplitude. Returns the event closed by this frame, if any.
    pub fn update(&mut self, reading: Option<&PitchReading>, timestamp: f64, level: f32) -> Option<NoteEvent> {
        let Some(reading) = reading else {
            return self.finish(timestamp);
        };

        if let Some(active) = self.active.as_mut() {
            if active.note == reading.note {
                active.extend(reading, level);
                return None;
            }
        }

        let closed = self.finish(timestamp);
        self.active = Some(ActiveNote::start(reading, timestamp, level));
        closed
    }

    /// Close the sounding note at `timestamp`
    pub fn finish(&mut self, timestamp: f64) -> Option<NoteEvent> {
        self.active.take().map(|a| a.close(timestamp))
    }
}
