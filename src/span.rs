use std::ops::RangeInclusive;

use serde::Serialize;

use crate::ir::Chord;
use crate::note::{
    Letter, Note, PIANO_HIGHEST_KEY, PIANO_LOWEST_KEY, octave_of_key, white_index,
};

/// Range of keys one batch of chords is drawn on. Every chord in the batch
/// shares it, so all diagrams come out the same width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyboardSpan {
    pub lowest: Note,
    pub highest: Note,
}

impl KeyboardSpan {
    pub fn new(lowest: Note, highest: Note) -> Self {
        if lowest <= highest {
            Self { lowest, highest }
        } else {
            Self {
                lowest: highest,
                highest: lowest,
            }
        }
    }

    pub fn first_key(&self) -> i32 {
        self.lowest.key()
    }

    pub fn last_key(&self) -> i32 {
        self.highest.key()
    }

    pub fn contains(&self, key: i32) -> bool {
        (self.first_key()..=self.last_key()).contains(&key)
    }

    pub fn keys(&self) -> RangeInclusive<i32> {
        self.first_key()..=self.last_key()
    }

    pub fn octaves(&self) -> RangeInclusive<i32> {
        octave_of_key(self.first_key())..=octave_of_key(self.last_key())
    }

    /// White-key index of the leftmost drawn key; geometry is measured from here.
    pub fn origin_white_index(&self) -> i32 {
        white_index(self.first_key())
    }

    pub fn white_key_count(&self) -> usize {
        (white_index(self.last_key()) - self.origin_white_index() + 1).max(0) as usize
    }

    pub fn key_count(&self) -> usize {
        (self.last_key() - self.first_key() + 1).max(0) as usize
    }
}

impl Default for KeyboardSpan {
    fn default() -> Self {
        Self {
            lowest: default_lowest(),
            highest: default_highest(),
        }
    }
}

fn default_lowest() -> Note {
    Note::natural(Letter::C, 4)
}

fn default_highest() -> Note {
    Note::natural(Letter::B, 5)
}

/// Widen the lowest bound to the C of its octave, except at the bottom key of
/// an 88-key piano.
fn normalize_lowest(note: Note) -> Note {
    let key = note.key();
    if key == PIANO_LOWEST_KEY {
        return Note::natural(Letter::A, 0);
    }
    Note::natural(Letter::C, octave_of_key(key) as i8)
}

/// Widen the highest bound to the B of its octave, except at the top key of
/// an 88-key piano.
fn normalize_highest(note: Note) -> Note {
    let key = note.key();
    if key == PIANO_HIGHEST_KEY {
        return Note::natural(Letter::C, 8);
    }
    Note::natural(Letter::B, octave_of_key(key) as i8)
}

/// Smallest octave-aligned span covering every note of every chord.
pub fn compute_span(chords: &[Chord]) -> KeyboardSpan {
    let lowest = chords.iter().filter_map(Chord::lowest).min().copied();
    let highest = chords.iter().filter_map(Chord::highest).max().copied();

    KeyboardSpan::new(
        lowest.map(normalize_lowest).unwrap_or_else(default_lowest),
        highest.map(normalize_highest).unwrap_or_else(default_highest),
    )
}
