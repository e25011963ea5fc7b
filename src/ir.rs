use serde::Serialize;

use crate::error::LineError;
use crate::note::Note;

/// Where a batch of lines came from. Decides how blank lines are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSource {
    /// Chords handed over one per entry (command-line arguments, API calls).
    /// An empty entry asks for a bare keyboard.
    Arguments,
    /// Lines read from a file or stream. Blank lines separate, they are not chords.
    Stream,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chord {
    /// Notes in input order, expected low to high.
    pub notes: Vec<Note>,
    /// Empty when the line carried no title.
    pub title: String,
    pub show_key_names: bool,
    /// 1-based position of the line this chord was parsed from.
    pub line_number: usize,
}

impl Chord {
    pub fn new(notes: Vec<Note>, title: impl Into<String>) -> Self {
        Self {
            notes,
            title: title.into(),
            show_key_names: false,
            line_number: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }

    pub fn lowest(&self) -> Option<&Note> {
        self.notes.iter().min()
    }

    pub fn highest(&self) -> Option<&Note> {
        self.notes.iter().max()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub chords: Vec<Chord>,
    pub errors: Vec<LineError>,
}

impl ParsedBatch {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
