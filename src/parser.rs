use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ChordError, LineError};
use crate::ir::{Chord, LineSource, ParsedBatch};
use crate::note::{Accidental, DEFAULT_OCTAVE, Letter, MAX_OCTAVE, Note, Spelling, spelling_of};

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<letter>[A-Ga-g])(?P<acc>(?i:bb|b|#|x)?)(?P<octave>[0-9]*)$").unwrap());

/// Titles equal to this placeholder render as a single blank.
const BLANK_TITLE_PLACEHOLDERS: [&str; 2] = ["\\", "\\\\"];

/// Chord-scoped octave tracking.
///
/// A chord is read as ascending: once a letter name comes back, the note must
/// belong to the next octave up, and so does everything after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctaveContext {
    implied: i8,
    seen: [bool; 7],
}

impl OctaveContext {
    pub fn new() -> Self {
        Self::starting_at(DEFAULT_OCTAVE)
    }

    pub fn starting_at(octave: i8) -> Self {
        Self {
            implied: octave,
            seen: [false; 7],
        }
    }

    pub fn implied_octave(&self) -> i8 {
        self.implied
    }

    pub fn has_seen(&self, letter: Letter) -> bool {
        self.seen[letter.slot() as usize]
    }

    fn anchor(&mut self, octave: i8, letter: Letter) {
        self.implied = octave;
        self.seen = [false; 7];
        self.seen[letter.slot() as usize] = true;
    }
}

impl Default for OctaveContext {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_accidentals(token: &str) -> String {
    token
        .replace('♯', "#")
        .replace('♭', "b")
        .replace('𝄪', "x")
        .replace('𝄫', "bb")
}

/// Parse one note token ("Bbb3", "c#", "Fx") against the chord's octave context.
pub fn parse_note(token: &str, ctx: &mut OctaveContext) -> Result<Note, ChordError> {
    let normalized = normalize_accidentals(token.trim());
    let caps = TOKEN_RE
        .captures(&normalized)
        .ok_or_else(|| ChordError::unknown(token))?;

    let letter = caps
        .name("letter")
        .and_then(|m| m.as_str().chars().next())
        .and_then(Letter::from_char)
        .ok_or_else(|| ChordError::unknown(token))?;
    let accidental = caps
        .name("acc")
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_default();
    let accidental = Accidental::from_token(&accidental).ok_or_else(|| ChordError::unknown(token))?;
    let spelling = spelling_of(&Spelling::new(letter, accidental).name())
        .map_err(|_| ChordError::unknown(token))?;

    let digits = caps.name("octave").map(|m| m.as_str()).unwrap_or("");
    if !digits.is_empty() {
        let octave = parse_octave(digits).ok_or_else(|| {
            ChordError::malformed(token, format!("octave must be a single digit 0-{MAX_OCTAVE}"))
        })?;
        ctx.anchor(octave, letter);
        return Ok(Note::new(spelling, octave));
    }

    if ctx.has_seen(letter) {
        if ctx.implied >= MAX_OCTAVE {
            return Err(ChordError::malformed(
                token,
                format!("implied octave would exceed {MAX_OCTAVE}"),
            ));
        }
        let next = ctx.implied + 1;
        ctx.anchor(next, letter);
    } else {
        ctx.seen[letter.slot() as usize] = true;
    }
    Ok(Note::new(spelling, ctx.implied))
}

fn parse_octave(digits: &str) -> Option<i8> {
    if digits.len() != 1 {
        return None;
    }
    digits.parse::<i8>().ok().filter(|octave| *octave <= MAX_OCTAVE)
}

fn normalize_title(raw: &str) -> String {
    let title = raw.trim();
    if BLANK_TITLE_PLACEHOLDERS.contains(&title) {
        return " ".to_string();
    }
    title.to_string()
}

/// Parse a `<notes>;<title>` line. An empty notes part is a valid bare keyboard.
pub fn parse_line(line: &str) -> Result<Chord, ChordError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (notes_part, title) = match line.split_once(';') {
        Some((notes, title)) => (notes, normalize_title(title)),
        None => (line, String::new()),
    };

    let mut ctx = OctaveContext::new();
    let notes = notes_part
        .split_whitespace()
        .map(|token| parse_note(token, &mut ctx))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Chord::new(notes, title))
}

/// Whether a line is a comment or a separator for the given source.
pub fn is_skipped(line: &str, source: LineSource) -> bool {
    let trimmed = line.trim();
    if trimmed.starts_with('#') {
        return true;
    }
    source == LineSource::Stream && trimmed.is_empty()
}

/// Parse every line, keeping good chords and collecting errors for bad ones.
pub fn parse_batch<I, S>(lines: I, source: LineSource) -> ParsedBatch
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut batch = ParsedBatch::default();
    for (idx, raw) in lines.into_iter().enumerate() {
        let raw = raw.as_ref();
        let line = if idx == 0 { raw.trim_start_matches('\u{feff}') } else { raw };
        if is_skipped(line, source) {
            continue;
        }
        match parse_line(line) {
            Ok(mut chord) => {
                chord.line_number = idx + 1;
                batch.chords.push(chord);
            }
            Err(error) => batch.errors.push(LineError {
                line_number: idx + 1,
                line: line.trim_end_matches(['\r', '\n']).to_string(),
                error,
            }),
        }
    }
    batch
}
