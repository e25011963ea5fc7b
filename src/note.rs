//! Note table: spellings, pitch classes and per-key drawing metadata.
//!
//! Both tables are derived from two small rules instead of being listed by
//! hand: a letter names a natural pitch class, an accidental adds a semitone
//! delta. The 35 accepted spellings are the product of the 7 letters and the
//! 5 accidentals; the 12 key visuals follow from which pitch classes are
//! naturals.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::ChordError;

pub const DEFAULT_OCTAVE: i8 = 4;
pub const MAX_OCTAVE: i8 = 9;

/// Lowest key of an 88-key piano (A0).
pub const PIANO_LOWEST_KEY: i32 = 9;
/// Highest key of an 88-key piano (C8).
pub const PIANO_HIGHEST_KEY: i32 = 8 * 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'E' => Some(Self::E),
            'F' => Some(Self::F),
            'G' => Some(Self::G),
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
            Self::G => 'G',
            Self::A => 'A',
            Self::B => 'B',
        }
    }

    /// Pitch class of the unaltered letter.
    pub fn natural_pitch(self) -> u8 {
        match self {
            Self::C => 0,
            Self::D => 2,
            Self::E => 4,
            Self::F => 5,
            Self::G => 7,
            Self::A => 9,
            Self::B => 11,
        }
    }

    /// Position among the seven white keys of an octave.
    pub fn slot(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    Natural,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    pub const ALL: [Accidental; 5] = [
        Accidental::DoubleFlat,
        Accidental::Flat,
        Accidental::Natural,
        Accidental::Sharp,
        Accidental::DoubleSharp,
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "" => Some(Self::Natural),
            "b" => Some(Self::Flat),
            "bb" => Some(Self::DoubleFlat),
            "#" => Some(Self::Sharp),
            "x" => Some(Self::DoubleSharp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DoubleFlat => "bb",
            Self::Flat => "b",
            Self::Natural => "",
            Self::Sharp => "#",
            Self::DoubleSharp => "x",
        }
    }

    pub fn semitones(self) -> i8 {
        match self {
            Self::DoubleFlat => -2,
            Self::Flat => -1,
            Self::Natural => 0,
            Self::Sharp => 1,
            Self::DoubleSharp => 2,
        }
    }
}

/// One of the 12 positions of the octave-repeating scale, `C` = 0 .. `B` = 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PitchClass(u8);

impl PitchClass {
    pub fn new(index: u8) -> Option<Self> {
        (index < 12).then_some(Self(index))
    }

    pub fn from_key(key: i32) -> Self {
        Self(key.rem_euclid(12) as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn is_natural(self) -> bool {
        matches!(self.0, 0 | 2 | 4 | 5 | 7 | 9 | 11)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Spelling {
    pub letter: Letter,
    pub accidental: Accidental,
}

impl Spelling {
    pub fn new(letter: Letter, accidental: Accidental) -> Self {
        Self { letter, accidental }
    }

    pub fn natural(letter: Letter) -> Self {
        Self::new(letter, Accidental::Natural)
    }

    pub fn pitch_class(self) -> PitchClass {
        PitchClass::from_key(self.semitone_offset())
    }

    /// Semitones from the C of the written octave. Ranges from -2 (`Cbb`)
    /// to 13 (`Bx`); values outside 0..12 land in a neighbouring octave.
    pub fn semitone_offset(self) -> i32 {
        self.letter.natural_pitch() as i32 + self.accidental.semitones() as i32
    }

    pub fn name(self) -> String {
        format!("{}{}", self.letter.as_char(), self.accidental.as_str())
    }
}

impl fmt::Display for Spelling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter.as_char(), self.accidental.as_str())
    }
}

static SPELLINGS: Lazy<HashMap<String, Spelling>> = Lazy::new(|| {
    let mut table = HashMap::with_capacity(Letter::ALL.len() * Accidental::ALL.len());
    for letter in Letter::ALL {
        for accidental in Accidental::ALL {
            let spelling = Spelling::new(letter, accidental);
            table.insert(spelling.name(), spelling);
        }
    }
    table
});

/// Every accepted spelling, in letter then accidental order.
pub fn all_spellings() -> Vec<Spelling> {
    let mut spellings: Vec<Spelling> = SPELLINGS.values().copied().collect();
    spellings.sort();
    spellings
}

/// Look up a normalized spelling ("C#", "Bbb", "Fx").
pub fn spelling_of(name: &str) -> Result<Spelling, ChordError> {
    SPELLINGS
        .get(name)
        .copied()
        .ok_or_else(|| ChordError::unknown(name))
}

pub fn pitch_class_of(name: &str) -> Result<PitchClass, ChordError> {
    spelling_of(name).map(Spelling::pitch_class)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyColor {
    White,
    Black,
}

/// Direction a black key is nudged away from the gap between its two white
/// neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Left,
    Center,
    Right,
}

impl Shift {
    pub fn factor(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Center => 0.0,
            Self::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyVisual {
    pub color: KeyColor,
    /// White-key slot (0..7). Black keys use the slot of their left neighbour.
    pub slot: u8,
    pub shift: Shift,
}

impl KeyVisual {
    pub fn is_black(&self) -> bool {
        self.color == KeyColor::Black
    }
}

static KEY_VISUALS: Lazy<[KeyVisual; 12]> = Lazy::new(|| std::array::from_fn(|idx| derive_visual(idx as u8)));

fn natural_letter(pitch: u8) -> Option<Letter> {
    Letter::ALL
        .into_iter()
        .find(|letter| letter.natural_pitch() == pitch)
}

fn derive_visual(pitch: u8) -> KeyVisual {
    if let Some(letter) = natural_letter(pitch) {
        return KeyVisual {
            color: KeyColor::White,
            slot: letter.slot(),
            shift: Shift::Center,
        };
    }
    // Black keys always sit between two naturals a semitone away.
    let left = natural_letter(pitch - 1).unwrap_or(Letter::C);
    let right = natural_letter(pitch + 1).unwrap_or(Letter::B);
    let shift = match (left, right) {
        (Letter::C | Letter::F, _) => Shift::Left,
        (_, Letter::E | Letter::B) => Shift::Right,
        _ => Shift::Center,
    };
    KeyVisual {
        color: KeyColor::Black,
        slot: left.slot(),
        shift,
    }
}

pub fn visual_of(pitch: PitchClass) -> KeyVisual {
    KEY_VISUALS[pitch.index() as usize]
}

/// A spelled note with its written octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Note {
    pub spelling: Spelling,
    pub octave: i8,
}

impl Note {
    pub fn new(spelling: Spelling, octave: i8) -> Self {
        Self { spelling, octave }
    }

    pub fn natural(letter: Letter, octave: i8) -> Self {
        Self::new(Spelling::natural(letter), octave)
    }

    /// Absolute key number, `C0` = 0. `Cb4` and `B3` share a key.
    pub fn key(&self) -> i32 {
        self.octave as i32 * 12 + self.spelling.semitone_offset()
    }

    pub fn pitch_class(&self) -> PitchClass {
        self.spelling.pitch_class()
    }

    pub fn visual(&self) -> KeyVisual {
        visual_of(self.pitch_class())
    }
}

impl Ord for Note {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key()
            .cmp(&other.key())
            .then_with(|| self.spelling.cmp(&other.spelling))
            .then_with(|| self.octave.cmp(&other.octave))
    }
}

impl PartialOrd for Note {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.spelling, self.octave)
    }
}

/// Octave containing a key number.
pub fn octave_of_key(key: i32) -> i32 {
    key.div_euclid(12)
}

/// Index of the white key at or immediately left of `key`, counted from C0.
pub fn white_index(key: i32) -> i32 {
    octave_of_key(key) * 7 + visual_of(PitchClass::from_key(key)).slot as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_35_spellings() {
        assert_eq!(all_spellings().len(), 35);
    }

    #[test]
    fn documented_pitch_classes() {
        let cases = [
            ("C", 0),
            ("C#", 1),
            ("Db", 1),
            ("Cx", 2),
            ("Ebb", 2),
            ("Fb", 4),
            ("E#", 5),
            ("Gbb", 5),
            ("Fx", 7),
            ("Abb", 7),
            ("Bbb", 9),
            ("A#", 10),
            ("Bb", 10),
            ("Cb", 11),
            ("Cbb", 10),
            ("B#", 0),
            ("Bx", 1),
        ];
        for (name, pc) in cases {
            assert_eq!(pitch_class_of(name).unwrap().index(), pc, "{name}");
        }
    }

    #[test]
    fn rejects_spellings_outside_the_table() {
        for name in ["H", "c", "C##", "Cbbb", "Xb", "", "C#b", "CB"] {
            assert!(
                matches!(pitch_class_of(name), Err(ChordError::UnknownSpelling { .. })),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn visual_table_matches_keyboard() {
        let whites: Vec<u8> = (0..12)
            .filter(|pc| visual_of(PitchClass::new(*pc).unwrap()).color == KeyColor::White)
            .collect();
        assert_eq!(whites, vec![0, 2, 4, 5, 7, 9, 11]);

        let black = |pc| visual_of(PitchClass::new(pc).unwrap());
        assert_eq!((black(1).slot, black(1).shift), (0, Shift::Left));
        assert_eq!((black(3).slot, black(3).shift), (1, Shift::Right));
        assert_eq!((black(6).slot, black(6).shift), (3, Shift::Left));
        assert_eq!((black(8).slot, black(8).shift), (4, Shift::Center));
        assert_eq!((black(10).slot, black(10).shift), (5, Shift::Right));
    }

    #[test]
    fn wrapping_spellings_land_on_neighbouring_octave() {
        let cb4 = Note::new(spelling_of("Cb").unwrap(), 4);
        let b3 = Note::natural(Letter::B, 3);
        assert_eq!(cb4.key(), b3.key());

        let bs3 = Note::new(spelling_of("B#").unwrap(), 3);
        assert_eq!(bs3.key(), Note::natural(Letter::C, 4).key());
    }

    #[test]
    fn notes_order_by_octave_then_pitch() {
        let mut notes = vec![
            Note::natural(Letter::C, 5),
            Note::natural(Letter::B, 4),
            Note::new(spelling_of("C#").unwrap(), 4),
            Note::natural(Letter::C, 4),
        ];
        notes.sort();
        let names: Vec<String> = notes.iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["C4", "C#4", "B4", "C5"]);
    }

    #[test]
    fn white_index_counts_from_c0() {
        assert_eq!(white_index(PIANO_LOWEST_KEY), 5);
        assert_eq!(white_index(Note::natural(Letter::C, 4).key()), 28);
        // C#4 sits to the right of C4
        assert_eq!(white_index(Note::natural(Letter::C, 4).key() + 1), 28);
        assert_eq!(white_index(PIANO_HIGHEST_KEY), 56);
    }
}
