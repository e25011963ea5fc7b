//! Keyboard geometry.
//!
//! All x positions are measured from the left edge of the span's lowest key
//! and built from three terms: the white keys between that edge and the start
//! of the key's octave, the key's slot inside the octave, and a per-colour
//! initial offset that centres black keys over the gap between two white keys.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::ir::Chord;
use crate::note::{KeyColor, Note, PitchClass, octave_of_key, visual_of};
use crate::span::KeyboardSpan;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyRect {
    pub key: i32,
    pub color: KeyColor,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoteGeometry {
    pub note: Note,
    pub key: i32,
    pub color: KeyColor,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub mark_x: f32,
    pub mark_y: f32,
    pub label_x: f32,
    pub label_y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyboardLayout {
    pub span: KeyboardSpan,
    pub width: f32,
    pub height: f32,
    /// Draw order: per octave, white keys first and black keys on top.
    pub keys: Vec<KeyRect>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordLayout {
    pub title: Option<String>,
    pub show_key_names: bool,
    pub width: f32,
    pub height: f32,
    pub keyboard_x: f32,
    pub keyboard_y: f32,
    pub title_x: f32,
    pub title_y: f32,
    pub keyboard: KeyboardLayout,
    /// One entry per distinct key, in chord order.
    pub marks: Vec<NoteGeometry>,
}

/// Rectangle of a single key. Pure function of its inputs.
pub fn key_rect(key: i32, span: &KeyboardSpan, config: &LayoutConfig) -> KeyRect {
    let visual = visual_of(PitchClass::from_key(key));
    let zoom = config.zoom;
    let octave_start =
        (octave_of_key(key) * 7 - span.origin_white_index()) as f32 * config.white_key_width;
    let slot_offset = visual.slot as f32 * config.white_key_width;
    let (initial, width, height) = match visual.color {
        KeyColor::White => (0.0, config.white_key_width, config.white_key_height),
        KeyColor::Black => (
            config.white_key_width - config.black_key_width / 2.0
                + visual.shift.factor() * config.black_key_shift,
            config.black_key_width,
            config.black_key_height,
        ),
    };
    KeyRect {
        key,
        color: visual.color,
        x: (octave_start + slot_offset + initial) * zoom,
        y: 0.0,
        width: width * zoom,
        height: height * zoom,
    }
}

pub fn layout_note(note: &Note, span: &KeyboardSpan, config: &LayoutConfig) -> NoteGeometry {
    let key = note.key();
    let rect = key_rect(key, span, config);
    let (mark_y, label_y) = match rect.color {
        KeyColor::White => (config.white_mark_y, config.white_label_y),
        KeyColor::Black => (config.black_mark_y, config.black_label_y),
    };
    let center_x = rect.x + rect.width / 2.0;
    NoteGeometry {
        note: *note,
        key,
        color: rect.color,
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
        mark_x: center_x,
        mark_y: mark_y * config.zoom,
        label_x: center_x,
        label_y: label_y * config.zoom,
    }
}

pub fn layout_keyboard(span: &KeyboardSpan, config: &LayoutConfig) -> KeyboardLayout {
    let mut keys = Vec::with_capacity(span.key_count());
    for octave in span.octaves() {
        let octave_keys = (octave * 12..octave * 12 + 12).filter(|key| span.contains(*key));
        let (white, black): (Vec<i32>, Vec<i32>) =
            octave_keys.partition(|key| PitchClass::from_key(*key).is_natural());
        for key in white.into_iter().chain(black) {
            keys.push(key_rect(key, span, config));
        }
    }
    KeyboardLayout {
        span: *span,
        width: span.white_key_count() as f32 * config.white_key_width * config.zoom,
        height: config.white_key_height * config.zoom,
        keys,
    }
}

pub fn compute_layout(chord: &Chord, span: &KeyboardSpan, config: &LayoutConfig) -> ChordLayout {
    let zoom = config.zoom;
    let keyboard = layout_keyboard(span, config);

    let mut seen = HashSet::new();
    let marks: Vec<NoteGeometry> = chord
        .notes
        .iter()
        .filter(|note| span.contains(note.key()) && seen.insert(note.key()))
        .map(|note| layout_note(note, span, config))
        .collect();

    let title = chord.has_title().then(|| chord.title.clone());
    let title_band = if title.is_some() { config.title_height } else { 0.0 };
    let label_band = if chord.show_key_names {
        config.label_band_height
    } else {
        0.0
    };

    let width = keyboard.width + 2.0 * config.margin * zoom;
    let height = (2.0 * config.margin + title_band + config.white_key_height + label_band) * zoom;
    let keyboard_x = config.margin * zoom;
    let keyboard_y = (config.margin + title_band) * zoom;

    ChordLayout {
        title,
        show_key_names: chord.show_key_names,
        width,
        height,
        keyboard_x,
        keyboard_y,
        title_x: width / 2.0,
        title_y: (config.margin + title_band * 0.7) * zoom,
        keyboard,
        marks,
    }
}
