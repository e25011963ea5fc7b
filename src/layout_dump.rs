use crate::RenderedBatch;
use crate::layout::{KeyRect, NoteGeometry};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub lowest: String,
    pub highest: String,
    pub key_count: usize,
    pub white_key_count: usize,
    pub chords: Vec<ChordDump>,
}

#[derive(Debug, Serialize)]
pub struct ChordDump {
    pub line: usize,
    pub file_stem: String,
    pub title: Option<String>,
    pub width: f32,
    pub height: f32,
    pub keyboard_offset: [f32; 2],
    pub keys: Vec<KeyRect>,
    pub marks: Vec<MarkDump>,
}

#[derive(Debug, Serialize)]
pub struct MarkDump {
    pub note: String,
    pub key: i32,
    pub rect: [f32; 4],
    pub mark: [f32; 2],
    pub label: [f32; 2],
}

impl From<&NoteGeometry> for MarkDump {
    fn from(mark: &NoteGeometry) -> Self {
        Self {
            note: mark.note.to_string(),
            key: mark.key,
            rect: [mark.x, mark.y, mark.width, mark.height],
            mark: [mark.mark_x, mark.mark_y],
            label: [mark.label_x, mark.label_y],
        }
    }
}

impl LayoutDump {
    pub fn from_batch(batch: &RenderedBatch) -> Self {
        let chords = batch
            .chords
            .iter()
            .map(|rendered| {
                let layout = &rendered.layout;
                ChordDump {
                    line: rendered.chord.line_number,
                    file_stem: rendered.file_stem.clone(),
                    title: layout.title.clone(),
                    width: layout.width,
                    height: layout.height,
                    keyboard_offset: [layout.keyboard_x, layout.keyboard_y],
                    keys: layout.keyboard.keys.clone(),
                    marks: layout.marks.iter().map(MarkDump::from).collect(),
                }
            })
            .collect();

        LayoutDump {
            lowest: batch.span.lowest.to_string(),
            highest: batch.span.highest.to_string(),
            key_count: batch.span.key_count(),
            white_key_count: batch.span.white_key_count(),
            chords,
        }
    }
}

pub fn write_layout_dump(path: &Path, batch: &RenderedBatch) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_batch(batch);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
