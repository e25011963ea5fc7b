use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::ir::Chord;

const UNSAFE_FILENAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Reduce a chord title to something usable as a file name stem.
pub fn sanitize_file_stem(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut pending_space = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if ch.is_control() || UNSAFE_FILENAME_CHARS.contains(&ch) {
            continue;
        }
        if pending_space && !stem.is_empty() {
            stem.push('_');
        }
        pending_space = false;
        stem.push(ch);
    }
    stem.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// File name stems for a batch, in chord order. Untitled chords use their
/// 1-based position; a stem already issued gets the first free `-2`, `-3`,
/// ... suffix, so no two chords share a file.
pub fn output_stems(chords: &[Chord], prefix: &str) -> Vec<String> {
    let mut issued: HashSet<String> = HashSet::with_capacity(chords.len());
    chords
        .iter()
        .enumerate()
        .map(|(idx, chord)| {
            let mut base = sanitize_file_stem(&chord.title);
            if base.is_empty() {
                base = (idx + 1).to_string();
            }
            let mut stem = base.clone();
            let mut n = 2;
            while issued.contains(&stem) {
                stem = format!("{base}-{n}");
                n += 1;
            }
            issued.insert(stem.clone());
            format!("{prefix}{stem}")
        })
        .collect()
}

pub fn output_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    dir.join(format!("{stem}.{ext}"))
}

/// Make sure `dir` exists and accepts new files before anything is rendered.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create output directory {}", dir.display()))?;
    let check = dir.join(format!(".chordkeys-write-check-{}", std::process::id()));
    std::fs::write(&check, b"")
        .with_context(|| format!("output directory {} is not writable", dir.display()))?;
    std::fs::remove_file(&check)
        .with_context(|| format!("cannot remove write-check file {}", check.display()))?;
    Ok(())
}
