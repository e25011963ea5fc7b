#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ir;
pub mod layout;
pub mod layout_dump;
#[cfg(feature = "musicxml")]
pub mod musicxml;
pub mod note;
pub mod output;
pub mod parser;
pub mod render;
pub mod span;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig};
pub use error::{ChordError, LineError};
pub use ir::{Chord, LineSource, ParsedBatch};
pub use layout::{ChordLayout, compute_layout, layout_note};
pub use note::{Note, PitchClass, Spelling};
pub use parser::{OctaveContext, parse_batch, parse_line, parse_note};
pub use render::render_svg;
pub use span::{KeyboardSpan, compute_span};
pub use theme::Theme;

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub print_key_names: bool,
    pub file_prefix: String,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self::default()
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            ..Self::default()
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            theme: config.theme.clone(),
            layout: config.layout.clone(),
            print_key_names: config.render.print_key_names,
            file_prefix: config.render.file_prefix.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedChord {
    pub chord: Chord,
    pub file_stem: String,
    pub layout: ChordLayout,
    pub svg: String,
}

#[derive(Debug, Clone)]
pub struct RenderedBatch {
    pub span: KeyboardSpan,
    pub chords: Vec<RenderedChord>,
    pub errors: Vec<LineError>,
}

/// Parse a batch, size one keyboard for all of it and render every chord.
/// Bad lines are collected in `errors`; they never stop the others.
pub fn render_batch<I, S>(lines: I, source: LineSource, options: &RenderOptions) -> RenderedBatch
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let ParsedBatch { mut chords, errors } = parse_batch(lines, source);
    if options.print_key_names {
        for chord in &mut chords {
            chord.show_key_names = true;
        }
    }
    let span = compute_span(&chords);
    let stems = output::output_stems(&chords, &options.file_prefix);

    let chords = chords
        .into_iter()
        .zip(stems)
        .map(|(chord, file_stem)| {
            let layout = compute_layout(&chord, &span, &options.layout);
            let svg = render_svg(&layout, &options.theme, &options.layout);
            RenderedChord {
                chord,
                file_stem,
                layout,
                svg,
            }
        })
        .collect();

    RenderedBatch {
        span,
        chords,
        errors,
    }
}

/// Render a single chord line to SVG.
pub fn render_with_options(line: &str, options: RenderOptions) -> anyhow::Result<String> {
    let batch = render_batch([line], LineSource::Arguments, &options);
    if let Some(err) = batch.errors.into_iter().next() {
        return Err(err.into());
    }
    batch
        .chords
        .into_iter()
        .next()
        .map(|rendered| rendered.svg)
        .ok_or_else(|| anyhow::anyhow!("line is a comment, nothing to render"))
}
