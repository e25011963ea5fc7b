use crate::config::{Config, OutputFormat as ConfigOutputFormat, load_config};
use crate::export::{RasterExporter, exporter_by_name, select_exporter_by_names};
use crate::ir::LineSource;
use crate::layout_dump::write_layout_dump;
use crate::output::{ensure_output_dir, output_path};
use crate::render::write_output_svg;
use crate::theme::Theme;
use crate::{RenderOptions, RenderedBatch, render_batch};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "chordkeys",
    version,
    about = "Draw piano chords as keyboard diagrams (SVG/PNG)"
)]
pub struct Args {
    /// Chord lines, e.g. "C E G;C major". Reads a stream when omitted.
    #[arg(value_name = "CHORD")]
    pub chords: Vec<String>,

    /// Input file with one chord per line, or '-' for stdin
    #[arg(short = 'i', long = "input", conflicts_with_all = ["chords", "musicxml"])]
    pub input: Option<PathBuf>,

    /// MusicXML (score-partwise) file to take chords from
    #[arg(short = 'x', long = "musicxml", conflicts_with = "chords")]
    pub musicxml: Option<PathBuf>,

    /// Output directory
    #[arg(short = 'o', long = "outputDir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Zoom factor applied to the whole drawing
    #[arg(short = 'z', long = "zoom")]
    pub zoom: Option<f32>,

    /// Print note names under the marked keys
    #[arg(short = 'k', long = "printKeyNames")]
    pub print_key_names: bool,

    /// Prefix for every output file name
    #[arg(short = 'p', long = "prefix")]
    pub prefix: Option<String>,

    /// Config JSON file (themeVariables, keyboard geometry, output settings)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Theme preset (classic, modern)
    #[arg(long = "theme")]
    pub theme: Option<String>,

    /// Preferred PNG exporter; may be repeated
    #[arg(long = "exporter", value_name = "NAME")]
    pub exporters: Vec<String>,

    /// Write computed geometry as JSON to this file
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Do not report written files
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl From<OutputFormat> for ConfigOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Svg => ConfigOutputFormat::Svg,
            OutputFormat::Png => ConfigOutputFormat::Png,
        }
    }
}

/// What a run produced. Bad lines and failed writes do not stop the run;
/// they are counted here.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub rendered: usize,
    pub exported: usize,
    pub line_errors: usize,
    pub write_errors: usize,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.line_errors > 0 || self.write_errors > 0
    }
}

pub fn run() -> Result<RunReport> {
    run_with_args(Args::parse())
}

pub fn run_with_args(args: Args) -> Result<RunReport> {
    let config = build_config(&args)?;
    let (lines, source) = gather_lines(&args)?;

    ensure_output_dir(&args.output_dir)?;

    let options = RenderOptions::from_config(&config);
    let batch = render_batch(&lines, source, &options);
    let mut report = RunReport {
        line_errors: batch.errors.len(),
        ..RunReport::default()
    };

    if batch.chords.is_empty() && batch.errors.is_empty() {
        eprintln!("warning: no chords to render");
    }

    let (svg_paths, mut write_errors) = write_svgs(&batch, &args.output_dir, args.quiet);
    report.rendered = svg_paths.len();

    if config.render.output_format == ConfigOutputFormat::Png && !svg_paths.is_empty() {
        report.exported = export_pngs(&svg_paths, &config, args.quiet);
    }

    if let Some(path) = args.dump_layout.as_deref() {
        if let Err(err) = write_layout_dump(path, &batch)
            .with_context(|| format!("failed to write layout dump {}", path.display()))
        {
            write_errors.push(err);
        }
    }
    report.write_errors = write_errors.len();

    report_failures(&batch, &write_errors);
    Ok(report)
}

fn report_failures(batch: &RenderedBatch, write_errors: &[anyhow::Error]) {
    for err in &batch.errors {
        eprintln!("error: {err}");
    }
    for err in write_errors {
        eprintln!("error: {err:#}");
    }
    if !batch.errors.is_empty() {
        eprintln!(
            "error: {} of {} chord line(s) could not be parsed",
            batch.errors.len(),
            batch.errors.len() + batch.chords.len()
        );
    }
    if !write_errors.is_empty() {
        eprintln!("error: {} output file(s) could not be written", write_errors.len());
    }
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(name) = args.theme.as_deref() {
        config.theme =
            Theme::by_name(name).ok_or_else(|| anyhow::anyhow!("unknown theme '{name}'"))?;
    }
    if let Some(zoom) = args.zoom {
        config.layout.zoom = zoom;
    }
    if args.print_key_names {
        config.render.print_key_names = true;
    }
    if let Some(prefix) = &args.prefix {
        config.render.file_prefix = prefix.clone();
    }
    if let Some(format) = args.output_format {
        config.render.output_format = format.into();
    }
    if !args.exporters.is_empty() {
        for name in &args.exporters {
            if exporter_by_name(name, &config.theme).is_none() {
                anyhow::bail!("unknown exporter '{name}'");
            }
        }
        let mut names = args.exporters.clone();
        names.extend(
            config
                .render
                .exporters
                .drain(..)
                .filter(|name| !args.exporters.contains(name)),
        );
        config.render.exporters = names;
    }
    config.validate()?;
    Ok(config)
}

fn gather_lines(args: &Args) -> Result<(Vec<String>, LineSource)> {
    if !args.chords.is_empty() {
        return Ok((args.chords.clone(), LineSource::Arguments));
    }
    if let Some(path) = args.musicxml.as_deref() {
        return Ok((read_musicxml(path)?, LineSource::Stream));
    }

    let (lines, err) = match args.input.as_deref() {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            read_lines(BufReader::new(file))
        }
        _ => read_lines(io::stdin().lock()),
    };
    if let Some(err) = err {
        eprintln!(
            "warning: input stopped early ({err}); rendering the {} complete line(s) read",
            lines.len()
        );
    }
    Ok((lines, LineSource::Stream))
}

#[cfg(feature = "musicxml")]
fn read_musicxml(path: &Path) -> Result<Vec<String>> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    crate::musicxml::chord_lines(&xml).with_context(|| format!("invalid MusicXML {}", path.display()))
}

#[cfg(not(feature = "musicxml"))]
fn read_musicxml(path: &Path) -> Result<Vec<String>> {
    anyhow::bail!(
        "cannot read {}: built without the musicxml feature",
        path.display()
    )
}

/// Read newline-terminated lines until end of input. Bytes that are not
/// UTF-8 are replaced with U+FFFD, so such a line fails on its own when
/// parsed. An I/O error ends the stream: the lines completed so far are kept
/// and the unterminated fragment being read is dropped.
pub fn read_lines<R: BufRead>(mut reader: R) -> (Vec<String>, Option<io::Error>) {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return (lines, None),
            Ok(_) => {
                let text = String::from_utf8_lossy(&buf);
                lines.push(text.trim_end_matches(['\n', '\r']).to_string());
            }
            Err(err) => return (lines, Some(err)),
        }
    }
}

/// Write every chord's SVG. A failed write is collected and the remaining
/// chords are still written.
fn write_svgs(
    batch: &RenderedBatch,
    dir: &Path,
    quiet: bool,
) -> (Vec<PathBuf>, Vec<anyhow::Error>) {
    let mut paths = Vec::with_capacity(batch.chords.len());
    let mut failures = Vec::new();
    for rendered in &batch.chords {
        let path = output_path(dir, &rendered.file_stem, ConfigOutputFormat::Svg.extension());
        if let Err(err) = write_output_svg(&rendered.svg, Some(&path))
            .with_context(|| format!("failed to write {}", path.display()))
        {
            failures.push(err);
            continue;
        }
        if !quiet {
            eprintln!("wrote {}", path.display());
        }
        paths.push(path);
    }
    (paths, failures)
}

fn export_pngs(svg_paths: &[PathBuf], config: &Config, quiet: bool) -> usize {
    let Some(exporter) = select_exporter_by_names(&config.render.exporters, &config.theme) else {
        eprintln!(
            "warning: no PNG exporter available (tried {}); SVG files were kept",
            config.render.exporters.join(", ")
        );
        return 0;
    };
    export_with(exporter.as_ref(), svg_paths, config.render.keep_svg, quiet)
}

fn export_with(
    exporter: &dyn RasterExporter,
    svg_paths: &[PathBuf],
    keep_svg: bool,
    quiet: bool,
) -> usize {
    let mut exported = 0;
    for svg_path in svg_paths {
        let png_path = svg_path.with_extension(ConfigOutputFormat::Png.extension());
        match exporter.export(svg_path, &png_path) {
            Ok(()) => {
                exported += 1;
                if !quiet {
                    eprintln!("wrote {} ({})", png_path.display(), exporter.name());
                }
                if !keep_svg {
                    if let Err(err) = std::fs::remove_file(svg_path) {
                        eprintln!("warning: could not remove {}: {err}", svg_path.display());
                    }
                }
            }
            Err(err) => {
                eprintln!(
                    "warning: {} could not convert {}: {err:#}",
                    exporter.name(),
                    svg_path.display()
                );
            }
        }
    }
    exported
}
