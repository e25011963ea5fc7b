//! Raster export.
//!
//! Exporters are polled in a configured priority order and the first one
//! that is available converts every SVG of the batch. A failed conversion
//! never touches the SVG it was converting.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::theme::Theme;

pub trait RasterExporter {
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
    fn export(&self, svg_path: &Path, png_path: &Path) -> Result<()>;
}

/// In-process rasterizer backed by resvg.
#[cfg(feature = "png")]
pub struct ResvgExporter {
    theme: Theme,
}

#[cfg(feature = "png")]
impl ResvgExporter {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }
}

#[cfg(feature = "png")]
impl RasterExporter for ResvgExporter {
    fn name(&self) -> &str {
        "resvg"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn export(&self, svg_path: &Path, png_path: &Path) -> Result<()> {
        let svg = std::fs::read_to_string(svg_path)
            .with_context(|| format!("failed to read {}", svg_path.display()))?;
        crate::render::write_output_png(&svg, png_path, &self.theme)
    }
}

type ArgBuilder = fn(&Path, &Path) -> Vec<OsString>;

/// An external converter program found on `PATH`.
pub struct CommandExporter {
    program: String,
    args: ArgBuilder,
}

impl CommandExporter {
    pub fn new(program: impl Into<String>, args: ArgBuilder) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn rsvg_convert() -> Self {
        Self::new("rsvg-convert", |svg, png| {
            vec!["-o".into(), png.into(), svg.into()]
        })
    }

    pub fn inkscape() -> Self {
        Self::new("inkscape", |svg, png| {
            let mut target = OsString::from("--export-filename=");
            target.push(png);
            vec![svg.into(), "--export-type=png".into(), target]
        })
    }

    pub fn imagemagick(program: &str) -> Self {
        Self::new(program, |svg, png| vec![svg.into(), png.into()])
    }

    pub fn arguments(&self, svg_path: &Path, png_path: &Path) -> Vec<OsString> {
        (self.args)(svg_path, png_path)
    }
}

impl RasterExporter for CommandExporter {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        find_program(&self.program).is_some()
    }

    fn export(&self, svg_path: &Path, png_path: &Path) -> Result<()> {
        let program = find_program(&self.program)
            .ok_or_else(|| anyhow::anyhow!("{} not found on PATH", self.program))?;
        let output = Command::new(program)
            .args(self.arguments(svg_path, png_path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to run {}", self.program))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            );
        }
        Ok(())
    }
}

/// Look `program` up in the directories of `PATH`.
pub fn find_program(program: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path).find_map(|dir| {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = candidate.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

/// Build the exporter registered under `name`, if this build knows it.
#[cfg_attr(not(feature = "png"), allow(unused_variables))]
pub fn exporter_by_name(name: &str, theme: &Theme) -> Option<Box<dyn RasterExporter>> {
    match name {
        #[cfg(feature = "png")]
        "resvg" => Some(Box::new(ResvgExporter::new(theme.clone()))),
        "rsvg-convert" => Some(Box::new(CommandExporter::rsvg_convert())),
        "inkscape" => Some(Box::new(CommandExporter::inkscape())),
        "magick" | "convert" => Some(Box::new(CommandExporter::imagemagick(name))),
        _ => None,
    }
}

/// First available exporter in priority order.
pub fn select_exporter(
    candidates: Vec<Box<dyn RasterExporter>>,
) -> Option<Box<dyn RasterExporter>> {
    candidates.into_iter().find(|exporter| exporter.is_available())
}

pub fn select_exporter_by_names(names: &[String], theme: &Theme) -> Option<Box<dyn RasterExporter>> {
    select_exporter(
        names
            .iter()
            .filter_map(|name| exporter_by_name(name, theme))
            .collect(),
    )
}
