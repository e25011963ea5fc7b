use crate::theme::Theme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_EXPORTERS: [&str; 5] = ["resvg", "rsvg-convert", "inkscape", "magick", "convert"];

/// Keyboard geometry in unzoomed units. `zoom` scales everything uniformly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub zoom: f32,
    pub white_key_width: f32,
    pub white_key_height: f32,
    pub black_key_width: f32,
    pub black_key_height: f32,
    /// Sideways nudge applied to off-centre black keys.
    pub black_key_shift: f32,
    pub mark_radius: f32,
    pub white_mark_y: f32,
    pub black_mark_y: f32,
    pub white_label_y: f32,
    pub black_label_y: f32,
    pub label_band_height: f32,
    pub title_height: f32,
    pub margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            white_key_width: 23.0,
            white_key_height: 120.0,
            black_key_width: 13.0,
            black_key_height: 80.0,
            black_key_shift: 2.0,
            mark_radius: 6.0,
            white_mark_y: 100.0,
            black_mark_y: 62.0,
            white_label_y: 136.0,
            black_label_y: 152.0,
            label_band_height: 40.0,
            title_height: 28.0,
            margin: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub print_key_names: bool,
    pub file_prefix: String,
    pub output_format: OutputFormat,
    /// Raster exporters in priority order; the first one available wins.
    pub exporters: Vec<String>,
    /// Keep the intermediate SVG after a PNG export.
    pub keep_svg: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            print_key_names: false,
            file_prefix: String::new(),
            output_format: OutputFormat::Svg,
            exporters: DEFAULT_EXPORTERS.iter().map(|name| name.to_string()).collect(),
            keep_svg: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let zoom = self.layout.zoom;
        if !zoom.is_finite() || zoom <= 0.0 {
            anyhow::bail!("zoom must be a positive number, got {zoom}");
        }
        if self.layout.white_key_width <= 0.0 || self.layout.white_key_height <= 0.0 {
            anyhow::bail!("white key dimensions must be positive");
        }
        if self.layout.black_key_width >= self.layout.white_key_width * 2.0 {
            anyhow::bail!("black keys must be narrower than two white keys");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    title_font_size: Option<f32>,
    label_font_size: Option<f32>,
    background: Option<String>,
    white_key_fill: Option<String>,
    black_key_fill: Option<String>,
    key_stroke: Option<String>,
    key_stroke_width: Option<f32>,
    white_mark_fill: Option<String>,
    black_mark_fill: Option<String>,
    mark_stroke: Option<String>,
    label_color: Option<String>,
    title_color: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct KeyboardConfigFile {
    zoom: Option<f32>,
    white_key_width: Option<f32>,
    white_key_height: Option<f32>,
    black_key_width: Option<f32>,
    black_key_height: Option<f32>,
    black_key_shift: Option<f32>,
    mark_radius: Option<f32>,
    white_mark_y: Option<f32>,
    black_mark_y: Option<f32>,
    white_label_y: Option<f32>,
    black_label_y: Option<f32>,
    label_band_height: Option<f32>,
    title_height: Option<f32>,
    margin: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    keyboard: Option<KeyboardConfigFile>,
    print_key_names: Option<bool>,
    file_prefix: Option<String>,
    output_format: Option<OutputFormat>,
    exporters: Option<Vec<String>>,
    keep_svg: Option<bool>,
}

fn parse_config_file(contents: &str) -> anyhow::Result<ConfigFile> {
    match serde_json::from_str::<ConfigFile>(contents) {
        Ok(parsed) => Ok(parsed),
        Err(strict_err) => json5::from_str::<ConfigFile>(contents)
            .map_err(|_| anyhow::Error::new(strict_err)),
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    config_from_str(&contents).with_context(|| format!("invalid config {}", path.display()))
}

pub fn config_from_str(contents: &str) -> anyhow::Result<Config> {
    let parsed = parse_config_file(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme '{theme_name}'"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.title_font_size {
            config.theme.title_font_size = v;
        }
        if let Some(v) = vars.label_font_size {
            config.theme.label_font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.white_key_fill {
            config.theme.white_key_fill = v;
        }
        if let Some(v) = vars.black_key_fill {
            config.theme.black_key_fill = v;
        }
        if let Some(v) = vars.key_stroke {
            config.theme.key_stroke = v;
        }
        if let Some(v) = vars.key_stroke_width {
            config.theme.key_stroke_width = v;
        }
        if let Some(v) = vars.white_mark_fill {
            config.theme.white_mark_fill = v;
        }
        if let Some(v) = vars.black_mark_fill {
            config.theme.black_mark_fill = v;
        }
        if let Some(v) = vars.mark_stroke {
            config.theme.mark_stroke = v;
        }
        if let Some(v) = vars.label_color {
            config.theme.label_color = v;
        }
        if let Some(v) = vars.title_color {
            config.theme.title_color = v;
        }
    }

    if let Some(keyboard) = parsed.keyboard {
        let layout = &mut config.layout;
        if let Some(v) = keyboard.zoom {
            layout.zoom = v;
        }
        if let Some(v) = keyboard.white_key_width {
            layout.white_key_width = v;
        }
        if let Some(v) = keyboard.white_key_height {
            layout.white_key_height = v;
        }
        if let Some(v) = keyboard.black_key_width {
            layout.black_key_width = v;
        }
        if let Some(v) = keyboard.black_key_height {
            layout.black_key_height = v;
        }
        if let Some(v) = keyboard.black_key_shift {
            layout.black_key_shift = v;
        }
        if let Some(v) = keyboard.mark_radius {
            layout.mark_radius = v;
        }
        if let Some(v) = keyboard.white_mark_y {
            layout.white_mark_y = v;
        }
        if let Some(v) = keyboard.black_mark_y {
            layout.black_mark_y = v;
        }
        if let Some(v) = keyboard.white_label_y {
            layout.white_label_y = v;
        }
        if let Some(v) = keyboard.black_label_y {
            layout.black_label_y = v;
        }
        if let Some(v) = keyboard.label_band_height {
            layout.label_band_height = v;
        }
        if let Some(v) = keyboard.title_height {
            layout.title_height = v;
        }
        if let Some(v) = keyboard.margin {
            layout.margin = v;
        }
    }

    if let Some(v) = parsed.print_key_names {
        config.render.print_key_names = v;
    }
    if let Some(v) = parsed.file_prefix {
        config.render.file_prefix = v;
    }
    if let Some(v) = parsed.output_format {
        config.render.output_format = v;
    }
    if let Some(v) = parsed.exporters {
        config.render.exporters = v;
    }
    if let Some(v) = parsed.keep_svg {
        config.render.keep_svg = v;
    }

    config.validate()?;
    Ok(config)
}
