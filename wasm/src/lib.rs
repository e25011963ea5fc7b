use chordkeys::{RenderOptions, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChordRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    zoom: Option<f32>,
    print_key_names: Option<bool>,
}

fn build_render_options(options: ChordRenderOptions) -> Result<RenderOptions, String> {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::classic()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(zoom) = options.zoom {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(format!("zoom must be a positive number, got {zoom}"));
        }
        render_options.layout.zoom = zoom;
    }
    if let Some(print_key_names) = options.print_key_names {
        render_options.print_key_names = print_key_names;
    }

    Ok(render_options)
}

/// Render one `"<notes>;<title>"` line to an SVG string.
#[wasm_bindgen]
pub fn render_chord_svg(line: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ChordRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        ChordRenderOptions::default()
    };

    let render_options = build_render_options(options).map_err(|error| JsValue::from_str(&error))?;
    render_with_options(line, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}
