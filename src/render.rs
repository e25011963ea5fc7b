use crate::config::LayoutConfig;
use crate::layout::{ChordLayout, KeyRect, NoteGeometry};
use crate::note::KeyColor;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(layout: &ChordLayout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));

    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));

    if let Some(title) = &layout.title {
        svg.push_str(&format!(
            "<text class=\"title\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\" xml:space=\"preserve\">{}</text>",
            layout.title_x,
            layout.title_y,
            escape_xml(&theme.font_family),
            theme.title_font_size * config.zoom,
            escape_xml(&theme.title_color),
            escape_xml(title)
        ));
    }

    svg.push_str(&format!(
        "<g class=\"keyboard\" transform=\"translate({:.2} {:.2})\">",
        layout.keyboard_x, layout.keyboard_y
    ));

    for key in &layout.keyboard.keys {
        svg.push_str(&key_svg(key, theme, config));
    }

    for mark in &layout.marks {
        svg.push_str(&mark_svg(mark, theme, config));
    }

    if layout.show_key_names {
        for mark in &layout.marks {
            svg.push_str(&label_svg(mark, theme, config));
        }
    }

    svg.push_str("</g>");
    svg.push_str("</svg>");
    svg
}

fn key_svg(key: &KeyRect, theme: &Theme, config: &LayoutConfig) -> String {
    let (class, fill) = match key.color {
        KeyColor::White => ("key white", escape_xml(&theme.white_key_fill)),
        KeyColor::Black => ("key black", escape_xml(&theme.black_key_fill)),
    };
    format!(
        "<rect class=\"{class}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{fill}\" stroke=\"{}\" stroke-width=\"{:.2}\"/>",
        key.x,
        key.y,
        key.width,
        key.height,
        escape_xml(&theme.key_stroke),
        theme.key_stroke_width * config.zoom
    )
}

fn mark_svg(mark: &NoteGeometry, theme: &Theme, config: &LayoutConfig) -> String {
    let fill = match mark.color {
        KeyColor::White => escape_xml(&theme.white_mark_fill),
        KeyColor::Black => escape_xml(&theme.black_mark_fill),
    };
    format!(
        "<circle class=\"mark\" data-note=\"{}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{fill}\" stroke=\"{}\" stroke-width=\"{:.2}\"/>",
        escape_xml(&mark.note.to_string()),
        mark.mark_x,
        mark.mark_y,
        config.mark_radius * config.zoom,
        escape_xml(&theme.mark_stroke),
        theme.key_stroke_width * config.zoom
    )
}

fn label_svg(mark: &NoteGeometry, theme: &Theme, config: &LayoutConfig) -> String {
    format!(
        "<text class=\"label\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\">{}</text>",
        mark.label_x,
        mark.label_y,
        escape_xml(&theme.font_family),
        theme.label_font_size * config.zoom,
        escape_xml(&theme.label_color),
        escape_xml(&mark.note.spelling.to_string())
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(family) = theme
        .font_family
        .split(',')
        .map(|part| part.trim().trim_matches('"').trim_matches('\''))
        .find(|part| !part.is_empty())
    {
        opt.font_family = family.to_string();
    }
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use crate::parser::parse_line;
    use crate::span::compute_span;

    fn render_line(line: &str, show_names: bool) -> String {
        let mut chord = parse_line(line).unwrap();
        chord.show_key_names = show_names;
        let span = compute_span(std::slice::from_ref(&chord));
        let config = LayoutConfig::default();
        let layout = compute_layout(&chord, &span, &config);
        render_svg(&layout, &Theme::classic(), &config)
    }

    fn mark_xs(svg: &str) -> Vec<f32> {
        svg.split("<circle class=\"mark\"")
            .skip(1)
            .filter_map(|chunk| {
                let start = chunk.find("cx=\"")? + 4;
                let end = start + chunk[start..].find('"')?;
                chunk[start..end].parse().ok()
            })
            .collect()
    }

    #[test]
    fn render_svg_basic() {
        let svg = render_line("C E G;Cmaj", false);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(">Cmaj</text>"));
        assert_eq!(svg.matches("<circle class=\"mark\"").count(), 3);
        assert_eq!(svg.matches("class=\"key white\"").count(), 7);
        assert_eq!(svg.matches("class=\"key black\"").count(), 5);
        assert!(!svg.contains("class=\"label\""));
    }

    #[test]
    fn black_keys_are_emitted_after_their_whites() {
        let svg = render_line("C E G", false);
        let last_white = svg.rfind("class=\"key white\"").unwrap();
        let first_black = svg.find("class=\"key black\"").unwrap();
        let first_mark = svg.find("class=\"mark\"").unwrap();
        assert!(last_white < first_black);
        assert!(first_black < first_mark);
    }

    #[test]
    fn mark_order_round_trips_chord_order() {
        let svg = render_line("F2 A2 C3 Eb3 G3 Bb3 D4", false);
        let xs = mark_xs(&svg);
        assert_eq!(xs.len(), 7);
        let mut sorted = xs.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs, sorted);
    }

    #[test]
    fn bare_keyboard_has_no_marks_or_title() {
        let svg = render_line("", false);
        assert!(!svg.contains("<circle"));
        assert!(!svg.contains("class=\"title\""));
        assert_eq!(svg.matches("class=\"key ").count(), 24);
    }

    #[test]
    fn key_names_are_printed_when_requested() {
        let svg = render_line("D F# A;D", true);
        assert_eq!(svg.matches("class=\"label\"").count(), 3);
        assert!(svg.contains(">F#</text>"));
    }

    #[test]
    fn theme_colours_are_escaped() {
        let chord = parse_line("C E G;C").unwrap();
        let span = compute_span(std::slice::from_ref(&chord));
        let config = LayoutConfig::default();
        let layout = compute_layout(&chord, &span, &config);
        let mut theme = Theme::classic();
        theme.background = "#fff\" onload=\"x".to_string();
        theme.white_key_fill = "<red>".to_string();
        theme.white_mark_fill = "a&b".to_string();
        theme.key_stroke = "'".to_string();
        let svg = render_svg(&layout, &theme, &config);
        assert!(svg.contains("fill=\"#fff&quot; onload=&quot;x\""));
        assert!(svg.contains("fill=\"&lt;red&gt;\""));
        assert!(svg.contains("fill=\"a&amp;b\""));
        assert!(svg.contains("stroke=\"&apos;\""));
        assert!(!svg.contains("onload=\"x"));
    }

    #[test]
    fn titles_are_escaped() {
        let svg = render_line("C Eb G;C<min> & \"friends\"", false);
        assert!(svg.contains("C&lt;min&gt; &amp; &quot;friends&quot;"));
    }
}
