//! MusicXML input adapter.
//!
//! Walks a `score-partwise` document and turns every group of simultaneous
//! notes into a `"<notes>;<title>"` line, the same format the chord parser
//! reads from a text stream.

use anyhow::{Result, anyhow, bail};
use roxmltree::{Document, Node};

pub fn chord_lines(xml: &str) -> Result<Vec<String>> {
    // MusicXML files carry a DOCTYPE, so DTDs must be allowed
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| anyhow!("XML parse error: {e}"))?;
    let root = doc.root_element();
    if root.tag_name().name() != "score-partwise" {
        bail!(
            "unsupported root element '{}', only 'score-partwise' is supported",
            root.tag_name().name()
        );
    }

    let parts: Vec<Node> = elements(root, "part").collect();
    let multi_part = parts.len() > 1;
    let mut lines = Vec::new();
    for part in &parts {
        let part_id = part.attribute("id").unwrap_or("P");
        for measure in elements(*part, "measure") {
            let number = measure.attribute("number").unwrap_or("?");
            let title = if multi_part {
                format!("{part_id} m{number}")
            } else {
                format!("m{number}")
            };
            for chord in measure_chords(&measure)? {
                lines.push(format!("{};{}", chord.join(" "), title));
            }
        }
    }
    Ok(lines)
}

fn elements<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn has_child(node: &Node, name: &str) -> bool {
    node.children()
        .any(|n| n.is_element() && n.tag_name().name() == name)
}

/// Groups of note tokens sounding together. A `<note>` carrying `<chord/>`
/// joins the group of the note before it.
fn measure_chords(measure: &Node) -> Result<Vec<Vec<String>>> {
    let mut chords: Vec<Vec<String>> = Vec::new();
    for note in elements(*measure, "note") {
        let joins_previous = has_child(&note, "chord");
        if has_child(&note, "rest") {
            continue;
        }
        let Some(pitch) = elements(note, "pitch").next() else {
            continue;
        };
        let token = pitch_token(&pitch)?;
        match chords.last_mut() {
            Some(current) if joins_previous => current.push(token),
            _ => chords.push(vec![token]),
        }
    }
    Ok(chords)
}

fn child_text<'a>(node: &Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| n.text())
        .map(str::trim)
}

fn pitch_token(pitch: &Node) -> Result<String> {
    let step = child_text(pitch, "step").ok_or_else(|| anyhow!("<pitch> without <step>"))?;
    let octave = child_text(pitch, "octave").ok_or_else(|| anyhow!("<pitch> without <octave>"))?;
    let alter = match child_text(pitch, "alter") {
        Some(text) => text
            .parse::<f64>()
            .map_err(|_| anyhow!("invalid <alter> value '{text}'"))?,
        None => 0.0,
    };
    let accidental = match alter.round() as i32 {
        _ if alter.fract() != 0.0 => bail!("microtonal <alter> {alter} cannot be drawn on a keyboard"),
        -2 => "bb",
        -1 => "b",
        0 => "",
        1 => "#",
        2 => "x",
        other => bail!("unsupported <alter> value {other}"),
    };
    Ok(format!("{step}{accidental}{octave}"))
}
