use std::path::Path;

use chordkeys::{
    ChordError, LayoutConfig, LineSource, RenderOptions, RenderedBatch, render_batch,
};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.starts_with("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.ends_with("</svg>"), "{fixture}: missing </svg tag");
}

fn render_fixture(name: &str, options: &RenderOptions) -> RenderedBatch {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    render_batch(input.lines(), LineSource::Stream, options)
}

#[test]
fn render_all_fixtures() {
    let options = RenderOptions::default();
    for fixture in [
        "triads.chords",
        "extremes.chords",
        "accidentals.chords",
        "errors.chords",
    ] {
        let batch = render_fixture(fixture, &options);
        assert!(!batch.chords.is_empty(), "{fixture}: nothing rendered");
        for rendered in &batch.chords {
            assert_valid_svg(&rendered.svg, fixture);
            assert_eq!(
                rendered.svg.matches("<circle").count(),
                rendered.layout.marks.len(),
                "{fixture}: one mark per distinct key"
            );
        }
    }
}

#[test]
fn triads_share_one_octave() {
    let batch = render_fixture("triads.chords", &RenderOptions::default());
    let stems: Vec<&str> = batch.chords.iter().map(|c| c.file_stem.as_str()).collect();
    assert_eq!(stems, vec!["C", "F", "G", "Am"]);
    assert_eq!(batch.span.lowest.to_string(), "C4");
    assert_eq!(batch.span.highest.to_string(), "B4");
    assert_eq!(batch.span.white_key_count(), 7);
}

#[test]
fn full_piano_range() {
    let batch = render_fixture("extremes.chords", &RenderOptions::default());
    assert_eq!(batch.span.key_count(), 88);
    assert_eq!(batch.span.white_key_count(), 52);

    let layout = &batch.chords[0].layout;
    let config = LayoutConfig::default();
    assert_eq!(layout.width, 52.0 * config.white_key_width + 2.0 * config.margin);
    assert_eq!(layout.keyboard.keys.first().map(|k| k.key), Some(9));
    assert_eq!(layout.keyboard.keys.iter().map(|k| k.key).max(), Some(96));

    let a0 = &layout.marks[0];
    assert_eq!(a0.x, 0.0);
    let c8 = &layout.marks[1];
    assert_eq!(c8.x, 51.0 * config.white_key_width);
}

#[test]
fn enharmonic_spellings_share_physical_keys() {
    let batch = render_fixture("accidentals.chords", &RenderOptions::default());
    assert!(batch.errors.is_empty());

    let enharmonics = &batch.chords[0].layout;
    let keys: Vec<i32> = enharmonics.marks.iter().map(|m| m.key).collect();
    // Cb4 = B3, B#3 = C4, Ebb4 = D4, Fx4 = G4
    assert_eq!(keys, vec![47, 48, 55, 50]);
    for mark in &enharmonics.marks {
        let rect = enharmonics
            .keyboard
            .keys
            .iter()
            .find(|k| k.key == mark.key)
            .expect("marked key is on the keyboard");
        assert_eq!(rect.x, mark.x);
    }

    let unicode: Vec<String> = batch.chords[1]
        .chord
        .notes
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(unicode, vec!["C#4", "Eb4"]);

    let lower: Vec<String> = batch.chords[2]
        .chord
        .notes
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(lower, vec!["Bbb4", "Dbb4", "Fb4"]);
}

#[test]
fn bad_lines_keep_their_position() {
    let batch = render_fixture("errors.chords", &RenderOptions::default());
    let titles: Vec<&str> = batch.chords.iter().map(|c| c.chord.title.as_str()).collect();
    assert_eq!(titles, vec!["ok", "ok2"]);

    assert_eq!(batch.errors.len(), 2);
    assert_eq!(batch.errors[0].line_number, 2);
    assert!(matches!(
        batch.errors[0].error,
        ChordError::UnknownSpelling { .. }
    ));
    assert_eq!(batch.errors[1].line_number, 3);
    assert!(matches!(
        batch.errors[1].error,
        ChordError::MalformedLine { .. }
    ));
    assert!(batch.errors[1].to_string().contains("C10;bad octave"));
}

#[test]
fn zoom_scales_every_coordinate() {
    let plain = render_fixture("triads.chords", &RenderOptions::default());
    let mut zoomed_options = RenderOptions::default();
    zoomed_options.layout.zoom = 2.0;
    let zoomed = render_fixture("triads.chords", &zoomed_options);

    for (a, b) in plain.chords.iter().zip(&zoomed.chords) {
        assert_eq!(a.layout.width * 2.0, b.layout.width);
        assert_eq!(a.layout.height * 2.0, b.layout.height);
        for (ma, mb) in a.layout.marks.iter().zip(&b.layout.marks) {
            assert_eq!(ma.mark_x * 2.0, mb.mark_x);
            assert_eq!(ma.mark_y * 2.0, mb.mark_y);
        }
    }
}

#[test]
fn key_names_add_a_label_band() {
    let plain = render_fixture("triads.chords", &RenderOptions::default());
    let labelled = render_fixture(
        "triads.chords",
        &RenderOptions {
            print_key_names: true,
            ..RenderOptions::default()
        },
    );
    let band = LayoutConfig::default().label_band_height;
    assert_eq!(plain.chords[0].layout.height + band, labelled.chords[0].layout.height);
    assert_eq!(labelled.chords[0].svg.matches("class=\"label\"").count(), 3);
}
