use chordkeys::config::LayoutConfig;
use chordkeys::ir::LineSource;
use chordkeys::layout::compute_layout;
use chordkeys::parser::parse_batch;
use chordkeys::render::render_svg;
use chordkeys::span::compute_span;
use chordkeys::theme::Theme;
use chordkeys::{RenderOptions, render_batch};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const ROOTS: [&str; 12] = ["C", "Db", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B"];

/// A songbook-sized batch: `count` seventh chords cycling through all roots
/// and octaves 1..=7.
fn songbook_source(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let root = ROOTS[i % ROOTS.len()];
            let octave = 1 + (i / ROOTS.len()) % 7;
            format!("{root}{octave} E G Bb;{root}7 #{i}")
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for count in [12usize, 120, 1200] {
        let lines = songbook_source(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &lines, |b, data| {
            b.iter(|| {
                let batch = parse_batch(black_box(data), LineSource::Stream);
                black_box(batch.chords.len());
            });
        });
    }
    group.finish();
}

fn bench_span(c: &mut Criterion) {
    let mut group = c.benchmark_group("span");
    for count in [12usize, 1200] {
        let batch = parse_batch(songbook_source(count), LineSource::Stream);
        group.bench_with_input(BenchmarkId::from_parameter(count), &batch.chords, |b, chords| {
            b.iter(|| black_box(compute_span(black_box(chords))));
        });
    }
    group.finish();
}

fn bench_layout_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_render");
    let theme = Theme::classic();
    let config = LayoutConfig::default();
    for (name, line) in [
        ("one_octave", "C E G;C"),
        ("full_piano", "A0 C8;range"),
        ("cluster", "C4 C#4 D4 D#4 E4 F4 F#4 G4 G#4 A4 A#4 B4;all"),
    ] {
        let batch = parse_batch([line], LineSource::Arguments);
        let span = compute_span(&batch.chords);
        let chord = &batch.chords[0];
        group.bench_with_input(BenchmarkId::from_parameter(name), chord, |b, chord| {
            b.iter(|| {
                let layout = compute_layout(black_box(chord), &span, &config);
                let svg = render_svg(&layout, &theme, &config);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let options = RenderOptions {
        print_key_names: true,
        ..RenderOptions::default()
    };
    for count in [12usize, 120] {
        let lines = songbook_source(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &lines, |b, data| {
            b.iter(|| {
                let batch = render_batch(black_box(data), LineSource::Stream, &options);
                black_box(batch.chords.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse, bench_span, bench_layout_render, bench_end_to_end
);
criterion_main!(benches);
