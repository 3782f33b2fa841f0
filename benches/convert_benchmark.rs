//! Benchmarks for note assembly and ENEX rendering.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use enexport::convert::{assemble, derive_title};
use enexport::hash::hash_image;
use enexport::model::Element;
use enexport::render::{to_enex, RenderOptions};

/// Creates a synthetic document with alternating paragraphs and images.
fn create_elements(paragraphs: usize, image_bytes: usize) -> Vec<Element> {
    let mut elements = Vec::with_capacity(paragraphs * 2);
    for i in 0..paragraphs {
        elements.push(Element::text(format!(
            "Paragraph {} of the benchmark document. It has a second sentence.",
            i
        )));
        if i % 4 == 0 {
            let bytes: Vec<u8> = (0..image_bytes).map(|b| (b + i) as u8).collect();
            elements.push(Element::image(bytes, 640.0, 480.0));
        }
    }
    elements
}

fn bench_hashing(c: &mut Criterion) {
    let image: Vec<u8> = (0..256 * 1024).map(|b| b as u8).collect();

    c.bench_function("hash_image_256k", |b| {
        b.iter(|| hash_image(black_box(&image)).unwrap());
    });
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    let options = RenderOptions::default();

    for paragraphs in [10, 100, 1000] {
        let elements = create_elements(paragraphs, 16 * 1024);
        group.bench_function(format!("{}_paragraphs", paragraphs), |b| {
            b.iter(|| {
                let note = assemble(black_box(&elements), None, &options).unwrap();
                to_enex(&note, &options)
            });
        });
    }

    group.finish();
}

fn bench_title(c: &mut Criterion) {
    let long = "word ".repeat(40);

    c.bench_function("derive_title", |b| {
        b.iter(|| derive_title(black_box(&long)));
    });
}

criterion_group!(benches, bench_hashing, bench_assemble, bench_title);
criterion_main!(benches);
