// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the text encoders and the document writer in the
// rasterps-transcode crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma};

use rasterps_core::{OutputLevel, TranscodeOptions};
use rasterps_transcode::{Ascii85Encoder, DecodedImageSource, DocumentWriter, HexEncoder};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// One megabyte of mixed data: runs of zeros (the `z` shorthand) and noise.
fn sample_data() -> Vec<u8> {
    (0..1024 * 1024u32)
        .map(|i| if (i / 4096) % 2 == 0 { 0 } else { (i.wrapping_mul(2_654_435_761) >> 24) as u8 })
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_ascii85(c: &mut Criterion) {
    let data = sample_data();
    c.bench_function("ascii85_encode (1 MiB)", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(data.len() * 5 / 4 + data.len() / 64);
            let mut encoder = Ascii85Encoder::new();
            encoder.encode(&mut out, black_box(&data)).unwrap();
            encoder.finish(&mut out).unwrap();
            black_box(out);
        });
    });
}

fn bench_hex(c: &mut Criterion) {
    let data = sample_data();
    c.bench_function("hex_encode (1 MiB)", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(data.len() * 2 + data.len() / 36 + 1);
            let mut encoder = HexEncoder::new();
            encoder.encode(&mut out, black_box(&data)).unwrap();
            encoder.finish(&mut out, true).unwrap();
            black_box(out);
        });
    });
}

/// Full document for a 1000x1000 gray image, strips of about 8 KiB.
fn bench_document(c: &mut Criterion) {
    let img = DynamicImage::ImageLuma8(GrayImage::from_fn(1000, 1000, |x, y| Luma([(x ^ y) as u8])));
    let options = TranscodeOptions {
        level: OutputLevel::Level3,
        ..TranscodeOptions::default()
    };

    c.bench_function("document (1000x1000 gray, level 3)", |b| {
        b.iter(|| {
            let mut source = DecodedImageSource::from_dynamic(black_box(img.clone())).unwrap();
            let mut writer = DocumentWriter::new(Vec::new(), options.clone());
            writer.write_image(&mut source).unwrap();
            black_box(writer.finish().unwrap());
        });
    });
}

criterion_group!(benches, bench_ascii85, bench_hex, bench_document);
criterion_main!(benches);
