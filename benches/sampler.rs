use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qr_reveal::reveal::{MotionPlan, compose_frame, sample_particles};
use qr_reveal::{ECLevel, Rgb, encode, render_bitmap};

fn bench_sample_particles(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_particles");
    for (name, payload) in [
        ("v3", "https://example.com".to_string()),
        ("v10", "https://example.com/".repeat(8)),
    ] {
        let symbol = encode(&payload, ECLevel::H).unwrap();
        let bitmap = render_bitmap(&symbol, 400, Rgb::BLACK, Rgb::WHITE).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &bitmap, |b, bmp| {
            b.iter(|| sample_particles(black_box(bmp), symbol.width(), 400.0))
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let symbol = encode("https://example.com", ECLevel::H).unwrap();
    c.bench_function("render_bitmap_1024", |b| {
        b.iter(|| render_bitmap(black_box(&symbol), 1024, Rgb::BLACK, Rgb::WHITE))
    });
}

fn bench_compose_frame(c: &mut Criterion) {
    let symbol = encode("https://example.com", ECLevel::H).unwrap();
    let bitmap = render_bitmap(&symbol, 256, Rgb::BLACK, Rgb::WHITE).unwrap();
    let field = sample_particles(&bitmap, symbol.width(), 256.0).unwrap();
    let plan = MotionPlan::new(&field, (512.0, 512.0), 0);
    c.bench_function("compose_frame_256_mid_flight", |b| {
        b.iter(|| compose_frame(&field, &plan, black_box(0.4), 256, Rgb::BLACK, Rgb::WHITE))
    });
}

criterion_group!(benches, bench_sample_particles, bench_render, bench_compose_frame);
criterion_main!(benches);
