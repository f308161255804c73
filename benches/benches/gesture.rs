// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_gesture::{GestureEvent, GestureRecognizer, PointerSample, TouchConfig};
use understory_photo_viewport::{ViewportConfig, ViewportController};

/// One finger dragging diagonally, `n` moves 16 ms apart.
fn drag_stream(n: u32) -> Vec<PointerSample> {
    let mut samples = Vec::with_capacity(n as usize + 2);
    samples.push(PointerSample::down(0, (100.0, 100.0), 0));
    for i in 1..=n {
        let d = f64::from(i) * 3.0;
        samples.push(PointerSample::moved(0, (100.0 + d, 100.0 + d), u64::from(i) * 16));
    }
    let end = 100.0 + f64::from(n) * 3.0;
    samples.push(PointerSample::up(0, (end, end), u64::from(n) * 16 + 8));
    samples
}

/// Two fingers spreading and turning, `n` batched moves.
fn pinch_stream(n: u32) -> Vec<Vec<PointerSample>> {
    (1..=n)
        .map(|i| {
            let t = u64::from(i) * 16;
            let r = 100.0 + f64::from(i) * 4.0;
            let (s, c) = (f64::from(i) * 1.5).to_radians().sin_cos();
            vec![
                PointerSample::moved(0, (500.0 - r * c, 500.0 - r * s), t),
                PointerSample::moved(1, (500.0 + r * c, 500.0 + r * s), t),
            ]
        })
        .collect()
}

fn bench_recognizer(c: &mut Criterion) {
    let drag = drag_stream(120);
    c.bench_function("recognizer/drag_120", |b| {
        b.iter_batched(
            || (GestureRecognizer::new(TouchConfig::default()), Vec::<GestureEvent>::new()),
            |(mut r, mut log)| {
                for s in &drag {
                    r.on_sample(s, &mut log);
                }
                black_box(log.len())
            },
            BatchSize::SmallInput,
        );
    });

    let pinch = pinch_stream(120);
    c.bench_function("recognizer/pinch_rotate_120", |b| {
        b.iter_batched(
            || {
                let mut r = GestureRecognizer::new(TouchConfig::default());
                let mut log = Vec::<GestureEvent>::new();
                r.on_sample(&PointerSample::down(0, (400.0, 500.0), 0), &mut log);
                r.on_sample(&PointerSample::down(1, (600.0, 500.0), 0), &mut log);
                (r, log)
            },
            |(mut r, mut log)| {
                for batch in &pinch {
                    r.on_move_batch(batch, &mut log);
                }
                black_box(log.len())
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_viewport(c: &mut Criterion) {
    let drag = drag_stream(60);
    c.bench_function("viewport/drag_and_settle", |b| {
        b.iter_batched(
            || {
                let mut v = ViewportController::new(
                    Size::new(2000.0, 1000.0),
                    ViewportConfig::default(),
                    TouchConfig::default(),
                    (),
                    (),
                );
                v.set_init_args(Rect::new(100.0, 100.0, 300.0, 200.0), || {});
                v.on_layout(Size::new(1000.0, 1000.0));
                let mut now = 0;
                while v.on_frame(now) {
                    now += 16;
                }
                v
            },
            |mut v| {
                for s in &drag {
                    v.on_pointer_sample(s);
                }
                let mut now = 10_000;
                while v.on_frame(now) {
                    now += 16;
                }
                black_box(v.transform())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_recognizer, bench_viewport);
criterion_main!(benches);
