// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::RefCell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Affine, Point, Size, Vec2};
use understory_affine::AffineTransform;
use understory_photo_viewport::ImageSurface;
use understory_transform_animator::{Builder, FlingBounds, Interpolator, Scroller, TransformSurface};

fn surface() -> Rc<RefCell<ImageSurface>> {
    let s = Rc::new(RefCell::new(ImageSurface::new(Size::new(2000.0, 1000.0))));
    s.borrow_mut()
        .set_image_matrix(Affine::translate((0.0, 250.0)) * Affine::scale(0.5));
    s
}

fn bench_decompose(c: &mut Criterion) {
    let m = Affine::translate((120.0, -40.0))
        * Affine::rotate(0.7)
        * Affine::scale_non_uniform(1.3, 0.8);
    c.bench_function("affine/decompose_compose", |b| {
        b.iter(|| black_box(AffineTransform::from_affine(black_box(m)).to_affine()));
    });
}

fn bench_frames(c: &mut Criterion) {
    let s = surface();
    let anim = Builder::new(&s)
        .unwrap()
        .to_scale(1.0)
        .to_rotate(30.0)
        .scale_interpolator(Interpolator::EaseInOut)
        .anim_center(500.0, 500.0)
        .build();
    c.bench_function("animator/frame_at", |b| {
        b.iter(|| {
            for i in 0..=100 {
                black_box(anim.frame_at(f64::from(i) / 100.0));
            }
        });
    });

    c.bench_function("animator/run_250ms", |b| {
        b.iter_batched(
            || {
                let s = surface();
                let mut anim = Builder::new(&s).unwrap().to_scale(1.0).duration(250).build();
                anim.start();
                (s, anim)
            },
            |(s, mut anim)| {
                let mut now = 0;
                while anim.tick(now).needs_frame() {
                    now += 16;
                }
                black_box(s.borrow().image_matrix())
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_fling(c: &mut Criterion) {
    let bounds = FlingBounds {
        min_x: -1000.0,
        max_x: 0.0,
        min_y: -2000.0,
        max_y: 0.0,
    };
    c.bench_function("scroller/fling_to_rest", |b| {
        b.iter(|| {
            let mut s = Scroller::new(2.0);
            s.fling(
                Point::new(-500.0, -1000.0),
                Vec2::new(-4000.0, 6000.0),
                bounds,
                Vec2::new(80.0, 80.0),
            );
            let mut now = 0;
            while s.compute_offset(now) {
                now += 16;
            }
            black_box(s.current())
        });
    });
}

criterion_group!(benches, bench_decompose, bench_frames, bench_fling);
criterion_main!(benches);
