//! Benchmarks for a full begin/draw/end frame against the mock context

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::Vec2;
use sprig_render::*;
use sprig_test_utils::MockRenderContext;

fn sprites(count: usize, textures: &[GpuTexture]) -> Vec<(Sprite, usize, i32)> {
    (0..count)
        .map(|i| {
            let sprite = Sprite::new(textures[i % textures.len()].clone())
                .with_position(Vec2::new((i % 100) as f32, (i / 100) as f32));
            (sprite, i % MAX_LAYERS, (i * 7 % 13) as i32)
        })
        .collect()
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("sprite_batch_frame");

    for count in [100, 1000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        let textures: Vec<GpuTexture> = (0..8).map(|_| GpuTexture::mock(64, 64)).collect();
        let input = sprites(count, &textures);
        let ctx = Arc::new(MockRenderContext::new());
        let mut batch = SpriteBatch::new(
            ctx.clone(),
            GpuShader::mock(),
            SpriteBatchDescriptor::new().with_max_sprites(count as u32),
        )
        .expect("valid capacity");

        group.bench_with_input(BenchmarkId::new("mixed_layers", count), &input, |b, input| {
            b.iter(|| {
                batch.begin();
                for (sprite, layer, order) in input {
                    batch.draw(black_box(sprite), *layer, *order);
                }
                batch.end();
                ctx.clear_calls();
            });
        });
    }

    group.finish();
}

fn bench_draw_same_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("sprite_batch_draw");

    let count = 10_000;
    group.throughput(Throughput::Elements(count as u64));

    let texture = GpuTexture::mock(32, 32);
    let sprite = Sprite::new(texture);
    let ctx = Arc::new(MockRenderContext::new());
    let mut batch = SpriteBatch::new(
        ctx,
        GpuShader::mock(),
        SpriteBatchDescriptor::new().with_max_sprites(count),
    )
    .expect("valid capacity");

    group.bench_function("single_layer", |b| {
        b.iter(|| {
            batch.begin();
            for _ in 0..count {
                batch.draw(black_box(&sprite), 0, 0);
            }
            batch.sprite_count()
        });
    });

    group.finish();
}

fn bench_frame_descending_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("sprite_batch_descending");

    // Every key is lower than the one before it
    for count in [1000, 10_000, 50_000] {
        group.throughput(Throughput::Elements(count as u64));

        let texture = GpuTexture::mock(32, 32);
        let input: Vec<Sprite> = (0..count)
            .map(|i| Sprite::new(texture.clone()).with_position(Vec2::splat(i as f32)))
            .collect();
        let ctx = Arc::new(MockRenderContext::new());
        let mut batch = SpriteBatch::new(
            ctx.clone(),
            GpuShader::mock(),
            SpriteBatchDescriptor::new().with_max_sprites(count as u32),
        )
        .expect("valid capacity");

        group.bench_with_input(BenchmarkId::new("single_layer", count), &input, |b, input| {
            b.iter(|| {
                batch.begin();
                for (i, sprite) in input.iter().enumerate() {
                    batch.draw(black_box(sprite), 0, -(i as i32));
                }
                batch.end();
                ctx.clear_calls();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_frame,
    bench_draw_same_order,
    bench_frame_descending_order
);
criterion_main!(benches);
