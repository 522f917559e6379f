//! Offscreen Sprites Example
//!
//! Renders a small scene into an offscreen texture with a single draw call:
//! - A 2x2-cell atlas shared by several sprites (one texture slot)
//! - Sprites spread over three layers with order keys inside a layer
//! - Flipped and tinted sprites
//!
//! Set `RUST_LOG=debug` to see GPU object creation.

use glam::{Mat4, Vec2};
use sprig_core::{Config, ProfilingMode};
use sprig_render::*;

const WIDTH: u32 = 256;
const HEIGHT: u32 = 256;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// 32x32 atlas: four 16x16 cells, each a different color.
fn atlas_pixels() -> Vec<u8> {
    const CELLS: [[u8; 4]; 4] = [
        [230, 80, 80, 255],
        [80, 200, 90, 255],
        [70, 110, 230, 255],
        [240, 220, 90, 255],
    ];

    (0..32 * 32)
        .flat_map(|i| {
            let (x, y) = (i % 32, i / 32);
            CELLS[(y / 16) * 2 + x / 16]
        })
        .collect()
}

fn cell(index: i32) -> IntRect {
    IntRect::new((index % 2) * 16, (index / 2) * 16, 16, 16)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    sprig_core::init(&Config::default().with_profiling(ProfilingMode::Scopes));

    let context = GraphicsContext::new_owned_sync()?;
    tracing::info!("Rendering on {}", context.info().name);

    let target = context.create_render_target(Some("Offscreen Target"), WIDTH, HEIGHT, FORMAT);
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());
    context.clear(&view, wgpu::Color { r: 0.1, g: 0.1, b: 0.12, a: 1.0 });
    context.set_render_target(Some(view));

    let atlas = context.create_texture_rgba8(Some("atlas"), 32, 32, &atlas_pixels())?;
    let white = context.create_texture_rgba8(Some("white"), 1, 1, &[255; 4])?;

    let shader = sprite_shader(context.as_ref(), FORMAT);
    let mut batch = SpriteBatch::new(
        context.clone(),
        shader,
        SpriteBatchDescriptor::new()
            .with_label("Offscreen Batch")
            .with_max_sprites(256),
    )?;
    batch.set_projection_matrix(Mat4::orthographic_rh(
        0.0,
        WIDTH as f32,
        0.0,
        HEIGHT as f32,
        -1.0,
        1.0,
    ));
    batch.set_view_matrix(Mat4::IDENTITY);

    let background = Sprite::new(white.clone())
        .with_scale(Vec2::new(WIDTH as f32, 48.0))
        .with_color(Color::from_hex(0x2d4a3e));

    let mut tiles = Vec::new();
    for i in 0..12 {
        let mut tile = Sprite::new(atlas.clone())
            .with_texture_rect(cell(i % 4))
            .with_position(Vec2::new(16.0 + i as f32 * 20.0, 64.0))
            .with_origin(Vec2::new(8.0, 8.0))
            .with_scale(Vec2::splat(1.5));
        if i % 3 == 0 {
            tile.flip_horizontal();
        }
        tiles.push(tile);
    }

    let shadow = Sprite::new(white)
        .with_position(Vec2::new(128.0, 120.0))
        .with_origin(Vec2::splat(0.5))
        .with_scale(Vec2::splat(40.0))
        .with_color(Color::BLACK.with_alpha(0.4));
    let hero = Sprite::new(atlas)
        .with_texture_rect(cell(3))
        .with_position(Vec2::new(124.0, 124.0))
        .with_origin(Vec2::new(8.0, 8.0))
        .with_scale(Vec2::splat(3.0));

    batch.begin();
    // Submitted front to back; layers and order keys sort it out
    batch.draw(&hero, 2, 1);
    batch.draw(&shadow, 2, 0);
    for (i, tile) in tiles.iter().enumerate() {
        batch.draw(tile, 1, -(i as i32));
    }
    batch.draw(&background, 0, 0);
    batch.end();
    sprig_core::profiling::new_frame();

    let stats = batch.stats();
    tracing::info!(
        "Drew {} sprites from {} textures on {} layers with {} draw call(s)",
        stats.sprites,
        stats.textures,
        stats.layers_used,
        stats.draw_calls
    );

    batch.destroy();
    context.device().poll(wgpu::PollType::Wait {
        submission_index: None,
        timeout: None,
    })?;

    Ok(())
}
