//! Layered sprite batching on wgpu.
//!
//! Sprites are queued with a layer and an order key between
//! [`SpriteBatch::begin`] and [`SpriteBatch::end`]; `end` renders the whole
//! frame with one indexed draw call. Up to [`MAX_TEXTURES`] distinct
//! textures may appear in a frame, each getting its own sampler unit.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sprig_render::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let context = GraphicsContext::new_owned_sync()?;
//! let format = wgpu::TextureFormat::Rgba8UnormSrgb;
//! let target = context.create_render_target(Some("Frame"), 320, 240, format);
//! context.set_render_target(Some(target.create_view(&Default::default())));
//!
//! let texture = context.create_texture_rgba8(Some("white"), 1, 1, &[255; 4])?;
//! let shader = sprite_shader(context.as_ref(), format);
//! let mut batch = SpriteBatch::new(context.clone(), shader, SpriteBatchDescriptor::default())?;
//! batch.set_projection_matrix(glam::Mat4::orthographic_rh(0.0, 320.0, 0.0, 240.0, -1.0, 1.0));
//!
//! batch.begin();
//! batch.draw(&Sprite::new(texture).with_scale(glam::Vec2::splat(32.0)), 0, 0);
//! batch.end();
//! # Ok(())
//! # }
//! ```

mod batch;
mod color;
mod context;
mod context_impl;
mod shader;
mod sprite;

pub use batch::*;
pub use color::Color;
pub use context::{GraphicsContext, GraphicsContextDescriptor, GraphicsError};
pub use shader::{SPRITE_SHADER_SOURCE, sprite_shader, uniforms};
pub use sprite::Sprite;

// Re-export the GPU abstraction so users need a single import
pub use sprig_test_utils::{
    GpuBuffer, GpuShader, GpuTexture, GpuVertexArray, RenderContext, ShaderDescriptor, ShaderId,
    TextureId, UniformValue,
};
#[cfg(feature = "mock")]
pub use sprig_test_utils::{MockRenderContext, RenderCall};

// Re-export wgpu and geometry types used in the public API
pub use sprig_core::geometry::{FloatRect, IntRect};
pub use wgpu;
