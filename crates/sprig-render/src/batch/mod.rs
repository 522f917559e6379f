//! Layer-aware sprite batching.
//!
//! A [`SpriteBatch`] collects sprites between [`begin`](SpriteBatch::begin)
//! and [`end`](SpriteBatch::end) and flushes all of them with a single
//! indexed draw call:
//!
//! | Stage | What happens |
//! |-------|--------------|
//! | `begin` | Layer buckets and the texture slot table are emptied |
//! | `draw` | The sprite gets a texture slot, becomes a [`Quad`] and is sorted into its layer |
//! | `end` | Buckets are flattened (layer 0 first), uploaded, textures bound, one draw issued |
//!
//! Capacity is fixed at construction. Anything past it is dropped and
//! reported as a [`BatchDiagnostic`]; the frame always completes.

mod diagnostics;
mod layers;
mod quad;
mod texture_slots;
mod vertex;

pub use diagnostics::{BatchDiagnostic, DiagnosticSink, RecordingSink, TracingSink};
pub use layers::{LayerBuckets, MAX_LAYERS};
pub use quad::{Quad, TEXEL_INSET, build_quad, inset_rect, to_tex_coords};
pub use texture_slots::{MAX_TEXTURES, SlotAcquire, TextureSlots};
pub use vertex::{INDICES_PER_QUAD, VERTICES_PER_QUAD, Vertex, quad_indices};

use std::fmt;
use std::sync::Arc;

use sprig_core::math::{Mat4, mat4_to_cols};
use sprig_core::profiling::{profile_function, profile_scope};
use sprig_test_utils::{GpuBuffer, GpuShader, GpuVertexArray, RenderContext, UniformValue};

use crate::Sprite;
use crate::shader::uniforms;

/// Descriptor for creating a sprite batch.
#[derive(Debug, Clone)]
pub struct SpriteBatchDescriptor {
    /// Label prefix for the batch's GPU objects
    pub label: Option<&'static str>,
    /// Sprites accepted per begin/end cycle; sizes the GPU buffers
    pub max_sprites: u32,
}

impl Default for SpriteBatchDescriptor {
    fn default() -> Self {
        Self {
            label: None,
            max_sprites: 10_000,
        }
    }
}

impl SpriteBatchDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_max_sprites(mut self, max_sprites: u32) -> Self {
        self.max_sprites = max_sprites;
        self
    }
}

/// Largest capacity whose index count still fits in a `u32`.
pub const MAX_SPRITES_LIMIT: u32 = u32::MAX / INDICES_PER_QUAD;

/// Invalid sprite batch configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteBatchError {
    /// `max_sprites` was zero
    ZeroCapacity,
    /// `max_sprites` exceeds [`MAX_SPRITES_LIMIT`]
    CapacityTooLarge { max_sprites: u32 },
    /// The vertex buffer for `max_sprites` would exceed the device's buffer
    /// size limit
    BufferTooLarge {
        max_sprites: u32,
        bytes: u64,
        max_buffer_size: u64,
    },
}

impl fmt::Display for SpriteBatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "Sprite batch capacity must be at least 1"),
            Self::CapacityTooLarge { max_sprites } => write!(
                f,
                "Sprite batch capacity {} exceeds the limit of {} sprites",
                max_sprites, MAX_SPRITES_LIMIT
            ),
            Self::BufferTooLarge {
                max_sprites,
                bytes,
                max_buffer_size,
            } => write!(
                f,
                "Sprite batch capacity {} needs a {} byte vertex buffer, over the device limit of {} bytes",
                max_sprites, bytes, max_buffer_size
            ),
        }
    }
}

impl std::error::Error for SpriteBatchError {}

/// Statistics of the last flushed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Sprites drawn
    pub sprites: u32,
    /// Texture slots bound
    pub textures: u32,
    /// Layers holding at least one sprite
    pub layers_used: u32,
    /// Sprites dropped by capacity checks
    pub dropped: u32,
    /// Draw calls issued
    pub draw_calls: u32,
}

/// Deferred sprite renderer issuing one draw call per frame.
///
/// The batch owns its vertex buffer, index buffer and vertex array. The
/// shader and every sprite texture are shared handles; the batch never
/// destroys them.
///
/// # Example
///
/// ```ignore
/// let mut batch = SpriteBatch::new(context, shader, SpriteBatchDescriptor::default())?;
/// batch.set_projection_matrix(Mat4::orthographic_rh(0.0, 800.0, 0.0, 600.0, -1.0, 1.0));
///
/// batch.begin();
/// batch.draw(&background, 0, 0);
/// batch.draw(&player, 1, 0);
/// batch.end();
/// ```
pub struct SpriteBatch {
    context: Arc<dyn RenderContext>,
    shader: GpuShader,
    vertex_buffer: GpuBuffer,
    index_buffer: GpuBuffer,
    vertex_array: GpuVertexArray,
    max_sprites: u32,
    layers: LayerBuckets,
    textures: TextureSlots,
    /// Flattened vertices of the current frame, reused between frames
    vertices: Vec<Vertex>,
    dropped: u32,
    stats: BatchStats,
    projection: Mat4,
    view: Mat4,
    sink: Arc<dyn DiagnosticSink>,
    released: bool,
}

impl SpriteBatch {
    /// Create a batch for up to `descriptor.max_sprites` sprites per frame.
    ///
    /// Allocates a vertex buffer for `max_sprites * 4` vertices and uploads
    /// the quad index pattern for `max_sprites * 6` indices once. Fails
    /// without creating anything if that vertex buffer would be larger than
    /// [`RenderContext::max_buffer_size`].
    pub fn new(
        context: Arc<dyn RenderContext>,
        shader: GpuShader,
        descriptor: SpriteBatchDescriptor,
    ) -> Result<Self, SpriteBatchError> {
        profile_function!();

        let max_sprites = descriptor.max_sprites;
        if max_sprites == 0 {
            return Err(SpriteBatchError::ZeroCapacity);
        }
        if max_sprites > MAX_SPRITES_LIMIT {
            return Err(SpriteBatchError::CapacityTooLarge { max_sprites });
        }

        // The vertex buffer is the larger of the two
        let vertex_count = max_sprites as u64 * VERTICES_PER_QUAD as u64;
        let vertex_bytes = vertex_count * Vertex::SIZE;
        let max_buffer_size = context.max_buffer_size();
        if vertex_bytes > max_buffer_size {
            return Err(SpriteBatchError::BufferTooLarge {
                max_sprites,
                bytes: vertex_bytes,
                max_buffer_size,
            });
        }

        let label = descriptor.label.unwrap_or("Sprite Batch");
        let vertex_label = format!("{label} Vertex Buffer");
        let index_label = format!("{label} Index Buffer");

        let vertex_buffer = context.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&vertex_label),
            size: vertex_bytes,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let indices = quad_indices(max_sprites);
        let index_buffer = context.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&index_label),
            size: std::mem::size_of_val(indices.as_slice()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // The pattern never changes, so it is uploaded exactly once
        context.write_buffer(&index_buffer, 0, bytemuck::cast_slice(&indices));

        let vertex_array = context.create_vertex_array(&vertex_buffer, &index_buffer, Vertex::SIZE);

        tracing::debug!(
            "Created {} for {} sprites ({} vertex bytes)",
            label,
            max_sprites,
            vertex_buffer.size()
        );

        Ok(Self {
            context,
            shader,
            vertex_buffer,
            index_buffer,
            vertex_array,
            max_sprites,
            layers: LayerBuckets::new(),
            textures: TextureSlots::new(),
            vertices: Vec::new(),
            dropped: 0,
            stats: BatchStats::default(),
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            sink: Arc::new(TracingSink),
            released: false,
        })
    }

    /// Replace the diagnostic sink (builder form).
    pub fn with_diagnostic_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the diagnostic sink.
    pub fn set_diagnostic_sink(&mut self, sink: Arc<dyn DiagnosticSink>) {
        self.sink = sink;
    }

    /// Start a frame: forget every sprite and texture slot of the last one.
    pub fn begin(&mut self) {
        self.layers.clear();
        self.textures.clear();
        self.dropped = 0;
    }

    /// Queue `sprite` on `layer`, ordered by `order` within the layer.
    ///
    /// Nothing reaches the GPU until [`end`](Self::end). The sprite is
    /// dropped, and a diagnostic reported, when the layer is out of range,
    /// the batch is full, or its texture needs a slot and none is left.
    pub fn draw(&mut self, sprite: &Sprite, layer: usize, order: i32) {
        profile_function!();

        if layer >= MAX_LAYERS {
            self.reject(BatchDiagnostic::LayerOverflow {
                layer,
                max_layers: MAX_LAYERS,
            });
            return;
        }

        if self.layers.len() >= self.max_sprites as usize {
            self.reject(BatchDiagnostic::SpriteOverflow {
                max_sprites: self.max_sprites,
            });
            return;
        }

        let texture = sprite.texture();
        let slot = match self.textures.acquire(texture) {
            SlotAcquire::Existing(slot) | SlotAcquire::Assigned(slot) => slot,
            SlotAcquire::Full => {
                self.reject(BatchDiagnostic::TextureSlotOverflow {
                    texture: texture.id(),
                    label: texture.label().map(str::to_string),
                    max_textures: MAX_TEXTURES,
                });
                return;
            }
        };

        self.layers.insert(layer, build_quad(sprite, slot, order));
    }

    /// Flush the frame with a single indexed draw call.
    pub fn end(&mut self) {
        profile_function!();

        let sprite_count = self.layers.len() as u32;

        {
            profile_scope!("flatten_and_upload");
            self.vertices.clear();
            self.layers.flatten_into(&mut self.vertices);

            // Only the live region; the rest of the buffer is stale and unused
            if !self.vertices.is_empty() {
                self.context.write_buffer(
                    &self.vertex_buffer,
                    0,
                    bytemuck::cast_slice(&self.vertices),
                );
            }
        }

        self.context.use_shader(&self.shader);

        let units: Vec<i32> = (0..self.textures.len() as i32).collect();
        self.context
            .set_uniform(&self.shader, uniforms::TEXTURES, UniformValue::IntArray(units));
        // Sprite transforms are already baked into the vertex positions
        self.context.set_uniform(
            &self.shader,
            uniforms::MODEL,
            UniformValue::Mat4(mat4_to_cols(Mat4::IDENTITY)),
        );

        for (unit, texture) in self.textures.iter().enumerate() {
            self.context.bind_texture(unit as u32, texture);
        }

        self.context.draw_indexed(
            &self.shader,
            &self.vertex_array,
            sprite_count * INDICES_PER_QUAD,
        );

        self.stats = BatchStats {
            sprites: sprite_count,
            textures: self.textures.len() as u32,
            layers_used: self.layers.layers_used() as u32,
            dropped: self.dropped,
            draw_calls: 1,
        };

        tracing::trace!(
            "Flushed {} sprites with {} textures ({} dropped)",
            self.stats.sprites,
            self.stats.textures,
            self.stats.dropped
        );
    }

    /// Set the projection matrix uniform immediately.
    pub fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection = projection;
        self.context.use_shader(&self.shader);
        self.context.set_uniform(
            &self.shader,
            uniforms::PROJECTION,
            UniformValue::Mat4(mat4_to_cols(projection)),
        );
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Set the view matrix uniform immediately.
    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.view = view;
        self.context.use_shader(&self.shader);
        self.context.set_uniform(
            &self.shader,
            uniforms::VIEW,
            UniformValue::Mat4(mat4_to_cols(view)),
        );
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// Switch to another shader. The current projection and view matrices
    /// are applied to it.
    pub fn set_shader(&mut self, shader: GpuShader) {
        self.shader = shader;
        self.set_projection_matrix(self.projection);
        self.set_view_matrix(self.view);
    }

    pub fn shader(&self) -> &GpuShader {
        &self.shader
    }

    pub fn max_sprites(&self) -> u32 {
        self.max_sprites
    }

    /// Sprites queued since the last `begin`.
    pub fn sprite_count(&self) -> usize {
        self.layers.len()
    }

    /// Texture slots assigned since the last `begin`.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Sprites dropped since the last `begin`.
    pub fn dropped_count(&self) -> u32 {
        self.dropped
    }

    /// Statistics of the last `end`.
    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    /// Release the vertex buffer, index buffer and vertex array.
    ///
    /// Dropping the batch does the same; this makes the release point
    /// explicit.
    pub fn destroy(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        self.context.destroy_vertex_array(&self.vertex_array);
        self.context.destroy_buffer(&self.vertex_buffer);
        self.context.destroy_buffer(&self.index_buffer);
        tracing::debug!("Released sprite batch GPU objects");
    }

    fn reject(&mut self, diagnostic: BatchDiagnostic) {
        self.dropped += 1;
        self.sink.report(&diagnostic);
    }
}

impl Drop for SpriteBatch {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_test_utils::MockRenderContext;

    fn mock_batch(max_sprites: u32) -> Result<SpriteBatch, SpriteBatchError> {
        SpriteBatch::new(
            Arc::new(MockRenderContext::new()),
            GpuShader::mock(),
            SpriteBatchDescriptor::new().with_max_sprites(max_sprites),
        )
    }

    #[test]
    fn test_descriptor_defaults() {
        let desc = SpriteBatchDescriptor::default();
        assert_eq!(desc.max_sprites, 10_000);
        assert_eq!(desc.label, None);

        let desc = desc.with_label("HUD").with_max_sprites(64);
        assert_eq!(desc.label, Some("HUD"));
        assert_eq!(desc.max_sprites, 64);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(matches!(mock_batch(0), Err(SpriteBatchError::ZeroCapacity)));
    }

    #[test]
    fn test_capacity_overflowing_u32_indices_is_rejected() {
        let too_many = MAX_SPRITES_LIMIT + 1;
        assert!(matches!(
            mock_batch(too_many),
            Err(SpriteBatchError::CapacityTooLarge { max_sprites }) if max_sprites == too_many
        ));
    }

    #[test]
    fn test_capacity_over_device_buffer_limit_is_rejected() {
        // 256 MiB, the default wgpu limit
        let limit = 256 << 20;
        let ctx = Arc::new(MockRenderContext::new().with_max_buffer_size(limit));
        let result = SpriteBatch::new(
            ctx.clone(),
            GpuShader::mock(),
            SpriteBatchDescriptor::new().with_max_sprites(2_000_000),
        );

        assert_eq!(
            result.err(),
            Some(SpriteBatchError::BufferTooLarge {
                max_sprites: 2_000_000,
                bytes: 2_000_000 * 4 * Vertex::SIZE,
                max_buffer_size: limit,
            })
        );
        assert_eq!(ctx.call_count(), 0);

        // Exactly at the limit still fits
        let fits = (limit / (VERTICES_PER_QUAD as u64 * Vertex::SIZE)) as u32;
        let batch = SpriteBatch::new(
            ctx.clone(),
            GpuShader::mock(),
            SpriteBatchDescriptor::new().with_max_sprites(fits),
        )
        .expect("fits the limit");
        assert_eq!(batch.max_sprites(), fits);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            SpriteBatchError::ZeroCapacity.to_string(),
            "Sprite batch capacity must be at least 1"
        );
        assert_eq!(
            SpriteBatchError::BufferTooLarge {
                max_sprites: 10,
                bytes: 1440,
                max_buffer_size: 1024,
            }
            .to_string(),
            "Sprite batch capacity 10 needs a 1440 byte vertex buffer, over the device limit of 1024 bytes"
        );
    }

    #[test]
    fn test_new_batch_is_empty() {
        let batch = mock_batch(8).expect("valid capacity");
        assert_eq!(batch.max_sprites(), 8);
        assert_eq!(batch.sprite_count(), 0);
        assert_eq!(batch.texture_count(), 0);
        assert_eq!(batch.stats(), BatchStats::default());
        assert_eq!(batch.projection_matrix(), Mat4::IDENTITY);
        assert_eq!(batch.view_matrix(), Mat4::IDENTITY);
    }
}
