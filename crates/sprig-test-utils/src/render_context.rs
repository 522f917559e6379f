//! Trait abstracting the GPU operations used by the sprite batch.
//!
//! The `RenderContext` trait provides an abstraction over GPU operations,
//! allowing for both real GPU usage and mock implementations for testing.

use crate::gpu_types::*;
use wgpu::{BufferDescriptor, TextureDescriptor};

/// Value of a named shader uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    /// Column-major 4x4 matrix.
    Mat4([[f32; 4]; 4]),
    /// Array of integers, e.g. the sampler unit list.
    IntArray(Vec<i32>),
}

/// Descriptor for compiling a shader program.
#[derive(Debug, Clone)]
pub struct ShaderDescriptor<'a> {
    pub label: Option<&'a str>,
    /// WGSL source with `vs_main` and `fs_main` entry points.
    pub source: &'a str,
    /// Layout of the single vertex buffer the program reads.
    pub vertex_layout: wgpu::VertexBufferLayout<'a>,
    /// Format of the color target the program renders into.
    pub target_format: wgpu::TextureFormat,
}

/// Trait abstracting GPU resource creation and operations.
///
/// # Lifetime Considerations
///
/// This trait does NOT use lifetimes because:
/// 1. All returned types are owned (not borrowed from Device)
/// 2. GPU resources use reference counting internally
/// 3. Resources live until dropped or explicitly destroyed
///
/// This makes the trait object-safe and easy to mock.
///
/// # Binding Model
///
/// The context keeps a small amount of binding state between calls, like a
/// classic immediate-mode graphics API: the current shader, the texture bound
/// to each sampler unit, and the uniform values of each shader. A
/// [`draw_indexed`](RenderContext::draw_indexed) consumes that state.
///
/// # Example
///
/// ```rust,no_run
/// use sprig_test_utils::RenderContext;
/// use wgpu::{BufferDescriptor, BufferUsages};
///
/// fn upload(ctx: &dyn RenderContext, data: &[u8]) {
///     let buffer = ctx.create_buffer(&BufferDescriptor {
///         label: None,
///         size: data.len() as u64,
///         usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
///         mapped_at_creation: false,
///     });
///     ctx.write_buffer(&buffer, 0, data);
///     ctx.destroy_buffer(&buffer);
/// }
/// ```
pub trait RenderContext: Send + Sync {
    // Limits

    /// Largest buffer, in bytes, that [`create_buffer`](RenderContext::create_buffer)
    /// accepts.
    fn max_buffer_size(&self) -> u64;

    // Buffer operations

    /// Create a GPU buffer. Contents are uninitialized until written.
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer;

    /// Write data to a buffer starting at `offset` bytes.
    ///
    /// Writing less than the whole buffer is a partial update; the rest of
    /// the buffer keeps its contents.
    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]);

    /// Release a buffer's GPU memory. The handle must not be used afterwards.
    fn destroy_buffer(&self, buffer: &GpuBuffer);

    // Texture operations

    /// Create a GPU texture.
    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture;

    /// Bind a texture to a sampler unit for subsequent draws.
    fn bind_texture(&self, unit: u32, texture: &GpuTexture);

    // Shader operations

    /// Compile a shader program for the given vertex layout and target.
    fn create_shader(&self, desc: &ShaderDescriptor) -> GpuShader;

    /// Make `shader` the current program.
    fn use_shader(&self, shader: &GpuShader);

    /// Set a named uniform of `shader`.
    fn set_uniform(&self, shader: &GpuShader, name: &str, value: UniformValue);

    // Vertex arrays and drawing

    /// Bind a vertex buffer and an index buffer together.
    fn create_vertex_array(
        &self,
        vertices: &GpuBuffer,
        indices: &GpuBuffer,
        stride: u64,
    ) -> GpuVertexArray;

    /// Release a vertex array. The buffers it references are not destroyed.
    fn destroy_vertex_array(&self, array: &GpuVertexArray);

    /// Draw `index_count` indices (triangle list) starting at index 0.
    fn draw_indexed(&self, shader: &GpuShader, array: &GpuVertexArray, index_count: u32);
}
