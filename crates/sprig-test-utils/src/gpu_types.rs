//! GPU resource wrappers that can be real or mock.
//!
//! These types wrap wgpu resources and allow for both real GPU operations
//! and mock implementations for testing.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identity of a texture handle.
///
/// Assigned when a texture is wrapped. Clones of a [`GpuTexture`] share the
/// id; wrapping the same image twice yields two ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u64);

impl TextureId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "texture#{}", self.0)
    }
}

/// Process-unique identity of a shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(u64);

impl ShaderId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Wrapper around GPU buffer that can be real or mock.
///
/// # Design Pattern: Opaque Wrapper
///
/// This type hides whether it contains a real `wgpu::Buffer` or a mock.
/// Users hold owned `GpuBuffer`, which is cheap to clone.
#[derive(Clone, Debug)]
pub struct GpuBuffer {
    inner: GpuBufferInner,
}

#[derive(Clone, Debug)]
enum GpuBufferInner {
    Real(wgpu::Buffer),
    #[cfg(feature = "mock")]
    Mock { id: usize, size: u64 },
}

impl GpuBuffer {
    /// Create from real WGPU buffer
    pub fn from_wgpu(buffer: wgpu::Buffer) -> Self {
        Self {
            inner: GpuBufferInner::Real(buffer),
        }
    }

    /// Create mock buffer (for testing)
    #[cfg(feature = "mock")]
    pub fn mock(id: usize, size: u64) -> Self {
        Self {
            inner: GpuBufferInner::Mock { id, size },
        }
    }

    /// Allocated size in bytes.
    pub fn size(&self) -> u64 {
        match &self.inner {
            GpuBufferInner::Real(buffer) => buffer.size(),
            #[cfg(feature = "mock")]
            GpuBufferInner::Mock { size, .. } => *size,
        }
    }

    /// Get the underlying wgpu::Buffer (if real)
    ///
    /// # Panics
    /// Panics if this is a mock buffer (test code should never call this)
    pub fn as_wgpu(&self) -> &wgpu::Buffer {
        match &self.inner {
            GpuBufferInner::Real(buffer) => buffer,
            #[cfg(feature = "mock")]
            GpuBufferInner::Mock { .. } => {
                panic!("Attempted to get wgpu::Buffer from mock buffer - this is a test-only buffer")
            }
        }
    }

    /// Check if this is a mock (useful in tests)
    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuBufferInner::Mock { .. })
    }

    /// Get mock ID (for test assertions)
    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuBufferInner::Mock { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Wrapper around a GPU texture that can be real or mock.
///
/// Equality is handle identity: two `GpuTexture`s are equal when they share
/// a [`TextureId`], regardless of the pixels behind them.
#[derive(Clone, Debug)]
pub struct GpuTexture {
    id: TextureId,
    width: u32,
    height: u32,
    label: Option<Arc<str>>,
    inner: GpuTextureInner,
}

#[derive(Clone, Debug)]
enum GpuTextureInner {
    Real {
        texture: wgpu::Texture,
        view: wgpu::TextureView,
    },
    #[cfg(feature = "mock")]
    Mock,
}

impl GpuTexture {
    /// Wrap a real WGPU texture, creating its default view.
    pub fn from_wgpu(texture: wgpu::Texture, label: Option<&str>) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            id: TextureId::next(),
            width: texture.width(),
            height: texture.height(),
            label: label.map(Arc::from),
            inner: GpuTextureInner::Real { texture, view },
        }
    }

    /// Create mock texture (for testing)
    #[cfg(feature = "mock")]
    pub fn mock(width: u32, height: u32) -> Self {
        Self {
            id: TextureId::next(),
            width,
            height,
            label: None,
            inner: GpuTextureInner::Mock,
        }
    }

    /// Create a labelled mock texture (for testing)
    #[cfg(feature = "mock")]
    pub fn mock_labeled(label: &str, width: u32, height: u32) -> Self {
        Self {
            label: Some(Arc::from(label)),
            ..Self::mock(width, height)
        }
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Get the underlying wgpu::Texture (if real)
    ///
    /// # Panics
    /// Panics if this is a mock texture
    pub fn as_wgpu(&self) -> &wgpu::Texture {
        match &self.inner {
            GpuTextureInner::Real { texture, .. } => texture,
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock => panic!("Attempted to get wgpu::Texture from mock texture"),
        }
    }

    /// Get the default view of the texture (if real)
    ///
    /// # Panics
    /// Panics if this is a mock texture
    pub fn view(&self) -> &wgpu::TextureView {
        match &self.inner {
            GpuTextureInner::Real { view, .. } => view,
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock => panic!("Attempted to get wgpu::TextureView from mock texture"),
        }
    }

    /// Check if this is a mock
    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuTextureInner::Mock)
    }
}

impl PartialEq for GpuTexture {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GpuTexture {}

/// A compiled sprite program: pipeline plus the bind group layouts the
/// context needs to feed it.
#[derive(Clone, Debug)]
pub struct GpuShader {
    id: ShaderId,
    inner: GpuShaderInner,
}

#[derive(Clone, Debug)]
enum GpuShaderInner {
    Real(Arc<ShaderProgram>),
    #[cfg(feature = "mock")]
    Mock,
}

/// The wgpu objects making up a [`GpuShader`].
#[derive(Debug)]
pub struct ShaderProgram {
    pub pipeline: wgpu::RenderPipeline,
    /// Group 0: uniform block and sampler.
    pub uniform_layout: wgpu::BindGroupLayout,
    /// Group 1: one binding per texture unit.
    pub texture_layout: wgpu::BindGroupLayout,
}

impl GpuShader {
    pub fn from_program(program: ShaderProgram) -> Self {
        Self {
            id: ShaderId::next(),
            inner: GpuShaderInner::Real(Arc::new(program)),
        }
    }

    /// Create mock shader (for testing)
    #[cfg(feature = "mock")]
    pub fn mock() -> Self {
        Self {
            id: ShaderId::next(),
            inner: GpuShaderInner::Mock,
        }
    }

    pub fn id(&self) -> ShaderId {
        self.id
    }

    /// Get the wgpu program (if real)
    ///
    /// # Panics
    /// Panics if this is a mock shader
    pub fn program(&self) -> &ShaderProgram {
        match &self.inner {
            GpuShaderInner::Real(program) => program,
            #[cfg(feature = "mock")]
            GpuShaderInner::Mock => panic!("Attempted to get shader program from mock shader"),
        }
    }

    /// Check if this is a mock
    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuShaderInner::Mock)
    }
}

impl PartialEq for GpuShader {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GpuShader {}

/// Vertex-array object: a vertex buffer, an index buffer and the vertex
/// stride bound together for indexed drawing.
#[derive(Clone, Debug)]
pub struct GpuVertexArray {
    inner: GpuVertexArrayInner,
}

#[derive(Clone, Debug)]
enum GpuVertexArrayInner {
    Real {
        vertices: wgpu::Buffer,
        indices: wgpu::Buffer,
        stride: u64,
    },
    #[cfg(feature = "mock")]
    Mock { id: usize },
}

impl GpuVertexArray {
    pub fn from_wgpu(vertices: wgpu::Buffer, indices: wgpu::Buffer, stride: u64) -> Self {
        Self {
            inner: GpuVertexArrayInner::Real {
                vertices,
                indices,
                stride,
            },
        }
    }

    /// Create mock vertex array (for testing)
    #[cfg(feature = "mock")]
    pub fn mock(id: usize) -> Self {
        Self {
            inner: GpuVertexArrayInner::Mock { id },
        }
    }

    /// Get the bound (vertex, index) wgpu buffers and vertex stride (if real)
    ///
    /// # Panics
    /// Panics if this is a mock vertex array
    pub fn as_wgpu(&self) -> (&wgpu::Buffer, &wgpu::Buffer, u64) {
        match &self.inner {
            GpuVertexArrayInner::Real {
                vertices,
                indices,
                stride,
            } => (vertices, indices, *stride),
            #[cfg(feature = "mock")]
            GpuVertexArrayInner::Mock { .. } => {
                panic!("Attempted to get wgpu buffers from mock vertex array")
            }
        }
    }

    /// Check if this is a mock
    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuVertexArrayInner::Mock { .. })
    }

    /// Get mock ID (for test assertions)
    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuVertexArrayInner::Mock { id } => Some(*id),
            _ => None,
        }
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;

    #[test]
    fn test_texture_identity() {
        let a = GpuTexture::mock(32, 32);
        let b = GpuTexture::mock(32, 32);

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_texture_dimensions_and_label() {
        let tex = GpuTexture::mock_labeled("atlas.png", 256, 128);
        assert_eq!(tex.width(), 256);
        assert_eq!(tex.height(), 128);
        assert_eq!(tex.label(), Some("atlas.png"));
        assert!(tex.is_mock());
    }

    #[test]
    fn test_shader_identity() {
        let shader = GpuShader::mock();
        assert_eq!(shader, shader.clone());
        assert_ne!(shader, GpuShader::mock());
    }

    #[test]
    fn test_buffer_size() {
        let buffer = GpuBuffer::mock(3, 4096);
        assert_eq!(buffer.size(), 4096);
        assert_eq!(buffer.mock_id(), Some(3));
    }
}
