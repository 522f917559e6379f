//! Mock implementation of RenderContext for testing.
//!
//! This module provides a mock GPU context that records operations
//! without actually interacting with the GPU.

use crate::{gpu_types::*, render_context::*};
use parking_lot::Mutex;
use wgpu::*;

/// Records a GPU operation call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    CreateBuffer {
        buffer_id: usize,
        size: u64,
        usage: BufferUsages,
    },
    WriteBuffer {
        buffer_id: usize,
        offset: u64,
        data: Vec<u8>,
    },
    DestroyBuffer {
        buffer_id: usize,
    },
    CreateTexture {
        texture: TextureId,
        width: u32,
        height: u32,
        format: TextureFormat,
    },
    BindTexture {
        unit: u32,
        texture: TextureId,
    },
    CreateShader {
        shader: ShaderId,
        label: Option<String>,
    },
    UseShader {
        shader: ShaderId,
    },
    SetUniform {
        shader: ShaderId,
        name: String,
        value: UniformValue,
    },
    CreateVertexArray {
        array_id: usize,
        vertex_buffer_id: Option<usize>,
        index_buffer_id: Option<usize>,
        stride: u64,
    },
    DestroyVertexArray {
        array_id: usize,
    },
    DrawIndexed {
        shader: ShaderId,
        array_id: Option<usize>,
        index_count: u32,
    },
}

/// Mock implementation of RenderContext for testing.
///
/// # Borrow Checking Pattern: Interior Mutability
///
/// Methods take `&self` but need to mutate internal state (record calls).
/// `parking_lot::Mutex` is `Send + Sync`, which the trait requires.
///
/// # Example
///
/// ```rust
/// use sprig_test_utils::{MockRenderContext, RenderContext};
/// use wgpu::*;
///
/// let mock = MockRenderContext::new();
///
/// let buffer = mock.create_buffer(&BufferDescriptor {
///     label: None,
///     size: 1024,
///     usage: BufferUsages::VERTEX,
///     mapped_at_creation: false,
/// });
/// mock.write_buffer(&buffer, 0, &[1, 2, 3, 4]);
///
/// assert!(buffer.is_mock());
/// assert_eq!(mock.last_write_to(&buffer), Some(vec![1, 2, 3, 4]));
/// ```
pub struct MockRenderContext {
    /// Recorded calls for verification
    calls: Mutex<Vec<RenderCall>>,

    /// Counters for generating IDs
    next_buffer_id: Mutex<usize>,
    next_array_id: Mutex<usize>,

    /// Reported by `max_buffer_size`; unlimited unless set
    max_buffer_size: u64,
}

impl MockRenderContext {
    /// Create a new mock render context.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_buffer_id: Mutex::new(0),
            next_array_id: Mutex::new(0),
            max_buffer_size: u64::MAX,
        }
    }

    /// Report `bytes` as the device's buffer size limit.
    pub fn with_max_buffer_size(mut self, bytes: u64) -> Self {
        self.max_buffer_size = bytes;
        self
    }

    fn record(&self, call: RenderCall) {
        self.calls.lock().push(call);
    }

    fn count(&self, pred: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| pred(*call)).count()
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    /// Count buffer creates.
    pub fn count_buffer_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateBuffer { .. }))
    }

    /// Count buffer write operations.
    pub fn count_buffer_writes(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::WriteBuffer { .. }))
    }

    /// Count writes that targeted `buffer`.
    pub fn count_writes_to(&self, buffer: &GpuBuffer) -> usize {
        let id = buffer.mock_id();
        self.count(|call| matches!(call, RenderCall::WriteBuffer { buffer_id, .. } if Some(*buffer_id) == id))
    }

    /// Bytes of the most recent write to `buffer`.
    pub fn last_write_to(&self, buffer: &GpuBuffer) -> Option<Vec<u8>> {
        let id = buffer.mock_id()?;
        self.calls.lock().iter().rev().find_map(|call| match call {
            RenderCall::WriteBuffer { buffer_id, data, .. } if *buffer_id == id => {
                Some(data.clone())
            }
            _ => None,
        })
    }

    /// Count indexed draw calls.
    pub fn count_draw_calls(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::DrawIndexed { .. }))
    }

    /// Index count of the most recent draw call.
    pub fn last_draw_index_count(&self) -> Option<u32> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            RenderCall::DrawIndexed { index_count, .. } => Some(*index_count),
            _ => None,
        })
    }

    /// Every (unit, texture) bind in call order.
    pub fn bound_textures(&self) -> Vec<(u32, TextureId)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::BindTexture { unit, texture } => Some((*unit, *texture)),
                _ => None,
            })
            .collect()
    }

    /// Most recent value set for the uniform `name`, on any shader.
    pub fn last_uniform(&self, name: &str) -> Option<UniformValue> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            RenderCall::SetUniform {
                name: uniform,
                value,
                ..
            } if uniform == name => Some(value.clone()),
            _ => None,
        })
    }

    /// Count buffer and vertex array destroys.
    pub fn count_destroys(&self) -> usize {
        self.count(|call| {
            matches!(
                call,
                RenderCall::DestroyBuffer { .. } | RenderCall::DestroyVertexArray { .. }
            )
        })
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for MockRenderContext {
    fn max_buffer_size(&self) -> u64 {
        self.max_buffer_size
    }

    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        let mut next = self.next_buffer_id.lock();
        let buffer_id = *next;
        *next += 1;

        self.record(RenderCall::CreateBuffer {
            buffer_id,
            size: desc.size,
            usage: desc.usage,
        });

        GpuBuffer::mock(buffer_id, desc.size)
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        if let Some(buffer_id) = buffer.mock_id() {
            self.record(RenderCall::WriteBuffer {
                buffer_id,
                offset,
                data: data.to_vec(),
            });
        }
    }

    fn destroy_buffer(&self, buffer: &GpuBuffer) {
        if let Some(buffer_id) = buffer.mock_id() {
            self.record(RenderCall::DestroyBuffer { buffer_id });
        }
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        let texture = match desc.label {
            Some(label) => GpuTexture::mock_labeled(label, desc.size.width, desc.size.height),
            None => GpuTexture::mock(desc.size.width, desc.size.height),
        };

        self.record(RenderCall::CreateTexture {
            texture: texture.id(),
            width: desc.size.width,
            height: desc.size.height,
            format: desc.format,
        });

        texture
    }

    fn bind_texture(&self, unit: u32, texture: &GpuTexture) {
        self.record(RenderCall::BindTexture {
            unit,
            texture: texture.id(),
        });
    }

    fn create_shader(&self, desc: &ShaderDescriptor) -> GpuShader {
        let shader = GpuShader::mock();

        self.record(RenderCall::CreateShader {
            shader: shader.id(),
            label: desc.label.map(|s| s.to_string()),
        });

        shader
    }

    fn use_shader(&self, shader: &GpuShader) {
        self.record(RenderCall::UseShader {
            shader: shader.id(),
        });
    }

    fn set_uniform(&self, shader: &GpuShader, name: &str, value: UniformValue) {
        self.record(RenderCall::SetUniform {
            shader: shader.id(),
            name: name.to_string(),
            value,
        });
    }

    fn create_vertex_array(
        &self,
        vertices: &GpuBuffer,
        indices: &GpuBuffer,
        stride: u64,
    ) -> GpuVertexArray {
        let mut next = self.next_array_id.lock();
        let array_id = *next;
        *next += 1;

        self.record(RenderCall::CreateVertexArray {
            array_id,
            vertex_buffer_id: vertices.mock_id(),
            index_buffer_id: indices.mock_id(),
            stride,
        });

        GpuVertexArray::mock(array_id)
    }

    fn destroy_vertex_array(&self, array: &GpuVertexArray) {
        if let Some(array_id) = array.mock_id() {
            self.record(RenderCall::DestroyVertexArray { array_id });
        }
    }

    fn draw_indexed(&self, shader: &GpuShader, array: &GpuVertexArray, index_count: u32) {
        self.record(RenderCall::DrawIndexed {
            shader: shader.id(),
            array_id: array.mock_id(),
            index_count,
        });
    }
}
