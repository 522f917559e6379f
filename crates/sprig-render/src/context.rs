use std::fmt;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use parking_lot::Mutex;
use sprig_core::alloc::HashMap;
use sprig_test_utils::{GpuTexture, ShaderId};

use crate::MAX_TEXTURES;

/// Errors raised while setting up the GPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// No adapter matched the requested backends and power preference.
    NoAdapter,
    /// The adapter refused to create a device.
    DeviceCreationFailed(String),
    /// Pixel data does not match the texture dimensions.
    TextureDataSize { expected: usize, actual: usize },
    /// A texture dimension is zero or above the device's 2D texture limit.
    InvalidTextureSize { width: u32, height: u32, max: u32 },
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAdapter => write!(f, "No suitable GPU adapter found"),
            Self::DeviceCreationFailed(msg) => write!(f, "Failed to create GPU device: {}", msg),
            Self::TextureDataSize { expected, actual } => write!(
                f,
                "Texture data is {} bytes, expected {} bytes",
                actual, expected
            ),
            Self::InvalidTextureSize { width, height, max } => write!(
                f,
                "Texture size {}x{} is invalid, each side must be between 1 and {}",
                width, height, max
            ),
        }
    }
}

impl std::error::Error for GraphicsError {}

/// Uniform block of the sprite program, laid out as in the WGSL source.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct UniformBlock {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

/// Uniform values set on one shader.
#[derive(Debug, Clone)]
pub(crate) struct ShaderUniforms {
    pub block: UniformBlock,
    /// Texture units the shader samples this draw
    pub textures: Vec<i32>,
}

impl Default for ShaderUniforms {
    fn default() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            block: UniformBlock {
                projection: identity,
                view: identity,
                model: identity,
            },
            textures: Vec::new(),
        }
    }
}

/// Binding state carried between `RenderContext` calls.
pub(crate) struct BindingState {
    pub current_shader: Option<ShaderId>,
    pub target: Option<wgpu::TextureView>,
    pub units: [Option<GpuTexture>; MAX_TEXTURES],
    pub uniforms: HashMap<ShaderId, ShaderUniforms>,
}

impl BindingState {
    fn new() -> Self {
        Self {
            current_shader: None,
            target: None,
            units: Default::default(),
            uniforms: HashMap::new(),
        }
    }
}

/// A shared graphics context.
///
/// Besides the wgpu device it holds the binding state behind the
/// [`RenderContext`](sprig_test_utils::RenderContext) implementation: the
/// render target, the texture bound to each unit and the uniforms of each
/// shader.
///
/// # Ownership Pattern
///
/// ```rust,no_run
/// use sprig_render::GraphicsContext;
///
/// let ctx = GraphicsContext::new_owned_sync().expect("no GPU"); // Arc<Self>
/// let ctx2 = ctx.clone(); // Cheap clone (Arc)
/// ```
pub struct GraphicsContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub(crate) sampler: wgpu::Sampler,
    /// 1x1 white texture backing unbound units
    pub(crate) fallback_view: wgpu::TextureView,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) state: Mutex<BindingState>,
}

impl GraphicsContext {
    /// Creates a new graphics context with default settings.
    pub async fn new_owned() -> Result<Arc<Self>, GraphicsError> {
        Self::new_owned_with_descriptor(GraphicsContextDescriptor::default()).await
    }

    /// Creates a new graphics context synchronously.
    ///
    /// This blocks the current thread until the context is created.
    pub fn new_owned_sync() -> Result<Arc<Self>, GraphicsError> {
        pollster::block_on(Self::new_owned())
    }

    /// Creates a new graphics context with a custom descriptor.
    pub async fn new_owned_with_descriptor(
        descriptor: GraphicsContextDescriptor,
    ) -> Result<Arc<Self>, GraphicsError> {
        let context = Self::create_context_internal(descriptor).await?;
        Ok(Arc::new(context))
    }

    async fn create_context_internal(
        descriptor: GraphicsContextDescriptor,
    ) -> Result<Self, GraphicsError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: descriptor.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: descriptor.power_preference,
                compatible_surface: None,
                force_fallback_adapter: descriptor.force_fallback_adapter,
            })
            .await
            .map_err(|_| GraphicsError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: descriptor.label,
                ..Default::default()
            })
            .await
            .map_err(|e| GraphicsError::DeviceCreationFailed(e.to_string()))?;

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Sprite Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Uniform Buffer"),
            size: std::mem::size_of::<UniformBlock>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let fallback = device.create_texture(&rgba8_texture_descriptor(Some("Fallback Texture"), 1, 1));
        write_rgba8(&queue, &fallback, 1, 1, &[255, 255, 255, 255]);
        let fallback_view = fallback.create_view(&wgpu::TextureViewDescriptor::default());

        tracing::info!("Created graphics context on {}", adapter.get_info().name);

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            sampler,
            fallback_view,
            uniform_buffer,
            state: Mutex::new(BindingState::new()),
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Get device info
    pub fn info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Get device limits
    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }

    /// Set the view that subsequent draws render into.
    ///
    /// Draws load the existing contents of the target and never clear it.
    /// With no target set, draws are skipped.
    pub fn set_render_target(&self, target: Option<wgpu::TextureView>) {
        self.state.lock().target = target;
    }

    /// Whether a render target is set.
    pub fn has_render_target(&self) -> bool {
        self.state.lock().target.is_some()
    }

    /// Create a sampled texture from tightly packed RGBA8 pixels.
    ///
    /// Rows are read in order: the first `width * 4` bytes become texel row
    /// `y = 0`. Sprite texture rects measure `y` upwards from that row, so
    /// `pixels` is bottom row first. Images stored top row first (PNG and
    /// most decoders) must have their rows reversed before upload or they
    /// render upside down.
    ///
    /// Fails if either side is zero or larger than
    /// `limits().max_texture_dimension_2d`, or if `pixels` is not exactly
    /// `width * height * 4` bytes.
    pub fn create_texture_rgba8(
        &self,
        label: Option<&str>,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<GpuTexture, GraphicsError> {
        check_texture_size(width, height, self.device.limits().max_texture_dimension_2d)?;

        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(GraphicsError::TextureDataSize {
                expected,
                actual: pixels.len(),
            });
        }

        let texture = self
            .device
            .create_texture(&rgba8_texture_descriptor(label, width, height));
        write_rgba8(&self.queue, &texture, width, height, pixels);

        tracing::debug!("Created {}x{} texture {:?}", width, height, label);
        Ok(GpuTexture::from_wgpu(texture, label))
    }

    /// Create a texture usable as a render target and copy source.
    pub fn create_render_target(
        &self,
        label: Option<&str>,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> wgpu::Texture {
        self.device.create_texture(&wgpu::TextureDescriptor {
            label,
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    /// Clear `view` to `color` in a separate pass.
    pub fn clear(&self, view: &wgpu::TextureView, color: wgpu::Color) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Clear Encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.queue.submit(Some(encoder.finish()));
    }
}

/// Reject sides that are zero or larger than `max`, which wgpu would panic on.
fn check_texture_size(width: u32, height: u32, max: u32) -> Result<(), GraphicsError> {
    if width == 0 || height == 0 || width > max || height > max {
        return Err(GraphicsError::InvalidTextureSize { width, height, max });
    }
    Ok(())
}

fn rgba8_texture_descriptor(label: Option<&str>, width: u32, height: u32) -> wgpu::TextureDescriptor<'_> {
    wgpu::TextureDescriptor {
        label,
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    }
}

fn write_rgba8(queue: &wgpu::Queue, texture: &wgpu::Texture, width: u32, height: u32, pixels: &[u8]) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

/// Descriptor for configuring graphics context creation.
#[derive(Debug, Clone)]
pub struct GraphicsContextDescriptor {
    /// GPU backends to use
    pub backends: wgpu::Backends,
    /// Power preference for adapter selection
    pub power_preference: wgpu::PowerPreference,
    /// Whether to force fallback adapter
    pub force_fallback_adapter: bool,
    /// Optional label for debugging
    pub label: Option<&'static str>,
}

impl Default for GraphicsContextDescriptor {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            label: None,
        }
    }
}

impl GraphicsContextDescriptor {
    /// Create a new descriptor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the power preference.
    pub fn power_preference(mut self, preference: wgpu::PowerPreference) -> Self {
        self.power_preference = preference;
        self
    }

    /// Set the backends to use.
    pub fn backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }

    /// Use the software fallback adapter.
    pub fn force_fallback_adapter(mut self, force: bool) -> Self {
        self.force_fallback_adapter = force;
        self
    }

    /// Set the debug label.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_block_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<UniformBlock>(), 3 * 64);
    }

    #[test]
    fn test_default_uniforms_are_identity() {
        let uniforms = ShaderUniforms::default();
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        assert_eq!(uniforms.block.projection, identity);
        assert_eq!(uniforms.block.view, identity);
        assert_eq!(uniforms.block.model, identity);
        assert!(uniforms.textures.is_empty());
    }

    #[test]
    fn test_descriptor_builder() {
        let desc = GraphicsContextDescriptor::new()
            .backends(wgpu::Backends::VULKAN)
            .power_preference(wgpu::PowerPreference::LowPower)
            .force_fallback_adapter(true)
            .label("test");

        assert_eq!(desc.backends, wgpu::Backends::VULKAN);
        assert_eq!(desc.power_preference, wgpu::PowerPreference::LowPower);
        assert!(desc.force_fallback_adapter);
        assert_eq!(desc.label, Some("test"));
    }

    #[test]
    fn test_texture_size_must_fit_device() {
        assert_eq!(check_texture_size(1, 1, 8192), Ok(()));
        assert_eq!(check_texture_size(8192, 8192, 8192), Ok(()));

        for (width, height) in [(0, 0), (0, 16), (16, 0), (8193, 1), (1, 8193)] {
            assert_eq!(
                check_texture_size(width, height, 8192),
                Err(GraphicsError::InvalidTextureSize {
                    width,
                    height,
                    max: 8192
                })
            );
        }
    }

    #[test]
    fn test_graphics_error_display() {
        assert_eq!(
            GraphicsError::NoAdapter.to_string(),
            "No suitable GPU adapter found"
        );
        let err = GraphicsError::TextureDataSize {
            expected: 16,
            actual: 4,
        };
        assert!(err.to_string().contains("expected 16"));
        let err = GraphicsError::InvalidTextureSize {
            width: 0,
            height: 4,
            max: 8192,
        };
        assert_eq!(
            err.to_string(),
            "Texture size 0x4 is invalid, each side must be between 1 and 8192"
        );
    }
}
