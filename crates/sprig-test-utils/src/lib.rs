//! GPU abstraction and test utilities for Sprig.
//!
//! The sprite batch never talks to wgpu directly. It drives a
//! [`RenderContext`], which is implemented by the real graphics context in
//! `sprig-render` and by `MockRenderContext` here (requires the `mock`
//! feature).
//!
//! # Overview
//!
//! - [`RenderContext`] - Trait abstracting the GPU operations the batch needs
//! - `MockRenderContext` - Records every call for test assertions
//! - GPU wrapper types ([`GpuBuffer`], [`GpuTexture`], [`GpuShader`],
//!   [`GpuVertexArray`]) - Can be real or mock
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use sprig_test_utils::{MockRenderContext, RenderContext};
//! use wgpu::*;
//!
//! let mock = MockRenderContext::new();
//!
//! let buffer = mock.create_buffer(&BufferDescriptor {
//!     label: Some("test_buffer"),
//!     size: 1024,
//!     usage: BufferUsages::VERTEX,
//!     mapped_at_creation: false,
//! });
//!
//! assert_eq!(mock.count_buffer_creates(), 1);
//! assert!(buffer.is_mock());
//! # }
//! ```
//!
//! # Design
//!
//! All GPU wrapper types are owned and cheap to clone, so no lifetimes leak
//! into the batch. The mock uses `parking_lot::Mutex` for interior
//! mutability so every trait method can take `&self`, which keeps
//! `RenderContext` object-safe and shareable behind an `Arc`.

pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_render;
pub mod render_context;

pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_render::*;
pub use render_context::*;
