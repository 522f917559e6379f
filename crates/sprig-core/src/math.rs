/// Vector and matrix math, re-exported from [`glam`].
///
/// Sprite positions, origins and scales are [`Vec2`]; camera inputs to the
/// sprite batch are [`Mat4`].
///
/// ```
/// use sprig_core::math::{Mat4, Vec2};
///
/// let anchor = Vec2::new(10.0, 10.0) - Vec2::new(4.0, 4.0) * Vec2::splat(2.0);
/// assert_eq!(anchor, Vec2::new(2.0, 2.0));
///
/// let projection = Mat4::orthographic_rh(0.0, 800.0, 0.0, 600.0, -1.0, 1.0);
/// assert_ne!(projection, Mat4::IDENTITY);
/// ```
///
/// [`glam`]: https://docs.rs/glam
pub mod fast {
    pub use glam::*;
}

pub use fast::*;

/// Convert a [`Mat4`] into the column-major nested array layout WGSL expects.
#[inline]
pub fn mat4_to_cols(mat: Mat4) -> [[f32; 4]; 4] {
    mat.to_cols_array_2d()
}
