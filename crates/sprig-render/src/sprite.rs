//! Sprite draw requests.
//!
//! A [`Sprite`] describes one textured rectangle: which region of which
//! texture, where it goes, and how it is tinted. It borrows its texture
//! through a cloned [`GpuTexture`] handle and never owns the GPU resource.

use glam::Vec2;
use sprig_core::geometry::{FloatRect, IntRect};
use sprig_test_utils::GpuTexture;

use crate::Color;

/// A textured, tinted rectangle ready to be submitted to a
/// [`SpriteBatch`](crate::SpriteBatch).
///
/// The destination rectangle is derived from the texture region:
/// its size is `|texture_rect| * scale`, and `origin` (in local, unscaled
/// units) is the point of the sprite placed at `position`.
///
/// # Example
///
/// ```ignore
/// let sprite = Sprite::new(atlas.clone())
///     .with_texture_rect(IntRect::new(32, 0, 32, 32))
///     .with_position(Vec2::new(100.0, 50.0))
///     .with_origin(Vec2::new(16.0, 16.0))
///     .with_scale(Vec2::splat(2.0));
///
/// batch.draw(&sprite, 1, 0);
/// ```
#[derive(Debug, Clone)]
pub struct Sprite {
    texture: GpuTexture,
    texture_rect: IntRect,
    position: Vec2,
    origin: Vec2,
    scale: Vec2,
    color: Color,
}

impl Sprite {
    /// Create a sprite showing the whole texture, untinted, at the origin.
    pub fn new(texture: GpuTexture) -> Self {
        let texture_rect = IntRect::from_size(texture.width() as i32, texture.height() as i32);
        Self {
            texture,
            texture_rect,
            position: Vec2::ZERO,
            origin: Vec2::ZERO,
            scale: Vec2::ONE,
            color: Color::WHITE,
        }
    }

    pub fn with_texture_rect(mut self, rect: IntRect) -> Self {
        self.texture_rect = rect;
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn texture(&self) -> &GpuTexture {
        &self.texture
    }

    /// Swap the texture. The texture rect is reset to cover the new texture
    /// when `reset_rect` is true.
    pub fn set_texture(&mut self, texture: GpuTexture, reset_rect: bool) {
        if reset_rect {
            self.texture_rect =
                IntRect::from_size(texture.width() as i32, texture.height() as i32);
        }
        self.texture = texture;
    }

    pub fn texture_rect(&self) -> IntRect {
        self.texture_rect
    }

    pub fn set_texture_rect(&mut self, rect: IntRect) {
        self.texture_rect = rect;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Move the sprite by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Mirror the sprite left-to-right by flipping the texture rect.
    pub fn flip_horizontal(&mut self) {
        self.texture_rect = self.texture_rect.flipped_horizontal();
    }

    /// Mirror the sprite top-to-bottom by flipping the texture rect.
    pub fn flip_vertical(&mut self) {
        self.texture_rect = self.texture_rect.flipped_vertical();
    }

    /// Size of the sprite on screen: `|texture_rect| * scale`.
    pub fn size(&self) -> Vec2 {
        Vec2::new(
            self.texture_rect.width.unsigned_abs() as f32,
            self.texture_rect.height.unsigned_abs() as f32,
        ) * self.scale
    }

    /// Bottom-left corner of the destination rectangle.
    pub fn anchor(&self) -> Vec2 {
        self.position - self.origin * self.scale
    }

    /// Unscaled rectangle relative to the origin, before positioning.
    pub fn local_bounds(&self) -> FloatRect {
        let width = self.texture_rect.width.unsigned_abs() as f32;
        let height = self.texture_rect.height.unsigned_abs() as f32;
        FloatRect::new(-self.origin.x, -self.origin.y, width, height)
    }

    /// Destination rectangle in world units.
    pub fn bounds(&self) -> FloatRect {
        let anchor = self.anchor();
        let size = self.size();
        FloatRect::new(anchor.x, anchor.y, size.x, size.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_covers_whole_texture() {
        let sprite = Sprite::new(GpuTexture::mock(64, 32));
        assert_eq!(sprite.texture_rect(), IntRect::new(0, 0, 64, 32));
        assert_eq!(sprite.size(), Vec2::new(64.0, 32.0));
        assert_eq!(sprite.color(), Color::WHITE);
    }

    #[test]
    fn test_anchor_applies_scaled_origin() {
        let sprite = Sprite::new(GpuTexture::mock(16, 16))
            .with_position(Vec2::new(10.0, 10.0))
            .with_origin(Vec2::new(8.0, 8.0))
            .with_scale(Vec2::new(2.0, 0.5));

        assert_eq!(sprite.anchor(), Vec2::new(-6.0, 6.0));
        assert_eq!(sprite.bounds(), FloatRect::new(-6.0, 6.0, 32.0, 8.0));
    }

    #[test]
    fn test_local_bounds_ignores_position_and_scale() {
        let sprite = Sprite::new(GpuTexture::mock(16, 8))
            .with_position(Vec2::new(100.0, 100.0))
            .with_origin(Vec2::new(8.0, 4.0))
            .with_scale(Vec2::splat(3.0));

        assert_eq!(sprite.local_bounds(), FloatRect::new(-8.0, -4.0, 16.0, 8.0));
    }

    #[test]
    fn test_flip_keeps_size() {
        let mut sprite = Sprite::new(GpuTexture::mock(16, 8));
        sprite.flip_horizontal();
        sprite.flip_vertical();

        assert_eq!(sprite.texture_rect(), IntRect::new(16, 8, -16, -8));
        assert_eq!(sprite.size(), Vec2::new(16.0, 8.0));
    }

    #[test]
    fn test_set_texture_resets_rect() {
        let mut sprite =
            Sprite::new(GpuTexture::mock(16, 16)).with_texture_rect(IntRect::new(4, 4, 4, 4));

        sprite.set_texture(GpuTexture::mock(32, 64), false);
        assert_eq!(sprite.texture_rect(), IntRect::new(4, 4, 4, 4));

        sprite.set_texture(GpuTexture::mock(32, 64), true);
        assert_eq!(sprite.texture_rect(), IntRect::new(0, 0, 32, 64));
    }
}
