//! Sprite to quad conversion.

use glam::Vec2;
use sprig_core::geometry::{FloatRect, IntRect};
use sprig_test_utils::GpuTexture;

use super::vertex::Vertex;
use crate::Sprite;

/// Texels shaved off each edge of a texture rect before sampling, so linear
/// filtering never reaches into the neighbouring atlas cell.
pub const TEXEL_INSET: f32 = 0.5;

/// Four vertices of one sprite plus its order key within a layer.
///
/// Corners are counter-clockwise from the bottom-left:
/// bottom-left, bottom-right, top-right, top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub vertices: [Vertex; 4],
    pub order: i32,
}

/// Shrink `rect` by [`TEXEL_INSET`] on every edge.
///
/// The inset follows the sign of each extent, so a mirrored rect (negative
/// width or height) shrinks towards its own interior as well.
pub fn inset_rect(rect: IntRect) -> FloatRect {
    let rect = rect.to_float();
    let sign_w = sign(rect.width);
    let sign_h = sign(rect.height);

    FloatRect::new(
        rect.left + sign_w * TEXEL_INSET,
        rect.bottom + sign_h * TEXEL_INSET,
        sign_w * (rect.width.abs() - 2.0 * TEXEL_INSET),
        sign_h * (rect.height.abs() - 2.0 * TEXEL_INSET),
    )
}

/// Like `f32::signum`, but zero maps to zero so empty rects stay empty.
#[inline]
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Convert a texel position into normalized texture coordinates.
#[inline]
pub fn to_tex_coords(texture: &GpuTexture, x: f32, y: f32) -> [f32; 2] {
    [x / texture.width() as f32, y / texture.height() as f32]
}

/// Build the quad for `sprite`, sampling from texture slot `slot`.
pub fn build_quad(sprite: &Sprite, slot: u32, order: i32) -> Quad {
    let texture = sprite.texture();
    let anchor = sprite.anchor();
    let size = sprite.size();
    let uv = inset_rect(sprite.texture_rect());

    let color = sprite.color().to_array();
    let tex_index = slot as f32;
    let vertex = |offset: Vec2, u: f32, v: f32| Vertex {
        position: (anchor + offset).to_array(),
        color,
        tex_coords: to_tex_coords(texture, u, v),
        tex_index,
    };

    Quad {
        vertices: [
            vertex(Vec2::ZERO, uv.left, uv.bottom),
            vertex(Vec2::new(size.x, 0.0), uv.right(), uv.bottom),
            vertex(size, uv.right(), uv.top()),
            vertex(Vec2::new(0.0, size.y), uv.left, uv.top()),
        ],
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_inset_shrinks_every_edge() {
        let rect = inset_rect(IntRect::new(0, 0, 32, 32));
        assert_eq!(rect, FloatRect::new(0.5, 0.5, 31.0, 31.0));
    }

    #[test]
    fn test_inset_follows_negative_extents() {
        let rect = inset_rect(IntRect::new(32, 16, -32, -16));
        assert_eq!(rect, FloatRect::new(31.5, 15.5, -31.0, -15.0));
        // Mirrored rect still covers the interior of the same region
        assert_eq!(rect.right(), 0.5);
        assert_eq!(rect.top(), 0.5);
    }

    #[test]
    fn test_inset_leaves_empty_extent_alone() {
        let rect = inset_rect(IntRect::new(4, 4, 0, 8));
        assert_eq!(rect, FloatRect::new(4.0, 4.5, 0.0, 7.0));
    }

    #[test]
    fn test_tex_coords_strictly_inside_unit_square() {
        let texture = GpuTexture::mock(32, 32);
        let sprite = Sprite::new(texture).with_texture_rect(IntRect::new(0, 0, 32, 32));
        let quad = build_quad(&sprite, 0, 0);

        let margin = TEXEL_INSET / 32.0;
        for vertex in &quad.vertices {
            for c in vertex.tex_coords {
                assert!(c >= margin - f32::EPSILON && c <= 1.0 - margin + f32::EPSILON);
                assert!(c > 0.0 && c < 1.0);
            }
        }
        assert_eq!(quad.vertices[0].tex_coords, [margin, margin]);
        assert_eq!(quad.vertices[2].tex_coords, [1.0 - margin, 1.0 - margin]);
    }

    #[test]
    fn test_corner_positions() {
        let sprite = Sprite::new(GpuTexture::mock(64, 64))
            .with_texture_rect(IntRect::new(0, 0, 20, 20))
            .with_position(Vec2::new(10.0, 10.0));
        let quad = build_quad(&sprite, 0, 0);

        assert_eq!(quad.vertices[0].position, [10.0, 10.0]); // bottom left
        assert_eq!(quad.vertices[1].position, [30.0, 10.0]); // bottom right
        assert_eq!(quad.vertices[2].position, [30.0, 30.0]); // top right
        assert_eq!(quad.vertices[3].position, [10.0, 30.0]); // top left
    }

    #[test]
    fn test_origin_and_scale() {
        let sprite = Sprite::new(GpuTexture::mock(64, 64))
            .with_texture_rect(IntRect::new(0, 0, -10, 20))
            .with_position(Vec2::new(100.0, 100.0))
            .with_origin(Vec2::new(5.0, 10.0))
            .with_scale(Vec2::new(2.0, 3.0));
        let quad = build_quad(&sprite, 0, 0);

        // anchor = (100, 100) - (5, 10) * (2, 3); size = (|-10| * 2, 20 * 3)
        assert_eq!(quad.vertices[0].position, [90.0, 70.0]);
        assert_eq!(quad.vertices[2].position, [110.0, 130.0]);
    }

    #[test]
    fn test_shared_color_slot_and_order() {
        let tint = Color::rgba(0.25, 0.5, 0.75, 1.0);
        let sprite = Sprite::new(GpuTexture::mock(8, 8)).with_color(tint);
        let quad = build_quad(&sprite, 3, -7);

        assert_eq!(quad.order, -7);
        for vertex in &quad.vertices {
            assert_eq!(vertex.color, tint.to_array());
            assert_eq!(vertex.tex_index, 3.0);
        }
    }
}
