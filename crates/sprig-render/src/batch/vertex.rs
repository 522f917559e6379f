//! GPU vertex format of the sprite batch.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

/// One corner of a sprite quad.
///
/// Interleaved, 36-byte stride:
///
/// ```text
/// Offset | Field      | Location
/// -------|------------|---------
/// 0      | position   | 0 (vec2)
/// 8      | color      | 1 (vec4)
/// 24     | tex_coords | 2 (vec2)
/// 32     | tex_index  | 3 (f32)
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    /// RGBA tint, 0–1.
    pub color: [f32; 4],
    /// Normalized texture coordinates, 0–1.
    pub tex_coords: [f32; 2],
    /// Texture slot, stored as a float and truncated in the shader.
    pub tex_index: f32,
}

const_assert_eq!(std::mem::size_of::<Vertex>(), 36);

impl Vertex {
    /// Size of the vertex in bytes.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Returns the wgpu vertex buffer layout.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: &[wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
            0 => Float32x2,  // position
            1 => Float32x4,  // color
            2 => Float32x2,  // tex_coords
            3 => Float32,    // tex_index
        ];

        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: ATTRS,
        }
    }
}

/// Vertices per sprite quad.
pub const VERTICES_PER_QUAD: u32 = 4;
/// Indices per sprite quad (two triangles).
pub const INDICES_PER_QUAD: u32 = 6;

/// Index pattern of one quad, relative to its first vertex.
const QUAD_PATTERN: [u32; INDICES_PER_QUAD as usize] = [0, 1, 2, 2, 3, 0];

/// Build the index buffer contents for `max_sprites` quads:
///
/// ```text
/// 0, 1, 2, 2, 3, 0,
/// 4, 5, 6, 6, 7, 4,
/// ...
/// ```
pub fn quad_indices(max_sprites: u32) -> Vec<u32> {
    (0..max_sprites)
        .flat_map(|quad| {
            let offset = quad * VERTICES_PER_QUAD;
            QUAD_PATTERN.map(|i| i + offset)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_offsets_match_layout() {
        let layout = Vertex::layout();
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8, 24, 32]);
        assert_eq!(layout.array_stride, 36);
    }

    #[test]
    fn test_quad_indices_pattern() {
        let indices = quad_indices(3);
        assert_eq!(indices.len(), 18);
        assert_eq!(&indices[..6], &[0, 1, 2, 2, 3, 0]);
        assert_eq!(&indices[6..12], &[4, 5, 6, 6, 7, 4]);
        assert_eq!(&indices[12..], &[8, 9, 10, 10, 11, 8]);
    }

    #[test]
    fn test_quad_indices_empty() {
        assert!(quad_indices(0).is_empty());
    }
}
