//! Built-in sprite shader.

use sprig_test_utils::{GpuShader, RenderContext, ShaderDescriptor};

use crate::batch::Vertex;

/// Names of the uniforms the sprite program understands.
pub mod uniforms {
    /// `mat4`, applied last.
    pub const PROJECTION: &str = "projection";
    /// `mat4`, camera transform.
    pub const VIEW: &str = "view";
    /// `mat4`, identity for batched sprites.
    pub const MODEL: &str = "model";
    /// Integer array of the texture units in use this draw.
    pub const TEXTURES: &str = "textures";
}

/// WGSL source of the sprite program.
///
/// Vertex input matches [`Vertex::layout`]. Group 0 holds the uniform block
/// (binding 0) and the sampler (binding 1); group 1 holds one
/// `texture_2d<f32>` per texture unit.
pub const SPRITE_SHADER_SOURCE: &str = include_str!("shaders/sprite.wgsl");

/// Compile the sprite program for the given render target format.
pub fn sprite_shader(context: &dyn RenderContext, target_format: wgpu::TextureFormat) -> GpuShader {
    context.create_shader(&ShaderDescriptor {
        label: Some("Sprite Shader"),
        source: SPRITE_SHADER_SOURCE,
        vertex_layout: Vertex::layout(),
        target_format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_TEXTURES;
    use sprig_test_utils::{MockRenderContext, RenderCall};

    #[test]
    fn test_source_declares_one_binding_per_texture_unit() {
        let bindings = SPRITE_SHADER_SOURCE
            .lines()
            .filter(|line| line.starts_with("@group(1)"))
            .count();
        assert_eq!(bindings, MAX_TEXTURES);

        for unit in 0..MAX_TEXTURES {
            assert!(SPRITE_SHADER_SOURCE.contains(&format!("case {unit}u:")));
        }
    }

    #[test]
    fn test_source_names_match_uniforms() {
        for name in [uniforms::PROJECTION, uniforms::VIEW, uniforms::MODEL] {
            assert!(SPRITE_SHADER_SOURCE.contains(&format!("{name}: mat4x4<f32>")));
        }
    }

    #[test]
    fn test_sprite_shader_is_created_through_context() {
        let mock = MockRenderContext::new();
        let shader = sprite_shader(&mock, wgpu::TextureFormat::Rgba8UnormSrgb);

        assert_eq!(
            mock.calls(),
            vec![RenderCall::CreateShader {
                shader: shader.id(),
                label: Some("Sprite Shader".to_string()),
            }]
        );
    }
}
