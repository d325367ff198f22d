//! Uniform block layout
//!
//! Every effect's uniform block starts with [`CommonUniforms`] (112 bytes,
//! each vector on its own 16-byte row) followed by the components of every
//! valid option, packed as 32-bit words in declaration order. The total is
//! rounded up to a 16-byte multiple.

use super::{Effect, ShaderOption};
use crate::utils::{COMMON_UNIFORMS_SIZE, PUSH_CONSTANT_SIZE_THRESHOLD, UNIFORM_ALIGNMENT};

/// Per-frame header shared by all effects
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CommonUniforms {
    pub src_rect: [f32; 4],
    pub src_size: [f32; 2],
    pub _pad0: [f32; 2],
    pub resolution: [f32; 2],
    pub _pad1: [f32; 2],
    pub rcp_resolution: [f32; 2],
    pub _pad2: [f32; 2],
    pub window_resolution: [f32; 2],
    pub _pad3: [f32; 2],
    pub rcp_window_resolution: [f32; 2],
    pub _pad4: [f32; 2],
    pub time: f32,
    pub _pad5: [f32; 3],
}

const _: () = assert!(std::mem::size_of::<CommonUniforms>() == COMMON_UNIFORMS_SIZE as usize);

/// Source texture, viewport and window geometry for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameGeometry {
    pub texture_width: u32,
    pub texture_height: u32,
    pub view_x: i32,
    pub view_y: i32,
    pub view_width: i32,
    pub view_height: i32,
    pub window_width: u32,
    pub window_height: u32,
    /// Seconds since the effect started
    pub time: f32,
}

impl FrameGeometry {
    /// Whole texture shown in a window of the same size
    pub fn full(width: u32, height: u32, time: f32) -> Self {
        Self {
            texture_width: width,
            texture_height: height,
            view_x: 0,
            view_y: 0,
            view_width: width as i32,
            view_height: height as i32,
            window_width: width,
            window_height: height,
            time,
        }
    }
}

impl CommonUniforms {
    /// Zero dimensions yield inf/NaN reciprocals rather than a panic
    pub fn new(geometry: &FrameGeometry) -> Self {
        let tex_w = geometry.texture_width as f32;
        let tex_h = geometry.texture_height as f32;
        let view_x = geometry.view_x as f32;
        let view_y = geometry.view_y as f32;
        let view_w = geometry.view_width as f32;
        let view_h = geometry.view_height as f32;
        let win_w = geometry.window_width as f32;
        let win_h = geometry.window_height as f32;

        Self {
            src_rect: [
                view_x / tex_w,
                view_y / tex_h,
                (view_x + view_w) / tex_w,
                (view_y + view_h) / tex_h,
            ],
            src_size: [view_w / tex_w, view_h / tex_h],
            resolution: [tex_w, tex_h],
            rcp_resolution: [1.0 / tex_w, 1.0 / tex_h],
            window_resolution: [win_w, win_h],
            rcp_window_resolution: [1.0 / win_w, 1.0 / win_h],
            time: geometry.time,
            ..Default::default()
        }
    }
}

fn align_up(size: u32, alignment: u32) -> u32 {
    size.div_ceil(alignment) * alignment
}

impl Effect {
    /// Header plus packed option words, rounded up to 16 bytes
    pub fn uniforms_size(&self) -> u32 {
        let options: u32 = self.options().iter().map(ShaderOption::uniform_size).sum();
        align_up(COMMON_UNIFORMS_SIZE + options, UNIFORM_ALIGNMENT)
    }

    /// Small blocks go through push constants instead of a uniform buffer
    pub fn use_push_constants(&self) -> bool {
        self.uniforms_size() <= PUSH_CONSTANT_SIZE_THRESHOLD
    }

    /// Write the uniform block for one frame into `buffer`.
    ///
    /// Only `vector_size` words are written per option; bytes after the last
    /// option up to [`Effect::uniforms_size`] are zeroed. Anything beyond that
    /// in `buffer` is left untouched.
    ///
    /// # Panics
    /// If `buffer` is shorter than [`Effect::uniforms_size`].
    pub fn fill_uniform_buffer(&self, buffer: &mut [u8], geometry: &FrameGeometry) {
        let size = self.uniforms_size() as usize;
        assert!(
            buffer.len() >= size,
            "uniform buffer of {} bytes is smaller than the {} byte block",
            buffer.len(),
            size
        );
        let block = &mut buffer[..size];

        let header = COMMON_UNIFORMS_SIZE as usize;
        block[..header].copy_from_slice(bytemuck::bytes_of(&CommonUniforms::new(geometry)));

        let mut offset = header;
        for option in self.options().iter().filter(|o| o.is_valid()) {
            for component in (0..option.components()).filter_map(|i| option.component(i)) {
                block[offset..offset + 4].copy_from_slice(&component.to_word().to_ne_bytes());
                offset += 4;
            }
        }

        block[offset..].fill(0);
    }

    /// Allocate and fill a block of exactly [`Effect::uniforms_size`] bytes
    pub fn uniform_buffer(&self, geometry: &FrameGeometry) -> Vec<u8> {
        let mut buffer = vec![0u8; self.uniforms_size() as usize];
        self.fill_uniform_buffer(&mut buffer, geometry);
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Component, OptionType};

    fn effect_with(options: &str) -> Effect {
        let json = format!(
            r#"{{ "passes": [ {{ "code": "void main() {{}}" }} ], "options": [ {} ] }}"#,
            options
        );
        Effect::parse("test", &json).unwrap()
    }

    fn word(buffer: &[u8], offset: usize) -> [u8; 4] {
        buffer[offset..offset + 4].try_into().unwrap()
    }

    fn f32_at(buffer: &[u8], offset: usize) -> f32 {
        f32::from_ne_bytes(word(buffer, offset))
    }

    #[test]
    fn test_header_layout() {
        assert_eq!(std::mem::size_of::<CommonUniforms>(), 112);
        assert_eq!(std::mem::offset_of!(CommonUniforms, resolution), 32);
        assert_eq!(std::mem::offset_of!(CommonUniforms, rcp_resolution), 48);
        assert_eq!(std::mem::offset_of!(CommonUniforms, window_resolution), 64);
        assert_eq!(std::mem::offset_of!(CommonUniforms, rcp_window_resolution), 80);
        assert_eq!(std::mem::offset_of!(CommonUniforms, time), 96);
    }

    #[test]
    fn test_no_options_is_header_only() {
        let effect = Effect::from_legacy_code("plain", "void main() {}").unwrap();
        assert_eq!(effect.uniforms_size(), 112);
        assert!(effect.use_push_constants());
    }

    #[test]
    fn test_vec2_option_size() {
        let effect = effect_with(r#"{ "name": "offset", "type": "float", "default": [0.5, 1.5] }"#);
        assert_eq!(effect.uniforms_size(), 128);
        assert!(effect.use_push_constants());
    }

    #[test]
    fn test_push_constant_threshold() {
        let effect = effect_with(
            r#"{ "name": "a", "type": "float", "default": [1, 2, 3, 4] },
               { "name": "b", "type": "int", "default": 1 }"#,
        );
        assert_eq!(effect.uniforms_size(), 144);
        assert!(!effect.use_push_constants());
    }

    #[test]
    fn test_invalid_options_take_no_space() {
        let mut effect = effect_with(
            r#"{ "name": "a", "type": "float", "default": [1, 2, 3, 4] },
               { "name": "b", "type": "int", "default": 1 }"#,
        );
        effect.options_mut()[0].ty = OptionType::Invalid;
        assert_eq!(effect.uniforms_size(), 128);
    }

    #[test]
    fn test_size_is_aligned() {
        for n in 1..=4 {
            let values = vec!["1"; n].join(",");
            let effect = effect_with(&format!(
                r#"{{ "name": "v", "type": "float", "default": [{}] }}"#,
                values
            ));
            assert_eq!(effect.uniforms_size() % 16, 0);
            assert!(effect.uniforms_size() >= 112);
        }
    }

    #[test]
    fn test_fill_header_geometry() {
        let effect = Effect::from_legacy_code("plain", "void main() {}").unwrap();
        let geometry = FrameGeometry {
            texture_width: 256,
            texture_height: 224,
            view_x: 32,
            view_y: 0,
            view_width: 192,
            view_height: 224,
            window_width: 512,
            window_height: 448,
            time: 1.25,
        };
        let buffer = effect.uniform_buffer(&geometry);

        assert_eq!(f32_at(&buffer, 0), 32.0 / 256.0);
        assert_eq!(f32_at(&buffer, 8), 224.0 / 256.0);
        assert_eq!(f32_at(&buffer, 16), 192.0 / 256.0);
        assert_eq!(f32_at(&buffer, 32), 256.0);
        assert_eq!(f32_at(&buffer, 48), 1.0 / 256.0);
        assert_eq!(f32_at(&buffer, 64), 512.0);
        assert_eq!(f32_at(&buffer, 80), 1.0 / 512.0);
        assert_eq!(f32_at(&buffer, 84), 1.0 / 448.0);
        assert_eq!(f32_at(&buffer, 96), 1.25);
        assert_eq!(word(&buffer, 100), [0; 4]);
    }

    #[test]
    fn test_fill_option_words() {
        let mut effect = effect_with(
            r#"{ "name": "on", "type": "bool", "default": true },
               { "name": "count", "type": "int", "default": [-2, 7] },
               { "name": "gain", "type": "float", "default": 0.75 }"#,
        );
        let mut buffer = vec![0xAAu8; 160];
        effect.fill_uniform_buffer(&mut buffer, &FrameGeometry::full(320, 240, 0.0));

        assert_eq!(effect.uniforms_size(), 128);
        assert_eq!(word(&buffer, 112), 1u32.to_ne_bytes());
        assert_eq!(word(&buffer, 116), (-2i32).to_ne_bytes());
        assert_eq!(word(&buffer, 120), 7i32.to_ne_bytes());
        assert_eq!(word(&buffer, 124), 0.75f32.to_ne_bytes());
        assert!(buffer[128..].iter().all(|b| *b == 0xAA));

        effect.options_mut()[0].set_component(0, Component::Bool(false));
        effect.fill_uniform_buffer(&mut buffer, &FrameGeometry::full(320, 240, 0.0));
        assert_eq!(word(&buffer, 112), [0; 4]);
    }

    #[test]
    fn test_trailing_padding_is_zeroed() {
        let effect = effect_with(r#"{ "name": "gain", "type": "float", "default": 0.75 }"#);
        let mut buffer = vec![0xFFu8; 128];
        effect.fill_uniform_buffer(&mut buffer, &FrameGeometry::full(64, 64, 0.0));
        assert!(buffer[116..128].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_zero_dimensions_do_not_panic() {
        let effect = Effect::from_legacy_code("plain", "void main() {}").unwrap();
        let buffer = effect.uniform_buffer(&FrameGeometry::default());
        assert!(f32_at(&buffer, 48).is_infinite());
        assert!(f32_at(&buffer, 0).is_nan());
    }

    #[test]
    #[should_panic]
    fn test_undersized_buffer_panics() {
        let effect = Effect::from_legacy_code("plain", "void main() {}").unwrap();
        let mut buffer = vec![0u8; 64];
        effect.fill_uniform_buffer(&mut buffer, &FrameGeometry::full(1, 1, 0.0));
    }
}
