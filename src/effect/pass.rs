use serde::{Deserialize, Serialize};

use crate::utils::DEFAULT_OUTPUT_SCALE;

/// Texture sampling filter for a pass input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
}

impl TextureFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextureFilter::Nearest => "nearest",
            TextureFilter::Linear => "linear",
        }
    }
}

/// One shader stage of an effect
#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    /// Shader source text
    pub code: String,
    /// Render-target resolution relative to the previous pass
    pub output_scale: f32,
    pub texture_filter: TextureFilter,
}

impl Pass {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            output_scale: DEFAULT_OUTPUT_SCALE,
            texture_filter: TextureFilter::default(),
        }
    }

    pub fn with_output_scale(mut self, output_scale: f32) -> Self {
        self.output_scale = output_scale;
        self
    }

    pub fn with_texture_filter(mut self, texture_filter: TextureFilter) -> Self {
        self.texture_filter = texture_filter;
        self
    }

    pub fn has_code(&self) -> bool {
        !self.code.trim().is_empty()
    }
}

impl Default for Pass {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_defaults() {
        let pass = Pass::new("void main() {}");
        assert_eq!(pass.output_scale, 1.0);
        assert_eq!(pass.texture_filter, TextureFilter::Linear);
        assert!(pass.has_code());
        assert!(!Pass::new("  \n").has_code());
    }
}
