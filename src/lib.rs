//! Multi-pass post-processing shader effects.
//!
//! Loads an effect from a legacy single-file shader or a JSON pass file,
//! persists its option values as a config string, and lays out the uniform
//! block a renderer uploads each frame.
//!
//! ```ignore
//! let mut effect = postfx::Effect::default();
//! if effect.load_from_file("crt", "shaders/crt.glsl") {
//!     effect.set_config_string("SCANLINE_STRENGTH=0.4");
//!     let block = effect.uniform_buffer(&postfx::FrameGeometry::full(640, 480, 0.0));
//! }
//! ```

pub mod effect;
pub mod settings;
pub mod utils;

pub use effect::{
    CommonUniforms, Component, Effect, FrameGeometry, OptionType, Pass, ShaderOption, TextureFilter,
    Value,
};
pub use settings::EffectSettings;
pub use utils::{
    format_shader_error, ByteSource, CodeEncoding, FileSystem, MemorySource, ShaderError,
    MAX_VECTOR_COMPONENTS, PUSH_CONSTANT_SIZE_THRESHOLD,
};
