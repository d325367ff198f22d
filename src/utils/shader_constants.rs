//! Centralized effect constants
//!
//! Layout sizes, format markers and option defaults shared by the loaders,
//! the config-string codec and the uniform layout engine.

/// Uniform blocks at or below this size are bound through push constants
pub const PUSH_CONSTANT_SIZE_THRESHOLD: u32 = 128;

/// Maximum number of components of a vector option
pub const MAX_VECTOR_COMPONENTS: usize = 4;

/// GPU uniform-block alignment (one std140 row)
pub const UNIFORM_ALIGNMENT: u32 = 16;

/// Size of the fixed per-frame header at the start of every uniform block
/// (28 floats, each vector field on its own 16-byte row)
pub const COMMON_UNIFORMS_SIZE: u32 = 112;

/// Bytes written per option component
pub const UNIFORM_COMPONENT_SIZE: u32 = 4;

/// Pass-file format version written on export
pub const PASS_FILE_VERSION: &str = "1.0";

/// Key whose presence marks a JSON document as a multi-pass file
pub const PASS_FILE_MARKER: &str = "\"passes\"";

/// Legacy configuration block delimiters
pub const LEGACY_CONFIG_BEGIN: &str = "[configuration]";
pub const LEGACY_CONFIG_END: &str = "[/configuration]";

/// Legacy option section names
pub const LEGACY_SECTION_BOOL: &str = "OptionBool";
pub const LEGACY_SECTION_INT: &str = "OptionRangeInteger";
pub const LEGACY_SECTION_FLOAT: &str = "OptionRangeFloat";

/// Config string separators: `name=v,v;name=v`
pub const CONFIG_ENTRY_SEPARATOR: char = ';';
pub const CONFIG_VALUE_SEPARATOR: char = '=';
pub const CONFIG_COMPONENT_SEPARATOR: char = ',';

/// Default step for integer options that declare none
pub const DEFAULT_INT_STEP: i32 = 1;

/// Default step for float options that declare none
pub const DEFAULT_FLOAT_STEP: f32 = 0.01;

/// Default output scale of a pass
pub const DEFAULT_OUTPUT_SCALE: f32 = 1.0;
