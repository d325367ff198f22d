pub mod errors;
pub mod formats;
pub mod legacy_format;
pub mod pass_file;
pub mod shader_constants;
pub mod source;
pub mod text;

pub use errors::{format_shader_error, ShaderError};
pub use formats::{detect_format, ShaderFormat};
pub use pass_file::{CodeEncoding, PassFile};
pub use shader_constants::*;
pub use source::{ByteSource, FileSystem, MemorySource};
