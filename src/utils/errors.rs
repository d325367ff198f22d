use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or exporting an effect
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed pass file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },
}

impl ShaderError {
    pub(crate) fn option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        ShaderError::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

/// Format an error for user display
pub fn format_shader_error(err: &ShaderError) -> String {
    match err {
        ShaderError::Io { .. } => format!("File Error\n\n{}", err),
        ShaderError::Json(_) | ShaderError::Encoding(_) => format!("Format Error\n\n{}", err),
        ShaderError::ValidationError(_) => format!("Validation Error\n\n{}", err),
        ShaderError::InvalidOption { .. } => format!("Option Error\n\n{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_option_error() {
        let err = ShaderError::option("strength", "vector size 5 is out of range");
        let formatted = format_shader_error(&err);
        assert!(formatted.starts_with("Option Error"));
        assert!(formatted.contains("'strength'"));
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = ShaderError::Io {
            path: PathBuf::from("shaders/crt.glsl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("shaders/crt.glsl"));
        assert!(format_shader_error(&err).starts_with("File Error"));
    }
}
