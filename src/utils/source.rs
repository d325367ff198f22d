//! Byte sources for shader files
//!
//! Loading goes through [`ByteSource`] so effects can be read from disk,
//! from an archive, or from memory in tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Path-addressed source of raw file content
pub trait ByteSource {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads from the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl ByteSource for FileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// In-memory file table
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }
}

impl ByteSource for MemorySource {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_lookup() {
        let source = MemorySource::new().with_file("a.glsl", "void main() {}");
        assert_eq!(source.read(Path::new("a.glsl")).unwrap(), b"void main() {}");

        let err = source.read(Path::new("b.glsl")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
