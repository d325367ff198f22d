//! Post-processing effect aggregate
//!
//! An [`Effect`] owns an ordered list of [`Pass`]es (render order) and an
//! ordered list of [`ShaderOption`]s (declaration order). It is built once at
//! load time, restored from a config string, and read every frame by the
//! renderer through the accessors and the uniform layout in [`uniforms`].

mod config_string;
mod option;
mod pass;
pub mod uniforms;

use std::path::Path;

pub use option::{Component, OptionType, ShaderOption, Value, ValueVector};
pub use pass::{Pass, TextureFilter};
pub use uniforms::{CommonUniforms, FrameGeometry};

use crate::utils::pass_file::{CodeEncoding, PassFile};
use crate::utils::{detect_format, legacy_format, ByteSource, FileSystem, ShaderError, ShaderFormat};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effect {
    name: String,
    passes: Vec<Pass>,
    options: Vec<ShaderOption>,
    is_legacy: bool,
}

impl Effect {
    /// Build a legacy single-pass effect directly from shader source
    pub fn from_legacy_code(name: impl Into<String>, code: impl Into<String>) -> Result<Self, ShaderError> {
        let code = code.into();
        let (pass, options) = legacy_format::parse(&code)?;
        Ok(Self {
            name: name.into(),
            passes: vec![pass],
            options,
            is_legacy: true,
        })
    }

    /// Build a multi-pass effect from pass-file JSON
    pub fn from_pass_file(name: impl Into<String>, json: &str) -> Result<Self, ShaderError> {
        let (passes, options) = PassFile::from_json(json)?.into_parts()?;
        Ok(Self {
            name: name.into(),
            passes,
            options,
            is_legacy: false,
        })
    }

    /// Classify the content, then parse it with the matching loader
    pub fn parse(name: impl Into<String>, content: &str) -> Result<Self, ShaderError> {
        let name = name.into();
        let format = detect_format(content);
        log::debug!("[Effect] Shader '{}' detected as {:?}", name, format);

        let effect = match format {
            ShaderFormat::Legacy => Self::from_legacy_code(name, content)?,
            ShaderFormat::PassFile => Self::from_pass_file(name, content)?,
        };

        if !effect.is_valid() {
            return Err(ShaderError::ValidationError(format!(
                "shader '{}' has no pass with code",
                effect.name
            )));
        }
        Ok(effect)
    }

    /// Read `path` from `source` and replace this effect with its contents.
    /// On failure the effect is left empty.
    pub fn load_from_source(
        &mut self,
        name: impl Into<String>,
        path: &Path,
        source: &dyn ByteSource,
    ) -> Result<(), ShaderError> {
        *self = Self::default();
        let content = read_text(path, source)?;
        *self = Self::parse(name, &content)?;
        log::info!(
            "[Effect] Loaded shader '{}' from {} ({} pass(es), {} option(s){})",
            self.name,
            path.display(),
            self.passes.len(),
            self.options.len(),
            if self.is_legacy { ", legacy" } else { "" }
        );
        Ok(())
    }

    pub fn try_load_from_file(&mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Result<(), ShaderError> {
        self.load_from_source(name, path.as_ref(), &FileSystem)
    }

    /// Load from disk, returning whether the effect is usable
    pub fn load_from_file(&mut self, name: impl Into<String>, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.try_load_from_file(name, path) {
            Ok(()) => true,
            Err(err) => {
                log::error!("[Effect] Failed to load shader from {}: {}", path.display(), err);
                false
            }
        }
    }

    /// Load a file that must be in the legacy format
    pub fn load_from_legacy_file(
        &mut self,
        name: impl Into<String>,
        path: &Path,
        source: &dyn ByteSource,
    ) -> Result<(), ShaderError> {
        *self = Self::default();
        let content = read_text(path, source)?;
        *self = Self::from_legacy_code(name, content)?;
        Ok(())
    }

    /// Load a file that must be a pass file
    pub fn load_from_pass_file(
        &mut self,
        name: impl Into<String>,
        path: &Path,
        source: &dyn ByteSource,
    ) -> Result<(), ShaderError> {
        *self = Self::default();
        let content = read_text(path, source)?;
        *self = Self::from_pass_file(name, &content)?;
        Ok(())
    }

    /// Serialize into the pass-file format (legacy effects are transcoded)
    pub fn to_pass_file(&self, encoding: CodeEncoding) -> Result<String, ShaderError> {
        PassFile::from_parts(&self.passes, &self.options, encoding).to_json()
    }

    /// Move the contents out, leaving this effect empty and invalid
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// # Panics
    /// If `pass >= self.num_passes()`.
    pub fn code(&self, pass: usize) -> &str {
        &self.passes[pass].code
    }

    /// # Panics
    /// If `pass >= self.num_passes()`.
    pub fn output_scale(&self, pass: usize) -> f32 {
        self.passes[pass].output_scale
    }

    /// # Panics
    /// If `pass >= self.num_passes()`.
    pub fn texture_filter(&self, pass: usize) -> TextureFilter {
        self.passes[pass].texture_filter
    }

    pub fn num_passes(&self) -> usize {
        self.passes.len()
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    pub fn pass(&self, index: usize) -> Option<&Pass> {
        self.passes.get(index)
    }

    pub fn options(&self) -> &[ShaderOption] {
        &self.options
    }

    /// Values may be edited in place; the list itself keeps its shape
    pub fn options_mut(&mut self) -> &mut [ShaderOption] {
        &mut self.options
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn is_legacy(&self) -> bool {
        self.is_legacy
    }

    pub fn is_valid(&self) -> bool {
        !self.passes.is_empty() && self.passes.iter().any(Pass::has_code)
    }

    pub fn option_by_name(&self, name: &str) -> Option<&ShaderOption> {
        self.options.iter().find(|o| o.name == name)
    }

    pub fn option_by_name_mut(&mut self, name: &str) -> Option<&mut ShaderOption> {
        self.options.iter_mut().find(|o| o.name == name)
    }

    /// Whether an option currently matters: unconditional, or its bool
    /// dependency is switched on
    pub fn is_option_active(&self, option: &ShaderOption) -> bool {
        if option.dependent_option.is_empty() {
            return true;
        }
        self.option_by_name(&option.dependent_option)
            .map(ShaderOption::is_enabled)
            .unwrap_or(false)
    }

    pub fn reset_options(&mut self) {
        self.options.iter_mut().for_each(ShaderOption::reset_to_default);
    }
}

fn read_text(path: &Path, source: &dyn ByteSource) -> Result<String, ShaderError> {
    let bytes = source.read(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes)
        .map_err(|_| ShaderError::Encoding(format!("{} is not valid UTF-8", path.display())))
}
