//! Persisted post-processing settings
//!
//! One JSON file holds the active shader chain and the saved config string
//! of every shader the user has tuned.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::effect::Effect;
use crate::utils::ShaderError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectSettings {
    /// Shader names in render order
    #[serde(default)]
    pub active_chain: Vec<String>,

    /// Shader name -> config string
    #[serde(default)]
    pub shader_configs: BTreeMap<String, String>,
}

impl EffectSettings {
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("postfx");
        path.push("settings.json");
        path
    }

    /// Missing file means defaults; an unreadable or corrupt one is an error
    pub fn load(path: &Path) -> Result<Self, ShaderError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("[Settings] No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ShaderError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ShaderError> {
        let io_err = |source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?).map_err(io_err)?;
        log::debug!("[Settings] Saved to {}", path.display());
        Ok(())
    }

    /// Record the effect's current option values
    pub fn store_effect(&mut self, effect: &Effect) {
        if effect.has_options() {
            self.shader_configs
                .insert(effect.name().to_string(), effect.config_string());
        } else {
            self.shader_configs.remove(effect.name());
        }
    }

    /// Restore saved option values; returns false if nothing was saved
    pub fn apply_to(&self, effect: &mut Effect) -> bool {
        match self.shader_configs.get(effect.name()) {
            Some(config) => {
                effect.set_config_string(config);
                true
            }
            None => false,
        }
    }

    pub fn config_for(&self, shader: &str) -> Option<&str> {
        self.shader_configs.get(shader).map(String::as_str)
    }
}
