use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::effect::{Component, OptionType, Pass, ShaderOption, TextureFilter};
use crate::utils::formats::{validate_options, OptionDecl};
use crate::utils::{ShaderError, DEFAULT_OUTPUT_SCALE, PASS_FILE_VERSION};

/// How pass code is stored inside the JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeEncoding {
    #[default]
    Plain,
    Base64,
}

/// Multi-pass effect file
/// Supports both plain text and base64-encoded pass code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassFile {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,

    #[serde(default)]
    pub encoding: CodeEncoding,

    pub passes: Vec<PassEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassEntry {
    pub code: String,

    #[serde(default = "default_output_scale")]
    pub output_scale: f32,

    #[serde(default)]
    pub filter: TextureFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionEntry {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_name: Option<String>,

    #[serde(rename = "type")]
    pub ty: OptionType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_size: Option<u32>,

    /// Array of components, or a bare scalar for single-component options
    pub default: JsonValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<JsonValue>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dependent_option: String,
}

fn default_version() -> String {
    PASS_FILE_VERSION.to_string()
}

fn default_output_scale() -> f32 {
    DEFAULT_OUTPUT_SCALE
}

impl PassFile {
    /// Parse a pass file and decode its pass code
    pub fn from_json(json_str: &str) -> Result<Self, ShaderError> {
        let mut file: Self = serde_json::from_str(json_str)?;

        if file.encoding == CodeEncoding::Base64 {
            for (index, pass) in file.passes.iter_mut().enumerate() {
                pass.code = decode_base64(&pass.code).ok_or_else(|| {
                    ShaderError::Encoding(format!("pass {} is not valid base64 UTF-8", index))
                })?;
            }
            file.encoding = CodeEncoding::Plain;
        }

        Ok(file)
    }

    /// Validate and convert into the in-memory pass and option lists
    pub fn into_parts(self) -> Result<(Vec<Pass>, Vec<ShaderOption>), ShaderError> {
        if self.passes.is_empty() {
            return Err(ShaderError::ValidationError(
                "pass file must declare at least one pass".to_string(),
            ));
        }

        let mut passes = Vec::with_capacity(self.passes.len());
        for (index, entry) in self.passes.into_iter().enumerate() {
            if entry.code.trim().is_empty() {
                return Err(ShaderError::ValidationError(format!(
                    "pass {} has no code",
                    index
                )));
            }
            if !entry.output_scale.is_finite() || entry.output_scale <= 0.0 {
                return Err(ShaderError::ValidationError(format!(
                    "pass {} output_scale {} must be positive",
                    index, entry.output_scale
                )));
            }
            passes.push(
                Pass::new(entry.code)
                    .with_output_scale(entry.output_scale)
                    .with_texture_filter(entry.filter),
            );
        }

        let options = self
            .options
            .into_iter()
            .map(OptionEntry::into_option)
            .collect::<Result<Vec<_>, _>>()?;
        validate_options(&options)?;

        Ok((passes, options))
    }

    /// Describe passes and valid options in pass-file form
    pub fn from_parts(passes: &[Pass], options: &[ShaderOption], encoding: CodeEncoding) -> Self {
        let passes = passes
            .iter()
            .map(|pass| PassEntry {
                code: match encoding {
                    CodeEncoding::Plain => pass.code.clone(),
                    CodeEncoding::Base64 => encode_to_base64(&pass.code),
                },
                output_scale: pass.output_scale,
                filter: pass.texture_filter,
            })
            .collect();

        let options = options
            .iter()
            .filter(|o| o.is_valid())
            .map(OptionEntry::from_option)
            .collect();

        Self {
            version: default_version(),
            exported_at: Some(chrono::Utc::now().to_rfc3339()),
            encoding,
            passes,
            options,
        }
    }

    pub fn to_json(&self) -> Result<String, ShaderError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl OptionEntry {
    fn into_option(self) -> Result<ShaderOption, ShaderError> {
        let ty = self.ty;
        let name = self.name;
        let list = |field: &str, value: &JsonValue| json_components(ty, value).map_err(|reason| {
            ShaderError::option(&name, format!("{}: {}", field, reason))
        });

        let default = list("default", &self.default)?;
        // Bool bounds are fixed at 0/1/1, whatever the file says
        let bound = |field: &str, value: &Option<JsonValue>| match value {
            Some(v) if ty.is_numeric() => list(field, v).map(Some),
            _ => Ok(None),
        };
        let min = bound("min", &self.min)?;
        let max = bound("max", &self.max)?;
        let step = bound("step", &self.step)?;

        OptionDecl {
            name: name.clone(),
            ui_name: self.ui_name,
            dependent_option: self.dependent_option,
            ty,
            vector_size: self.vector_size,
            default,
            min,
            max,
            step,
        }
        .build()
    }

    fn from_option(option: &ShaderOption) -> Self {
        let n = option.components();
        let list = |values: &[crate::effect::Value]| {
            JsonValue::Array(
                values[..n]
                    .iter()
                    .filter_map(|v| Component::from_value(option.ty, *v))
                    .map(component_to_json)
                    .collect(),
            )
        };
        let numeric = option.ty.is_numeric();

        Self {
            name: option.name.clone(),
            ui_name: Some(option.ui_name.clone()),
            ty: option.ty,
            vector_size: Some(option.vector_size),
            default: list(&option.default_value),
            min: numeric.then(|| list(&option.min_value)),
            max: numeric.then(|| list(&option.max_value)),
            step: numeric.then(|| list(&option.step_value)),
            dependent_option: option.dependent_option.clone(),
        }
    }
}

fn json_components(ty: OptionType, value: &JsonValue) -> Result<Vec<Component>, String> {
    match value {
        JsonValue::Array(items) => items.iter().map(|item| json_component(ty, item)).collect(),
        scalar => json_component(ty, scalar).map(|c| vec![c]),
    }
}

fn json_component(ty: OptionType, value: &JsonValue) -> Result<Component, String> {
    match (ty, value) {
        (OptionType::Bool, JsonValue::Bool(b)) => Ok(Component::Bool(*b)),
        (OptionType::Bool, JsonValue::Number(n)) => match n.as_i64() {
            Some(0) => Ok(Component::Bool(false)),
            Some(1) => Ok(Component::Bool(true)),
            _ => Err(format!("{} is not a bool", n)),
        },
        (OptionType::Int, JsonValue::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Component::Int)
            .ok_or_else(|| format!("{} is not a 32-bit integer", n)),
        (OptionType::Float, JsonValue::Number(n)) => n
            .as_f64()
            .map(|v| Component::Float(v as f32))
            .ok_or_else(|| format!("{} is not a number", n)),
        (_, other) => Err(format!("unexpected value {} for a {} option", other, ty.as_str())),
    }
}

fn component_to_json(component: Component) -> JsonValue {
    match component {
        Component::Bool(v) => JsonValue::Bool(v),
        Component::Int(v) => JsonValue::from(v),
        Component::Float(v) => JsonValue::from(v as f64),
    }
}

/// Encode pass code to base64 for safe JSON storage
pub fn encode_to_base64(code: &str) -> String {
    base64::Engine::encode(&base64::engine::general_purpose::STANDARD, code.as_bytes())
}

/// Decode base64 string to UTF-8 text
fn decode_base64(encoded: &str) -> Option<String> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim().as_bytes())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PASS: &str = r#"{
        "version": "1.0",
        "passes": [
            { "code": "void main() { blur_h(); }", "output_scale": 0.5, "filter": "nearest" },
            { "code": "void main() { blur_v(); }" }
        ],
        "options": [
            { "name": "enabled", "type": "bool", "default": true },
            { "name": "radius", "ui_name": "Radius", "type": "float", "default": [1.5],
              "min": [0.0], "max": [8.0], "step": [0.5], "dependent_option": "enabled" },
            { "name": "taps", "type": "int", "vector_size": 2, "default": [3, 5], "min": [1, 1], "max": [9, 9] }
        ]
    }"#;

    #[test]
    fn test_two_pass_file() {
        let (passes, options) = PassFile::from_json(TWO_PASS).unwrap().into_parts().unwrap();

        assert_eq!(passes.len(), 2);
        assert_eq!(passes[0].output_scale, 0.5);
        assert_eq!(passes[0].texture_filter, TextureFilter::Nearest);
        assert_eq!(passes[1].output_scale, 1.0);
        assert_eq!(passes[1].texture_filter, TextureFilter::Linear);

        assert_eq!(options.len(), 3);
        assert_eq!(options[0].ui_name, "enabled");
        assert_eq!(options[1].component(0), Some(Component::Float(1.5)));
        assert_eq!(options[1].max_value[0].float(), 8.0);
        assert_eq!(options[2].current(), vec![Component::Int(3), Component::Int(5)]);
        assert_eq!(options[2].step_value[1].int(), 1);
    }

    #[test]
    fn test_base64_passes() {
        let json = format!(
            r#"{{ "encoding": "base64", "passes": [ {{ "code": "{}" }} ] }}"#,
            encode_to_base64("void main() {}")
        );
        let (passes, options) = PassFile::from_json(&json).unwrap().into_parts().unwrap();
        assert_eq!(passes[0].code, "void main() {}");
        assert!(options.is_empty());
    }

    #[test]
    fn test_bad_base64_fails() {
        let json = r#"{ "encoding": "base64", "passes": [ { "code": "!!not base64!!" } ] }"#;
        assert!(matches!(PassFile::from_json(json), Err(ShaderError::Encoding(_))));
    }

    #[test]
    fn test_structural_errors() {
        let no_passes = r#"{ "passes": [] }"#;
        assert!(PassFile::from_json(no_passes).unwrap().into_parts().is_err());

        let bad_scale = r#"{ "passes": [ { "code": "x", "output_scale": 0 } ] }"#;
        assert!(PassFile::from_json(bad_scale).unwrap().into_parts().is_err());

        let bad_type = r#"{ "passes": [ { "code": "x" } ], "options": [ { "name": "a", "type": "vec9", "default": 1 } ] }"#;
        assert!(PassFile::from_json(bad_type).is_err());

        let int_as_float = r#"{ "passes": [ { "code": "x" } ], "options": [ { "name": "a", "type": "int", "default": 1.5 } ] }"#;
        assert!(PassFile::from_json(int_as_float).unwrap().into_parts().is_err());

        let wide = r#"{ "passes": [ { "code": "x" } ], "options": [ { "name": "a", "type": "float", "default": [1,2,3,4,5] } ] }"#;
        assert!(PassFile::from_json(wide).unwrap().into_parts().is_err());
    }

    #[test]
    fn test_bool_bounds_are_ignored() {
        let json = r#"{ "passes": [ { "code": "x" } ], "options": [
            { "name": "b", "type": "bool", "default": true, "min": 0.0, "max": [1.0], "step": "big" } ] }"#;
        let (_, options) = PassFile::from_json(json).unwrap().into_parts().unwrap();
        assert_eq!(options[0].component(0), Some(Component::Bool(true)));
        assert_eq!(options[0].min_value[0].int(), 0);
        assert_eq!(options[0].max_value[0].int(), 1);
        assert_eq!(options[0].step_value[0].int(), 1);
    }

    #[test]
    fn test_export_reloads_identically() {
        let (passes, options) = PassFile::from_json(TWO_PASS).unwrap().into_parts().unwrap();

        for encoding in [CodeEncoding::Plain, CodeEncoding::Base64] {
            let json = PassFile::from_parts(&passes, &options, encoding).to_json().unwrap();
            let reloaded = PassFile::from_json(&json).unwrap();
            assert!(reloaded.exported_at.is_some());

            let (passes2, options2) = reloaded.into_parts().unwrap();
            assert_eq!(passes2, passes);
            assert_eq!(options2, options);
        }
    }
}
