//! Shader file classification and shared option validation
//!
//! Loading is classify-then-parse: [`detect_format`] never fails, it only
//! picks the parser. Both parsers describe options as [`OptionDecl`] and go
//! through the same [`OptionDecl::build`] / [`validate_options`] checks.

use std::collections::HashSet;

use crate::effect::{Component, OptionType, ShaderOption, Value, ValueVector};
use crate::utils::text::is_identifier;
use crate::utils::{
    ShaderError, DEFAULT_FLOAT_STEP, DEFAULT_INT_STEP, MAX_VECTOR_COMPONENTS, PASS_FILE_MARKER,
};

/// On-disk shader description format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderFormat {
    /// Single shader file, options in a `[configuration]` comment block
    Legacy,
    /// JSON document with explicit passes and options
    PassFile,
}

pub fn detect_format(content: &str) -> ShaderFormat {
    let body = content.trim_start_matches('\u{feff}').trim_start();
    if body.starts_with('{') && body.contains(PASS_FILE_MARKER) {
        ShaderFormat::PassFile
    } else {
        ShaderFormat::Legacy
    }
}

/// Option declaration as read from a file, before validation
#[derive(Debug, Clone, Default)]
pub struct OptionDecl {
    pub name: String,
    pub ui_name: Option<String>,
    pub dependent_option: String,
    pub ty: OptionType,
    /// Explicit size; otherwise the length of `default`
    pub vector_size: Option<u32>,
    pub default: Vec<Component>,
    pub min: Option<Vec<Component>>,
    pub max: Option<Vec<Component>>,
    pub step: Option<Vec<Component>>,
}

impl OptionDecl {
    pub fn build(self) -> Result<ShaderOption, ShaderError> {
        if self.name.is_empty() {
            return Err(ShaderError::ValidationError(
                "option declared without a name".to_string(),
            ));
        }
        if !is_identifier(&self.name) {
            return Err(ShaderError::option(&self.name, "name is not a valid identifier"));
        }
        if self.ty == OptionType::Invalid {
            return Err(ShaderError::option(&self.name, "unknown option type"));
        }
        if self.default.is_empty() {
            return Err(ShaderError::option(&self.name, "missing default value"));
        }

        let size = self.vector_size.unwrap_or(self.default.len() as u32);
        if size == 0 || size as usize > MAX_VECTOR_COMPONENTS {
            return Err(ShaderError::option(
                &self.name,
                format!("vector size {} is out of range 1..={}", size, MAX_VECTOR_COMPONENTS),
            ));
        }
        let n = size as usize;

        let default_value = self.slots("default", Some(&self.default), n)?;
        let (min_value, max_value, step_value) = match self.ty {
            OptionType::Bool => (
                splat(Value::from_int(0), n),
                splat(Value::from_int(1), n),
                splat(Value::from_int(1), n),
            ),
            OptionType::Int => (
                self.slots_or("min", self.min.as_ref(), n, Value::from_int(i32::MIN))?,
                self.slots_or("max", self.max.as_ref(), n, Value::from_int(i32::MAX))?,
                self.slots_or("step", self.step.as_ref(), n, Value::from_int(DEFAULT_INT_STEP))?,
            ),
            OptionType::Float => (
                self.slots_or("min", self.min.as_ref(), n, Value::from_float(f32::MIN))?,
                self.slots_or("max", self.max.as_ref(), n, Value::from_float(f32::MAX))?,
                self.slots_or("step", self.step.as_ref(), n, Value::from_float(DEFAULT_FLOAT_STEP))?,
            ),
            OptionType::Invalid => unreachable!("rejected above"),
        };

        for i in 0..n {
            let in_bounds = match self.ty {
                OptionType::Int => {
                    let (lo, hi, v) = (min_value[i].int(), max_value[i].int(), default_value[i].int());
                    lo <= hi && lo <= v && v <= hi
                }
                OptionType::Float => {
                    let (lo, hi, v) = (min_value[i].float(), max_value[i].float(), default_value[i].float());
                    lo <= hi && lo <= v && v <= hi
                }
                _ => true,
            };
            if !in_bounds {
                return Err(ShaderError::option(
                    &self.name,
                    format!("component {} default lies outside [min, max]", i),
                ));
            }
        }

        let ui_name = self
            .ui_name
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.name.clone());

        Ok(ShaderOption {
            name: self.name,
            ui_name,
            dependent_option: self.dependent_option,
            ty: self.ty,
            vector_size: size,
            default_value,
            min_value,
            max_value,
            step_value,
            value: default_value,
        })
    }

    fn slots(&self, field: &str, values: Option<&Vec<Component>>, n: usize) -> Result<ValueVector, ShaderError> {
        let values = values.ok_or_else(|| ShaderError::option(&self.name, format!("missing {}", field)))?;
        if values.len() != n {
            return Err(ShaderError::option(
                &self.name,
                format!("{} has {} components, expected {}", field, values.len(), n),
            ));
        }
        let mut out = ValueVector::default();
        for (slot, component) in out.iter_mut().zip(values) {
            *slot = coerce(self.ty, *component)
                .ok_or_else(|| ShaderError::option(&self.name, format!("{} has the wrong type", field)))?;
        }
        Ok(out)
    }

    fn slots_or(
        &self,
        field: &str,
        values: Option<&Vec<Component>>,
        n: usize,
        fallback: Value,
    ) -> Result<ValueVector, ShaderError> {
        match values {
            Some(_) => self.slots(field, values, n),
            None => Ok(splat(fallback, n)),
        }
    }
}

/// Int literals are accepted for float options; everything else must match
fn coerce(ty: OptionType, component: Component) -> Option<Value> {
    match (ty, component) {
        (OptionType::Bool, Component::Bool(v)) => Some(Value::from_bool(v)),
        (OptionType::Bool, Component::Int(v)) if v == 0 || v == 1 => Some(Value::from_bool(v == 1)),
        (OptionType::Int, Component::Int(v)) => Some(Value::from_int(v)),
        (OptionType::Float, Component::Float(v)) => Some(Value::from_float(v)),
        (OptionType::Float, Component::Int(v)) => Some(Value::from_float(v as f32)),
        _ => None,
    }
}

fn splat(value: Value, n: usize) -> ValueVector {
    let mut out = ValueVector::default();
    out[..n].fill(value);
    out
}

/// Cross-option checks: unique names and dependencies on declared bool options
pub fn validate_options(options: &[ShaderOption]) -> Result<(), ShaderError> {
    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.name.as_str()) {
            return Err(ShaderError::option(&option.name, "duplicate option name"));
        }
    }

    for option in options.iter().filter(|o| !o.dependent_option.is_empty()) {
        match options.iter().find(|o| o.name == option.dependent_option) {
            Some(dep) if dep.name == option.name => {
                return Err(ShaderError::option(&option.name, "option depends on itself"));
            }
            Some(dep) if dep.ty == OptionType::Bool => {}
            Some(_) => {
                return Err(ShaderError::option(
                    &option.name,
                    format!("dependent option '{}' is not a bool", option.dependent_option),
                ));
            }
            None => {
                return Err(ShaderError::option(
                    &option.name,
                    format!("dependent option '{}' is not declared", option.dependent_option),
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, ty: OptionType, default: Vec<Component>) -> OptionDecl {
        OptionDecl {
            name: name.to_string(),
            ty,
            default,
            ..Default::default()
        }
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format("{\n  \"passes\": []\n}"), ShaderFormat::PassFile);
        assert_eq!(detect_format("\u{feff}  { \"passes\": [] }"), ShaderFormat::PassFile);
        assert_eq!(detect_format("void main() { }"), ShaderFormat::Legacy);
        assert_eq!(detect_format("{ \"name\": 1 }"), ShaderFormat::Legacy);
        assert_eq!(detect_format("/* \"passes\" */ void main() {}"), ShaderFormat::Legacy);
    }

    #[test]
    fn test_build_fills_defaults() {
        let option = decl("gain", OptionType::Float, vec![Component::Float(0.5), Component::Float(1.5)])
            .build()
            .unwrap();
        assert_eq!(option.vector_size, 2);
        assert_eq!(option.ui_name, "gain");
        assert_eq!(option.min_value[0].float(), f32::MIN);
        assert_eq!(option.step_value[1].float(), DEFAULT_FLOAT_STEP);
        assert_eq!(option.value, option.default_value);
    }

    #[test]
    fn test_build_rejects_bad_vector_size() {
        let mut d = decl("v", OptionType::Int, vec![Component::Int(1); 5]);
        assert!(d.clone().build().is_err());
        d.default.truncate(2);
        d.vector_size = Some(3);
        assert!(d.build().is_err());
    }

    #[test]
    fn test_build_rejects_default_out_of_bounds() {
        let mut d = decl("level", OptionType::Int, vec![Component::Int(10)]);
        d.min = Some(vec![Component::Int(0)]);
        d.max = Some(vec![Component::Int(5)]);
        let err = d.build().unwrap_err();
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn test_bool_bounds_are_fixed() {
        let option = decl("enabled", OptionType::Bool, vec![Component::Bool(true)])
            .build()
            .unwrap();
        assert_eq!(option.value[0].int(), 1);
        assert_eq!(option.max_value[0].int(), 1);
    }

    #[test]
    fn test_validate_duplicates_and_dependencies() {
        let a = decl("a", OptionType::Bool, vec![Component::Bool(false)]).build().unwrap();
        let mut b = decl("b", OptionType::Float, vec![Component::Float(1.0)]).build().unwrap();
        b.dependent_option = "a".into();
        assert!(validate_options(&[a.clone(), b.clone()]).is_ok());
        assert!(validate_options(&[a.clone(), a.clone()]).is_err());

        let mut c = b.clone();
        c.name = "c".into();
        c.dependent_option = "b".into();
        assert!(validate_options(&[a.clone(), b.clone(), c]).is_err());

        b.dependent_option = "missing".into();
        assert!(validate_options(&[a, b]).is_err());
    }
}
