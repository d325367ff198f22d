//! Text helpers shared by the legacy parser and the config-string codec

use once_cell::sync::Lazy;
use regex::Regex;

use crate::effect::{Component, OptionType};
use crate::utils::CONFIG_COMPONENT_SEPARATOR;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern"));

/// Option names must be plain identifiers so they survive the config string
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "true" | "True" | "TRUE" | "1" => Some(true),
        "false" | "False" | "FALSE" | "0" => Some(false),
        _ => None,
    }
}

pub fn parse_component(ty: OptionType, s: &str) -> Result<Component, String> {
    let s = s.trim();
    match ty {
        OptionType::Bool => parse_bool(s)
            .map(Component::Bool)
            .ok_or_else(|| format!("'{}' is not a bool", s)),
        OptionType::Int => s
            .parse::<i32>()
            .map(Component::Int)
            .map_err(|_| format!("'{}' is not an integer", s)),
        OptionType::Float => s
            .parse::<f32>()
            .map(Component::Float)
            .map_err(|_| format!("'{}' is not a number", s)),
        OptionType::Invalid => Err("option has no type".to_string()),
    }
}

/// Parse a comma-separated component list such as `0.5, 1.5`
pub fn parse_components(ty: OptionType, s: &str) -> Result<Vec<Component>, String> {
    if s.trim().is_empty() {
        return Err("empty value".to_string());
    }
    s.split(CONFIG_COMPONENT_SEPARATOR)
        .map(|part| parse_component(ty, part))
        .collect()
}

pub fn format_component(component: Component) -> String {
    match component {
        Component::Bool(v) => v.to_string(),
        Component::Int(v) => v.to_string(),
        // Display for f32 is the shortest text that parses back to the same bits
        Component::Float(v) => v.to_string(),
    }
}

pub fn format_components(components: &[Component]) -> String {
    components
        .iter()
        .map(|c| format_component(*c))
        .collect::<Vec<_>>()
        .join(CONFIG_COMPONENT_SEPARATOR.to_string().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("scanline_strength"));
        assert!(is_identifier("_x2"));
        assert!(!is_identifier("2x"));
        assert!(!is_identifier("a=b"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_parse_components() {
        assert_eq!(
            parse_components(OptionType::Float, "0.5, 1.5").unwrap(),
            vec![Component::Float(0.5), Component::Float(1.5)]
        );
        assert_eq!(parse_components(OptionType::Int, "-3").unwrap(), vec![Component::Int(-3)]);
        assert_eq!(parse_components(OptionType::Bool, "1").unwrap(), vec![Component::Bool(true)]);
        assert!(parse_components(OptionType::Int, "1.5").is_err());
        assert!(parse_components(OptionType::Float, "1,,2").is_err());
        assert!(parse_components(OptionType::Float, "").is_err());
    }

    #[test]
    fn test_float_text_is_lossless() {
        for v in [0.1f32, 1.0 / 3.0, -0.0, 1.0e-7, f32::MAX, 16777217.0] {
            let text = format_component(Component::Float(v));
            let back: f32 = text.parse().unwrap();
            assert_eq!(back.to_bits(), v.to_bits(), "{}", text);
        }
    }
}
