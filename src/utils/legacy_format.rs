//! Legacy single-file shaders
//!
//! The whole file is one pass. Options are declared in a comment block:
//!
//! ```text
//! /*
//! [configuration]
//! [OptionRangeFloat]
//! GUIName = Scanline Strength
//! OptionName = SCANLINE_STRENGTH
//! MinValue = 0.0
//! MaxValue = 1.0
//! StepAmount = 0.05
//! DefaultValue = 0.5
//! [/configuration]
//! */
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::effect::{OptionType, Pass, ShaderOption};
use crate::utils::formats::{validate_options, OptionDecl};
use crate::utils::text::parse_components;
use crate::utils::{
    ShaderError, LEGACY_CONFIG_BEGIN, LEGACY_CONFIG_END, LEGACY_SECTION_BOOL, LEGACY_SECTION_FLOAT,
    LEGACY_SECTION_INT,
};

static SECTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[\s*([A-Za-z_][A-Za-z0-9_]*)\s*\]$").expect("section pattern"));
static KEY_VALUE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*)$").expect("key/value pattern"));

/// Parse a legacy shader into its single pass and declared options
pub fn parse(code: &str) -> Result<(Pass, Vec<ShaderOption>), ShaderError> {
    if code.trim().is_empty() {
        return Err(ShaderError::ValidationError(
            "Shader source is empty".to_string(),
        ));
    }
    let options = parse_options(code)?;
    Ok((Pass::new(code), options))
}

/// Extract options from the `[configuration]` block, if any
pub fn parse_options(code: &str) -> Result<Vec<ShaderOption>, ShaderError> {
    let Some(block) = configuration_block(code)? else {
        log::debug!("[LegacyFormat] Legacy shader has no configuration block");
        return Ok(Vec::new());
    };

    let mut options = Vec::new();
    let mut section: Option<Section> = None;

    for (line_no, line) in block {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
            continue;
        }

        if let Some(caps) = SECTION_LINE.captures(line) {
            if let Some(Section::Option(decl)) = section.take() {
                options.push(decl.build()?);
            }
            section = Some(Section::begin(&caps[1]));
            continue;
        }

        if let Some(Section::Ignored(name)) = &section {
            log::debug!("[LegacyFormat] Skipping line {} in unsupported section [{}]", line_no, name);
            continue;
        }

        let Some(caps) = KEY_VALUE_LINE.captures(line) else {
            return Err(ShaderError::ValidationError(format!(
                "line {}: expected 'Key = Value', found '{}'",
                line_no, line
            )));
        };

        match section.as_mut() {
            None => {
                return Err(ShaderError::ValidationError(format!(
                    "line {}: '{}' appears outside of an option section",
                    line_no, &caps[1]
                )));
            }
            Some(Section::Ignored(_)) => {}
            Some(Section::Option(decl)) => apply_key(decl, &caps[1], caps[2].trim(), line_no)?,
        }
    }

    if let Some(Section::Option(decl)) = section.take() {
        options.push(decl.build()?);
    }

    validate_options(&options)?;
    log::debug!("[LegacyFormat] Parsed {} legacy option(s)", options.len());
    Ok(options)
}

enum Section {
    Option(OptionDecl),
    Ignored(String),
}

impl Section {
    fn begin(name: &str) -> Self {
        let ty = match name {
            LEGACY_SECTION_BOOL => OptionType::Bool,
            LEGACY_SECTION_INT => OptionType::Int,
            LEGACY_SECTION_FLOAT => OptionType::Float,
            other => {
                log::warn!("[LegacyFormat] Ignoring unknown legacy section [{}]", other);
                return Section::Ignored(other.to_string());
            }
        };
        Section::Option(OptionDecl {
            ty,
            ..Default::default()
        })
    }
}

fn apply_key(decl: &mut OptionDecl, key: &str, value: &str, line_no: usize) -> Result<(), ShaderError> {
    let ty = decl.ty;
    let components = |field: &str| {
        parse_components(ty, value).map_err(|e| {
            ShaderError::ValidationError(format!("line {}: {} {}", line_no, field, e))
        })
    };

    match key {
        "GUIName" => decl.ui_name = Some(value.to_string()),
        "OptionName" => decl.name = value.to_string(),
        "DependentOption" => decl.dependent_option = value.to_string(),
        "DefaultValue" => decl.default = components(key)?,
        "MinValue" => decl.min = Some(components(key)?),
        "MaxValue" => decl.max = Some(components(key)?),
        "StepAmount" => decl.step = Some(components(key)?),
        other => log::warn!("[LegacyFormat] line {}: ignoring unknown key '{}'", line_no, other),
    }
    Ok(())
}

/// Lines strictly between the block markers, with 1-based line numbers
fn configuration_block(code: &str) -> Result<Option<Vec<(usize, &str)>>, ShaderError> {
    let mut lines = code.lines().enumerate().map(|(i, l)| (i + 1, l));

    if !lines.any(|(_, l)| l.trim() == LEGACY_CONFIG_BEGIN) {
        return Ok(None);
    }

    let mut block = Vec::new();
    for (line_no, line) in lines {
        if line.trim() == LEGACY_CONFIG_END {
            return Ok(Some(block));
        }
        block.push((line_no, line));
    }

    Err(ShaderError::ValidationError(format!(
        "{} block is not closed by {}",
        LEGACY_CONFIG_BEGIN, LEGACY_CONFIG_END
    )))
}
