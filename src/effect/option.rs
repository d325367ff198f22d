//! Typed, bounded shader options
//!
//! Values live in raw 32-bit slots exactly as the GPU reads them. The
//! option's [`OptionType`] decides whether a slot holds an `i32` or an `f32`;
//! [`Component`] is the tagged view used at the API boundary.

use serde::{Deserialize, Serialize};

use crate::utils::MAX_VECTOR_COMPONENTS;

/// Option value kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Malformed or unrecognized declaration, excluded from layout and config strings
    #[default]
    #[serde(skip)]
    Invalid,
    Bool,
    Int,
    Float,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Invalid => "invalid",
            OptionType::Bool => "bool",
            OptionType::Int => "int",
            OptionType::Float => "float",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, OptionType::Int | OptionType::Float)
    }
}

/// One 32-bit component slot, holding either an `i32` or an `f32` bit pattern
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Value(u32);

impl Value {
    pub const fn from_int(v: i32) -> Self {
        Self(v as u32)
    }

    pub fn from_float(v: f32) -> Self {
        Self(v.to_bits())
    }

    pub const fn from_bool(v: bool) -> Self {
        Self(v as u32)
    }

    pub const fn int(self) -> i32 {
        self.0 as i32
    }

    pub fn float(self) -> f32 {
        f32::from_bits(self.0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }
}

pub type ValueVector = [Value; MAX_VECTOR_COMPONENTS];

/// Tagged view of a single component
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Component {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl Component {
    /// Reinterpret a raw slot according to `ty`
    pub fn from_value(ty: OptionType, value: Value) -> Option<Self> {
        match ty {
            OptionType::Bool => Some(Component::Bool(value.int() != 0)),
            OptionType::Int => Some(Component::Int(value.int())),
            OptionType::Float => Some(Component::Float(value.float())),
            OptionType::Invalid => None,
        }
    }

    pub fn to_value(self) -> Value {
        match self {
            Component::Bool(v) => Value::from_bool(v),
            Component::Int(v) => Value::from_int(v),
            Component::Float(v) => Value::from_float(v),
        }
    }

    /// The 32-bit word written into the uniform buffer
    pub fn to_word(self) -> u32 {
        match self {
            Component::Bool(v) => v as u32,
            Component::Int(v) => v as u32,
            Component::Float(v) => v.to_bits(),
        }
    }

    pub fn option_type(&self) -> OptionType {
        match self {
            Component::Bool(_) => OptionType::Bool,
            Component::Int(_) => OptionType::Int,
            Component::Float(_) => OptionType::Float,
        }
    }
}

/// A named, typed, user-adjustable effect parameter
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShaderOption {
    /// Machine identifier, unique within an effect
    pub name: String,
    /// Display label
    pub ui_name: String,
    /// Name of a bool option gating this one; empty means unconditional
    pub dependent_option: String,
    pub ty: OptionType,
    /// Number of meaningful slots, 1..=4
    pub vector_size: u32,
    pub default_value: ValueVector,
    pub min_value: ValueVector,
    pub max_value: ValueVector,
    pub step_value: ValueVector,
    pub value: ValueVector,
}

impl ShaderOption {
    pub fn is_valid(&self) -> bool {
        self.ty != OptionType::Invalid
            && (1..=MAX_VECTOR_COMPONENTS as u32).contains(&self.vector_size)
    }

    /// Meaningful component count, 0 for invalid options
    pub fn components(&self) -> usize {
        if self.is_valid() {
            self.vector_size as usize
        } else {
            0
        }
    }

    /// Bytes this option contributes to the uniform block
    pub fn uniform_size(&self) -> u32 {
        self.components() as u32 * crate::utils::UNIFORM_COMPONENT_SIZE
    }

    pub fn component(&self, index: usize) -> Option<Component> {
        if index >= self.components() {
            return None;
        }
        Component::from_value(self.ty, self.value[index])
    }

    pub fn default_component(&self, index: usize) -> Option<Component> {
        if index >= self.components() {
            return None;
        }
        Component::from_value(self.ty, self.default_value[index])
    }

    /// Current values of the meaningful components
    pub fn current(&self) -> Vec<Component> {
        (0..self.components())
            .filter_map(|i| self.component(i))
            .collect()
    }

    /// Assign one component, clamping numeric values into `[min, max]`.
    /// Returns false if the index is out of range or the kind does not match.
    pub fn set_component(&mut self, index: usize, component: Component) -> bool {
        if index >= self.components() || component.option_type() != self.ty {
            return false;
        }
        self.value[index] = self.clamp_component(index, component).to_value();
        true
    }

    pub fn clamp_component(&self, index: usize, component: Component) -> Component {
        match component {
            Component::Bool(v) => Component::Bool(v),
            Component::Int(v) => {
                let lo = self.min_value[index].int();
                let hi = self.max_value[index].int();
                Component::Int(v.max(lo).min(hi))
            }
            Component::Float(v) => {
                let lo = self.min_value[index].float();
                let hi = self.max_value[index].float();
                Component::Float(v.max(lo).min(hi))
            }
        }
    }

    /// The bool state used for dependency gating
    pub fn is_enabled(&self) -> bool {
        self.ty == OptionType::Bool && self.vector_size >= 1 && self.value[0].int() != 0
    }

    pub fn reset_to_default(&mut self) {
        self.value = self.default_value;
    }

    pub fn is_default(&self) -> bool {
        let n = self.components();
        self.value[..n] == self.default_value[..n]
    }
}
