//! Sculpture parameters: declarations, values and validation
//!
//! Each sculpture declares its parameters once, in order, as integer
//! sliders, float sliders or colors. A parameter set is a map from name to
//! value that serializes to plain JSON:
//!
//! ```json
//! { "num_ribs": 60, "rib_bend": -2.5, "background_color": [0.7, 0.85, 1.0] }
//! ```

use crate::{Error, Result};
use ribbed_core::color::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single parameter value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Color(Color),
}

impl ParamValue {
    /// Parse `50`, `0.25` or `r,g,b`
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.contains(',') {
            let channels: Vec<f64> = text
                .split(',')
                .map(|c| c.trim().parse::<f64>())
                .collect::<std::result::Result<_, _>>()
                .ok()?;
            return match channels[..] {
                [r, g, b] => Some(ParamValue::Color(Color::new(r, g, b))),
                _ => None,
            };
        }
        if let Ok(value) = text.parse::<i64>() {
            return Some(ParamValue::Int(value));
        }
        text.parse::<f64>().ok().map(ParamValue::Float)
    }

    fn kind_name(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "an integer",
            ParamValue::Float(_) => "a float",
            ParamValue::Color(_) => "a color",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Color(c) => write!(f, "{},{},{}", c.r, c.g, c.b),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<Color> for ParamValue {
    fn from(value: Color) -> Self {
        ParamValue::Color(value)
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// How a parameter is presented and which values it accepts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ParamKind {
    IntSlider {
        min: i64,
        max: i64,
        step: i64,
        default: i64,
    },
    FloatSlider {
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    },
    Color {
        default: Color,
    },
}

impl ParamKind {
    pub fn default_value(&self) -> ParamValue {
        match *self {
            ParamKind::IntSlider { default, .. } => ParamValue::Int(default),
            ParamKind::FloatSlider { default, .. } => ParamValue::Float(default),
            ParamKind::Color { default } => ParamValue::Color(default),
        }
    }

    /// Convert a value to this kind; integers are accepted for float sliders
    fn coerce(&self, value: ParamValue) -> Option<ParamValue> {
        match (self, value) {
            (ParamKind::IntSlider { .. }, ParamValue::Int(_))
            | (ParamKind::FloatSlider { .. }, ParamValue::Float(_))
            | (ParamKind::Color { .. }, ParamValue::Color(_)) => Some(value),
            (ParamKind::FloatSlider { .. }, ParamValue::Int(v)) => {
                Some(ParamValue::Float(v as f64))
            }
            _ => None,
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            ParamKind::IntSlider { .. } => "an integer",
            ParamKind::FloatSlider { .. } => "a number",
            ParamKind::Color { .. } => "a color",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::IntSlider {
                min,
                max,
                step,
                default,
            } => write!(f, "int   {min}..={max} step {step}, default {default}"),
            ParamKind::FloatSlider {
                min,
                max,
                step,
                default,
            } => write!(f, "float {min}..={max} step {step}, default {default}"),
            ParamKind::Color { default } => {
                write!(f, "color default {},{},{}", default.r, default.g, default.b)
            }
        }
    }
}

/// A declared parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamDecl {
    pub name: String,
    #[serde(flatten)]
    pub kind: ParamKind,
}

/// The ordered parameter declarations of one sculpture
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ParamRegistry {
    decls: Vec<ParamDecl>,
}

impl ParamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an integer slider
    pub fn int_slider(
        &mut self,
        name: &str,
        min: i64,
        max: i64,
        step: i64,
        default: i64,
    ) -> Result<()> {
        if min > max || step <= 0 {
            return Err(Error::parameter(
                name,
                format!("invalid range {min}..={max} with step {step}"),
            ));
        }
        if !(min..=max).contains(&default) {
            return Err(Error::parameter(
                name,
                format!("default {default} outside {min}..={max}"),
            ));
        }
        self.declare(
            name,
            ParamKind::IntSlider {
                min,
                max,
                step,
                default,
            },
        )
    }

    /// Declare a float slider
    pub fn float_slider(
        &mut self,
        name: &str,
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    ) -> Result<()> {
        if !(min <= max && step > 0.0) {
            return Err(Error::parameter(
                name,
                format!("invalid range {min}..={max} with step {step}"),
            ));
        }
        if !(min..=max).contains(&default) {
            return Err(Error::parameter(
                name,
                format!("default {default} outside {min}..={max}"),
            ));
        }
        self.declare(
            name,
            ParamKind::FloatSlider {
                min,
                max,
                step,
                default,
            },
        )
    }

    /// Declare a color
    pub fn color(&mut self, name: &str, default: Color) -> Result<()> {
        self.declare(name, ParamKind::Color { default })
    }

    fn declare(&mut self, name: &str, kind: ParamKind) -> Result<()> {
        if self.get(name).is_some() {
            return Err(Error::parameter(name, "declared more than once"));
        }
        self.decls.push(ParamDecl {
            name: name.to_string(),
            kind,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ParamDecl> {
        self.decls.iter().find(|d| d.name == name)
    }

    /// Declarations in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ParamDecl> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Every parameter at its default value
    pub fn defaults(&self) -> Params {
        let mut params = Params::new();
        for decl in &self.decls {
            params.set(&decl.name, decl.kind.default_value());
        }
        params
    }

    /// Apply overrides on top of the defaults
    ///
    /// Fails if an override names an undeclared parameter or has the wrong
    /// kind of value.
    pub fn resolve(&self, overrides: &Params) -> Result<Params> {
        let mut params = self.defaults();
        for (name, value) in overrides.iter() {
            let decl = self
                .get(name)
                .ok_or_else(|| Error::parameter(name, "unknown parameter"))?;
            let value = decl.kind.coerce(*value).ok_or_else(|| {
                Error::parameter(
                    name,
                    format!(
                        "expected {}, got {}",
                        decl.kind.expected(),
                        value.kind_name()
                    ),
                )
            })?;
            params.set(name, value);
        }
        Ok(params)
    }
}

// ============================================================================
// Values
// ============================================================================

/// A set of parameter values by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) -> &mut Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Builder-style [`Params::set`]
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a value from a `name=value` assignment
    pub fn assign(&mut self, assignment: &str) -> Result<()> {
        let (name, text) = assignment
            .split_once('=')
            .ok_or_else(|| Error::parameter(assignment, "expected NAME=VALUE"))?;
        let name = name.trim();
        let value = ParamValue::parse(text)
            .ok_or_else(|| Error::parameter(name, format!("cannot parse value '{text}'")))?;
        self.set(name, value);
        Ok(())
    }

    /// Overwrite values with those of `other`
    pub fn merge(&mut self, other: &Params) {
        for (name, value) in other.iter() {
            self.values.insert(name.clone(), *value);
        }
    }

    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.values.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, name: &str) -> Result<ParamValue> {
        self.get(name)
            .ok_or_else(|| Error::parameter(name, "not set"))
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        match self.require(name)? {
            ParamValue::Int(v) => Ok(v),
            other => Err(Error::parameter(
                name,
                format!("expected an integer, got {}", other.kind_name()),
            )),
        }
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        match self.require(name)? {
            ParamValue::Float(v) => Ok(v),
            ParamValue::Int(v) => Ok(v as f64),
            ParamValue::Color(_) => Err(Error::parameter(name, "expected a number, got a color")),
        }
    }

    pub fn color(&self, name: &str) -> Result<Color> {
        match self.require(name)? {
            ParamValue::Color(c) => Ok(c),
            other => Err(Error::parameter(
                name,
                format!("expected a color, got {}", other.kind_name()),
            )),
        }
    }
}
