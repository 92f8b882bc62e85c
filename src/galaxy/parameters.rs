use std::fmt;

use bevy::prelude::*;

use crate::error::{GalaxyError, Result};

#[derive(Clone, PartialEq, Debug)]
pub struct GalaxyParameters {
    pub quantity: u32,
    pub size: f32,
    pub radius: f32,
    pub branches: u32,
    pub spin: f32,
    /// Exposed in the panel but not read by point placement; only `randomness_power`
    /// shapes the offsets.
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: Color,
    pub outside_color: Color,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            quantity: 100_000,
            size: 0.01,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 1.0,
            randomness_power: 3.0,
            inside_color: Color::srgb_u8(0xfd, 0xb0, 0x5d),
            outside_color: Color::srgb_u8(0xdb, 0x52, 0xf4),
        }
    }
}

impl GalaxyParameters {
    // Widget bounds. Color fields are unbounded and only hold placeholders here.
    pub const MIN: Self = Self {
        quantity: 100,
        size: 0.01,
        radius: 1.0,
        branches: 2,
        spin: -10.0,
        randomness: 0.01,
        randomness_power: -5.0,
        inside_color: Color::BLACK,
        outside_color: Color::BLACK,
    };
    pub const MAX: Self = Self {
        quantity: 100_000,
        size: 0.05,
        radius: 10.0,
        branches: 20,
        spin: 10.0,
        randomness: 10.0,
        randomness_power: 5.0,
        inside_color: Color::WHITE,
        outside_color: Color::WHITE,
    };

    /// Largest `quantity` `validate` accepts. Each point becomes a four-vertex quad, and
    /// every vertex index has to fit the `u32` index buffer.
    pub const MAX_QUANTITY: u32 = u32::MAX / 4;

    /// Checks the values point placement cannot work with. Everything else passes through.
    pub fn validate(&self) -> Result<()> {
        if self.quantity < 1 {
            return Err(GalaxyError::invalid(
                ParameterField::Quantity,
                "at least one point is required",
            ));
        }
        if self.quantity > Self::MAX_QUANTITY {
            return Err(GalaxyError::invalid(
                ParameterField::Quantity,
                format!(
                    "at most {} points are supported, got {}",
                    Self::MAX_QUANTITY,
                    self.quantity
                ),
            ));
        }
        // NaN fails both checks
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(GalaxyError::invalid(
                ParameterField::Radius,
                format!("radius must be positive and finite, got {}", self.radius),
            ));
        }
        if self.branches < 1 {
            return Err(GalaxyError::invalid(
                ParameterField::Branches,
                "at least one branch is required",
            ));
        }
        Ok(())
    }

    pub fn get(&self, field: ParameterField) -> ParameterValue {
        match field {
            ParameterField::Quantity => ParameterValue::Integer(self.quantity.into()),
            ParameterField::Size => ParameterValue::Float(self.size),
            ParameterField::Radius => ParameterValue::Float(self.radius),
            ParameterField::Branches => ParameterValue::Integer(self.branches.into()),
            ParameterField::Spin => ParameterValue::Float(self.spin),
            ParameterField::Randomness => ParameterValue::Float(self.randomness),
            ParameterField::RandomnessPower => ParameterValue::Float(self.randomness_power),
            ParameterField::InsideColor => ParameterValue::Color(self.inside_color),
            ParameterField::OutsideColor => ParameterValue::Color(self.outside_color),
        }
    }

    /// Writes `value` into `field` without range checks. Integers are accepted for float
    /// fields; the reverse is a mismatch.
    pub fn apply(&mut self, field: ParameterField, value: ParameterValue) -> Result<()> {
        match field {
            ParameterField::Quantity => self.quantity = value.to_u32(field)?,
            ParameterField::Branches => self.branches = value.to_u32(field)?,
            ParameterField::Size => self.size = value.to_f32(field)?,
            ParameterField::Radius => self.radius = value.to_f32(field)?,
            ParameterField::Spin => self.spin = value.to_f32(field)?,
            ParameterField::Randomness => self.randomness = value.to_f32(field)?,
            ParameterField::RandomnessPower => self.randomness_power = value.to_f32(field)?,
            ParameterField::InsideColor => self.inside_color = value.to_color(field)?,
            ParameterField::OutsideColor => self.outside_color = value.to_color(field)?,
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ParameterField {
    Quantity,
    Size,
    Radius,
    Branches,
    Spin,
    Randomness,
    RandomnessPower,
    InsideColor,
    OutsideColor,
}

impl ParameterField {
    pub const ALL: [Self; 9] = [
        Self::Quantity,
        Self::Size,
        Self::Radius,
        Self::Branches,
        Self::Spin,
        Self::Randomness,
        Self::RandomnessPower,
        Self::InsideColor,
        Self::OutsideColor,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Quantity => "quantity",
            Self::Size => "size",
            Self::Radius => "radius",
            Self::Branches => "branches",
            Self::Spin => "spin",
            Self::Randomness => "randomness",
            Self::RandomnessPower => "randomnessPower",
            Self::InsideColor => "insideColor",
            Self::OutsideColor => "outsideColor",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, Self::Quantity | Self::Branches)
    }

    pub fn is_color(self) -> bool {
        matches!(self, Self::InsideColor | Self::OutsideColor)
    }

    pub fn step(self) -> Option<f64> {
        match self {
            Self::Quantity => Some(10.0),
            Self::Size => Some(0.01),
            Self::Radius => Some(1.0),
            Self::Branches => Some(1.0),
            Self::Spin => Some(0.001),
            Self::Randomness => Some(0.01),
            Self::RandomnessPower => Some(0.001),
            Self::InsideColor | Self::OutsideColor => None,
        }
    }

    /// Slider bounds for numeric fields, `None` for colors.
    pub fn bounds(self) -> Option<ParameterBounds> {
        Some(ParameterBounds {
            min: GalaxyParameters::MIN.get(self).as_f64()?,
            max: GalaxyParameters::MAX.get(self).as_f64()?,
            step: self.step()?,
        })
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ParameterBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ParameterValue {
    Integer(i64),
    Float(f32),
    Color(Color),
}

impl ParameterValue {
    /// Builds the value kind `field` stores from a slider reading.
    pub fn number(field: ParameterField, value: f64) -> Self {
        if field.is_integer() {
            Self::Integer(value.round() as i64)
        } else {
            Self::Float(value as f32)
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Integer(v) => Some(v as f64),
            Self::Float(v) => Some(v.into()),
            Self::Color(_) => None,
        }
    }

    fn to_u32(self, field: ParameterField) -> Result<u32> {
        match self {
            Self::Integer(v) => u32::try_from(v)
                .map_err(|_| GalaxyError::invalid(field, format!("{v} is out of range"))),
            _ => Err(GalaxyError::ValueMismatch {
                field,
                expected: "an integer",
            }),
        }
    }

    fn to_f32(self, field: ParameterField) -> Result<f32> {
        match self {
            Self::Float(v) => Ok(v),
            Self::Integer(v) => Ok(v as f32),
            Self::Color(_) => Err(GalaxyError::ValueMismatch {
                field,
                expected: "a number",
            }),
        }
    }

    fn to_color(self, field: ParameterField) -> Result<Color> {
        match self {
            Self::Color(c) => Ok(c),
            _ => Err(GalaxyError::ValueMismatch {
                field,
                expected: "a color",
            }),
        }
    }
}

impl From<u32> for ParameterValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f32> for ParameterValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<Color> for ParameterValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}
