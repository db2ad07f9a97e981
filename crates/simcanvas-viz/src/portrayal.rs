//! JSON portrayal objects, as sent by a simulation server for each agent.
//!
//! ```json
//! [
//!   {"Shape": "circle", "x": 0.5, "y": 0.5, "r": 2, "Color": "Red", "Filled": "true", "Layer": 0},
//!   {"Shape": "rect", "x": 0.1, "y": 0.9, "w": 0.025, "h": 0.025, "Color": ["#AA0000"], "Filled": true},
//!   {"Shape": "agents/toddler.png", "x": 0.3, "y": 0.4, "w": 50, "h": 50, "Layer": 1}
//! ]
//! ```
//!
//! `Shape` values other than `rect` and `circle` name a custom image. `Layer`
//! is accepted and ignored; draw order is array order. A missing `Color`
//! keeps whatever style the previous shape left on the canvas.

use serde::Deserialize;

use simcanvas_engine::paint::{Color, ColorParseError};

use crate::descriptor::{Descriptor, Shape};

/// Failure to turn JSON into descriptors.
#[derive(Debug, thiserror::Error)]
pub enum PortrayalError {
    #[error("invalid portrayal JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame must be a JSON array of portrayals")]
    NotAnArray,
    #[error("`{shape}` portrayal is missing `{field}`")]
    MissingField { shape: String, field: &'static str },
    #[error("`{field}` must be a finite number")]
    NonFinite { field: &'static str },
    #[error(transparent)]
    Color(#[from] ColorParseError),
}

/// `Color` may be a single CSS color or a list of them; the first entry wins.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    One(String),
    Many(Vec<String>),
}

impl ColorSpec {
    pub fn primary(&self) -> Option<&str> {
        match self {
            ColorSpec::One(s) => Some(s),
            ColorSpec::Many(v) => v.first().map(String::as_str),
        }
    }
}

/// `Filled` may be a JSON boolean or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    /// Any non-empty string is set, `"false"` and `"0"` included.
    pub fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Text(s) => !s.is_empty(),
        }
    }
}

/// One agent's portrayal, exactly as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Portrayal {
    #[serde(rename = "Shape")]
    pub shape: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub w: Option<f32>,
    #[serde(default)]
    pub h: Option<f32>,
    #[serde(default)]
    pub r: Option<f32>,
    #[serde(rename = "Color", default)]
    pub color: Option<ColorSpec>,
    #[serde(rename = "Filled", default)]
    pub filled: Option<Flag>,
    #[serde(rename = "Layer", default)]
    pub layer: Option<f64>,
}

impl Portrayal {
    /// Resolves the shape string and the loosely typed fields into a [`Descriptor`].
    pub fn to_descriptor(&self) -> Result<Descriptor, PortrayalError> {
        finite("x", self.x)?;
        finite("y", self.y)?;

        let shape = match self.shape.as_str() {
            "rect" => Shape::Rect {
                w: self.required("w", self.w)?,
                h: self.required("h", self.h)?,
                color: self.color()?,
                filled: self.filled(),
            },
            "circle" => Shape::Circle {
                r: self.required("r", self.r)?,
                color: self.color()?,
                filled: self.filled(),
            },
            id => Shape::Image {
                id: id.to_string(),
                w: self.required("w", self.w)?,
                h: self.required("h", self.h)?,
            },
        };
        Ok(Descriptor::new(self.x, self.y, shape))
    }

    fn required(&self, field: &'static str, value: Option<f32>) -> Result<f32, PortrayalError> {
        let v = value.ok_or_else(|| PortrayalError::MissingField {
            shape: self.shape.clone(),
            field,
        })?;
        finite(field, v)
    }

    fn color(&self) -> Result<Option<Color>, PortrayalError> {
        self.color
            .as_ref()
            .and_then(ColorSpec::primary)
            .map(Color::parse_css)
            .transpose()
            .map_err(PortrayalError::from)
    }

    fn filled(&self) -> bool {
        self.filled.as_ref().is_some_and(Flag::is_set)
    }
}

fn finite(field: &'static str, v: f32) -> Result<f32, PortrayalError> {
    if v.is_finite() { Ok(v) } else { Err(PortrayalError::NonFinite { field }) }
}

/// Parses a single portrayal object.
pub fn parse_portrayal(json: &str) -> Result<Descriptor, PortrayalError> {
    let p: Portrayal = serde_json::from_str(json)?;
    p.to_descriptor()
}

/// Parses one frame (a JSON array of portrayals).
///
/// Entries that fail to parse are skipped with a warning so one bad agent does
/// not blank the whole frame. Only a frame that is not an array is an error.
pub fn parse_frame(json: &str) -> Result<Vec<Descriptor>, PortrayalError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(items) = value else {
        return Err(PortrayalError::NotAnArray);
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let parsed = serde_json::from_value::<Portrayal>(item)
            .map_err(PortrayalError::from)
            .and_then(|p| p.to_descriptor());
        match parsed {
            Ok(d) => out.push(d),
            Err(e) => log::warn!("skipping portrayal #{index}: {e}"),
        }
    }
    Ok(out)
}
