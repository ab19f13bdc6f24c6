//! Question record model and key-feature parsing.
//!
//! The question JSON is the sole input contract of the plotting side:
//! an array of objects carrying at least `equation`, `key_features` and
//! `question_choice`. Key features arrive as display strings (`"(2, 1)"`,
//! `"x = 2"`) and are converted to numbers here; each malformed field is
//! a `Data` error naming the field, so one bad record can be reported
//! and skipped without aborting a batch.

use serde::{Deserialize, Serialize};

use crate::error::{QuadError, QuadResult};
use crate::expr::Equation;

/// One generated question, in the shape the generator LLM emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub equation: String,
    pub key_features: KeyFeatures,
    pub question_choice: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_a: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_b: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_d: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parabola_type: Option<String>,
}

/// Key features as display strings, exactly as generated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyFeatures {
    pub vertex: Option<String>,
    pub axis_of_symmetry: Option<String>,
    pub x_intercepts: Vec<String>,
    pub y_intercept: Option<String>,
}

/// Key features converted to numbers, ready for annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPoints {
    pub vertex: (f64, f64),
    pub axis_of_symmetry: f64,
    pub x_intercepts: Vec<f64>,
    pub y_intercept: f64,
}

impl KeyPoints {
    pub fn from_features(features: &KeyFeatures) -> QuadResult<Self> {
        let vertex_str = features
            .vertex
            .as_deref()
            .ok_or_else(|| QuadError::data("vertex", "missing"))?;
        let coords = scan_floats(vertex_str);
        if coords.len() < 2 {
            return Err(QuadError::data(
                "vertex",
                format!("expected an (x, y) pair, got `{vertex_str}`"),
            ));
        }
        let vertex = (coords[0], coords[1]);

        let axis_str = features
            .axis_of_symmetry
            .as_deref()
            .ok_or_else(|| QuadError::data("axis_of_symmetry", "missing"))?;
        // Typically "x = 2"; accept a bare number as well.
        let axis_value = axis_str.rsplit('=').next().unwrap_or(axis_str).trim();
        let axis_of_symmetry = parse_number(axis_value).ok_or_else(|| {
            QuadError::data(
                "axis_of_symmetry",
                format!("cannot read a number from `{axis_str}`"),
            )
        })?;

        let mut x_intercepts = Vec::with_capacity(features.x_intercepts.len());
        for raw in &features.x_intercepts {
            let value = parse_number(raw).ok_or_else(|| {
                QuadError::data("x_intercepts", format!("cannot parse `{raw}` as a number"))
            })?;
            x_intercepts.push(value);
        }

        let y_str = features
            .y_intercept
            .as_deref()
            .ok_or_else(|| QuadError::data("y_intercept", "missing"))?;
        let y_intercept = parse_number(y_str).ok_or_else(|| {
            QuadError::data("y_intercept", format!("cannot parse `{y_str}` as a number"))
        })?;

        Ok(Self {
            vertex,
            axis_of_symmetry,
            x_intercepts,
            y_intercept,
        })
    }
}

/// Relative tolerance for the vertex consistency check.
pub const VERTEX_TOLERANCE: f64 = 1e-6;

/// Check that the equation, evaluated at the stated vertex x, reproduces
/// the stated vertex y. The key features are supplied by the generator
/// independently of the equation, so a disagreement means the record
/// would plot a curve whose annotations sit off the parabola.
pub fn verify_vertex(eq: &Equation, points: &KeyPoints) -> QuadResult<()> {
    let (vx, vy) = points.vertex;
    let y = eq.eval(vx)?;
    if (y - vy).abs() <= VERTEX_TOLERANCE * vy.abs().max(1.0) {
        Ok(())
    } else {
        Err(QuadError::data(
            "vertex",
            format!("equation gives y = {y} at x = {vx}, but stated vertex y is {vy}"),
        ))
    }
}

/// Parse a display string that should hold one number, tolerating
/// decoration like parentheses or labels around it.
fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if let Ok(v) = trimmed.parse::<f64>() {
        return Some(v);
    }
    scan_floats(trimmed).into_iter().next()
}

/// Scan every decimal number out of a display string: `"(2, -1.5)"`
/// yields `[2.0, -1.5]`. A leading `-` is taken as the sign.
fn scan_floats(s: &str) -> Vec<f64> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let mut j = i;
        if bytes[j] == b'-' {
            j += 1;
        }
        let digits_from = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > digits_from {
            if j < bytes.len() && bytes[j] == b'.' {
                j += 1;
                while j < bytes.len() && bytes[j].is_ascii_digit() {
                    j += 1;
                }
            }
            if let Ok(v) = s[start..j].parse::<f64>() {
                out.push(v);
            }
            i = j;
        } else {
            i = start + 1;
        }
    }

    out
}
