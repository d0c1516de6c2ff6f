//! Style values consumed and produced by scale correctors.
//!
//! Correctors receive the raw value a host read from computed style and may
//! rewrite it into a form that stays visually correct under non-uniform
//! scale (e.g. a pixel border-radius becomes a dual-percentage radius).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::boxes::Point;

/// Lightweight kind enum for quick dispatch without destructuring.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StyleValueKind {
    Number,
    Px,
    Percent,
    RadiusPercent,
    Shadow,
    Keyword,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum StyleValue {
    /// Unitless number (e.g. opacity, border-image widths).
    Number(f32),

    /// Pixel length.
    Px(f32),

    /// Single percentage (already scale-proof for radii).
    Percent(f32),

    /// Dual-percentage border radius: horizontal / vertical percentages of
    /// the element's own box.
    RadiusPercent { x: f32, y: f32 },

    /// A parsed box-shadow.
    Shadow(BoxShadow),

    /// Anything the engine does not interpret (colors, keywords); passed
    /// through untouched.
    Keyword(String),
}

impl StyleValue {
    #[inline]
    pub fn kind(&self) -> StyleValueKind {
        match self {
            StyleValue::Number(_) => StyleValueKind::Number,
            StyleValue::Px(_) => StyleValueKind::Px,
            StyleValue::Percent(_) => StyleValueKind::Percent,
            StyleValue::RadiusPercent { .. } => StyleValueKind::RadiusPercent,
            StyleValue::Shadow(_) => StyleValueKind::Shadow,
            StyleValue::Keyword(_) => StyleValueKind::Keyword,
        }
    }

    /// Pixel magnitude, if this value carries one.
    #[inline]
    pub fn as_px(&self) -> Option<f32> {
        match self {
            StyleValue::Px(v) | StyleValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(v) => write!(f, "{v}"),
            StyleValue::Px(v) => write!(f, "{v}px"),
            StyleValue::Percent(v) => write!(f, "{v}%"),
            StyleValue::RadiusPercent { x, y } => write!(f, "{x}% / {y}%"),
            StyleValue::Shadow(s) => write!(f, "{s}"),
            StyleValue::Keyword(s) => write!(f, "{s}"),
        }
    }
}

/// One box-shadow, with the color kept as an uninterpreted string (color
/// mixing is the value-animation layer's job, not ours).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct BoxShadow {
    pub offset: Point,
    pub blur: f32,
    pub spread: f32,
    #[serde(default)]
    pub color: Option<String>,
}

impl fmt::Display for BoxShadow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}px {}px {}px {}px",
            self.offset.x, self.offset.y, self.blur, self.spread
        )?;
        if let Some(color) = &self.color {
            write!(f, " {color}")?;
        }
        Ok(())
    }
}

/// Split on whitespace without breaking inside parentheses, so
/// `rgba(0, 0, 0, 0.5)` stays one token.
fn split_shadow_tokens(s: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in s.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn parse_length(token: &str) -> Option<f32> {
    let t = token.strip_suffix("px").unwrap_or(token);
    f32::from_str(t).ok()
}

impl FromStr for BoxShadow {
    type Err = String;

    /// Lenient parse of `offset-x offset-y blur? spread? color?` in any
    /// interleaving of lengths and color tokens. Lengths are consumed in
    /// declaration order; everything else is joined into the color.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("empty box-shadow".to_string());
        }
        let mut lengths: Vec<f32> = Vec::new();
        let mut color_parts: Vec<String> = Vec::new();
        for token in split_shadow_tokens(s) {
            match parse_length(&token) {
                Some(v) if lengths.len() < 4 => lengths.push(v),
                _ => color_parts.push(token),
            }
        }
        if lengths.len() < 2 {
            return Err(format!("box-shadow needs two offsets: {s:?}"));
        }
        Ok(BoxShadow {
            offset: Point::new(lengths[0], lengths[1]),
            blur: lengths.get(2).copied().unwrap_or(0.0),
            spread: lengths.get(3).copied().unwrap_or(0.0),
            color: if color_parts.is_empty() {
                None
            } else {
                Some(color_parts.join(" "))
            },
        })
    }
}
