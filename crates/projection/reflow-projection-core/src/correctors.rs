//! Scale correction registry.
//!
//! Raw style values distort under non-uniform scale: a pixel border-radius
//! stretches with the longer axis, shadows smear when their owner is scaled.
//! Correctors rewrite such values using the node's target box, projection
//! delta and tree scale so they stay visually correct for free.
//!
//! The registry is constructor-injected into each engine instance (no
//! process-wide singleton), additive via [`CorrectorRegistry::register`],
//! and read-only during a correction pass.

use hashbrown::HashMap;
use std::fmt;

use reflow_api_core::{BoxDelta, LayoutBox, Point, ProjectionError, StyleValue};

/// Geometry context for one correction pass over one node.
#[derive(Copy, Clone, Debug)]
pub struct CorrectionContext<'a> {
    /// The box the node should occupy once animation completes.
    pub target: &'a LayoutBox,
    /// Current projection delta, if one was computed this frame.
    pub delta: Option<&'a BoxDelta>,
    /// Cumulative ancestor scale.
    pub tree_scale: Point,
}

impl<'a> CorrectionContext<'a> {
    /// Total rendered scale per axis: own delta scale times tree scale.
    fn render_scale(&self) -> Point {
        let (dx, dy) = match self.delta {
            Some(d) => (d.x.scale, d.y.scale),
            None => (1.0, 1.0),
        };
        Point::new(dx * self.tree_scale.x, dy * self.tree_scale.y)
    }
}

/// A value-specific corrector keyed by style property name.
pub trait ScaleCorrector {
    /// Rewrite `raw` so it renders undistorted under the context's scale.
    fn correct(&self, raw: &StyleValue, ctx: &CorrectionContext<'_>) -> StyleValue;

    /// Additional property names that should receive the corrected value.
    fn apply_to(&self) -> Option<&[&'static str]> {
        None
    }
}

/// Per-engine corrector table.
#[derive(Default)]
pub struct CorrectorRegistry {
    entries: HashMap<String, Box<dyn ScaleCorrector>>,
}

impl fmt::Debug for CorrectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorrectorRegistry")
            .field("properties", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CorrectorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in set: border-radius (and corners), box-shadow and
    /// border-width.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("border-radius", Box::new(BorderRadiusCorrector));
        for corner in [
            "border-top-left-radius",
            "border-top-right-radius",
            "border-bottom-left-radius",
            "border-bottom-right-radius",
        ] {
            registry.register(corner, Box::new(BorderRadiusCorrector));
        }
        registry.register("box-shadow", Box::new(BoxShadowCorrector));
        registry.register("border-width", Box::new(BorderWidthCorrector));
        registry
    }

    pub fn register(&mut self, property: &str, corrector: Box<dyn ScaleCorrector>) {
        self.entries.insert(property.to_string(), corrector);
    }

    /// Property names with a registered corrector; these are the style
    /// properties the engine snapshots and re-reads on measurement.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn get(&self, property: &str) -> Option<&dyn ScaleCorrector> {
        self.entries.get(property).map(|b| b.as_ref())
    }

    /// Correct one value. Without a context (non-projecting node) the raw
    /// value passes through unchanged.
    pub fn correct(
        &self,
        property: &str,
        raw: &StyleValue,
        ctx: Option<&CorrectionContext<'_>>,
    ) -> StyleValue {
        match (self.entries.get(property), ctx) {
            (Some(corrector), Some(ctx)) => corrector.correct(raw, ctx),
            (Some(_), None) => {
                log::debug!(
                    "{}",
                    ProjectionError::CorrectorMissingTarget(property.to_string())
                );
                raw.clone()
            }
            _ => raw.clone(),
        }
    }
}

/// Converts pixel radii to percentages of the target box, which scale
/// correctly without repaints. Percentage radii pass through.
pub struct BorderRadiusCorrector;

impl ScaleCorrector for BorderRadiusCorrector {
    fn correct(&self, raw: &StyleValue, ctx: &CorrectionContext<'_>) -> StyleValue {
        let Some(px) = raw.as_px() else {
            return raw.clone();
        };
        let width = ctx.target.width();
        let height = ctx.target.height();
        if width <= f32::EPSILON || height <= f32::EPSILON {
            return raw.clone();
        }
        StyleValue::RadiusPercent {
            x: px / width * 100.0,
            y: px / height * 100.0,
        }
    }
}

/// Divides shadow offsets by the per-axis render scale and blur/spread by the
/// mean scale so shadows do not stretch with their owner.
pub struct BoxShadowCorrector;

impl ScaleCorrector for BoxShadowCorrector {
    fn correct(&self, raw: &StyleValue, ctx: &CorrectionContext<'_>) -> StyleValue {
        let shadow = match raw {
            StyleValue::Shadow(s) => s.clone(),
            StyleValue::Keyword(s) => match s.parse() {
                Ok(parsed) => parsed,
                Err(_) => return raw.clone(),
            },
            _ => return raw.clone(),
        };
        let scale = ctx.render_scale();
        let sx = if scale.x.abs() <= f32::EPSILON { 1.0 } else { scale.x };
        let sy = if scale.y.abs() <= f32::EPSILON { 1.0 } else { scale.y };
        let mean = (sx + sy) / 2.0;
        StyleValue::Shadow(reflow_api_core::BoxShadow {
            offset: Point::new(shadow.offset.x / sx, shadow.offset.y / sy),
            blur: shadow.blur / mean,
            spread: shadow.spread / mean,
            color: shadow.color,
        })
    }
}

/// Divides pixel border widths by the mean render scale.
pub struct BorderWidthCorrector;

impl ScaleCorrector for BorderWidthCorrector {
    fn correct(&self, raw: &StyleValue, ctx: &CorrectionContext<'_>) -> StyleValue {
        let Some(px) = raw.as_px() else {
            return raw.clone();
        };
        let scale = ctx.render_scale();
        let mean = (scale.x + scale.y) / 2.0;
        if mean.abs() <= f32::EPSILON {
            return raw.clone();
        }
        StyleValue::Px(px / mean)
    }
}
