//! Reflow Projection Core (engine-agnostic)
//!
//! A layout projection engine: elements appear to animate between two layout
//! states (size, position, radius, shadow) without layout-triggering style
//! animation. Geometry is measured before and after a layout-affecting
//! mutation, the inverse transform is computed and applied instantly, and the
//! transform is animated back to identity (FLIP), generalized to trees,
//! shared elements and non-uniform scale.
//!
//! The host supplies measurement, style reads and patch writes through the
//! [`Host`] trait and drives one [`ProjectionEngine::run_frame`] per display
//! frame.

pub mod config;
pub mod correctors;
pub mod engine;
pub mod group;
pub mod host;
pub mod ids;
pub mod node;
pub mod outputs;
pub mod relative;
pub mod scheduler;
pub mod shared;
pub mod snapshot;

// Re-exports for consumers (adapters)
pub use config::Config;
pub use correctors::{
    BorderRadiusCorrector, BorderWidthCorrector, BoxShadowCorrector, CorrectionContext,
    CorrectorRegistry, ScaleCorrector,
};
pub use engine::ProjectionEngine;
pub use host::{FramePatch, Host};
pub use ids::{GroupId, NodeId};
pub use node::{NodeOptions, NodeOptionsPatch, TransitionMode};
pub use outputs::{FrameOutputs, ProjectionEvent};
pub use scheduler::Phase;
pub use reflow_api_core::{
    Axis, AxisDelta, BoxDelta, BoxShadow, LayoutBox, Point, ProjectionError, StyleValue,
};
