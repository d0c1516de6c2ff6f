//! Error taxonomy for the projection engine.
//!
//! Every variant is recovered locally by the engine (degrade-and-continue);
//! none of them propagates to the host as a hard failure. A missed animation
//! frame beats a broken layout.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// The host cannot report geometry (element detached, display:none
    /// ancestor). Delta propagation to descendants is suspended, never
    /// zeroed.
    #[error("measurement unavailable: {0}")]
    MeasurementUnavailable(String),

    /// The before-box has a zero-sized axis; scale is treated as 1.
    #[error("degenerate before-box (zero-sized axis)")]
    DegenerateBox,

    /// More nodes share a layout id than the expected lead/follow pair; the
    /// newest pair is kept and older followers are dropped without animating.
    #[error("shared layout id collision on {0:?}")]
    SharedIdCollision(String),

    /// A scale corrector ran against a non-projecting node; the raw value is
    /// passed through unchanged.
    #[error("corrector for {0:?} invoked without a projection target")]
    CorrectorMissingTarget(String),
}
