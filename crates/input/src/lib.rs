//! User controls: actions, and the reducer that turns them into new control
//! values and controller effects.
//!
//! # Invariants
//! - Controls never mutate a config in place; every change yields a new value.
//! - Grid size and light parameters are clamped to their control ranges.

pub mod action;
pub mod control;

pub use action::Action;
pub use control::{ControlState, Effect, Outcome, dispatch};

pub fn crate_info() -> &'static str {
    "voxscape-input v0.1.0"
}
