//! # scriptcam
//!
//! Easing curves, camera path interpolation and the ScriptMapper bookmark
//! command codec for rhythm-game camera authoring.
//!
//! - [`data`]: the serde camera path model and built-in presets.
//! - [`easing`], [`registry`]: the easing catalog.
//! - [`interpolate`]: pose at a normalized time.
//! - [`codec`], [`export`]: bookmark commands and level JSON.
//! - [`beats`]: tempo arithmetic.
//! - [`animation`]: playback through the `keyframe` crate.

pub mod animation;

pub use animation::{CameraAnimation, CameraPose, SegmentEasing};
pub use scriptcam_core::*;
