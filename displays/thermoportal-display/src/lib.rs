//! Display abstraction and screen model for Thermoportal
//!
//! This crate provides:
//! - `DisplayBackend` trait for drawing text on a panel
//! - `GraphicsBackend`, an implementation over any `embedded-graphics` target
//! - `Screen`, `View` and `Label`: a small retained scene of text labels
//! - Word wrapping and text box layout helpers
//! - Backlight level handling
//!
//! # Architecture
//!
//! Application code only mutates labels on a `Screen`. The firmware renders
//! the screen to its `DisplayBackend` when it is dirty, so the control loop
//! never talks to the panel directly.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod backend;
pub mod backlight;
pub mod color;
pub mod label;
pub mod layout;
pub mod screen;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError, GraphicsBackend, LINE_HEIGHT};
pub use backlight::Backlight;
pub use label::{Label, TemperaturePanel, LABEL_LEN};
pub use layout::{text_box, wrap_nicely};
pub use screen::{LabelId, Screen, ViewId};
