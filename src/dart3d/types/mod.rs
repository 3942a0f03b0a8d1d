//! Type definitions for the dart thrower
//!
//! This module is organized into submodules:
//! - `dart` - Dart components and spawn pose
//! - `camera` - Camera-related components
//! - `settings` - Throw settings and their RON file format
//! - `ui` - HUD components and the last-launch record

pub mod camera;
pub mod dart;
pub mod settings;
pub mod ui;

// Re-export all public types for convenient access
pub use camera::*;
pub use dart::*;
pub use settings::*;
pub use ui::*;
