//! Scene, keyboard and HUD systems
//!
//! - `setup` - Range and dart spawning
//! - `input` - Reset key
//! - `hud` - Status text

pub mod hud;
pub mod input;
pub mod setup;

pub use hud::*;
pub use input::*;
pub use setup::*;
