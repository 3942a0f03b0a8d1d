//! HUD components

use bevy::prelude::*;

use crate::dart3d::throw_control::DartLaunched;

/// Marker for the status text in the top-left corner
#[derive(Component)]
pub struct HudText;

/// The most recent launch, shown on the HUD
#[derive(Resource, Default)]
pub struct LastLaunch(pub Option<DartLaunched>);
