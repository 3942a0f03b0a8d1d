//! Camera-related types and components
//!
//! This module contains the main camera marker component.

use bevy::prelude::*;

/// Marker component for the camera the player throws from
#[derive(Component)]
pub struct MainCamera;
