//! Throw settings and persistence
//!
//! Settings live in a RON file (JSON is accepted too). Every field has a
//! default so partial files are fine.

use std::path::Path;

use bevy::prelude::*;
use bevy_rapier3d::prelude::{CollisionGroups, Group, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::dart3d::throw_control::LaunchPolicy;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DartSettings {
    /// Launch formula and its constants.
    pub policy: LaunchPolicy,

    /// Length of the pick ray, in meters.
    pub max_pick_distance: f32,

    /// Collision groups the pick ray may hit. `None` hits everything.
    pub pick_mask: Option<u32>,

    /// Dart mass in kilograms.
    pub dart_mass: f32,

    /// Maximum roll impulse added at release. `0.0` disables it.
    pub spin_jitter: f32,

    /// Where the dart waits to be picked up.
    pub spawn_position: [f32; 3],
}

impl Default for DartSettings {
    fn default() -> Self {
        Self {
            policy: LaunchPolicy::default(),
            max_pick_distance: 100.0,
            pick_mask: None,
            dart_mass: 0.025,
            spin_jitter: 0.0,
            spawn_position: [0.0, 1.5, 0.45],
        }
    }
}

impl DartSettings {
    /// Load settings from a `.ron` or `.json` file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings file {}: {}", path.display(), e))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let settings = if is_json {
            serde_json::from_str::<Self>(&contents)
                .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?
        } else {
            Self::from_ron_str(&contents)?
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, String> {
        ron::from_str::<Self>(text).map_err(|e| format!("Failed to parse settings: {}", e))
    }

    pub fn to_ron_string(&self) -> Result<String, String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| format!("Failed to serialize settings: {}", e))
    }

    pub fn validate(&self) -> Result<(), String> {
        self.policy.validate()?;

        if !self.max_pick_distance.is_finite() || self.max_pick_distance <= 0.0 {
            return Err(format!(
                "max_pick_distance must be positive, got {}",
                self.max_pick_distance
            ));
        }
        if !self.dart_mass.is_finite() || self.dart_mass <= 0.0 {
            return Err(format!("dart_mass must be positive, got {}", self.dart_mass));
        }
        if !self.spin_jitter.is_finite() || self.spin_jitter < 0.0 {
            return Err(format!(
                "spin_jitter must be non-negative, got {}",
                self.spin_jitter
            ));
        }
        if self.spawn_position.iter().any(|c| !c.is_finite()) {
            return Err("spawn_position must be finite".to_string());
        }

        Ok(())
    }

    pub fn spawn_position(&self) -> Vec3 {
        Vec3::from_array(self.spawn_position)
    }

    /// Filter for the pick ray.
    pub fn pick_filter(&self) -> QueryFilter<'static> {
        match self.pick_mask {
            Some(mask) => QueryFilter::new().groups(CollisionGroups::new(
                Group::ALL,
                Group::from_bits_truncate(mask),
            )),
            None => QueryFilter::default(),
        }
    }
}
