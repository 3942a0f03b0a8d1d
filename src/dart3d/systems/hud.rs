//! HUD systems
//!
//! Shows the controller phase and the last launch in the corner text.

use bevy::prelude::*;

use crate::dart3d::throw_control::{DartControl, DartLaunched, Launch, ThrowPhase};
use crate::dart3d::types::*;

/// Keep the most recent launch for display.
pub fn record_launches(mut launches: MessageReader<DartLaunched>, mut last: ResMut<LastLaunch>) {
    if let Some(launch) = launches.read().last() {
        last.0 = Some(*launch);
    }
}

/// System to update the HUD text
pub fn update_hud(
    dart_query: Query<&DartControl, With<Dart>>,
    last: Res<LastLaunch>,
    mut text_query: Query<&mut Text, With<HudText>>,
) {
    let Some(control) = dart_query.iter().next() else {
        return;
    };

    let value = format_hud(control.phase(), last.0.as_ref());
    for mut text in text_query.iter_mut() {
        if text.0 != value {
            text.0 = value.clone();
        }
    }
}

/// Format the HUD text for a phase and the last launch
pub fn format_hud(phase: &ThrowPhase, last: Option<&DartLaunched>) -> String {
    let mut out = format!("Dart: {}\n", phase.name());

    if let Some(last) = last {
        let (kind, unit) = match last.launch {
            Launch::Impulse(_) => ("Impulse", "N·s"),
            Launch::Velocity(_) => ("Velocity", "m/s"),
        };
        out.push_str(&format!(
            "Last launch: {} {:.3} {} ({:.2}, {:.2}, {:.2})\n",
            kind,
            last.world.length(),
            unit,
            last.world.x,
            last.world.y,
            last.world.z
        ));
    }

    out.push_str("\nDrag the dart, release to throw\nPress R to reset");
    out
}
