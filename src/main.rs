use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use dartflick::dart3d::{
    handle_reset_input, record_launches, setup, update_hud, DartSettings, DartThrowPlugin,
    LastLaunch, LaunchPolicy,
};

/// Dart Flick - grab the dart, drag it and flick it at the board
#[derive(Parser, Debug)]
#[command(name = "dartflick")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (.ron or .json)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Override the launch policy with its default constants
    #[arg(short, long, value_enum)]
    policy: Option<PolicyArg>,

    /// Print the effective settings as RON and exit
    #[arg(long)]
    print_settings: bool,

    /// Log filter passed to Bevy's log plugin
    #[arg(long, default_value = "info,wgpu=error,naga=warn")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Impulse,
    Velocity,
}

impl PolicyArg {
    fn policy(self) -> LaunchPolicy {
        match self {
            PolicyArg::Impulse => LaunchPolicy::default_impulse(),
            PolicyArg::Velocity => LaunchPolicy::default_velocity(),
        }
    }
}

fn load_settings(cli: &Cli) -> DartSettings {
    let mut settings = match &cli.settings {
        Some(path) => DartSettings::load_from_file(path).unwrap_or_else(|e| {
            eprintln!("{}; using default settings", e);
            DartSettings::default()
        }),
        None => DartSettings::default(),
    };

    // Keep the file's constants when it already uses the requested policy.
    if let Some(arg) = cli.policy {
        let requested = arg.policy();
        if settings.policy.name() != requested.name() {
            settings.policy = requested;
        }
    }

    settings
}

fn main() {
    let cli = Cli::parse();
    let settings = load_settings(&cli);

    if cli.print_settings {
        match settings.to_ron_string() {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Dart Flick".to_string(),
                        resolution: (1280u32, 720u32).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(bevy::log::LogPlugin {
                    level: bevy::log::Level::INFO,
                    filter: cli.log_level.clone(),
                    ..default()
                }),
        )
        // Rapier steps at the fixed rate the dart controller writes at and
        // interpolates bodies carrying `TransformInterpolation` in between.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .insert_resource(TimestepMode::Interpolated {
            dt: Time::<Fixed>::default().timestep().as_secs_f32(),
            time_scale: 1.0,
            substeps: 1,
        })
        .add_plugins(DartThrowPlugin)
        .insert_resource(settings)
        .insert_resource(LastLaunch::default())
        .add_systems(Startup, setup)
        .add_systems(Update, (handle_reset_input, record_launches, update_hud))
        .run();
}
