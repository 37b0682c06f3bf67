use bevy::prelude::*;
use clap::Parser;
use std::path::PathBuf;
use tidal_core::SimConfig;
use tidal_render::TidalRenderPlugin;
use tidal_sim::binary_system::BinaryState;
use tidal_sim::control::ControlState;
use tidal_sim::pipeline::SimulationPlugin;

#[derive(Parser)]
#[command(name = "tidal")]
#[command(about = "VFTS 352 binary star particle visualizer", long_about = None)]
struct Cli {
    /// JSON config file; missing fields keep their defaults
    config: Option<PathBuf>,
}

fn main() -> AppExit {
    let cli = Cli::parse();

    // The log plugin is not up yet, so setup failures go to stderr
    let config = match cli.config {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return AppExit::error();
            }
        },
        None => SimConfig::default(),
    };

    let control = ControlState::new(config.initial_openness);
    let state = match BinaryState::new(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to build particle set: {e}");
            return AppExit::error();
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "VFTS 352 - The Kiss of Death".into(),
                resolution: (1600.0, 900.0).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb_u8(5, 11, 20)))
        .insert_resource(control)
        .insert_resource(state)
        .add_plugins(SimulationPlugin)
        .add_plugins(TidalRenderPlugin)
        .run()
}
