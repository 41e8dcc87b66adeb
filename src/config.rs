//! # Game Configuration
//!
//! `GameConfig` is built once at startup (either from defaults or from a JSON
//! file) and handed to the engine and the world explicitly. Every field has a
//! default, so a config file only needs to name the values it overrides.

use std::{fs::File, io::BufReader, path::Path};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// How newly streamed chunks are filled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    /// Noise height field with trees.
    Terrain,
    /// A grass plain at a fixed height, no trees.
    Flat,
    /// Every block is air.
    Empty,
}

/// Tuning for the fluid engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidConfig {
    /// Soft cap on tracked water cells; full-level spreading stops past it.
    pub max_water_blocks: usize,
    /// Number of queued fluid cells processed per tick.
    pub updates_per_tick: usize,
}

impl Default for FluidConfig {
    fn default() -> Self {
        FluidConfig {
            max_water_blocks: 4096,
            updates_per_tick: 64,
        }
    }
}

/// Player body and movement tuning. Distances are in blocks, speeds in blocks per second.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal extent of the player's bounding box.
    pub width: f32,
    /// Vertical extent of the player's bounding box, measured from the feet.
    pub height: f32,
    /// Horizontal walking speed.
    pub walk_speed: f32,
    /// Upward velocity applied by a jump.
    pub jump_velocity: f32,
    /// Downward acceleration while in air.
    pub gravity: f32,
    /// Maximum falling speed in air.
    pub terminal_velocity: f32,
    /// Top-centre of the body used at session start and after falling out of the world.
    pub spawn: [f32; 3],
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            width: 0.6,
            height: 1.8,
            walk_speed: 4.3,
            jump_velocity: 8.0,
            gravity: 28.0,
            terminal_velocity: 50.0,
            spawn: [8.5, 100.0, 8.5],
        }
    }
}

/// Top level configuration passed into the engine at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Radius in chunks of the square region kept loaded around the player.
    pub render_distance: i32,
    /// Seed for terrain noise and tree placement.
    pub seed: u32,
    /// How new chunks are filled.
    pub generation: GenerationMethod,
    /// Longest distance the aim ray travels before giving up.
    pub max_ray_distance: f32,
    /// Fixed update rate in ticks per second.
    pub tick_rate: u32,
    /// Fluid engine tuning.
    pub fluid: FluidConfig,
    /// Player tuning.
    pub player: PlayerConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            render_distance: 4,
            seed: 0,
            generation: GenerationMethod::Terrain,
            max_ray_distance: 6.0,
            tick_rate: 60,
            fluid: FluidConfig::default(),
            player: PlayerConfig::default(),
        }
    }
}

impl GameConfig {
    /// Reads a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults and a negative render
    /// distance is clamped to zero.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let file = File::open(path.as_ref())?;
        let mut config: GameConfig = serde_json::from_reader(BufReader::new(file))?;
        config.render_distance = config.render_distance.max(0);
        config.tick_rate = config.tick_rate.max(1);
        info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Duration of one fixed update step in seconds.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "render_distance": 2, "generation": "flat" }"#).unwrap();
        assert_eq!(config.render_distance, 2);
        assert_eq!(config.generation, GenerationMethod::Flat);
        assert_eq!(config.player, PlayerConfig::default());
        assert_eq!(config.fluid.max_water_blocks, 4096);
    }

    #[test]
    fn load_clamps_negative_render_distance() {
        let path = std::env::temp_dir().join(format!(
            "voxel_world_config_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "render_distance": -3 }"#).unwrap();
        let config = GameConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.render_distance, 0);
    }

    #[test]
    fn load_reports_missing_file() {
        let result = GameConfig::load("/definitely/not/here.json");
        assert!(matches!(result, Err(EngineError::Io(_))));
    }
}
