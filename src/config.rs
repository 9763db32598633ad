use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::player::{CollisionResponse, DEFAULT_PLAYER_SPEED};
use crate::window::WindowConfig;

/// Top-level game configuration, read from a JSON file.
///
/// Every field is optional in the file; anything left out takes the value
/// from `Default`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Directory the player texture and map paths are relative to.
    pub assets_dir: PathBuf,
    /// Fixed update rate of the frame loop.
    pub target_ups: u32,
    /// Draw collidable regions on top of the map.
    pub debug_regions: bool,
    pub window: WindowConfig,
    pub player: PlayerConfig,
    pub map: MapConfig,
    pub camera: CameraConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub texture: PathBuf,
    /// World units per second.
    pub speed: f32,
    /// Sprite footprint in world units.
    pub size: [f32; 2],
    /// Starting position of the sprite origin.
    pub spawn: [f32; 2],
    pub collision_response: CollisionResponse,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub path: PathBuf,
    /// Object layer whose rectangles are tested for collisions.
    pub collision_layer: String,
    /// World units per map pixel.
    pub unit_scale: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Visible width in world units.
    pub viewport_width: f32,
    /// Visible height in world units.
    pub viewport_height: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            target_ups: 60,
            debug_regions: false,
            window: WindowConfig::default(),
            player: PlayerConfig::default(),
            map: MapConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            texture: PathBuf::from("player.png"),
            speed: DEFAULT_PLAYER_SPEED,
            size: [1.0, 1.0],
            spawn: [0.0, 0.0],
            collision_response: CollisionResponse::Report,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Dungeon.tmj"),
            collision_layer: "Torches and Treasures".into(),
            unit_scale: 1.0 / 16.0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { viewport_width: 100.0, viewport_height: 100.0 }
    }
}

impl GameConfig {
    /// Deserialise a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read a config file. A file that exists but does not parse is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io { path, source }) if source.kind() == std::io::ErrorKind::NotFound => {
                warn!("[Config] {} not found; using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Player texture path resolved against `assets_dir`.
    pub fn player_texture_path(&self) -> PathBuf {
        self.assets_dir.join(&self.player.texture)
    }

    /// Map path resolved against `assets_dir`.
    pub fn map_path(&self) -> PathBuf {
        self.assets_dir.join(&self.map.path)
    }
}
