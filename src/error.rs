use std::path::PathBuf;

use thiserror::Error;

/// Failure to read or decode an image asset.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read image '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Failure to read or interpret a Tiled JSON map.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed map json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported map orientation '{0}' (only orthogonal maps are supported)")]
    UnsupportedOrientation(String),
    #[error("layer '{layer}' uses unsupported tile data encoding '{encoding}'")]
    UnsupportedEncoding { layer: String, encoding: String },
    #[error("layer '{layer}' has {actual} tiles, expected {expected}")]
    LayerSize { layer: String, expected: usize, actual: usize },
    #[error("tileset '{0}' is external; embed tilesets in the map before exporting")]
    ExternalTileset(String),
    #[error("infinite maps are not supported")]
    Infinite,
    #[error("{0} is too large")]
    TooLarge(String),
}

/// Failure to load the game configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to bring up the GPU.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create window surface: {0}")]
    Surface(String),
    #[error("no suitable GPU adapter found: {0}")]
    Adapter(String),
    #[error("failed to create GPU device: {0}")]
    Device(String),
}

/// Failure that stops the frame loop.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
