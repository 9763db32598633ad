pub mod assets;
pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod map;
pub mod player;
pub mod renderer;
pub mod screen;
pub mod window;
