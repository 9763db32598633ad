use std::path::Path;

use crate::error::AssetError;

/// A decoded RGBA8 image, ready to be uploaded as a texture.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 pixels, top row first.
    pub rgba: Vec<u8>,
}

impl SpriteImage {
    /// Read and decode an image file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        image::load_from_memory(&bytes)
            .map(|img| Self::from_rgba8(img.to_rgba8()))
            .map_err(|source| AssetError::Decode { path: path.to_path_buf(), source })
    }

    pub fn from_rgba8(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self { width, height, rgba: img.into_raw() }
    }

    /// A `width × height` image filled with one colour.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width * height) as usize;
        Self { width, height, rgba: rgba.repeat(pixels) }
    }
}
