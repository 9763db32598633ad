// =============================================================================
// MAP: Tile maps loaded from Tiled's JSON export
//
// The model mirrors what a level needs at runtime:
// - map size and tile size (pixels)
// - tile layers (gids) and the tilesets they index into
// - object layers whose rectangles carry a property bag
//
// All coordinates are stored in y-up *pixel* space. Callers convert to world
// units by passing a `unit_scale` (world units per pixel) to the queries.
// =============================================================================

mod tiled;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec2;
use log::warn;

use crate::error::MapError;
use crate::geometry::Rect;

/// Name of the boolean object property that marks a rectangle as blocking.
pub const COLLIDABLE_PROPERTY: &str = "collidable";

// ── Properties ───────────────────────────────────────────────────────────────

/// A typed custom property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// `#AARRGGBB` colour string, kept verbatim.
    Color(String),
    /// Path relative to the map file.
    File(String),
    /// Id of another object on the map.
    Object(u32),
}

/// String-keyed bag of custom properties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties(HashMap<String, PropertyValue>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The value of `key` if it exists and is a boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(PropertyValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(PropertyValue::String(s)) | Some(PropertyValue::File(s)) | Some(PropertyValue::Color(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

// ── Objects ──────────────────────────────────────────────────────────────────

/// Geometry of a map object in y-up pixel space.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectShape {
    Rectangle(Rect),
    Ellipse(Rect),
    Point(Vec2),
    /// Closed outline, absolute points.
    Polygon(Vec<Vec2>),
    /// Open outline, absolute points.
    Polyline(Vec<Vec2>),
    /// Tile placed as an object; `rect` is its footprint.
    Tile { gid: u32, rect: Rect },
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapObject {
    pub id: u32,
    pub name: String,
    pub shape: ObjectShape,
    pub properties: Properties,
}

impl MapObject {
    /// The object's rectangle, if it is a plain rectangle object.
    pub fn rectangle(&self) -> Option<Rect> {
        match &self.shape {
            ObjectShape::Rectangle(r) => Some(*r),
            _ => None,
        }
    }
}

// ── Layers ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct TileLayer {
    pub name: String,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    pub visible: bool,
    pub opacity: f32,
    /// Global tile ids, row-major from the top row, flip bits stripped.
    /// `0` is an empty cell.
    pub data: Vec<u32>,
}

impl TileLayer {
    /// Gid at `(col, row)` with row 0 at the top, or `None` when empty or out
    /// of range.
    pub fn gid_at(&self, col: u32, row: u32) -> Option<u32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        match self.data.get(row as usize * self.width as usize + col as usize) {
            Some(0) | None => None,
            Some(gid) => Some(*gid),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectLayer {
    pub name: String,
    pub visible: bool,
    pub objects: Vec<MapObject>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Layer {
    Tiles(TileLayer),
    Objects(ObjectLayer),
    /// Image layers and any kind the screen does not use.
    Other { name: String },
}

impl Layer {
    pub fn name(&self) -> &str {
        match self {
            Layer::Tiles(l) => &l.name,
            Layer::Objects(l) => &l.name,
            Layer::Other { name } => name,
        }
    }
}

// ── Tilesets ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Tileset {
    pub name: String,
    pub first_gid: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub columns: u32,
    pub tile_count: u32,
    pub margin: u32,
    pub spacing: u32,
    /// Image path, resolved against the map file's directory when the map
    /// was loaded from disk.
    pub image: PathBuf,
    pub image_width: u32,
    pub image_height: u32,
}

impl Tileset {
    /// True if `gid` falls inside this tileset's range.
    pub fn contains_gid(&self, gid: u32) -> bool {
        gid.checked_sub(self.first_gid).is_some_and(|local| local < self.tile_count)
    }

    /// Returns (uv_min, uv_max) for a tile-local id (row-major order), with
    /// v = 0 at the top of the image.
    pub fn uv_for(&self, local_id: u32) -> ([f32; 2], [f32; 2]) {
        let columns = u64::from(self.columns.max(1));
        let col = u64::from(local_id) % columns;
        let row = u64::from(local_id) / columns;
        let (tw, th) = (u64::from(self.tile_width), u64::from(self.tile_height));
        let px = u64::from(self.margin) + col * (tw + u64::from(self.spacing));
        let py = u64::from(self.margin) + row * (th + u64::from(self.spacing));

        let iw = self.image_width.max(1) as f32;
        let ih = self.image_height.max(1) as f32;

        let u_min = px as f32 / iw;
        let v_min = py as f32 / ih;
        let u_max = (px + tw) as f32 / iw;
        let v_max = (py + th) as f32 / ih;

        ([u_min, v_min], [u_max, v_max])
    }
}

// ── Derived data ─────────────────────────────────────────────────────────────

/// A rectangle from an object layer plus whether it blocks the player.
/// Rectangles are in world units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollidableRegion {
    pub rect: Rect,
    pub collidable: bool,
}

/// One non-empty tile cell resolved to its tileset and world rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacedTile {
    /// Index into `TileMap::tilesets`.
    pub tileset: usize,
    /// Tile id local to that tileset.
    pub local_id: u32,
    pub rect: Rect,
    /// Opacity of the layer the tile came from.
    pub opacity: f32,
}

// ── TileMap ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    pub properties: Properties,
    /// Layers in document order with groups flattened.
    pub layers: Vec<Layer>,
    pub tilesets: Vec<Tileset>,
}

impl TileMap {
    /// Parse a Tiled JSON map. Tileset image paths are kept as written.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        tiled::parse(json)
    }

    /// Read and parse a Tiled JSON map from disk. Tileset image paths are
    /// resolved relative to the map file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut map = Self::from_json(&json)?;

        if let Some(dir) = path.parent() {
            for tileset in &mut map.tilesets {
                if tileset.image.is_relative() {
                    tileset.image = dir.join(&tileset.image);
                }
            }
        }
        Ok(map)
    }

    pub fn pixel_width(&self) -> u64 { u64::from(self.width) * u64::from(self.tile_width) }
    pub fn pixel_height(&self) -> u64 { u64::from(self.height) * u64::from(self.tile_height) }

    /// Map size in world units.
    pub fn world_size(&self, unit_scale: f32) -> Vec2 {
        Vec2::new(self.pixel_width() as f32, self.pixel_height() as f32) * unit_scale
    }

    /// Centre of the map in world units.
    pub fn world_center(&self, unit_scale: f32) -> Vec2 {
        self.world_size(unit_scale) * 0.5
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    pub fn object_layer(&self, name: &str) -> Option<&ObjectLayer> {
        self.layers.iter().find_map(|l| match l {
            Layer::Objects(ol) if ol.name == name => Some(ol),
            _ => None,
        })
    }

    /// Rectangle objects of the named object layer as world-space regions.
    ///
    /// A region is collidable only when its object has a boolean
    /// `collidable` property set to `true`. Ellipses, points and polylines
    /// are skipped. A missing layer yields an empty list.
    pub fn collidable_regions(&self, layer_name: &str, unit_scale: f32) -> Vec<CollidableRegion> {
        let Some(layer) = self.object_layer(layer_name) else {
            return Vec::new();
        };

        layer
            .objects
            .iter()
            .filter_map(|obj| {
                obj.rectangle().map(|rect| CollidableRegion {
                    rect: rect.scaled(unit_scale),
                    collidable: obj.properties.get_bool(COLLIDABLE_PROPERTY).unwrap_or(false),
                })
            })
            .collect()
    }

    /// Tileset owning `gid`: the last one whose `first_gid <= gid`.
    pub fn tileset_for_gid(&self, gid: u32) -> Option<usize> {
        self.tilesets
            .iter()
            .enumerate()
            .filter(|(_, ts)| ts.first_gid <= gid)
            .max_by_key(|(_, ts)| ts.first_gid)
            .map(|(i, _)| i)
    }

    /// Every non-empty cell of every visible tile layer, in draw order, with
    /// its world rectangle. Gids past the end of their tileset are skipped.
    pub fn tile_placements(&self, unit_scale: f32) -> Vec<PlacedTile> {
        let tw = self.tile_width as f32 * unit_scale;
        let th = self.tile_height as f32 * unit_scale;
        let mut placed = Vec::new();

        for layer in &self.layers {
            let Layer::Tiles(tl) = layer else { continue };
            if !tl.visible {
                continue;
            }
            let mut out_of_range = 0usize;
            for row in 0..tl.height {
                // Row 0 is the top of the map; world space is y-up.
                let y = (tl.height - 1 - row) as f32 * th;
                for col in 0..tl.width {
                    let Some(gid) = tl.gid_at(col, row) else { continue };
                    let Some(ts) = self.tileset_for_gid(gid) else { continue };
                    let tileset = &self.tilesets[ts];
                    if !tileset.contains_gid(gid) {
                        out_of_range += 1;
                        continue;
                    }
                    placed.push(PlacedTile {
                        tileset: ts,
                        local_id: gid - tileset.first_gid,
                        rect: Rect::new(col as f32 * tw, y, tw, th),
                        opacity: tl.opacity,
                    });
                }
            }
            if out_of_range > 0 {
                warn!(
                    "[Map] Layer '{}': {out_of_range} tiles use gids outside their tileset and are not drawn",
                    tl.name
                );
            }
        }
        placed
    }
}
