// Tiled JSON (.tmj) → TileMap.
//
// Tiled writes pixel coordinates with y pointing down. Everything is flipped
// here once so the rest of the crate only sees y-up space.

use std::path::PathBuf;

use glam::Vec2;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use super::{Layer, MapObject, ObjectLayer, ObjectShape, Properties, PropertyValue, TileLayer, TileMap, Tileset};
use crate::error::MapError;
use crate::geometry::Rect;

/// High bits of a gid that encode horizontal/vertical/diagonal flips.
const FLIP_FLAGS: u32 = 0xE000_0000;

// ── Raw (JSON-facing) types ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawMap {
    width: u32,
    height: u32,
    #[serde(rename = "tilewidth")]
    tile_width: u32,
    #[serde(rename = "tileheight")]
    tile_height: u32,
    #[serde(default)]
    orientation: Option<String>,
    #[serde(default)]
    infinite: bool,
    #[serde(default)]
    properties: Vec<RawProperty>,
    #[serde(default)]
    layers: Vec<RawLayer>,
    #[serde(default)]
    tilesets: Vec<RawTileset>,
}

#[derive(Deserialize)]
struct RawProperty {
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    value: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTileData {
    Gids(Vec<u32>),
    Encoded(String),
}

#[derive(Deserialize)]
struct RawLayer {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default = "default_opacity")]
    opacity: f32,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    data: Option<RawTileData>,
    #[serde(default)]
    objects: Vec<RawObject>,
    #[serde(default)]
    layers: Vec<RawLayer>,
}

#[derive(Deserialize)]
struct RawPoint {
    x: f32,
    y: f32,
}

#[derive(Deserialize)]
struct RawObject {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    x: f32,
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default)]
    ellipse: bool,
    #[serde(default)]
    point: bool,
    #[serde(default)]
    polygon: Option<Vec<RawPoint>>,
    #[serde(default)]
    polyline: Option<Vec<RawPoint>>,
    #[serde(default)]
    gid: Option<u32>,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

#[derive(Deserialize)]
struct RawTileset {
    #[serde(rename = "firstgid")]
    first_gid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(rename = "tilewidth", default)]
    tile_width: u32,
    #[serde(rename = "tileheight", default)]
    tile_height: u32,
    #[serde(default)]
    columns: u32,
    #[serde(rename = "tilecount", default)]
    tile_count: u32,
    #[serde(default)]
    margin: u32,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    image: String,
    #[serde(rename = "imagewidth", default)]
    image_width: u32,
    #[serde(rename = "imageheight", default)]
    image_height: u32,
}

fn default_true() -> bool { true }
fn default_opacity() -> f32 { 1.0 }

/// `a * b` in pixels or cells; `MapError::TooLarge` when it overflows `u32`.
fn checked_product(what: &str, a: u32, b: u32) -> Result<u32, MapError> {
    a.checked_mul(b)
        .ok_or_else(|| MapError::TooLarge(format!("{what} ({a} x {b})")))
}

// ── Conversion ───────────────────────────────────────────────────────────────

pub(super) fn parse(json: &str) -> Result<TileMap, MapError> {
    let raw: RawMap = serde_json::from_str(json)?;

    if let Some(o) = raw.orientation.as_deref() {
        if o != "orthogonal" {
            return Err(MapError::UnsupportedOrientation(o.to_string()));
        }
    }
    if raw.infinite {
        return Err(MapError::Infinite);
    }

    checked_product("map width", raw.width, raw.tile_width)?;
    let map_pixel_height = checked_product("map height", raw.height, raw.tile_height)? as f32;

    let mut layers = Vec::new();
    flatten_layers(raw.layers, map_pixel_height, &mut layers)?;

    let tilesets = raw
        .tilesets
        .into_iter()
        .map(convert_tileset)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TileMap {
        width: raw.width,
        height: raw.height,
        tile_width: raw.tile_width,
        tile_height: raw.tile_height,
        properties: convert_properties(raw.properties),
        layers,
        tilesets,
    })
}

fn flatten_layers(raw: Vec<RawLayer>, map_pixel_height: f32, out: &mut Vec<Layer>) -> Result<(), MapError> {
    for layer in raw {
        match layer.kind.as_str() {
            "tilelayer" => out.push(Layer::Tiles(convert_tile_layer(layer)?)),
            "objectgroup" => out.push(Layer::Objects(ObjectLayer {
                name: layer.name,
                visible: layer.visible,
                objects: layer
                    .objects
                    .into_iter()
                    .map(|o| convert_object(o, map_pixel_height))
                    .collect(),
            })),
            "group" => flatten_layers(layer.layers, map_pixel_height, out)?,
            _ => out.push(Layer::Other { name: layer.name }),
        }
    }
    Ok(())
}

fn convert_tile_layer(layer: RawLayer) -> Result<TileLayer, MapError> {
    if let Some(enc) = layer.encoding.as_deref() {
        if enc != "csv" {
            return Err(MapError::UnsupportedEncoding { layer: layer.name, encoding: enc.to_string() });
        }
    }

    let gids = match layer.data {
        Some(RawTileData::Gids(gids)) => gids,
        Some(RawTileData::Encoded(_)) => {
            return Err(MapError::UnsupportedEncoding {
                layer: layer.name,
                encoding: layer.encoding.unwrap_or_else(|| "string".into()),
            });
        }
        None => Vec::new(),
    };

    let expected = checked_product(&format!("layer '{}'", layer.name), layer.width, layer.height)? as usize;
    if gids.len() != expected {
        return Err(MapError::LayerSize { layer: layer.name, expected, actual: gids.len() });
    }

    Ok(TileLayer {
        name: layer.name,
        width: layer.width,
        height: layer.height,
        visible: layer.visible,
        opacity: layer.opacity,
        data: gids.into_iter().map(|g| g & !FLIP_FLAGS).collect(),
    })
}

fn convert_object(obj: RawObject, map_pixel_height: f32) -> MapObject {
    let flip_point = |p: &RawPoint| Vec2::new(obj.x + p.x, map_pixel_height - (obj.y + p.y));

    let shape = if let Some(gid) = obj.gid {
        // Tile objects are anchored at their bottom-left corner in Tiled.
        ObjectShape::Tile {
            gid: gid & !FLIP_FLAGS,
            rect: Rect::new(obj.x, map_pixel_height - obj.y, obj.width, obj.height),
        }
    } else if obj.point {
        ObjectShape::Point(Vec2::new(obj.x, map_pixel_height - obj.y))
    } else if let Some(points) = &obj.polygon {
        ObjectShape::Polygon(points.iter().map(flip_point).collect())
    } else if let Some(points) = &obj.polyline {
        ObjectShape::Polyline(points.iter().map(flip_point).collect())
    } else {
        let rect = Rect::new(obj.x, map_pixel_height - obj.y - obj.height, obj.width, obj.height);
        if obj.ellipse {
            ObjectShape::Ellipse(rect)
        } else {
            ObjectShape::Rectangle(rect)
        }
    };

    MapObject {
        id: obj.id,
        name: obj.name,
        shape,
        properties: convert_properties(obj.properties),
    }
}

fn convert_tileset(ts: RawTileset) -> Result<Tileset, MapError> {
    if let Some(source) = ts.source {
        return Err(MapError::ExternalTileset(source));
    }
    Ok(Tileset {
        name: ts.name,
        first_gid: ts.first_gid,
        tile_width: ts.tile_width,
        tile_height: ts.tile_height,
        columns: ts.columns,
        tile_count: ts.tile_count,
        margin: ts.margin,
        spacing: ts.spacing,
        image: PathBuf::from(ts.image),
        image_width: ts.image_width,
        image_height: ts.image_height,
    })
}

fn convert_properties(raw: Vec<RawProperty>) -> Properties {
    let mut props = Properties::new();
    for p in raw {
        let kind = p.kind.as_deref().unwrap_or("string");
        let value = match kind {
            "bool" => p.value.as_bool().map(PropertyValue::Bool),
            "int" => p.value.as_i64().map(PropertyValue::Int),
            "float" => p.value.as_f64().map(PropertyValue::Float),
            "string" => p.value.as_str().map(|s| PropertyValue::String(s.to_string())),
            "color" => p.value.as_str().map(|s| PropertyValue::Color(s.to_string())),
            "file" => p.value.as_str().map(|s| PropertyValue::File(s.to_string())),
            "object" => p.value.as_u64().map(|id| PropertyValue::Object(id as u32)),
            _ => None,
        };
        match value {
            Some(v) => props.insert(p.name, v),
            None => warn!("[Map] Skipping property '{}' of type '{}': unsupported value {}", p.name, kind, p.value),
        }
    }
    props
}
