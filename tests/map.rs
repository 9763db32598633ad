use affirmation_adventures::error::MapError;
use affirmation_adventures::geometry::Rect;
use affirmation_adventures::map::*;
use glam::Vec2;

const SCALE: f32 = 1.0 / 16.0;

/// 4x3 map of 16px tiles: one tile layer, a hidden tile layer, a grouped
/// object layer with a mix of shapes.
const DUNGEON: &str = r#"{
    "width": 4, "height": 3, "tilewidth": 16, "tileheight": 16,
    "orientation": "orthogonal", "infinite": false,
    "properties": [{ "name": "title", "type": "string", "value": "Dungeon" }],
    "layers": [
        { "type": "tilelayer", "name": "Floor", "width": 4, "height": 3, "opacity": 0.5,
          "data": [1, 0, 0, 2,
                   0, 0, 0, 0,
                   3, 0, 0, 0] },
        { "type": "tilelayer", "name": "Hidden", "visible": false, "width": 4, "height": 3,
          "data": [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1] },
        { "type": "group", "name": "Props", "layers": [
            { "type": "objectgroup", "name": "Torches and Treasures", "objects": [
                { "id": 1, "name": "chest", "x": 16, "y": 0, "width": 16, "height": 16,
                  "properties": [{ "name": "collidable", "type": "bool", "value": true }] },
                { "id": 2, "name": "rug", "x": 0, "y": 32, "width": 32, "height": 16 },
                { "id": 3, "name": "pool", "x": 32, "y": 16, "width": 16, "height": 16, "ellipse": true,
                  "properties": [{ "name": "collidable", "type": "bool", "value": true }] },
                { "id": 4, "name": "spawn", "x": 8, "y": 40, "point": true },
                { "id": 5, "name": "fence", "x": 0, "y": 0,
                  "polyline": [{ "x": 0, "y": 0 }, { "x": 16, "y": 16 }] },
                { "id": 6, "name": "door", "x": 48, "y": 16, "width": 16, "height": 16,
                  "properties": [{ "name": "collidable", "type": "bool", "value": false }] }
            ]}
        ]},
        { "type": "imagelayer", "name": "Sky" }
    ],
    "tilesets": [
        { "firstgid": 1, "name": "dungeon", "tilewidth": 16, "tileheight": 16,
          "columns": 4, "tilecount": 8, "margin": 1, "spacing": 2,
          "image": "tiles.png", "imagewidth": 72, "imageheight": 36 }
    ]
}"#;

fn dungeon() -> TileMap {
    TileMap::from_json(DUNGEON).unwrap()
}

#[test]
fn test_parse_header() {
    let map = dungeon();
    assert_eq!((map.width, map.height), (4, 3));
    assert_eq!((map.tile_width, map.tile_height), (16, 16));
    assert_eq!((map.pixel_width(), map.pixel_height()), (64, 48));
    assert_eq!(map.world_size(SCALE), Vec2::new(4.0, 3.0));
    assert_eq!(map.world_center(SCALE), Vec2::new(2.0, 1.5));
    assert_eq!(map.properties.get_str("title"), Some("Dungeon"));
}

#[test]
fn test_groups_are_flattened_in_order() {
    let map = dungeon();
    let names: Vec<&str> = map.layers.iter().map(|l| l.name()).collect();
    assert_eq!(names, vec!["Floor", "Hidden", "Torches and Treasures", "Sky"]);
    assert!(matches!(map.layer("Sky"), Some(Layer::Other { .. })));
    assert!(map.object_layer("Floor").is_none());
}

#[test]
fn test_objects_are_flipped_to_y_up() {
    let map = dungeon();
    let layer = map.object_layer("Torches and Treasures").unwrap();

    assert_eq!(layer.objects[0].shape, ObjectShape::Rectangle(Rect::new(16.0, 32.0, 16.0, 16.0)));
    assert_eq!(layer.objects[1].shape, ObjectShape::Rectangle(Rect::new(0.0, 0.0, 32.0, 16.0)));
    assert_eq!(layer.objects[2].shape, ObjectShape::Ellipse(Rect::new(32.0, 16.0, 16.0, 16.0)));
    assert_eq!(layer.objects[3].shape, ObjectShape::Point(Vec2::new(8.0, 8.0)));
    assert_eq!(
        layer.objects[4].shape,
        ObjectShape::Polyline(vec![Vec2::new(0.0, 48.0), Vec2::new(16.0, 32.0)])
    );
    assert_eq!(layer.objects[0].name, "chest");
    assert_eq!(layer.objects[0].rectangle(), Some(Rect::new(16.0, 32.0, 16.0, 16.0)));
    assert_eq!(layer.objects[3].rectangle(), None);
}

#[test]
fn test_collidable_regions_are_rectangles_in_world_units() {
    let map = dungeon();
    let regions = map.collidable_regions("Torches and Treasures", SCALE);

    assert_eq!(
        regions,
        vec![
            CollidableRegion { rect: Rect::new(1.0, 2.0, 1.0, 1.0), collidable: true },
            CollidableRegion { rect: Rect::new(0.0, 0.0, 2.0, 1.0), collidable: false },
            CollidableRegion { rect: Rect::new(3.0, 1.0, 1.0, 1.0), collidable: false },
        ]
    );
}

#[test]
fn test_missing_collision_layer_yields_no_regions() {
    assert!(dungeon().collidable_regions("Walls", SCALE).is_empty());
}

#[test]
fn test_string_collidable_is_not_collidable() {
    let json = r#"{
        "width": 1, "height": 1, "tilewidth": 16, "tileheight": 16,
        "layers": [{ "type": "objectgroup", "name": "Walls", "objects": [
            { "id": 1, "x": 0, "y": 0, "width": 16, "height": 16,
              "properties": [{ "name": "collidable", "type": "string", "value": "true" }] },
            { "id": 2, "x": 0, "y": 0, "width": 16, "height": 16,
              "properties": [{ "name": "collidable", "type": "bool", "value": "yes" }] }
        ]}]
    }"#;
    let map = TileMap::from_json(json).unwrap();
    let regions = map.collidable_regions("Walls", 1.0);
    assert_eq!(regions.len(), 2);
    assert!(regions.iter().all(|r| !r.collidable));
}

#[test]
fn test_tile_placements_skip_empty_and_hidden() {
    let map = dungeon();
    let tiles = map.tile_placements(SCALE);

    assert_eq!(tiles.len(), 3);
    assert_eq!(tiles[0], PlacedTile { tileset: 0, local_id: 0, rect: Rect::new(0.0, 2.0, 1.0, 1.0), opacity: 0.5 });
    assert_eq!(tiles[1].local_id, 1);
    assert_eq!(tiles[1].rect, Rect::new(3.0, 2.0, 1.0, 1.0));
    assert_eq!(tiles[2].local_id, 2);
    assert_eq!(tiles[2].rect, Rect::new(0.0, 0.0, 1.0, 1.0));
}

#[test]
fn test_tile_layer_lookup() {
    let map = dungeon();
    let Some(Layer::Tiles(floor)) = map.layer("Floor") else { panic!("expected tile layer") };
    assert_eq!(floor.gid_at(0, 0), Some(1));
    assert_eq!(floor.gid_at(1, 0), None);
    assert_eq!(floor.gid_at(0, 2), Some(3));
    assert_eq!(floor.gid_at(4, 0), None);
}

#[test]
fn test_tileset_uv_with_margin_and_spacing() {
    let map = dungeon();
    let ts = &map.tilesets[0];
    assert!(ts.contains_gid(1));
    assert!(ts.contains_gid(8));
    assert!(!ts.contains_gid(9));

    let (min, max) = ts.uv_for(5);
    let expect: [f32; 4] = [19.0 / 72.0, 19.0 / 36.0, 35.0 / 72.0, 35.0 / 36.0];
    for (got, want) in [min[0], min[1], max[0], max[1]].iter().zip(expect) {
        assert!((got - want).abs() < 1e-6, "{got} != {want}");
    }
}

#[test]
fn test_tileset_for_gid_picks_last_first_gid() {
    let json = r#"{
        "width": 1, "height": 1, "tilewidth": 8, "tileheight": 8,
        "tilesets": [
            { "firstgid": 1, "name": "a", "tilecount": 4, "columns": 2, "image": "a.png" },
            { "firstgid": 5, "name": "b", "tilecount": 4, "columns": 2, "image": "b.png" }
        ]
    }"#;
    let map = TileMap::from_json(json).unwrap();
    assert_eq!(map.tileset_for_gid(0), None);
    assert_eq!(map.tileset_for_gid(4), Some(0));
    assert_eq!(map.tileset_for_gid(5), Some(1));
    assert_eq!(map.tileset_for_gid(7), Some(1));
}

#[test]
fn test_rejects_non_orthogonal() {
    let json = r#"{ "width": 1, "height": 1, "tilewidth": 8, "tileheight": 8, "orientation": "isometric" }"#;
    assert!(matches!(TileMap::from_json(json), Err(MapError::UnsupportedOrientation(o)) if o == "isometric"));
}

#[test]
fn test_rejects_infinite() {
    let json = r#"{ "width": 1, "height": 1, "tilewidth": 8, "tileheight": 8, "infinite": true }"#;
    assert!(matches!(TileMap::from_json(json), Err(MapError::Infinite)));
}

#[test]
fn test_rejects_encoded_layer_data() {
    let json = r#"{
        "width": 1, "height": 1, "tilewidth": 8, "tileheight": 8,
        "layers": [{ "type": "tilelayer", "name": "g", "width": 1, "height": 1,
                     "encoding": "base64", "data": "AQAAAA==" }]
    }"#;
    assert!(matches!(
        TileMap::from_json(json),
        Err(MapError::UnsupportedEncoding { encoding, .. }) if encoding == "base64"
    ));
}

#[test]
fn test_rejects_wrong_layer_size() {
    let json = r#"{
        "width": 2, "height": 2, "tilewidth": 8, "tileheight": 8,
        "layers": [{ "type": "tilelayer", "name": "g", "width": 2, "height": 2, "data": [1, 2, 3] }]
    }"#;
    assert!(matches!(
        TileMap::from_json(json),
        Err(MapError::LayerSize { expected: 4, actual: 3, .. })
    ));
}

#[test]
fn test_rejects_external_tileset() {
    let json = r#"{
        "width": 1, "height": 1, "tilewidth": 8, "tileheight": 8,
        "tilesets": [{ "firstgid": 1, "source": "dungeon.tsx" }]
    }"#;
    assert!(matches!(TileMap::from_json(json), Err(MapError::ExternalTileset(s)) if s == "dungeon.tsx"));
}

#[test]
fn test_malformed_json_is_an_error() {
    assert!(matches!(TileMap::from_json("{ not json"), Err(MapError::Json(_))));
    assert!(matches!(TileMap::from_json(r#"{ "width": 1 }"#), Err(MapError::Json(_))));
}

#[test]
fn test_load_resolves_tileset_image_next_to_map() {
    let dir = tempfile::tempdir().unwrap();
    let map_dir = dir.path().join("maps");
    std::fs::create_dir(&map_dir).unwrap();
    let map_path = map_dir.join("Dungeon.tmj");
    std::fs::write(&map_path, DUNGEON).unwrap();

    let map = TileMap::load(&map_path).unwrap();
    assert_eq!(map.tilesets[0].image, map_dir.join("tiles.png"));

    // from_json keeps the path as written.
    assert_eq!(dungeon().tilesets[0].image, std::path::PathBuf::from("tiles.png"));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.tmj");
    match TileMap::load(&missing) {
        Err(MapError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_bundled_dungeon_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/Dungeon.tmj");
    let map = TileMap::load(path).unwrap();
    assert_eq!((map.width, map.height), (20, 15));

    let regions = map.collidable_regions("Torches and Treasures", SCALE);
    assert_eq!(regions.len(), 9);
    assert_eq!(regions.iter().filter(|r| r.collidable).count(), 7);
    assert_eq!(map.tile_placements(SCALE).len(), 20 * 15 + 5);
    assert!(map.tilesets[0].image.ends_with("assets/tiles.png"));
}

#[test]
fn test_oversized_header_is_an_error() {
    let json = r#"{ "width": 1, "height": 4000000, "tilewidth": 16, "tileheight": 4000 }"#;
    assert!(matches!(TileMap::from_json(json), Err(MapError::TooLarge(_))));

    let json = r#"{ "width": 4294967295, "height": 1, "tilewidth": 2, "tileheight": 16 }"#;
    assert!(matches!(TileMap::from_json(json), Err(MapError::TooLarge(_))));
}

#[test]
fn test_oversized_layer_is_an_error() {
    let json = r#"{
        "width": 1, "height": 1, "tilewidth": 16, "tileheight": 16,
        "layers": [{ "type": "tilelayer", "name": "huge", "width": 65536, "height": 65536, "data": [] }]
    }"#;
    match TileMap::from_json(json) {
        Err(MapError::TooLarge(what)) => assert!(what.contains("huge"), "{what}"),
        other => panic!("expected TooLarge, got {other:?}"),
    }
}

#[test]
fn test_gids_past_tileset_end_are_not_placed() {
    let json = r#"{
        "width": 3, "height": 1, "tilewidth": 16, "tileheight": 16,
        "layers": [{ "type": "tilelayer", "name": "g", "width": 3, "height": 1, "data": [1, 2, 3] }],
        "tilesets": [{ "firstgid": 1, "name": "small", "tilewidth": 16, "tileheight": 16,
                       "columns": 2, "tilecount": 2, "image": "t.png",
                       "imagewidth": 32, "imageheight": 16 }]
    }"#;
    let map = TileMap::from_json(json).unwrap();
    let tiles = map.tile_placements(SCALE);
    assert_eq!(tiles.len(), 2);
    assert_eq!(tiles.iter().map(|t| t.local_id).collect::<Vec<_>>(), vec![0, 1]);
}
