// =============================================================================
// SCREEN.RS: The in-game screen
//
// Owns the level (tile map + collidable regions), the player and the camera.
// Every asset is optional: a texture or map that fails to load is logged and
// the matching feature is switched off, the session keeps running.
// =============================================================================

use glam::Vec2;
use log::{debug, error, info, warn};

use crate::assets::SpriteImage;
use crate::camera::Camera;
use crate::config::GameConfig;
use crate::engine::{Color, Screen, TextureUploader};
use crate::input::{ActionMap, Direction, InputState, pressed_direction};
use crate::map::{CollidableRegion, PlacedTile, TileMap};
use crate::player::{Player, PlayerUpdateStep};
use crate::renderer::batch::{FULL_UV, SpriteBatch, TextureId};

const REGION_COLOR: Color = Color::YELLOW.with_alpha(0.25);
const REGION_HIT_COLOR: Color = Color::RED.with_alpha(0.4);

pub struct GameScreen {
    step: PlayerUpdateStep,
    unit_scale: f32,
    viewport: Vec2,
    debug_regions: bool,
    actions: ActionMap<Direction>,
    camera: Camera,

    player: Option<Player>,
    player_image: Option<SpriteImage>,
    player_texture: Option<TextureId>,

    map: Option<TileMap>,
    /// One entry per map tileset, same order.
    tileset_images: Vec<Option<SpriteImage>>,
    tileset_textures: Vec<Option<TextureId>>,
    tiles: Vec<PlacedTile>,
    regions: Vec<CollidableRegion>,

    last_collision: bool,
    paused: bool,
}

impl GameScreen {
    /// Load the player texture, the map and its tileset images from the
    /// paths in `config`. Failures are logged and leave the feature off.
    pub fn new(config: &GameConfig) -> Self {
        let texture_path = config.player_texture_path();
        let player_image = match SpriteImage::load(&texture_path) {
            Ok(img) => Some(img),
            Err(e) => {
                error!("[GameScreen] Failed to load player texture: {e}");
                None
            }
        };

        let map = match TileMap::load(config.map_path()) {
            Ok(map) => {
                info!(
                    "[GameScreen] Map loaded: {}x{} tiles of {}x{} px",
                    map.width, map.height, map.tile_width, map.tile_height
                );
                Some(map)
            }
            Err(e) => {
                error!("[GameScreen] Failed to load map: {e}");
                None
            }
        };

        let tileset_images = map
            .as_ref()
            .map(|m| {
                m.tilesets
                    .iter()
                    .map(|ts| match SpriteImage::load(&ts.image) {
                        Ok(img) => Some(img),
                        Err(e) => {
                            error!("[GameScreen] Tileset '{}' will not be drawn: {e}", ts.name);
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self::from_parts(config, player_image, map, tileset_images)
    }

    /// Build a screen from already-loaded parts. `tileset_images` is matched
    /// to `map.tilesets` by index; missing entries mean "not drawn".
    pub fn from_parts(
        config: &GameConfig,
        player_image: Option<SpriteImage>,
        map: Option<TileMap>,
        tileset_images: Vec<Option<SpriteImage>>,
    ) -> Self {
        let unit_scale = config.map.unit_scale;
        let size = Vec2::from(config.player.size);
        let viewport = Vec2::new(config.camera.viewport_width, config.camera.viewport_height);

        let player = player_image
            .as_ref()
            .map(|_| Player::new(Vec2::from(config.player.spawn), size));

        let (tiles, regions) = match &map {
            Some(m) => {
                let layer = &config.map.collision_layer;
                if m.object_layer(layer).is_none() {
                    warn!("[GameScreen] Map has no object layer '{layer}'; nothing is collidable");
                }
                let regions = m.collidable_regions(layer, unit_scale);
                info!(
                    "[GameScreen] {} collidable regions of {} in '{layer}'",
                    regions.iter().filter(|r| r.collidable).count(),
                    regions.len()
                );
                (m.tile_placements(unit_scale), regions)
            }
            None => (Vec::new(), Vec::new()),
        };

        let tileset_count = map.as_ref().map_or(0, |m| m.tilesets.len());
        let mut tileset_images = tileset_images;
        tileset_images.resize(tileset_count, None);

        let mut screen = Self {
            step: PlayerUpdateStep {
                speed: config.player.speed,
                size,
                response: config.player.collision_response,
            },
            unit_scale,
            viewport,
            debug_regions: config.debug_regions,
            actions: ActionMap::arrow_keys(),
            camera: Camera::new(viewport.x, viewport.y),
            player,
            player_image,
            player_texture: None,
            map,
            tileset_images,
            tileset_textures: vec![None; tileset_count],
            tiles,
            regions,
            last_collision: false,
            paused: false,
        };
        screen.recenter();
        screen
    }

    pub fn player(&self) -> Option<&Player> { self.player.as_ref() }
    pub fn map(&self) -> Option<&TileMap> { self.map.as_ref() }
    pub fn regions(&self) -> &[CollidableRegion] { &self.regions }
    pub fn is_paused(&self) -> bool { self.paused }
    pub fn unit_scale(&self) -> f32 { self.unit_scale }

    /// Whether the player overlapped a collidable region after the last update.
    pub fn last_collision(&self) -> bool { self.last_collision }

    pub fn set_debug_regions(&mut self, enabled: bool) {
        self.debug_regions = enabled;
    }

    /// Point the camera at the player, or at the map centre when there is no
    /// player. Without either it stays where `set_to_ortho` left it.
    fn recenter(&mut self) {
        if let Some(p) = &self.player {
            self.camera.center_on(p.position());
        } else if let Some(m) = &self.map {
            self.camera.center_on(m.world_center(self.unit_scale));
        }
    }

    fn draw_tiles(&self, batch: &mut SpriteBatch) {
        let Some(map) = &self.map else { return };
        let visible = self.camera.visible_rect();

        for tile in &self.tiles {
            if !tile.rect.overlaps(&visible) {
                continue;
            }
            let Some(texture) = self.tileset_textures.get(tile.tileset).copied().flatten() else {
                continue;
            };
            let uv = map.tilesets[tile.tileset].uv_for(tile.local_id);
            batch.draw(texture, tile.rect, uv, Color::WHITE.with_alpha(tile.opacity));
        }
    }

    fn draw_regions(&self, batch: &mut SpriteBatch) {
        let bounds = self.player.as_ref().map(|p| p.bounds());
        for region in self.regions.iter().filter(|r| r.collidable) {
            let hit = bounds.is_some_and(|b| b.overlaps(&region.rect));
            batch.fill_rect(region.rect, if hit { REGION_HIT_COLOR } else { REGION_COLOR });
        }
    }
}

impl Screen for GameScreen {
    fn show(&mut self, textures: &mut dyn TextureUploader) {
        if let Some(img) = self.player_image.take() {
            self.player_texture = Some(textures.upload("player", &img));
        }
        for (i, slot) in self.tileset_images.iter_mut().enumerate() {
            if let Some(img) = slot.take() {
                self.tileset_textures[i] = Some(textures.upload("tileset", &img));
            }
        }
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        if self.paused {
            return;
        }
        let Some(player) = self.player.as_mut() else { return };

        let direction = pressed_direction(&self.actions, input);
        let result = self.step.apply(player.position(), dt, direction, &self.regions);
        player.set_position(result.position);

        if result.collided && !self.last_collision {
            debug!(
                "[GameScreen] Collision at ({:.2}, {:.2})",
                result.position.x, result.position.y
            );
        }
        self.last_collision = result.collided;
        self.camera.center_on(result.position);
    }

    fn draw(&mut self, batch: &mut SpriteBatch) {
        self.draw_tiles(batch);

        if let (Some(player), Some(texture)) = (&self.player, self.player_texture) {
            batch.draw(texture, player.bounds(), FULL_UV, Color::WHITE);
        }

        if self.debug_regions {
            self.draw_regions(batch);
        }
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn resize(&mut self, _width: u32, _height: u32) {
        self.camera.set_to_ortho(self.viewport.x, self.viewport.y);
        self.recenter();
    }

    fn pause(&mut self) {
        if !self.paused {
            info!("[GameScreen] Paused");
        }
        self.paused = true;
    }

    fn resume(&mut self) {
        if self.paused {
            info!("[GameScreen] Resumed");
        }
        self.paused = false;
    }

    fn hide(&mut self) {
        info!("[GameScreen] Hidden");
    }
}
