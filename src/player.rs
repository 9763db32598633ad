// =============================================================================
// PLAYER.RS: Per-frame movement and collision for the player sprite
//
// The update step is a pure function of (position, input, elapsed time,
// collidable regions). It never fails: an empty region list simply means
// nothing can be hit.
// =============================================================================

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::input::Direction;
use crate::map::CollidableRegion;

/// Default sprite footprint in world units (one tile).
pub const DEFAULT_PLAYER_SIZE: Vec2 = Vec2::new(1.0, 1.0);

/// Default movement speed in world units per second.
pub const DEFAULT_PLAYER_SPEED: f32 = 20.0;

/// What the update step does when the moved player overlaps a collidable
/// region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionResponse {
    /// Flag the collision and keep the move.
    #[default]
    Report,
    /// Flag the collision and cancel the move for this frame.
    Block,
}

/// The player's sprite origin and footprint. Bounds are always derived from
/// the position, so they cannot drift out of sync.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Player {
    position: Vec2,
    size: Vec2,
}

impl Player {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    pub fn position(&self) -> Vec2 { self.position }
    pub fn size(&self) -> Vec2 { self.size }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

/// Outcome of one update step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepResult {
    pub position: Vec2,
    pub bounds: Rect,
    pub collided: bool,
}

/// Movement rules shared by every frame of a screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlayerUpdateStep {
    pub speed: f32,
    pub size: Vec2,
    pub response: CollisionResponse,
}

impl Default for PlayerUpdateStep {
    fn default() -> Self {
        Self {
            speed: DEFAULT_PLAYER_SPEED,
            size: DEFAULT_PLAYER_SIZE,
            response: CollisionResponse::Report,
        }
    }
}

impl PlayerUpdateStep {
    /// Advance the player by one frame.
    ///
    /// The displacement is `speed * elapsed` along the single axis of
    /// `direction`. The candidate bounds are then tested against every
    /// region flagged collidable. With `CollisionResponse::Report` the move
    /// always applies; with `Block` a colliding move is discarded.
    pub fn apply(
        &self,
        position: Vec2,
        elapsed: f32,
        direction: Option<Direction>,
        regions: &[CollidableRegion],
    ) -> StepResult {
        let displacement = direction.map_or(Vec2::ZERO, |d| d.vector() * (self.speed * elapsed));
        let candidate = position + displacement;
        let bounds = Rect::from_origin_size(candidate, self.size);
        let collided = regions.iter().any(|r| r.collidable && bounds.overlaps(&r.rect));

        if collided && self.response == CollisionResponse::Block {
            return StepResult {
                position,
                bounds: Rect::from_origin_size(position, self.size),
                collided,
            };
        }

        StepResult { position: candidate, bounds, collided }
    }
}

/// One frame of movement with the default sprite size and response.
/// Returns the new position and whether a collidable region was hit.
pub fn update(
    position: Vec2,
    speed: f32,
    elapsed: f32,
    direction: Option<Direction>,
    regions: &[CollidableRegion],
) -> (Vec2, bool) {
    let step = PlayerUpdateStep { speed, ..PlayerUpdateStep::default() };
    let result = step.apply(position, elapsed, direction, regions);
    (result.position, result.collided)
}
