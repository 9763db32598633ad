use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use glam::Vec2;
pub use winit::keyboard::KeyCode;

/// Raw keyboard state for a single frame.
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_held: HashSet<KeyCode>,
    pub keys_pressed: HashSet<KeyCode>,
    pub keys_released: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down event. Auto-repeat events do not count as a new press.
    pub fn press(&mut self, key: KeyCode) {
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
        self.keys_released.insert(key);
    }

    /// Forget every held key, e.g. when the window loses focus and the
    /// matching release events will never arrive.
    pub fn release_all(&mut self) {
        let held: Vec<KeyCode> = self.keys_held.drain().collect();
        self.keys_released.extend(held);
    }

    pub fn clear_frame_state(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool { self.keys_held.contains(&key) }
    pub fn is_key_pressed(&self, key: KeyCode) -> bool { self.keys_pressed.contains(&key) }
    pub fn is_key_released(&self, key: KeyCode) -> bool { self.keys_released.contains(&key) }
}

/// Maps logical actions (defined by the game) to one or more keys.
#[derive(Debug, Clone)]
pub struct ActionMap<A: Hash + Eq + Copy> {
    bindings: HashMap<A, Vec<KeyCode>>,
}

impl<A: Hash + Eq + Copy> ActionMap<A> {
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    pub fn bind(&mut self, action: A, key: KeyCode) {
        self.bindings.entry(action).or_default().push(key);
    }

    /// Returns true if any bound key went down this frame.
    pub fn is_pressed(&self, action: A, input: &InputState) -> bool {
        self.bindings
            .get(&action)
            .is_some_and(|keys| keys.iter().any(|k| input.is_key_pressed(*k)))
    }

    /// Returns true if any bound key is currently held.
    pub fn is_held(&self, action: A, input: &InputState) -> bool {
        self.bindings
            .get(&action)
            .is_some_and(|keys| keys.iter().any(|k| input.is_key_held(*k)))
    }

    /// Returns true if any bound key was released this frame.
    pub fn is_released(&self, action: A, input: &InputState) -> bool {
        self.bindings
            .get(&action)
            .is_some_and(|keys| keys.iter().any(|k| input.is_key_released(*k)))
    }
}

impl<A: Hash + Eq + Copy> Default for ActionMap<A> {
    fn default() -> Self { Self::new() }
}

// ── Directions ───────────────────────────────────────────────────────────────

/// One of the four movement directions. "No direction" is `Option::None`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

/// Directions in the order they are checked each frame, with their unit
/// vectors (world space is y-up). Only the first held direction moves the
/// player, so holding Right and Up together moves right.
pub const DIRECTION_PRIORITY: [(Direction, Vec2); 4] = [
    (Direction::Right, Vec2::new(1.0, 0.0)),
    (Direction::Left, Vec2::new(-1.0, 0.0)),
    (Direction::Up, Vec2::new(0.0, 1.0)),
    (Direction::Down, Vec2::new(0.0, -1.0)),
];

impl Direction {
    /// Unit vector for this direction.
    pub fn vector(self) -> Vec2 {
        DIRECTION_PRIORITY
            .iter()
            .find(|(d, _)| *d == self)
            .map_or(Vec2::ZERO, |(_, v)| *v)
    }
}

impl ActionMap<Direction> {
    /// The default bindings: one arrow key per direction.
    pub fn arrow_keys() -> Self {
        let mut map = Self::new();
        map.bind(Direction::Right, KeyCode::ArrowRight);
        map.bind(Direction::Left, KeyCode::ArrowLeft);
        map.bind(Direction::Up, KeyCode::ArrowUp);
        map.bind(Direction::Down, KeyCode::ArrowDown);
        map
    }
}

/// The highest-priority direction currently held, or `None`.
pub fn pressed_direction(actions: &ActionMap<Direction>, input: &InputState) -> Option<Direction> {
    DIRECTION_PRIORITY
        .iter()
        .map(|(d, _)| *d)
        .find(|d| actions.is_held(*d, input))
}
