use affirmation_adventures::input::*;
use glam::Vec2;

#[test]
fn test_press_and_release() {
    let mut input = InputState::new();
    input.press(KeyCode::ArrowLeft);
    assert!(input.is_key_pressed(KeyCode::ArrowLeft));
    assert!(input.is_key_held(KeyCode::ArrowLeft));

    input.clear_frame_state();
    assert!(!input.is_key_pressed(KeyCode::ArrowLeft));
    assert!(input.is_key_held(KeyCode::ArrowLeft));

    input.release(KeyCode::ArrowLeft);
    assert!(input.is_key_released(KeyCode::ArrowLeft));
    assert!(!input.is_key_held(KeyCode::ArrowLeft));
}

#[test]
fn test_auto_repeat_is_not_a_new_press() {
    let mut input = InputState::new();
    input.press(KeyCode::ArrowUp);
    input.clear_frame_state();
    input.press(KeyCode::ArrowUp);
    assert!(!input.is_key_pressed(KeyCode::ArrowUp));
    assert!(input.is_key_held(KeyCode::ArrowUp));
}

#[test]
fn test_release_all_drops_held_keys() {
    let mut input = InputState::new();
    input.press(KeyCode::ArrowUp);
    input.press(KeyCode::ArrowRight);
    input.release_all();
    assert!(input.keys_held.is_empty());
    assert!(input.is_key_released(KeyCode::ArrowUp));
    assert!(input.is_key_released(KeyCode::ArrowRight));
}

#[test]
fn test_action_map_multiple_keys() {
    let mut actions = ActionMap::arrow_keys();
    actions.bind(Direction::Left, KeyCode::KeyA);

    let mut input = InputState::new();
    input.press(KeyCode::KeyA);
    assert!(actions.is_held(Direction::Left, &input));
    assert!(actions.is_pressed(Direction::Left, &input));
    assert!(!actions.is_held(Direction::Right, &input));
}

#[test]
fn test_direction_priority_order() {
    let actions = ActionMap::arrow_keys();
    let cases = [
        (vec![KeyCode::ArrowRight, KeyCode::ArrowLeft], Direction::Right),
        (vec![KeyCode::ArrowLeft, KeyCode::ArrowUp], Direction::Left),
        (vec![KeyCode::ArrowUp, KeyCode::ArrowDown], Direction::Up),
        (vec![KeyCode::ArrowDown], Direction::Down),
        (vec![KeyCode::ArrowDown, KeyCode::ArrowUp, KeyCode::ArrowLeft, KeyCode::ArrowRight], Direction::Right),
    ];
    for (keys, expected) in cases {
        let mut input = InputState::new();
        for key in keys {
            input.press(key);
        }
        assert_eq!(pressed_direction(&actions, &input), Some(expected));
    }
}

#[test]
fn test_no_keys_no_direction() {
    let actions = ActionMap::arrow_keys();
    let mut input = InputState::new();
    assert_eq!(pressed_direction(&actions, &input), None);

    input.press(KeyCode::Space);
    assert_eq!(pressed_direction(&actions, &input), None);
}

#[test]
fn test_direction_vectors_are_unit_and_y_up() {
    assert_eq!(Direction::Right.vector(), Vec2::X);
    assert_eq!(Direction::Left.vector(), -Vec2::X);
    assert_eq!(Direction::Up.vector(), Vec2::Y);
    assert_eq!(Direction::Down.vector(), -Vec2::Y);
    let order: Vec<Direction> = DIRECTION_PRIORITY.iter().map(|(d, _)| *d).collect();
    assert_eq!(order, vec![Direction::Right, Direction::Left, Direction::Up, Direction::Down]);
}
