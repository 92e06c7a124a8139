use uuid::Uuid;

use super::*;

// --- Tool ---

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn tool_hotkeys_ignore_case() {
    assert_eq!(Tool::from_hotkey(&Key::new("w")), Some(Tool::Wall));
    assert_eq!(Tool::from_hotkey(&Key::new("W")), Some(Tool::Wall));
    assert_eq!(Tool::from_hotkey(&Key::new("t")), Some(Tool::Terrain));
    assert_eq!(Tool::from_hotkey(&Key::new("x")), None);
    assert_eq!(Tool::from_hotkey(&Key::new("Enter")), None);
}

// --- Key ---

#[test]
fn key_classification() {
    assert!(Key::new("Escape").is_escape());
    assert!(Key::new("Enter").is_enter());
    assert!(Key::new("Backspace").is_delete());
    assert!(Key::new("Delete").is_delete());
    assert!(!Key::new("Esc").is_escape());
}

// --- UiState ---

#[test]
fn ui_state_default() {
    let ui = UiState::default();
    assert_eq!(ui.tool, Tool::Select);
    assert!(ui.selected_id.is_none());
    assert!(ui.guidance.is_none());
    assert_eq!(ui.view_mode, ViewMode::TwoD);
}

// --- InputState ---

#[test]
fn input_state_default_is_idle() {
    assert!(matches!(InputState::default(), InputState::Idle));
}

#[test]
fn only_move_and_resize_have_a_transform_target() {
    let p = Vertex::new(0.0, 0.0);
    let b = Bounds { left: 0.0, top: 0.0, right: 1.0, bottom: 1.0 };
    let id = Uuid::new_v4();
    assert_eq!(InputState::Idle.transform_target(), None);
    assert_eq!(InputState::Panning { last_screen: p }.transform_target(), None);
    let moving = InputState::MovingTerrain { id, start_world: p, orig_center: p, center: p };
    assert_eq!(moving.transform_target(), Some(id));
    let resizing = InputState::ResizingTerrain { id, side: Side::Top, start_world: p, orig: b, bounds: b };
    assert_eq!(resizing.transform_target(), Some(id));
}
