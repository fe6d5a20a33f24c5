//! End-to-end keyboard sessions through the public API.
//!
//! A recording host sits behind a `KeyboardController`; pointer events are
//! aimed at key centres found through the view, and the host's document is
//! checked afterwards.
//!
//! Run with: cargo test --test keyboard_session

use std::time::{Duration, Instant};

use spark_keyboard::{
    InputModeList, Key, KeyboardAction, KeyboardController, Orientation, Point, PointerEvent,
    PointerPhase, ProfileRegistry, Size, TextDocumentProxy, ViewState,
};

// =============================================================================
// RECORDING HOST
// =============================================================================

#[derive(Default)]
struct Host {
    text: String,
    cursor_offsets: Vec<i64>,
    input_mode_lists: Vec<String>,
}

impl TextDocumentProxy for Host {
    fn insert_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn delete_backward(&mut self) {
        self.text.pop();
    }

    fn adjust_text_position(&mut self, offset: i64) {
        self.cursor_offsets.push(offset);
    }
}

impl InputModeList for Host {
    fn handle_input_mode_list(&mut self, anchor: &Key, _event: &PointerEvent) {
        self.input_mode_lists.push(anchor.action().label().into_owned());
    }
}

struct Session {
    controller: KeyboardController<Host>,
    start: Instant,
}

fn setup() -> Session {
    let controller = KeyboardController::new(
        Host::default(),
        ProfileRegistry::builtin(),
        Size::new(375.0, 812.0),
    )
    .expect("keyboard lays out");

    Session {
        controller,
        start: Instant::now(),
    }
}

impl Session {
    fn at(&self, ms: u64) -> Instant {
        self.start + Duration::from_millis(ms)
    }

    fn center_of(&self, action: &KeyboardAction) -> Point {
        let view = self.controller.keyboard_view().expect("keyboard view");
        let (frame, _) = view
            .visible_keys()
            .find(|(_, key)| key.action() == action)
            .unwrap_or_else(|| panic!("no key for {action:?}"));
        Point::new(frame.x + frame.width / 2.0, frame.y + frame.height / 2.0)
    }

    fn pointer(&mut self, pointer: u64, location: Point, phase: PointerPhase, ms: u64) {
        let event = PointerEvent::new(pointer, location, phase, self.at(ms));
        self.controller.handle_pointer(&event);
    }

    fn tap(&mut self, action: KeyboardAction, ms: u64) {
        let location = self.center_of(&action);
        self.pointer(1, location, PointerPhase::Down, ms);
        self.pointer(1, location, PointerPhase::Up, ms + 40);
    }

    fn type_text(&mut self, text: &str, mut ms: u64) {
        for c in text.chars() {
            let action = match c {
                ' ' => KeyboardAction::Space,
                c => KeyboardAction::from(c.to_string().as_str()),
            };
            self.tap(action, ms);
            ms += 100;
        }
    }
}

// =============================================================================
// TYPING
// =============================================================================

#[test]
fn test_type_words() {
    let mut s = setup();
    s.type_text("hello world", 0);
    s.tap(KeyboardAction::NewLine, 2000);

    assert_eq!(s.controller.host().text, "hello world\n");
}

#[test]
fn test_shift_types_one_capital_layer() {
    let mut s = setup();
    s.tap(KeyboardAction::Shift, 0);
    s.type_text("HI", 100);
    s.tap(KeyboardAction::ShiftDown, 400);
    s.type_text("there", 500);

    assert_eq!(s.controller.host().text, "HIthere");
}

#[test]
fn test_numbers_and_symbols_layers() {
    let mut s = setup();
    s.tap(KeyboardAction::KeyboardType(spark_keyboard::KeyboardType::Numeric), 0);
    s.type_text("42", 100);
    s.tap(KeyboardAction::KeyboardType(spark_keyboard::KeyboardType::Symbolic), 400);
    s.type_text("#", 500);

    assert_eq!(s.controller.host().text, "42#");
}

#[test]
fn test_rolling_multi_touch() {
    let mut s = setup();
    let a = s.center_of(&"a".into());
    let b = s.center_of(&"b".into());

    s.pointer(1, a, PointerPhase::Down, 0);
    s.pointer(2, b, PointerPhase::Down, 30);
    // A was released by B's press
    assert_eq!(s.controller.host().text, "a");

    s.pointer(1, a, PointerPhase::Up, 60);
    s.pointer(2, b, PointerPhase::Up, 90);
    assert_eq!(s.controller.host().text, "ab");
}

// =============================================================================
// GESTURES
// =============================================================================

#[test]
fn test_hold_backspace() {
    let mut s = setup();
    s.type_text("abcdefg", 0);
    let backspace = s.center_of(&KeyboardAction::Backspace);

    s.pointer(1, backspace, PointerPhase::Down, 1000);
    assert_eq!(s.controller.host().text, "abcdef");

    // Nothing extra at the first tick
    s.controller.advance(s.at(1110));
    assert_eq!(s.controller.host().text, "abcdef");

    s.controller.advance(s.at(1220));
    s.controller.advance(s.at(1330));
    assert_eq!(s.controller.host().text, "abcd");

    s.pointer(1, backspace, PointerPhase::Up, 1340);
    s.controller.advance(s.at(2000));
    assert_eq!(s.controller.host().text, "abcd");
    assert!(s.controller.next_timer_deadline().is_none());
}

#[test]
fn test_space_drag_moves_cursor() {
    let mut s = setup();
    let space = s.center_of(&KeyboardAction::Space);
    let at = |dx: f64| Point::new(space.x + dx, space.y);

    s.pointer(1, space, PointerPhase::Down, 0);
    s.pointer(1, space, PointerPhase::Move, 10);
    s.pointer(1, at(-17.0), PointerPhase::Move, 20);
    s.pointer(1, at(-20.0), PointerPhase::Move, 30);
    s.pointer(1, at(-20.0), PointerPhase::Up, 40);

    assert_eq!(s.controller.host().cursor_offsets, vec![-1, -1, -1, -1]);
    assert!(s.controller.host().text.is_empty());
}

#[test]
fn test_space_tap_with_jitter() {
    let mut s = setup();
    let space = s.center_of(&KeyboardAction::Space);

    s.pointer(1, space, PointerPhase::Down, 0);
    s.pointer(1, space, PointerPhase::Move, 10);
    s.pointer(1, Point::new(space.x + 1.0, space.y), PointerPhase::Move, 20);
    s.pointer(1, Point::new(space.x + 1.0, space.y), PointerPhase::Up, 30);

    assert_eq!(s.controller.host().text, " ");
    assert!(s.controller.host().cursor_offsets.is_empty());
}

#[test]
fn test_globe_key() {
    let mut s = setup();
    s.tap(KeyboardAction::NextKeyboard, 0);

    assert_eq!(s.controller.host().input_mode_lists, vec!["🌐", "🌐"]);
    assert!(s.controller.host().text.is_empty());
}

#[test]
fn test_cancel_sends_nothing() {
    let mut s = setup();
    let q = s.center_of(&"q".into());

    s.pointer(1, q, PointerPhase::Down, 0);
    s.pointer(1, q, PointerPhase::Cancel, 20);
    s.pointer(1, q, PointerPhase::Up, 40);

    assert!(s.controller.host().text.is_empty());
}

// =============================================================================
// SCREEN CHANGES
// =============================================================================

#[test]
fn test_typing_after_rotation() {
    let mut s = setup();
    s.controller.will_rotate(Orientation::Landscape).expect("relayout");

    assert_eq!(s.controller.root_height().constant(), 188.0);
    s.type_text("ok", 0);
    assert_eq!(s.controller.host().text, "ok");
}

#[test]
fn test_rotation_to_same_orientation_is_noop() {
    let mut s = setup();
    s.controller.will_rotate(Orientation::Portrait).expect("relayout");
    let state = *s.controller.view_state();

    s.controller.will_rotate(Orientation::Portrait).expect("relayout");
    assert_eq!(*s.controller.view_state(), state);
    assert_eq!(state.screen_size, Some(Size::new(375.0, 812.0)));
}

#[test]
fn test_profile_table_from_json() {
    let json = r#"[
        {
            "screen": [320, 568],
            "metrics": {
                "keyboard_size": { "width": 320.0, "height": 216.0 },
                "input_key_width": 26.0,
                "system_key_width": 34.0,
                "shift_key_width": 36.0,
                "key_height": 38.0,
                "autocomplete_bar_height": 40.0,
                "edge_horizontal_inset": 3.0
            }
        }
    ]"#;
    let registry = ProfileRegistry::from_json(json).expect("valid table");
    let mut controller =
        KeyboardController::new(Host::default(), registry, Size::new(320.0, 568.0)).expect("layout");

    assert_eq!(controller.root_height().constant(), 216.0);

    controller
        .apply_view_state(ViewState::new().with_dark_appearance(true))
        .expect("relayout");
    assert!(controller.keyboard_view().expect("view").dark_appearance());
}
