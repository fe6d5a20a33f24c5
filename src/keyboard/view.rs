//! Keyboard view - four key rows, hit-testing and layer switching.
//!
//! The view owns its rows and its touch handler. Pointer events are
//! hit-tested here and fed to the handler; the handler's outputs either
//! switch the visible layer locally or go to the delegate.

use std::rc::Rc;
use std::time::Instant;

use super::layers;
use crate::error::LayoutError;
use crate::layout::{Key, KeyRow, LayoutAnchor, LayoutPriority, LayoutProfile, RowLayoutMode, RowStacker};
use crate::state::{
    InputMode, PointerEvent, PointerPhase, TouchConfig, TouchHandler, TouchOutput, ViewState,
    ViewStateFields, ViewStateForwarder, ViewStateListener,
};
use crate::types::{CaseState, KeyboardAction, KeyboardType, Point, Rect};

/// Rows in every layer: three of keys and the space bar row.
pub const ROW_COUNT: usize = 4;

/// Receives everything the view does not handle itself.
pub trait KeyboardViewDelegate {
    /// A key action that is not a layer switch.
    fn send_key(&mut self, action: KeyboardAction);
    /// The globe key asked for the input mode list.
    fn handle_input_mode_list(&mut self, anchor: &Key, event: &PointerEvent);
}

/// The keyboard surface: four rows of keys for the visible layer.
///
/// Starts on lowercase letters. Call [`layout`](Self::layout) after setting
/// the frame, then route pointer events through
/// [`handle_pointer`](Self::handle_pointer).
pub struct KeyboardView {
    frame: Rect,
    width_anchor: Rc<LayoutAnchor>,
    rows: Vec<KeyRow>,
    stacker: RowStacker,
    keyboard_type: KeyboardType,
    touch_handler: TouchHandler,
    profile: Option<LayoutProfile>,
    dark_appearance: bool,
}

impl KeyboardView {
    /// Create a view with the letters layer set up but not yet laid out.
    pub fn new(config: TouchConfig) -> Self {
        let rows = (0..ROW_COUNT)
            .map(|index| match index {
                2 => KeyRow::new(RowLayoutMode::ShiftRow),
                3 => KeyRow::new(RowLayoutMode::SpaceBarRow),
                _ => KeyRow::new(RowLayoutMode::Normal),
            })
            .collect();

        let mut view = Self {
            frame: Rect::ZERO,
            width_anchor: Rc::new(LayoutAnchor::new(LayoutPriority::Required)),
            rows,
            stacker: RowStacker::new(),
            keyboard_type: KeyboardType::default(),
            touch_handler: TouchHandler::new(config),
            profile: None,
            dark_appearance: false,
        };
        view.set_up_rows();
        view
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    /// The anchor the owner binds to the keyboard width.
    pub fn width_anchor(&self) -> &Rc<LayoutAnchor> {
        &self.width_anchor
    }

    pub fn keyboard_type(&self) -> KeyboardType {
        self.keyboard_type
    }

    pub fn dark_appearance(&self) -> bool {
        self.dark_appearance
    }

    pub fn rows(&self) -> &[KeyRow] {
        &self.rows
    }

    pub fn input_mode(&self) -> InputMode {
        self.touch_handler.input_mode()
    }

    pub fn next_timer_deadline(&self) -> Option<Instant> {
        self.touch_handler.next_repeat_deadline()
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    /// Stack the rows and lay out every key for the current frame width.
    pub fn layout(&mut self, profile: &LayoutProfile) -> Result<(), LayoutError> {
        let slots = self.stacker.stack(profile, self.frame.width, self.rows.len())?;

        for (row, slot) in self.rows.iter_mut().zip(slots) {
            row.set_frame(slot.frame);
            row.set_margins(slot.margins);
            row.layout(profile);
        }

        self.profile = Some(profile.clone());
        Ok(())
    }

    /// The key under a point in view coordinates.
    pub fn key_at(&self, point: Point) -> Option<&Key> {
        let row = self.rows.iter().find(|row| row.frame().contains(point))?;
        let origin = row.frame().origin();
        row.key_at(Point::new(point.x - origin.x, point.y - origin.y))
    }

    /// Every key with its visible frame in view coordinates.
    pub fn visible_keys(&self) -> impl Iterator<Item = (Rect, &Key)> {
        self.rows.iter().flat_map(|row| {
            let origin = row.frame().origin();
            row.keys()
                .map(move |key| (key.frame().offset_by(origin.x, origin.y), key))
        })
    }

    fn set_up_rows(&mut self) {
        let Some(key_caps) = layers::key_caps(self.keyboard_type) else {
            return;
        };

        for (row, groups) in self.rows.iter_mut().zip(key_caps) {
            row.set_up(&groups);
        }

        if let Some(profile) = &self.profile {
            for row in &mut self.rows {
                row.layout(profile);
            }
        }
    }

    fn switch_layer(&mut self, keyboard_type: KeyboardType) {
        tracing::debug!(?keyboard_type, "switching keyboard layer");
        self.keyboard_type = keyboard_type;
        self.set_up_rows();
    }

    // -------------------------------------------------------------------------
    // Touch
    // -------------------------------------------------------------------------

    /// Hit-test `event` and run it through the touch handler.
    ///
    /// Presses and moves over no key are dropped; releases and cancels always
    /// reach the handler so a session can end off the keys. Layer switches
    /// are applied here, everything else goes to `delegate`.
    pub fn handle_pointer(&mut self, event: &PointerEvent, delegate: &mut dyn KeyboardViewDelegate) {
        let key = self.key_at(event.location).cloned();

        let outputs = match (event.phase, key) {
            (PointerPhase::Down, Some(key)) => self.touch_handler.touch_began(event, &key),
            (PointerPhase::Move, Some(key)) => self.touch_handler.touch_moved(event, &key),
            (PointerPhase::Down | PointerPhase::Move, None) => return,
            (PointerPhase::Up, key) => self.touch_handler.touch_ended(event, key.as_ref()),
            (PointerPhase::Cancel, _) => self.touch_handler.touch_cancelled(),
        };

        self.dispatch(outputs, delegate);
    }

    /// Fire key repeat ticks due at `now`.
    pub fn advance(&mut self, now: Instant, delegate: &mut dyn KeyboardViewDelegate) {
        let outputs = self.touch_handler.advance(now);
        self.dispatch(outputs, delegate);
    }

    fn dispatch(&mut self, outputs: Vec<TouchOutput>, delegate: &mut dyn KeyboardViewDelegate) {
        for output in outputs {
            match output {
                TouchOutput::Key(action) => self.handle_key(action, delegate),
                TouchOutput::ShowInputModeList { anchor, event } => {
                    delegate.handle_input_mode_list(&anchor, &event);
                }
            }
        }
    }

    fn handle_key(&mut self, action: KeyboardAction, delegate: &mut dyn KeyboardViewDelegate) {
        match action {
            KeyboardAction::Shift => self.switch_layer(KeyboardType::Alphabetic(CaseState::Uppercased)),
            KeyboardAction::ShiftDown | KeyboardAction::KeyboardType(KeyboardType::Alphabetic(_)) => {
                self.switch_layer(KeyboardType::Alphabetic(CaseState::Lowercased));
            }
            KeyboardAction::KeyboardType(KeyboardType::Numeric) => self.switch_layer(KeyboardType::Numeric),
            KeyboardAction::KeyboardType(KeyboardType::Symbolic) => self.switch_layer(KeyboardType::Symbolic),
            action => delegate.send_key(action),
        }
    }
}

impl ViewStateListener for KeyboardView {
    fn on_view_state_changed(&mut self, current: &ViewState, changes: &ViewState) {
        if changes.fields().contains(ViewStateFields::APPEARANCE) {
            self.dark_appearance = current.dark_appearance.unwrap_or(false);
        }
        self.forward_to_children(current, changes);
    }
}

impl ViewStateForwarder for KeyboardView {
    fn view_state_children(&mut self) -> Vec<&mut dyn ViewStateListener> {
        self.rows
            .iter_mut()
            .map(|row| row as &mut dyn ViewStateListener)
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ProfileRegistry;
    use crate::types::Size;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingDelegate {
        keys: Vec<KeyboardAction>,
        input_mode_lists: usize,
    }

    impl KeyboardViewDelegate for RecordingDelegate {
        fn send_key(&mut self, action: KeyboardAction) {
            self.keys.push(action);
        }

        fn handle_input_mode_list(&mut self, _anchor: &Key, _event: &PointerEvent) {
            self.input_mode_lists += 1;
        }
    }

    struct Harness {
        view: KeyboardView,
        delegate: RecordingDelegate,
        start: Instant,
    }

    fn setup() -> Harness {
        let profile = ProfileRegistry::builtin().resolve(Size::new(375.0, 812.0)).clone();
        let mut view = KeyboardView::new(TouchConfig::default());
        view.set_frame(Rect::new(0.0, 0.0, 375.0, 261.0));
        view.layout(&profile).unwrap();

        Harness {
            view,
            delegate: RecordingDelegate::default(),
            start: Instant::now(),
        }
    }

    impl Harness {
        fn center_of(&self, action: &KeyboardAction) -> Point {
            let (frame, _) = self
                .view
                .visible_keys()
                .find(|(_, key)| key.action() == action)
                .unwrap_or_else(|| panic!("no key for {action:?}"));
            Point::new(frame.x + frame.width / 2.0, frame.y + frame.height / 2.0)
        }

        fn send(&mut self, pointer: u64, location: Point, phase: PointerPhase, ms: u64) {
            let event = PointerEvent::new(pointer, location, phase, self.start + Duration::from_millis(ms));
            self.view.handle_pointer(&event, &mut self.delegate);
        }

        fn tap(&mut self, action: &KeyboardAction, ms: u64) {
            let location = self.center_of(action);
            self.send(1, location, PointerPhase::Down, ms);
            self.send(1, location, PointerPhase::Up, ms + 30);
        }
    }

    fn row_labels(view: &KeyboardView, index: usize) -> Vec<String> {
        view.rows()[index]
            .keys()
            .map(|key| key.action().label().into_owned())
            .collect()
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    #[test]
    fn test_initial_layer_is_lowercase_letters() {
        let h = setup();
        assert_eq!(h.view.keyboard_type(), KeyboardType::Alphabetic(CaseState::Lowercased));
        assert_eq!(row_labels(&h.view, 0).concat(), "qwertyuiop");
        assert_eq!(h.view.rows()[2].mode(), RowLayoutMode::ShiftRow);
        assert_eq!(h.view.rows()[3].mode(), RowLayoutMode::SpaceBarRow);
    }

    #[test]
    fn test_rows_stacked_below_autocomplete_bar() {
        let h = setup();
        let rows = h.view.rows();

        assert!((rows[0].frame().y - 45.0).abs() < 1e-3);
        assert!((rows[3].frame().max_y() - 261.0).abs() < 1e-3);
        assert!(rows.iter().all(|row| !row.needs_layout()));
    }

    #[test]
    fn test_key_at_resolves_every_key_center() {
        let h = setup();
        for (frame, key) in h.view.visible_keys() {
            let center = Point::new(frame.x + frame.width / 2.0, frame.y + frame.height / 2.0);
            assert_eq!(h.view.key_at(center).map(Key::action), Some(key.action()));
        }
    }

    #[test]
    fn test_no_gap_between_rows() {
        let registry = ProfileRegistry::builtin();
        let screens: Vec<_> = registry.screens().collect();

        for screen in screens {
            let profile = registry.get(screen).unwrap();
            let size = profile.keyboard_size;
            let mut view = KeyboardView::new(TouchConfig::default());
            view.set_frame(Rect::new(0.0, 0.0, size.width, size.height));
            view.layout(profile).unwrap();

            let rows = view.rows();
            for pair in rows.windows(2) {
                let boundary = pair[0].frame().max_y();
                assert_eq!(boundary, pair[1].frame().min_y(), "{screen:?}");
                for y in [boundary - 1e-9, boundary, boundary + 1e-9] {
                    assert!(view.key_at(Point::new(size.width / 2.0, y)).is_some(), "{screen:?} y={y}");
                }
            }

            let mut y = rows[0].frame().min_y();
            while y < rows[3].frame().max_y() {
                assert!(view.key_at(Point::new(size.width / 2.0, y)).is_some(), "{screen:?} y={y}");
                y += 0.01;
            }
        }
    }

    #[test]
    fn test_release_on_row_boundary_sends_key() {
        let mut h = setup();
        let boundary = h.view.rows()[0].frame().max_y();
        let q = h.center_of(&"q".into());

        h.send(1, q, PointerPhase::Down, 0);
        h.send(1, Point::new(q.x, boundary), PointerPhase::Up, 30);

        assert_eq!(h.delegate.keys.len(), 1);
    }

    #[test]
    fn test_autocomplete_bar_has_no_keys() {
        let h = setup();
        assert!(h.view.key_at(Point::new(100.0, 20.0)).is_none());
    }

    // -------------------------------------------------------------------------
    // Touch
    // -------------------------------------------------------------------------

    #[test]
    fn test_tap_sends_character() {
        let mut h = setup();
        h.tap(&"q".into(), 0);
        assert_eq!(h.delegate.keys, vec![KeyboardAction::from("q")]);
    }

    #[test]
    fn test_down_outside_keys_ignored() {
        let mut h = setup();
        h.send(1, Point::new(100.0, 20.0), PointerPhase::Down, 0);
        assert_eq!(h.view.input_mode(), InputMode::Idle);
        assert!(h.delegate.keys.is_empty());
    }

    #[test]
    fn test_shift_switches_to_uppercase() {
        let mut h = setup();
        h.tap(&KeyboardAction::Shift, 0);

        assert_eq!(h.view.keyboard_type(), KeyboardType::Alphabetic(CaseState::Uppercased));
        assert_eq!(row_labels(&h.view, 0).concat(), "QWERTYUIOP");
        // Shift never reaches the delegate
        assert!(h.delegate.keys.is_empty());

        h.tap(&"Q".into(), 100);
        h.tap(&KeyboardAction::ShiftDown, 200);
        assert_eq!(h.view.keyboard_type(), KeyboardType::Alphabetic(CaseState::Lowercased));
        assert_eq!(h.delegate.keys, vec![KeyboardAction::from("Q")]);
    }

    #[test]
    fn test_layer_keys_switch_tables() {
        let mut h = setup();

        h.tap(&KeyboardAction::KeyboardType(KeyboardType::Numeric), 0);
        assert_eq!(h.view.keyboard_type(), KeyboardType::Numeric);
        assert_eq!(row_labels(&h.view, 0).concat(), "1234567890");

        h.tap(&KeyboardAction::KeyboardType(KeyboardType::Symbolic), 100);
        assert_eq!(h.view.keyboard_type(), KeyboardType::Symbolic);
        assert_eq!(row_labels(&h.view, 0).concat(), "[]{}#%^*+=");

        h.tap(&KeyboardAction::KeyboardType(KeyboardType::Alphabetic(CaseState::Lowercased)), 200);
        assert_eq!(h.view.keyboard_type(), KeyboardType::Alphabetic(CaseState::Lowercased));

        // New keys are laid out right away
        assert!(h.view.rows().iter().all(|row| !row.needs_layout()));
        assert!(h.delegate.keys.is_empty());
    }

    #[test]
    fn test_backspace_repeat_through_view() {
        let mut h = setup();
        let location = h.center_of(&KeyboardAction::Backspace);

        h.send(1, location, PointerPhase::Down, 0);
        h.view.advance(h.start + Duration::from_millis(330), &mut h.delegate);
        h.send(1, location, PointerPhase::Up, 340);

        assert_eq!(h.delegate.keys, vec![KeyboardAction::Backspace; 3]);
    }

    #[test]
    fn test_globe_shows_input_mode_list() {
        let mut h = setup();
        h.tap(&KeyboardAction::NextKeyboard, 0);

        // Once on press, once on release over the globe
        assert_eq!(h.delegate.input_mode_lists, 2);
        assert!(h.delegate.keys.is_empty());
    }

    #[test]
    fn test_space_drag_moves_cursor() {
        let mut h = setup();
        let start = h.center_of(&KeyboardAction::Space);

        h.send(1, start, PointerPhase::Down, 0);
        h.send(1, start, PointerPhase::Move, 10);
        h.send(1, Point::new(start.x + 12.0, start.y), PointerPhase::Move, 20);
        h.send(1, Point::new(start.x + 12.0, start.y), PointerPhase::Up, 30);

        assert_eq!(h.delegate.keys, vec![KeyboardAction::MoveCursorForward; 2]);
    }

    #[test]
    fn test_appearance_patch_reaches_view() {
        let mut h = setup();
        let patch = ViewState::new().with_dark_appearance(true);
        h.view.on_view_state_changed(&patch, &patch);
        assert!(h.view.dark_appearance());
    }

    #[test]
    fn test_screen_size_patch_reaches_rows() {
        let mut h = setup();
        let patch = ViewState::new().with_screen_size(Size::new(812.0, 375.0));
        h.view.on_view_state_changed(&patch, &patch);
        assert!(h.view.rows().iter().all(KeyRow::needs_layout));
    }
}
