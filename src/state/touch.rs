//! Touch handling - the gesture state machine behind every key press.
//!
//! Pointer events arrive already hit-tested to a key. The handler tracks at
//! most one bound (pointer, key) session and turns the event stream into
//! [`TouchOutput`]s: key actions plus requests to show the input mode list.
//!
//! # Gestures
//!
//! - Tap: characters, space and return are sent on release.
//! - Backspace: sent on press, then repeated while held (the first repeat
//!   tick is skipped).
//! - Space drag: moving a finger that went down on space turns it into a
//!   cursor drag, one cursor step per threshold of horizontal travel.
//! - Next keyboard: the globe key asks the host for its input mode list.
//! - Rolling multi-touch: a second character press releases the first one.
//!
//! Every entry point returns the outputs produced by that call, in order.

use std::time::{Duration, Instant};

use super::repeat::{KeyRepeatTimer, TimerId};
use crate::layout::Key;
use crate::types::{KeyboardAction, Point};

// =============================================================================
// TYPES
// =============================================================================

/// Identifies one finger (or mouse button) for the lifetime of its touch.
pub type PointerId = u64;

/// Phase of a pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// Pointer went down.
    Down,
    /// Pointer moved while down.
    Move,
    /// Pointer was lifted.
    Up,
    /// The system took the touch away; nothing is sent.
    Cancel,
}

/// One pointer sample in keyboard-view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer: PointerId,
    pub location: Point,
    pub phase: PointerPhase,
    pub timestamp: Instant,
}

impl PointerEvent {
    pub fn new(pointer: PointerId, location: Point, phase: PointerPhase, timestamp: Instant) -> Self {
        Self {
            pointer,
            location,
            phase,
            timestamp,
        }
    }
}

/// How the in-progress touch is being interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// No touch in progress.
    #[default]
    Idle,
    /// A key is held; characters are sent on release. Presses start with
    /// `one_off` unset.
    Typing {
        one_off: bool,
    },
    /// Backspace is held and repeating.
    Backspacing,
    /// The globe key is held.
    NextKeyboard,
    /// A drag that started on space is moving the cursor.
    CursorMoving,
}

/// Something the handler asks its owner to do.
#[derive(Debug, Clone, PartialEq)]
pub enum TouchOutput {
    /// Perform a key action (send text, switch layer, move the cursor...).
    Key(KeyboardAction),
    /// Show the host's input mode list, anchored at the globe key.
    ShowInputModeList { anchor: Key, event: PointerEvent },
}

/// Timing and distance tuning for [`TouchHandler`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchConfig {
    /// Period of the key repeat timer.
    pub key_repeat_interval: Duration,
    /// Horizontal travel per cursor step while dragging on space. Must be positive.
    pub cursor_moving_threshold: f64,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            key_repeat_interval: Duration::from_millis(110),
            cursor_moving_threshold: 5.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Binding {
    pointer: PointerId,
    key: Key,
}

// =============================================================================
// TOUCH HANDLER
// =============================================================================

/// Gesture state machine for one keyboard view.
///
/// Feed it hit-tested pointer events and, while backspace is held, the
/// current time through [`advance`](Self::advance). It never touches the
/// host directly; every call returns the outputs it produced.
#[derive(Debug)]
pub struct TouchHandler {
    config: TouchConfig,
    binding: Option<Binding>,
    input_mode: InputMode,
    cursor_anchor: Option<Point>,
    moved_cursor: bool,
    repeat_timer: KeyRepeatTimer,
    repeat_counter: u32,
    outputs: Vec<TouchOutput>,
}

impl Default for TouchHandler {
    fn default() -> Self {
        Self::new(TouchConfig::default())
    }
}

impl TouchHandler {
    /// Create an idle handler.
    pub fn new(config: TouchConfig) -> Self {
        Self {
            config,
            binding: None,
            input_mode: InputMode::Idle,
            cursor_anchor: None,
            moved_cursor: false,
            repeat_timer: KeyRepeatTimer::new(config.key_repeat_interval),
            repeat_counter: 0,
            outputs: Vec::new(),
        }
    }

    pub fn config(&self) -> &TouchConfig {
        &self.config
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// The pointer owning the current session, if any.
    pub fn bound_pointer(&self) -> Option<PointerId> {
        self.binding.as_ref().map(|binding| binding.pointer)
    }

    /// The key pressed by the bound pointer.
    pub fn bound_key(&self) -> Option<&Key> {
        self.binding.as_ref().map(|binding| &binding.key)
    }

    /// Honoured repeat ticks since the timer was last armed.
    pub fn repeat_counter(&self) -> u32 {
        self.repeat_counter
    }

    /// When the host should next call [`advance`](Self::advance).
    pub fn next_repeat_deadline(&self) -> Option<Instant> {
        self.repeat_timer.next_deadline()
    }

    /// The live repeat timer id, for hosts scheduling ticks themselves.
    pub fn current_timer(&self) -> Option<TimerId> {
        self.repeat_timer.current()
    }

    // -------------------------------------------------------------------------
    // Pointer events
    // -------------------------------------------------------------------------

    /// A pointer went down on `key`.
    ///
    /// Binds the session to this pointer. Backspace is sent immediately, the
    /// globe key requests the input mode list, shift and layer keys switch
    /// on press, and a character press releases any character still held.
    pub fn touch_began(&mut self, event: &PointerEvent, key: &Key) -> Vec<TouchOutput> {
        self.repeat_counter = 0;

        match (self.input_mode, key.action()) {
            (InputMode::Idle, KeyboardAction::NextKeyboard) => {
                self.input_mode = InputMode::NextKeyboard;
                self.bind(event.pointer, key);
                self.show_input_mode_list(key, event);
            }
            (InputMode::Idle, KeyboardAction::Backspace) => {
                self.input_mode = InputMode::Backspacing;
                self.bind(event.pointer, key);
                self.emit(KeyboardAction::Backspace);
            }
            (_, action) => {
                match action {
                    KeyboardAction::Shift | KeyboardAction::ShiftDown | KeyboardAction::KeyboardType(_) => {
                        self.emit(action.clone());
                    }
                    KeyboardAction::Character(_) => self.release_previous_character(event),
                    _ => {}
                }
                self.bind(event.pointer, key);
                self.input_mode = InputMode::Typing { one_off: false };
            }
        }

        self.arm_repeat(event.timestamp);
        self.drain()
    }

    /// A pointer moved over `key`.
    ///
    /// Moving the pointer bound to space starts a cursor drag; further moves
    /// step the cursor once per threshold of horizontal travel.
    pub fn touch_moved(&mut self, event: &PointerEvent, key: &Key) -> Vec<TouchOutput> {
        let is_bound_pointer = self.bound_pointer() == Some(event.pointer);

        match self.input_mode {
            InputMode::Backspacing => return Vec::new(),
            InputMode::Typing { .. }
                if is_bound_pointer
                    && self.bound_key().map(Key::action) == Some(&KeyboardAction::Space) =>
            {
                self.input_mode = InputMode::CursorMoving;
                self.cursor_anchor = Some(event.location);
                self.moved_cursor = false;
                return Vec::new();
            }
            InputMode::CursorMoving => {
                if is_bound_pointer {
                    self.move_cursor(event.location);
                }
                return self.drain();
            }
            InputMode::NextKeyboard => {
                if key.action() != &KeyboardAction::NextKeyboard {
                    return Vec::new();
                }
                self.show_input_mode_list(key, event);
            }
            InputMode::Idle | InputMode::Typing { .. } => {}
        }

        if is_bound_pointer {
            self.arm_repeat(event.timestamp);
        }
        self.drain()
    }

    /// A pointer was lifted. Only the bound pointer ends the session.
    ///
    /// `key` is whatever lies under the release point, if anything.
    pub fn touch_ended(&mut self, event: &PointerEvent, key: Option<&Key>) -> Vec<TouchOutput> {
        self.end(event.pointer, key, event);
        self.drain()
    }

    /// Abandon the session without sending anything.
    pub fn touch_cancelled(&mut self) -> Vec<TouchOutput> {
        self.repeat_timer.cancel();
        self.reset();
        Vec::new()
    }

    // -------------------------------------------------------------------------
    // Key repeat
    // -------------------------------------------------------------------------

    /// Handle one repeat tick. Ticks from a superseded arming are dropped.
    pub fn on_key_repeat(&mut self, id: TimerId) -> Vec<TouchOutput> {
        self.tick(id);
        self.drain()
    }

    /// Fire every repeat tick due at `now`.
    pub fn advance(&mut self, now: Instant) -> Vec<TouchOutput> {
        while let Some(id) = self.repeat_timer.take_due(now) {
            self.tick(id);
        }
        self.drain()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn end(&mut self, pointer: PointerId, key: Option<&Key>, event: &PointerEvent) {
        let Some(binding) = self.binding.take_if(|binding| binding.pointer == pointer) else {
            return;
        };

        self.repeat_timer.cancel();

        match self.input_mode {
            InputMode::Backspacing | InputMode::Idle => {}
            InputMode::CursorMoving => {
                // A drag that never reached the threshold is still a tap.
                if !self.moved_cursor {
                    self.emit(binding.key.action().clone());
                }
            }
            InputMode::NextKeyboard => {
                if let Some(key) = key.filter(|key| key.action() == &KeyboardAction::NextKeyboard) {
                    self.show_input_mode_list(key, event);
                }
            }
            InputMode::Typing { .. } => {
                if let Some(key) = key {
                    if matches!(
                        key.action(),
                        KeyboardAction::Character(_) | KeyboardAction::Space | KeyboardAction::NewLine
                    ) {
                        self.emit(key.action().clone());
                    }
                }
            }
        }

        self.reset();
    }

    /// Rolling multi-touch: a character press while another pointer holds a
    /// character key releases that key first.
    fn release_previous_character(&mut self, event: &PointerEvent) {
        let previous = self
            .binding
            .as_ref()
            .filter(|binding| binding.pointer != event.pointer && binding.key.action().is_character())
            .cloned();

        if let Some(previous) = previous {
            tracing::trace!(pointer = previous.pointer, "auto-releasing previous character touch");
            self.end(previous.pointer, Some(&previous.key), event);
        }
    }

    fn move_cursor(&mut self, location: Point) {
        let Some(anchor) = self.cursor_anchor else {
            return;
        };
        let threshold = self.config.cursor_moving_threshold;

        let delta = location.x - anchor.x;
        let backward = delta < 0.0;
        let mut remaining = delta.abs();

        while threshold > 0.0 && remaining >= threshold {
            remaining -= threshold;
            self.emit(if backward {
                KeyboardAction::MoveCursorBackward
            } else {
                KeyboardAction::MoveCursorForward
            });
            self.moved_cursor = true;
        }

        // Carry the unconsumed travel into the next move.
        let carried = if backward { -remaining } else { remaining };
        self.cursor_anchor = Some(Point::new(location.x - carried, location.y));
    }

    fn tick(&mut self, id: TimerId) {
        if !self.repeat_timer.is_current(id) {
            tracing::trace!(?id, "dropping stale key repeat tick");
            return;
        }

        self.repeat_counter += 1;
        tracing::trace!(counter = self.repeat_counter, "key repeat tick");

        // The first tick is swallowed so a quick press deletes only once.
        if self.repeat_counter > 1 && self.input_mode == InputMode::Backspacing {
            self.emit(KeyboardAction::Backspace);
        }
    }

    fn arm_repeat(&mut self, now: Instant) {
        self.repeat_counter = 0;
        self.repeat_timer.arm(now);
    }

    fn bind(&mut self, pointer: PointerId, key: &Key) {
        self.binding = Some(Binding {
            pointer,
            key: key.clone(),
        });
    }

    fn reset(&mut self) {
        self.binding = None;
        self.input_mode = InputMode::Idle;
        self.cursor_anchor = None;
        self.moved_cursor = false;
    }

    fn emit(&mut self, action: KeyboardAction) {
        self.outputs.push(TouchOutput::Key(action));
    }

    fn show_input_mode_list(&mut self, key: &Key, event: &PointerEvent) {
        self.outputs.push(TouchOutput::ShowInputModeList {
            anchor: key.clone(),
            event: *event,
        });
    }

    fn drain(&mut self) -> Vec<TouchOutput> {
        std::mem::take(&mut self.outputs)
    }
}

// =============================================================================
// Tests
// =============================================================================
