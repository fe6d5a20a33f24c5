//! Key rows - per-key widths, frames and hit-test frames.
//!
//! A row holds three key groups. The left group hugs the leading margin, the
//! right group hugs the trailing margin and the middle group is centred.
//! After the visible frames are placed, every key gets a hit-test frame
//! reaching halfway to its neighbours, so a touch between two keys goes to the
//! nearer one and the row has no dead zones.
//!
//! Key frames are in row coordinates; the row frame is in keyboard-view
//! coordinates.

use super::profile::LayoutProfile;
use crate::error::LayoutError;
use crate::state::view_state::{ViewState, ViewStateFields, ViewStateListener};
use crate::types::{EdgeInsets, KeyboardAction, Point, Rect};

/// Row-level policy altering the width rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowLayoutMode {
    #[default]
    Normal,
    ShiftRow,
    SpaceBarRow,
}

/// Punctuation keys that share the shift row with two shift-width keys.
const WIDENED_SYMBOLS: [&str; 5] = [".", ",", "?", "!", "'"];

/// Width of a key for an action under a row mode and profile.
pub fn key_width(action: &KeyboardAction, mode: RowLayoutMode, profile: &LayoutProfile) -> f64 {
    match (mode, action) {
        (
            RowLayoutMode::ShiftRow,
            KeyboardAction::Shift
            | KeyboardAction::ShiftDown
            | KeyboardAction::CapsLock
            | KeyboardAction::Backspace
            | KeyboardAction::KeyboardType(_),
        ) => profile.shift_button_width,
        (RowLayoutMode::ShiftRow, KeyboardAction::Character(text))
            if WIDENED_SYMBOLS.contains(&text.as_str()) =>
        {
            profile.widened_symbol_button_width
        }
        (RowLayoutMode::SpaceBarRow, KeyboardAction::NewLine) => 1.5 * profile.system_button_width,
        _ if action.is_input_action() => profile.key_button_width,
        _ => profile.system_button_width,
    }
}

// =============================================================================
// KEY
// =============================================================================

/// One key of a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    action: KeyboardAction,
    width: f64,
    frame: Rect,
    hit_test_frame: Option<Rect>,
}

impl Key {
    pub fn new(action: KeyboardAction) -> Self {
        Self {
            action,
            width: 0.0,
            frame: Rect::ZERO,
            hit_test_frame: None,
        }
    }

    pub fn action(&self) -> &KeyboardAction {
        &self.action
    }

    /// Width computed by the last layout pass.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Visible frame.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Expanded touch region, once laid out.
    pub fn hit_test_frame(&self) -> Option<Rect> {
        self.hit_test_frame
    }

    /// Whether a point (row coordinates) lands on this key.
    pub fn contains(&self, point: Point) -> bool {
        self.hit_test_frame.unwrap_or(self.frame).contains(point)
    }
}

// =============================================================================
// KEY ROW
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupAlignment {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Default)]
pub struct KeyRow {
    mode: RowLayoutMode,
    left_keys: Vec<Key>,
    middle_keys: Vec<Key>,
    right_keys: Vec<Key>,
    frame: Rect,
    margins: EdgeInsets,
    needs_layout: bool,
}

impl KeyRow {
    pub fn new(mode: RowLayoutMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> RowLayoutMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RowLayoutMode) {
        self.mode = mode;
        self.needs_layout = true;
    }

    /// Replace the row's keys from one group (middle only) or three groups.
    ///
    /// # Panics
    ///
    /// Any other group count is a broken key table and aborts.
    pub fn set_up(&mut self, action_groups: &[Vec<KeyboardAction>]) {
        if let Err(err) = self.try_set_up(action_groups) {
            panic!("{err}");
        }
    }

    /// Like [`set_up`](Self::set_up) but reports a bad group count.
    pub fn try_set_up(&mut self, action_groups: &[Vec<KeyboardAction>]) -> Result<(), LayoutError> {
        let (left, middle, right): (&[KeyboardAction], &[KeyboardAction], &[KeyboardAction]) =
            match action_groups {
                [middle] => (&[], middle, &[]),
                [left, middle, right] => (left, middle, right),
                _ => return Err(LayoutError::InvalidGroupCount(action_groups.len())),
            };

        self.left_keys = make_keys(left);
        self.middle_keys = make_keys(middle);
        self.right_keys = make_keys(right);
        self.needs_layout = true;
        Ok(())
    }

    /// Row frame in keyboard-view coordinates.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn set_frame(&mut self, frame: Rect) {
        if self.frame != frame {
            self.frame = frame;
            self.needs_layout = true;
        }
    }

    pub fn margins(&self) -> EdgeInsets {
        self.margins
    }

    pub fn set_margins(&mut self, margins: EdgeInsets) {
        if self.margins != margins {
            self.margins = margins;
            self.needs_layout = true;
        }
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// All keys, left group first, then middle, then right.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.left_keys
            .iter()
            .chain(self.middle_keys.iter())
            .chain(self.right_keys.iter())
    }

    pub fn key_count(&self) -> usize {
        self.left_keys.len() + self.middle_keys.len() + self.right_keys.len()
    }

    /// The key under a point in row coordinates.
    pub fn key_at(&self, point: Point) -> Option<&Key> {
        self.keys().find(|key| key.contains(point))
    }

    /// Compute every key's frame and hit-test frame.
    ///
    /// The leading and trailing margins come from the profile's edge inset;
    /// top and bottom from the row's own margins.
    pub fn layout(&mut self, profile: &LayoutProfile) {
        let mode = self.mode;
        for key in self
            .left_keys
            .iter_mut()
            .chain(self.middle_keys.iter_mut())
            .chain(self.right_keys.iter_mut())
        {
            key.width = key_width(&key.action, mode, profile);
        }

        // First, put the keys where they should be.
        let left_frames = self.place_group(&self.left_keys, GroupAlignment::Left, profile);
        let middle_frames = self.place_group(&self.middle_keys, GroupAlignment::Middle, profile);
        let right_frames = self.place_group(&self.right_keys, GroupAlignment::Right, profile);

        let left_count = left_frames.len();
        let mut frames = left_frames;
        frames.extend(middle_frames);
        frames.extend(right_frames);

        // The space key takes all the slack between the side groups.
        if self.mode == RowLayoutMode::SpaceBarRow
            && self.middle_keys.len() == 1
            && self.middle_keys[0].action == KeyboardAction::Space
        {
            let space_start = match left_count {
                0 => profile.edge_horizontal_inset,
                n => frames[n - 1].max_x() + profile.button_gap,
            };
            let space_end = match frames.get(left_count + 1) {
                Some(first_right) => first_right.min_x() - profile.button_gap,
                None => self.frame.width - profile.edge_horizontal_inset,
            };
            let space = &mut frames[left_count];
            space.x = space_start;
            space.width = space_end - space_start;
        }

        // Then expand every key to fill the gaps around it.
        self.expand_keys_to_fill_gaps(&frames);
        self.needs_layout = false;
    }

    fn place_group(&self, keys: &[Key], alignment: GroupAlignment, profile: &LayoutProfile) -> Vec<Rect> {
        let group_width = || {
            let gaps = keys.len().saturating_sub(1) as f64 * profile.button_gap;
            keys.iter().map(Key::width).sum::<f64>() + gaps
        };

        let mut x = match alignment {
            GroupAlignment::Left => profile.edge_horizontal_inset,
            GroupAlignment::Middle => (self.frame.width - group_width()) / 2.0,
            GroupAlignment::Right => self.frame.width - profile.edge_horizontal_inset - group_width(),
        };

        keys.iter()
            .map(|key| {
                let rect = Rect::new(x, self.margins.top, key.width, profile.key_height);
                x += key.width + profile.button_gap;
                rect
            })
            .collect()
    }

    fn expand_keys_to_fill_gaps(&mut self, frames: &[Rect]) {
        let row_width = self.frame.width;
        let row_height = self.frame.height;
        let mut start_x = 0.0;

        let keys = self
            .left_keys
            .iter_mut()
            .chain(self.middle_keys.iter_mut())
            .chain(self.right_keys.iter_mut());

        for (index, key) in keys.enumerate() {
            let frame = frames[index];
            let end_x = match frames.get(index + 1) {
                Some(next) => (frame.max_x() + next.min_x()) / 2.0,
                None => row_width,
            };

            key.frame = frame;
            key.hit_test_frame = Some(Rect::new(start_x, 0.0, end_x - start_x, row_height));
            start_x = end_x;
        }
    }
}

impl ViewStateListener for KeyRow {
    fn on_view_state_changed(&mut self, _current: &ViewState, changes: &ViewState) {
        if changes.fields().contains(ViewStateFields::SCREEN_SIZE) {
            self.needs_layout = true;
        }
    }
}

fn make_keys(actions: &[KeyboardAction]) -> Vec<Key> {
    actions.iter().cloned().map(Key::new).collect()
}

// =============================================================================
// Tests
// =============================================================================
