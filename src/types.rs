//! Core types for spark-keyboard.
//!
//! Geometry primitives shared by the layout engine and the touch handler,
//! and the closed set of actions a key can produce.

use std::borrow::Cow;

use serde::Deserialize;

// =============================================================================
// Geometry
// =============================================================================

/// A point in keyboard-view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The shorter of the two edges.
    pub fn short_edge(&self) -> f64 {
        self.width.min(self.height)
    }

    /// The longer of the two edges.
    pub fn long_edge(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// Axis-aligned rectangle (origin + size).
///
/// `contains` is half-open on both axes, so rectangles sharing an edge never
/// both claim a point on it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Half-open containment test: `min <= p < max` on both axes.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    /// Translate by (dx, dy).
    pub fn offset_by(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Directional insets of a view's layout margins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub top: f64,
    pub leading: f64,
    pub bottom: f64,
    pub trailing: f64,
}

impl EdgeInsets {
    pub const fn new(top: f64, leading: f64, bottom: f64, trailing: f64) -> Self {
        Self {
            top,
            leading,
            bottom,
            trailing,
        }
    }
}

// =============================================================================
// Keyboard actions
// =============================================================================

/// Shift state of the alphabetic layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseState {
    #[default]
    Lowercased,
    Uppercased,
    CapsLocked,
}

/// Which key layer is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyboardType {
    Alphabetic(CaseState),
    Numeric,
    Symbolic,
    Emojis,
}

impl Default for KeyboardType {
    fn default() -> Self {
        Self::Alphabetic(CaseState::Lowercased)
    }
}

/// The semantic outcome of pressing a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum KeyboardAction {
    Character(String),
    Space,
    NewLine,
    Backspace,
    Shift,
    ShiftDown,
    CapsLock,
    NextKeyboard,
    KeyboardType(KeyboardType),
    MoveCursorForward,
    MoveCursorBackward,
    Emoji(String),
    #[default]
    None,
}

impl KeyboardAction {
    /// Whether this action produces text (drives width and key styling).
    pub fn is_input_action(&self) -> bool {
        match self {
            Self::Character(_) | Self::Emoji(_) | Self::Space | Self::NewLine => true,
            Self::Backspace
            | Self::Shift
            | Self::ShiftDown
            | Self::CapsLock
            | Self::NextKeyboard
            | Self::KeyboardType(_)
            | Self::MoveCursorForward
            | Self::MoveCursorBackward
            | Self::None => false,
        }
    }

    pub fn is_character(&self) -> bool {
        matches!(self, Self::Character(_))
    }

    /// Key-cap text. Image keys get a short glyph instead of an image.
    pub fn label(&self) -> Cow<'_, str> {
        match self {
            Self::Character(text) | Self::Emoji(text) => Cow::Borrowed(text.as_str()),
            Self::NewLine => Cow::Borrowed("return"),
            Self::Space => Cow::Borrowed("space"),
            Self::KeyboardType(KeyboardType::Numeric) => Cow::Borrowed("123"),
            Self::KeyboardType(KeyboardType::Symbolic) => Cow::Borrowed("#+="),
            Self::KeyboardType(KeyboardType::Alphabetic(_)) => Cow::Borrowed("ABC"),
            Self::KeyboardType(KeyboardType::Emojis) => Cow::Borrowed("☺"),
            Self::Backspace => Cow::Borrowed("⌫"),
            Self::NextKeyboard => Cow::Borrowed("🌐"),
            Self::Shift => Cow::Borrowed("⇧"),
            Self::ShiftDown => Cow::Borrowed("⬆"),
            Self::CapsLock => Cow::Borrowed("⇪"),
            Self::MoveCursorForward => Cow::Borrowed("→"),
            Self::MoveCursorBackward => Cow::Borrowed("←"),
            Self::None => Cow::Borrowed(""),
        }
    }
}

impl From<&str> for KeyboardAction {
    fn from(text: &str) -> Self {
        Self::Character(text.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================
