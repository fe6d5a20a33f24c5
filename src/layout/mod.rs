//! Keyboard Layout Module
//!
//! Geometry for the key area, driven by the active layout profile.
//!
//! # Architecture
//!
//! 1. [`ProfileRegistry`] resolves a screen size into a [`LayoutProfile`]
//! 2. [`LayoutContext`] holds the active profile in a signal
//! 3. [`DynamicDimensions`] pulls profile values into displayed sizes
//! 4. [`RowStacker`] stacks the key rows vertically using Taffy
//! 5. [`KeyRow`] places keys horizontally and builds their hit-test frames
//!
//! # Example
//!
//! ```ignore
//! use spark_keyboard::layout::{KeyRow, LayoutContext, ProfileRegistry, RowLayoutMode};
//! use spark_keyboard::types::Size;
//!
//! let context = LayoutContext::new(ProfileRegistry::builtin(), Size::new(375.0, 812.0));
//! let mut row = KeyRow::new(RowLayoutMode::Normal);
//! row.set_up(&[vec!["q".into(), "w".into()]]);
//! row.layout(&context.active_profile());
//! ```

pub mod context;
pub mod dimension;
pub mod key_row;
pub mod profile;
pub mod row_stack;

pub use context::LayoutContext;
pub use dimension::{DimensionTarget, DynamicDimensions, LayoutAnchor, LayoutPriority, TargetHandle};
pub use key_row::{key_width, Key, KeyRow, RowLayoutMode};
pub use profile::{
    LayoutProfile, ProfileRegistry, ProvidedMetrics, ScreenKey, KEY_VIEW_BOTTOM_INSET,
    KEY_VIEW_TOP_INSET,
};
pub use row_stack::{row_margins, RowSlot, RowStacker};
