//! # spark-keyboard
//!
//! Soft keyboard input surface for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! reactive layout values and [Taffy](https://github.com/DioxusLabs/taffy) for
//! row stacking.
//!
//! ## Architecture
//!
//! Everything runs on one thread. Pointer events go through hit-testing into
//! the touch state machine; its outputs either switch layers or reach the
//! host as text edits. Geometry comes from a layout profile resolved from the
//! screen size:
//! ```text
//! screen size → ProfileRegistry → LayoutContext → DynamicDimensions / KeyRow layout
//! PointerEvent → KeyboardView::key_at → TouchHandler → KeyboardAction → host
//! ```
//!
//! The key repeat timer is a deadline, not a thread: hosts call
//! [`KeyboardController::advance`] when [`KeyboardController::next_timer_deadline`]
//! passes.
//!
//! ## Modules
//!
//! - [`types`] - Geometry and keyboard actions
//! - [`layout`] - Layout profiles, dimension bindings, key and row layout
//! - [`state`] - Touch state machine, key repeat, view state
//! - [`keyboard`] - Key-cap tables, keyboard view, controller
//! - [`error`] - Error types

pub mod error;
pub mod keyboard;
pub mod layout;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{LayoutError, ProfileError};

pub use layout::{
    DynamicDimensions, Key, KeyRow, LayoutAnchor, LayoutContext, LayoutPriority, LayoutProfile,
    ProfileRegistry, ProvidedMetrics, RowLayoutMode, ScreenKey,
};

pub use state::{
    InputMode, PointerEvent, PointerId, PointerPhase, TouchConfig, TouchHandler, TouchOutput,
    ViewState, ViewStateFields, ViewStateForwarder, ViewStateListener, ViewStatePropagator,
};

pub use keyboard::{
    InputModeList, KeyboardController, KeyboardView, KeyboardViewDelegate, Orientation,
    TextDocumentProxy,
};
