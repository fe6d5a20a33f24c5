//! State Module - Runtime input state
//!
//! - **Touch** - Gesture state machine turning pointer events into key actions
//! - **Repeat** - Deterministic key repeat timer driven by the host clock
//! - **View state** - Screen/appearance patches broadcast through the view tree

pub mod repeat;
pub mod touch;
pub mod view_state;

pub use repeat::{KeyRepeatTimer, TimerId};
pub use touch::{
    InputMode, PointerEvent, PointerId, PointerPhase, TouchConfig, TouchHandler, TouchOutput,
};
pub use view_state::{
    forward_view_state, ViewState, ViewStateFields, ViewStateForwarder, ViewStateListener,
    ViewStatePropagator,
};
