//! Keyboard Module - the assembled keyboard
//!
//! - **Layers** - Built-in key-cap tables (letters, numbers, symbols)
//! - **View** - Key rows, hit-testing, layer switching
//! - **Controller** - Layout context, dimension bindings, view state, host bridge

pub mod controller;
pub mod layers;
pub mod view;

pub use controller::{InputModeList, KeyboardController, Orientation, TextDocumentProxy};
pub use layers::{key_caps, KeyCapRows};
pub use view::{KeyboardView, KeyboardViewDelegate, ROW_COUNT};
