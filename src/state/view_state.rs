//! View state - screen and appearance patches broadcast through the view tree.
//!
//! A [`ViewState`] patch carries only the fields that changed. The receiver
//! merges it into its current state; listeners get both the merged current
//! state and the raw patch, so they can react to exactly what changed.
//! Forwarders pass the same patch on to their children.

use std::cell::RefCell;
use std::rc::Rc;

use crate::types::Size;

bitflags::bitflags! {
    /// Which fields a view state patch carries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ViewStateFields: u8 {
        const SCREEN_SIZE = 1 << 0;
        const APPEARANCE = 1 << 1;
    }
}

// =============================================================================
// VIEW STATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewState {
    pub screen_size: Option<Size>,
    pub dark_appearance: Option<bool>,
}

impl ViewState {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_screen_size(mut self, screen_size: Size) -> Self {
        self.screen_size = Some(screen_size);
        self
    }

    pub fn with_dark_appearance(mut self, dark_appearance: bool) -> Self {
        self.dark_appearance = Some(dark_appearance);
        self
    }

    /// Field-wise override: each field takes the patch's value when present.
    pub fn merge(&self, changes: &ViewState) -> ViewState {
        ViewState {
            screen_size: changes.screen_size.or(self.screen_size),
            dark_appearance: changes.dark_appearance.or(self.dark_appearance),
        }
    }

    pub fn fields(&self) -> ViewStateFields {
        let mut fields = ViewStateFields::empty();
        if self.screen_size.is_some() {
            fields |= ViewStateFields::SCREEN_SIZE;
        }
        if self.dark_appearance.is_some() {
            fields |= ViewStateFields::APPEARANCE;
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}

// =============================================================================
// LISTENERS
// =============================================================================

pub trait ViewStateListener {
    /// `current` is the merged state; `changes` is the patch that produced it.
    fn on_view_state_changed(&mut self, current: &ViewState, changes: &ViewState);
}

/// A listener that also hands every patch to its children.
pub trait ViewStateForwarder: ViewStateListener {
    /// Children that observe view state, in order.
    fn view_state_children(&mut self) -> Vec<&mut dyn ViewStateListener>;

    fn forward_to_children(&mut self, current: &ViewState, changes: &ViewState) {
        forward_view_state(current, changes, self.view_state_children());
    }
}

/// Offer the same patch to each child in order.
pub fn forward_view_state<'a>(
    current: &ViewState,
    changes: &ViewState,
    children: impl IntoIterator<Item = &'a mut (dyn ViewStateListener + 'a)>,
) {
    for child in children {
        child.on_view_state_changed(current, changes);
    }
}

/// Root of the broadcast: an explicit, insertion-ordered list of listeners.
#[derive(Default)]
pub struct ViewStatePropagator {
    listeners: Vec<Rc<RefCell<dyn ViewStateListener>>>,
}

impl ViewStatePropagator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, listener: Rc<RefCell<dyn ViewStateListener>>) {
        self.listeners.push(listener);
    }

    /// Drop a listener registered earlier (matched by identity).
    pub fn unregister(&mut self, listener: &Rc<RefCell<dyn ViewStateListener>>) {
        self.listeners.retain(|registered| !Rc::ptr_eq(registered, listener));
    }

    pub fn propagate(&self, current: &ViewState, changes: &ViewState) {
        for listener in &self.listeners {
            listener.borrow_mut().on_view_state_changed(current, changes);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
