//! Keyboard controller - owns the layout context, the bindings and the view.
//!
//! The controller is the root of the view-state broadcast: screen size and
//! appearance changes enter here as [`ViewState`] patches. Key actions coming
//! out of the view are translated into edits on the host's text document.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Instant;

use super::view::{KeyboardView, KeyboardViewDelegate};
use crate::error::LayoutError;
use crate::layout::{
    DynamicDimensions, Key, LayoutAnchor, LayoutContext, LayoutPriority, LayoutProfile, ProfileRegistry,
};
use crate::state::{PointerEvent, TouchConfig, ViewState, ViewStateListener, ViewStatePropagator};
use crate::types::{KeyboardAction, Rect, Size};

// =============================================================================
// HOST INTERFACES
// =============================================================================

/// The text being edited.
pub trait TextDocumentProxy {
    fn insert_text(&mut self, text: &str);
    fn delete_backward(&mut self);
    fn adjust_text_position(&mut self, offset: i64);
}

/// The host's keyboard switcher (globe key).
pub trait InputModeList {
    fn handle_input_mode_list(&mut self, anchor: &Key, event: &PointerEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Adapts the host to the view's delegate interface.
struct HostDelegate<'a, H> {
    host: &'a mut H,
}

impl<H: TextDocumentProxy + InputModeList> KeyboardViewDelegate for HostDelegate<'_, H> {
    fn send_key(&mut self, action: KeyboardAction) {
        tracing::debug!(?action, "send key");
        match action {
            KeyboardAction::Character(text) | KeyboardAction::Emoji(text) => self.host.insert_text(&text),
            KeyboardAction::Space => self.host.insert_text(" "),
            KeyboardAction::NewLine => self.host.insert_text("\n"),
            KeyboardAction::Backspace => self.host.delete_backward(),
            KeyboardAction::MoveCursorForward => self.host.adjust_text_position(1),
            KeyboardAction::MoveCursorBackward => self.host.adjust_text_position(-1),
            KeyboardAction::Shift
            | KeyboardAction::ShiftDown
            | KeyboardAction::CapsLock
            | KeyboardAction::NextKeyboard
            | KeyboardAction::KeyboardType(_)
            | KeyboardAction::None => {}
        }
    }

    fn handle_input_mode_list(&mut self, anchor: &Key, event: &PointerEvent) {
        self.host.handle_input_mode_list(anchor, event);
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct KeyboardController<H> {
    host: H,
    context: LayoutContext,
    dimensions: DynamicDimensions,
    view_state: ViewState,
    screen_size: Size,
    root_height: Rc<LayoutAnchor>,
    keyboard_view: Option<Rc<RefCell<KeyboardView>>>,
    propagator: ViewStatePropagator,
    touch_config: TouchConfig,
}

impl<H: TextDocumentProxy + InputModeList> KeyboardController<H> {
    /// Activate the profile for `screen_size`, bind the root height and
    /// create the keyboard view.
    pub fn new(host: H, registry: ProfileRegistry, screen_size: Size) -> Result<Self, LayoutError> {
        Self::with_config(host, registry, screen_size, TouchConfig::default())
    }

    pub fn with_config(
        host: H,
        registry: ProfileRegistry,
        screen_size: Size,
        touch_config: TouchConfig,
    ) -> Result<Self, LayoutError> {
        let context = LayoutContext::new(registry, screen_size);
        let mut dimensions = DynamicDimensions::new();

        let root_height = Rc::new(LayoutAnchor::new(LayoutPriority::DefaultHigh));
        dimensions.add(&root_height, context.bind(|profile| profile.keyboard_size.height));

        let mut controller = Self {
            host,
            context,
            dimensions,
            view_state: ViewState::new(),
            screen_size,
            root_height,
            keyboard_view: None,
            propagator: ViewStatePropagator::new(),
            touch_config,
        };
        controller.create_keyboard()?;
        Ok(controller)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn context(&self) -> &LayoutContext {
        &self.context
    }

    pub fn active_profile(&self) -> LayoutProfile {
        self.context.active_profile()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn screen_size(&self) -> Size {
        self.screen_size
    }

    /// Height of the keyboard root, as bound to the active profile.
    pub fn root_height(&self) -> &Rc<LayoutAnchor> {
        &self.root_height
    }

    pub fn dimensions(&self) -> &DynamicDimensions {
        &self.dimensions
    }

    pub fn keyboard_view(&self) -> Option<Ref<'_, KeyboardView>> {
        self.keyboard_view.as_ref().map(|view| view.borrow())
    }

    // -------------------------------------------------------------------------
    // Keyboard view lifecycle
    // -------------------------------------------------------------------------

    /// Create the keyboard view if there is none.
    pub fn create_keyboard(&mut self) -> Result<(), LayoutError> {
        if self.keyboard_view.is_some() {
            return Ok(());
        }

        let view = Rc::new(RefCell::new(KeyboardView::new(self.touch_config)));
        let width_anchor = view.borrow().width_anchor().clone();
        self.dimensions
            .add(&width_anchor, self.context.bind(|profile| profile.keyboard_size.width));

        let listener: Rc<RefCell<dyn ViewStateListener>> = view.clone();
        self.propagator.register(listener);
        self.keyboard_view = Some(view);

        tracing::debug!("keyboard view created");
        self.layout_keyboard()
    }

    /// Drop the keyboard view. Its width binding is pruned on the next
    /// dimension update.
    pub fn destroy_keyboard(&mut self) {
        if let Some(view) = self.keyboard_view.take() {
            let listener: Rc<RefCell<dyn ViewStateListener>> = view;
            self.propagator.unregister(&listener);
            tracing::debug!("keyboard view destroyed");
        }
    }

    fn layout_keyboard(&mut self) -> Result<(), LayoutError> {
        let Some(view) = &self.keyboard_view else {
            return Ok(());
        };

        let profile = self.context.active_profile();
        let mut view = view.borrow_mut();
        let width = view.width_anchor().constant();
        view.set_frame(Rect::new(0.0, 0.0, width, self.root_height.constant()));
        view.layout(&profile)
    }

    // -------------------------------------------------------------------------
    // View state
    // -------------------------------------------------------------------------

    /// Apply a screen/appearance patch and re-lay out the keyboard.
    pub fn apply_view_state(&mut self, changes: ViewState) -> Result<(), LayoutError> {
        if let Some(screen_size) = changes.screen_size {
            self.screen_size = screen_size;
            self.context.set_screen_size(screen_size);
            self.dimensions.update();
        }

        let current = self.view_state.merge(&changes);
        self.propagator.propagate(&current, &changes);
        self.view_state = current;

        self.layout_keyboard()
    }

    /// Swap the screen edges for the new orientation, if they change.
    pub fn will_rotate(&mut self, orientation: Orientation) -> Result<(), LayoutError> {
        let short_edge = self.screen_size.short_edge();
        let long_edge = self.screen_size.long_edge();
        let new_size = match orientation {
            Orientation::Portrait => Size::new(short_edge, long_edge),
            Orientation::Landscape => Size::new(long_edge, short_edge),
        };

        if self.view_state.screen_size == Some(new_size) {
            return Ok(());
        }

        tracing::debug!(?orientation, width = new_size.width, height = new_size.height, "rotating");
        self.apply_view_state(ViewState::new().with_screen_size(new_size))
    }

    pub fn set_dark_appearance(&mut self, dark_appearance: bool) -> Result<(), LayoutError> {
        self.apply_view_state(ViewState::new().with_dark_appearance(dark_appearance))
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        let Some(view) = &self.keyboard_view else {
            return;
        };
        let mut delegate = HostDelegate { host: &mut self.host };
        view.borrow_mut().handle_pointer(event, &mut delegate);
    }

    /// Fire key repeat ticks due at `now`.
    pub fn advance(&mut self, now: Instant) {
        let Some(view) = &self.keyboard_view else {
            return;
        };
        let mut delegate = HostDelegate { host: &mut self.host };
        view.borrow_mut().advance(now, &mut delegate);
    }

    /// When the host event loop should call [`advance`](Self::advance) next.
    pub fn next_timer_deadline(&self) -> Option<Instant> {
        self.keyboard_view
            .as_ref()
            .and_then(|view| view.borrow().next_timer_deadline())
    }
}

// =============================================================================
// Tests
// =============================================================================
