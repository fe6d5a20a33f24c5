//! Layout context - the active layout profile.
//!
//! Owned explicitly by the keyboard controller and passed to whatever needs
//! geometry. The active profile lives in a signal so closures produced by
//! [`LayoutContext::bind`] always read the latest profile when called.

use spark_signals::{signal, Signal};

use super::profile::{LayoutProfile, ProfileRegistry};
use crate::types::Size;

pub struct LayoutContext {
    registry: ProfileRegistry,
    active: Signal<LayoutProfile>,
}

impl LayoutContext {
    /// Create a context whose active profile is resolved for `screen_size`.
    pub fn new(registry: ProfileRegistry, screen_size: Size) -> Self {
        let active = signal(registry.resolve(screen_size).clone());
        Self { registry, active }
    }

    /// Snapshot of the active profile.
    pub fn active_profile(&self) -> LayoutProfile {
        self.active.get()
    }

    /// Resolve and activate the profile for a new screen size.
    ///
    /// Bound dimensions are not recomputed here; the owner calls
    /// `DynamicDimensions::update()` afterwards.
    pub fn set_screen_size(&self, screen_size: Size) {
        self.active.set(self.registry.resolve(screen_size).clone());
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Turn a profile accessor into a provider reading the active profile at
    /// call time.
    pub fn bind<F>(&self, f: F) -> impl Fn() -> f64 + use<F>
    where
        F: Fn(&LayoutProfile) -> f64 + 'static,
    {
        let active = self.active.clone();
        move || f(&active.get())
    }
}
