//! Dynamic dimensions - pull-based bindings from the layout profile to
//! displayed sizes.
//!
//! Each binding pairs a non-owning handle to a target with a closure that
//! produces the value. Targets may be dropped by their owner at any time;
//! their bindings are pruned on the next `add()` or `update()`.
//!
//! # Example
//!
//! ```ignore
//! let mut dimensions = DynamicDimensions::new();
//! let height = Rc::new(LayoutAnchor::new(LayoutPriority::DefaultHigh));
//! dimensions.add(&height, context.bind(|p| p.keyboard_size.height));
//!
//! context.set_screen_size(new_size);
//! dimensions.update(); // height now matches the new profile
//! ```

use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};

// =============================================================================
// TARGETS
// =============================================================================

/// Something a bound value can be written to.
pub trait DimensionTarget {
    fn apply(&self, value: f64);
}

/// Priority of a layout anchor when the host resolves competing sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LayoutPriority {
    DefaultHigh,
    #[default]
    Required,
}

/// A single displayed dimension (a width or a height) with a reactive constant.
pub struct LayoutAnchor {
    constant: Signal<f64>,
    priority: LayoutPriority,
}

impl LayoutAnchor {
    pub fn new(priority: LayoutPriority) -> Self {
        Self {
            constant: signal(0.0),
            priority,
        }
    }

    /// Current value.
    pub fn constant(&self) -> f64 {
        self.constant.get()
    }

    pub fn priority(&self) -> LayoutPriority {
        self.priority
    }
}

impl DimensionTarget for LayoutAnchor {
    fn apply(&self, value: f64) {
        self.constant.set(value);
    }
}

/// Non-owning reference to a binding target.
pub struct TargetHandle {
    target: Weak<dyn DimensionTarget>,
}

impl TargetHandle {
    pub fn new<T: DimensionTarget + 'static>(target: &Rc<T>) -> Self {
        let target = Rc::downgrade(target);
        let target: Weak<dyn DimensionTarget> = target;
        Self { target }
    }

    /// The target, or `None` once its owner dropped it.
    pub fn get(&self) -> Option<Rc<dyn DimensionTarget>> {
        self.target.upgrade()
    }
}

// =============================================================================
// BINDINGS
// =============================================================================

struct DimensionBinding {
    target: TargetHandle,
    provider: Box<dyn Fn() -> f64>,
}

impl DimensionBinding {
    fn update(&self) {
        if let Some(target) = self.target.get() {
            target.apply((self.provider)());
        }
    }
}

/// Ordered collection of dimension bindings.
#[derive(Default)]
pub struct DynamicDimensions {
    bindings: Vec<DimensionBinding>,
}

impl DynamicDimensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `target` to `provider` and apply the current value right away.
    pub fn add<T, F>(&mut self, target: &Rc<T>, provider: F)
    where
        T: DimensionTarget + 'static,
        F: Fn() -> f64 + 'static,
    {
        let binding = DimensionBinding {
            target: TargetHandle::new(target),
            provider: Box::new(provider),
        };
        binding.update();
        self.prune();
        self.bindings.push(binding);
    }

    /// Re-evaluate every binding in insertion order. Dropped targets are
    /// pruned without evaluating their providers.
    pub fn update(&mut self) {
        self.prune();
        for binding in &self.bindings {
            binding.update();
        }
    }

    fn prune(&mut self) {
        self.bindings.retain(|binding| binding.target.get().is_some());
    }

    pub fn remove_all(&mut self) {
        self.bindings.clear();
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
