//! Layout profiles - per-screen-size geometry constants.
//!
//! A profile is looked up by the exact integer screen size. Every profile is
//! built from a handful of provided metrics; the rest is derived once, the
//! first time the profile is resolved.
//!
//! # Example
//!
//! ```ignore
//! use spark_keyboard::layout::ProfileRegistry;
//! use spark_keyboard::types::Size;
//!
//! let registry = ProfileRegistry::builtin();
//! let profile = registry.resolve(Size::new(375.0, 812.0));
//! assert!(profile.button_gap > 0.0);
//! ```

use std::cell::OnceCell;

use serde::Deserialize;

use crate::error::ProfileError;
use crate::types::Size;

/// Gap between the autocomplete bar and the first key row.
pub const KEY_VIEW_TOP_INSET: f64 = 8.0;

/// Gap between the last key row and the bottom of the keyboard.
pub const KEY_VIEW_BOTTOM_INSET: f64 = 3.0;

// =============================================================================
// PROVIDED METRICS
// =============================================================================

/// Metrics measured per device; everything else is derived from these.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ProvidedMetrics {
    pub keyboard_size: Size,
    pub input_key_width: f64,
    pub system_key_width: f64,
    pub shift_key_width: f64,
    pub key_height: f64,
    pub autocomplete_bar_height: f64,
    pub edge_horizontal_inset: f64,
}

// =============================================================================
// LAYOUT PROFILE
// =============================================================================

/// Resolved geometry constants for one screen size.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutProfile {
    // Fixed
    pub key_view_top_inset: f64,
    pub key_view_bottom_inset: f64,

    // Provided
    pub keyboard_size: Size,
    pub key_button_width: f64,
    pub system_button_width: f64,
    pub shift_button_width: f64,
    pub key_height: f64,
    pub autocomplete_bar_height: f64,
    pub edge_horizontal_inset: f64,

    // Derived
    pub button_gap: f64,
    pub key_view_height: f64,
    pub key_row_gap: f64,
    pub widened_symbol_button_width: f64,
}

impl LayoutProfile {
    pub fn new(metrics: &ProvidedMetrics) -> Self {
        let keyboard_size = metrics.keyboard_size;
        let input_key_width = metrics.input_key_width;

        // Ten input keys and nine gaps fill the top row between the edge insets.
        let button_gap =
            (keyboard_size.width - 2.0 * metrics.edge_horizontal_inset - 10.0 * input_key_width) / 9.0;
        let key_view_height = keyboard_size.height
            - metrics.autocomplete_bar_height
            - KEY_VIEW_TOP_INSET
            - KEY_VIEW_BOTTOM_INSET;
        let key_row_gap = (key_view_height - 4.0 * metrics.key_height) / 3.0;
        // Five punctuation keys span the width of seven letters.
        let widened_symbol_button_width =
            (7.0 * input_key_width + 6.0 * button_gap - 4.0 * button_gap) / 5.0;

        Self {
            key_view_top_inset: KEY_VIEW_TOP_INSET,
            key_view_bottom_inset: KEY_VIEW_BOTTOM_INSET,
            keyboard_size,
            key_button_width: input_key_width,
            system_button_width: metrics.system_key_width,
            shift_button_width: metrics.shift_key_width,
            key_height: metrics.key_height,
            autocomplete_bar_height: metrics.autocomplete_bar_height,
            edge_horizontal_inset: metrics.edge_horizontal_inset,
            button_gap,
            key_view_height,
            key_row_gap,
            widened_symbol_button_width,
        }
    }
}

// =============================================================================
// SCREEN KEY
// =============================================================================

/// Exact integer screen size used as the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "(i32, i32)")]
pub struct ScreenKey {
    pub width: i32,
    pub height: i32,
}

impl ScreenKey {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl From<(i32, i32)> for ScreenKey {
    fn from((width, height): (i32, i32)) -> Self {
        Self::new(width, height)
    }
}

impl From<Size> for ScreenKey {
    /// Truncates toward zero, so 375.5 x 812.9 looks up 375 x 812.
    fn from(size: Size) -> Self {
        Self::new(size.width as i32, size.height as i32)
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

struct ProfileEntry {
    screen: ScreenKey,
    metrics: ProvidedMetrics,
    profile: OnceCell<LayoutProfile>,
}

impl ProfileEntry {
    fn new(screen: ScreenKey, metrics: ProvidedMetrics) -> Self {
        Self {
            screen,
            metrics,
            profile: OnceCell::new(),
        }
    }

    fn profile(&self) -> &LayoutProfile {
        self.profile.get_or_init(|| LayoutProfile::new(&self.metrics))
    }
}

#[derive(Deserialize)]
struct ProfileTableEntry {
    screen: ScreenKey,
    metrics: ProvidedMetrics,
}

/// Screen size → layout profile table.
///
/// Never empty: the first registered entry is the fallback for unknown sizes.
pub struct ProfileRegistry {
    entries: Vec<ProfileEntry>,
}

impl ProfileRegistry {
    /// Create a registry whose default (fallback) entry is `screen`.
    pub fn with_default(screen: ScreenKey, metrics: ProvidedMetrics) -> Self {
        Self {
            entries: vec![ProfileEntry::new(screen, metrics)],
        }
    }

    /// The built-in device table. Portrait 375x812 is the default.
    pub fn builtin() -> Self {
        let mut registry = Self::with_default(
            // iPhone 11 Pro, X, Xs (portrait)
            ScreenKey::new(375, 812),
            ProvidedMetrics {
                keyboard_size: Size::new(375.0, 261.0),
                input_key_width: 95.0 / 3.0,
                system_key_width: 40.0,
                shift_key_width: 46.0,
                key_height: 42.0,
                autocomplete_bar_height: 45.0,
                edge_horizontal_inset: 3.0,
            },
        );

        registry
            // iPhone 11 Pro, X, Xs (landscape)
            .register(
                ScreenKey::new(812, 375),
                ProvidedMetrics {
                    keyboard_size: Size::new(812.0, 188.0),
                    input_key_width: 60.0,
                    system_key_width: 59.0,
                    shift_key_width: 80.0,
                    key_height: 30.0,
                    autocomplete_bar_height: 38.0,
                    edge_horizontal_inset: 78.0,
                },
            )
            // iPhone SE, 8, 7, 6s, 6 (portrait)
            .register(
                ScreenKey::new(375, 667),
                ProvidedMetrics {
                    keyboard_size: Size::new(375.0, 260.0),
                    input_key_width: 31.5,
                    system_key_width: 42.0,
                    shift_key_width: 42.0,
                    key_height: 260.0 / 6.0,
                    autocomplete_bar_height: 45.0,
                    edge_horizontal_inset: 3.0,
                },
            )
            // iPhone 11 Pro Max, Xs Max, 11, Xr (portrait)
            .register(
                ScreenKey::new(414, 896),
                ProvidedMetrics {
                    keyboard_size: Size::new(414.0, 271.0),
                    input_key_width: 36.0,
                    system_key_width: 46.0,
                    shift_key_width: 46.0,
                    key_height: 271.0 / 6.0,
                    autocomplete_bar_height: 45.0,
                    edge_horizontal_inset: 4.0,
                },
            )
            // iPhone SE, 8, 7, 6s, 6 (landscape)
            .register(
                ScreenKey::new(667, 375),
                ProvidedMetrics {
                    keyboard_size: Size::new(667.0, 200.0),
                    input_key_width: 46.0,
                    system_key_width: 63.0,
                    shift_key_width: 80.0,
                    key_height: 200.0 / 6.0,
                    autocomplete_bar_height: 45.0,
                    edge_horizontal_inset: 72.5 - 17.0,
                },
            )
            // iPhone 11 Pro Max, Xs Max, 11, Xr (landscape)
            .register(
                ScreenKey::new(896, 414),
                ProvidedMetrics {
                    keyboard_size: Size::new(690.0, 187.5),
                    input_key_width: 50.0,
                    system_key_width: 65.0,
                    shift_key_width: 80.0,
                    key_height: 187.5 / 6.0,
                    autocomplete_bar_height: 45.0,
                    edge_horizontal_inset: 71.0 - 17.0,
                },
            );

        registry
    }

    /// Load a table of `{ "screen": [w, h], "metrics": { ... } }` entries.
    ///
    /// The first entry becomes the fallback profile.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let table: Vec<ProfileTableEntry> = serde_json::from_str(json)?;
        let mut entries = table.into_iter();

        let Some(first) = entries.next() else {
            return Err(ProfileError::Empty);
        };

        let mut registry = Self::with_default(first.screen, first.metrics);
        for entry in entries {
            registry.register(entry.screen, entry.metrics);
        }
        Ok(registry)
    }

    /// Register (or replace) the metrics for a screen size.
    pub fn register(&mut self, screen: ScreenKey, metrics: ProvidedMetrics) -> &mut Self {
        match self.entries.iter_mut().find(|entry| entry.screen == screen) {
            Some(entry) => *entry = ProfileEntry::new(screen, metrics),
            None => self.entries.push(ProfileEntry::new(screen, metrics)),
        }
        self
    }

    /// Exact lookup.
    pub fn get(&self, screen: ScreenKey) -> Option<&LayoutProfile> {
        self.entries
            .iter()
            .find(|entry| entry.screen == screen)
            .map(ProfileEntry::profile)
    }

    /// Resolve the profile for a screen size, falling back to the default
    /// profile when the size is not registered.
    pub fn resolve(&self, screen_size: Size) -> &LayoutProfile {
        let screen = ScreenKey::from(screen_size);
        match self.get(screen) {
            Some(profile) => profile,
            None => {
                let fallback = self.default_screen();
                tracing::warn!(
                    width = screen_size.width,
                    height = screen_size.height,
                    "no layout profile for screen size, defaulting to {}x{}",
                    fallback.width,
                    fallback.height
                );
                self.default_profile()
            }
        }
    }

    /// The fallback profile (first registered).
    pub fn default_profile(&self) -> &LayoutProfile {
        self.entries[0].profile()
    }

    /// The screen size of the fallback profile.
    pub fn default_screen(&self) -> ScreenKey {
        self.entries[0].screen
    }

    /// Registered screen sizes in registration order.
    pub fn screens(&self) -> impl Iterator<Item = ScreenKey> + '_ {
        self.entries.iter().map(|entry| entry.screen)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// Tests
// =============================================================================
