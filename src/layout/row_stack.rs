//! Row stacking - vertical placement of key rows inside the keyboard view.
//!
//! Rows are fixed-height children of a column flexbox whose top padding
//! leaves room for the autocomplete bar. Each row's height is its top margin,
//! the key height and its bottom margin; the first row's top margin is the key
//! view top inset, the last row's bottom margin the bottom inset, and every
//! other margin half the row gap.
//!
//! Taffy places the column; row heights and every origin after the first are
//! carried in f64 so no point falls between two rows.

use taffy::{
    AvailableSpace, Dimension, Display, FlexDirection, LengthPercentage, NodeId,
    Rect as TaffyRect, Size as TaffySize, Style, TaffyTree,
};

use super::profile::LayoutProfile;
use crate::error::LayoutError;
use crate::types::{EdgeInsets, Rect};

/// Frame and vertical margins computed for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSlot {
    pub frame: Rect,
    pub margins: EdgeInsets,
}

/// Vertical margins of each of `row_count` rows.
pub fn row_margins(profile: &LayoutProfile, row_count: usize) -> Vec<EdgeInsets> {
    let half_gap = profile.key_row_gap / 2.0;
    let last = row_count.saturating_sub(1);

    (0..row_count)
        .map(|index| {
            let top = if index == 0 { profile.key_view_top_inset } else { half_gap };
            let bottom = if index == last { profile.key_view_bottom_inset } else { half_gap };
            EdgeInsets::new(top, 0.0, bottom, 0.0)
        })
        .collect()
}

pub struct RowStacker {
    tree: TaffyTree<()>,
}

impl Default for RowStacker {
    fn default() -> Self {
        Self::new()
    }
}

impl RowStacker {
    pub fn new() -> Self {
        let mut tree = TaffyTree::new();
        // Fractional key geometry must survive the pass untouched.
        tree.disable_rounding();
        Self { tree }
    }

    /// Stack `row_count` rows in a view of the given width.
    pub fn stack(
        &mut self,
        profile: &LayoutProfile,
        width: f64,
        row_count: usize,
    ) -> Result<Vec<RowSlot>, LayoutError> {
        self.tree.clear();

        let margins = row_margins(profile, row_count);
        let rows = margins
            .iter()
            .map(|margin| {
                let height = margin.top + profile.key_height + margin.bottom;
                self.tree.new_leaf(row_style(height))
            })
            .collect::<Result<Vec<NodeId>, _>>()
            .map_err(stack_error)?;

        let root = self
            .tree
            .new_with_children(container_style(width, profile.autocomplete_bar_height), &rows)
            .map_err(stack_error)?;

        let available = TaffySize {
            width: AvailableSpace::Definite(width as f32),
            height: AvailableSpace::MaxContent,
        };
        self.tree.compute_layout(root, available).map_err(stack_error)?;

        let mut slots = Vec::with_capacity(rows.len());
        let mut next_y = None;
        for (&node, margins) in rows.iter().zip(margins) {
            let layout = self.tree.layout(node).map_err(stack_error)?;
            // Chain origins in f64 so adjacent rows share their boundary exactly.
            let y = next_y.unwrap_or(f64::from(layout.location.y));
            let height = margins.top + profile.key_height + margins.bottom;
            let frame = Rect::new(f64::from(layout.location.x), y, f64::from(layout.size.width), height);
            next_y = Some(frame.max_y());
            slots.push(RowSlot { frame, margins });
        }
        Ok(slots)
    }
}

fn container_style(width: f64, top_padding: f64) -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        size: TaffySize {
            width: Dimension::Length(width as f32),
            height: Dimension::Auto,
        },
        padding: TaffyRect {
            top: LengthPercentage::Length(top_padding as f32),
            right: LengthPercentage::Length(0.0),
            bottom: LengthPercentage::Length(0.0),
            left: LengthPercentage::Length(0.0),
        },
        ..Style::default()
    }
}

fn row_style(height: f64) -> Style {
    Style {
        size: TaffySize {
            width: Dimension::Percent(1.0),
            height: Dimension::Length(height as f32),
        },
        flex_shrink: 0.0,
        ..Style::default()
    }
}

fn stack_error(err: taffy::TaffyError) -> LayoutError {
    LayoutError::RowStack(err.to_string())
}
