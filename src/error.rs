//! Error types.
//!
//! Nothing here crosses toward the host delegate: layout errors are contract
//! violations surfaced while configuring rows, profile errors come from
//! loading configuration tables.

use thiserror::Error;

/// Errors raised while configuring or laying out key rows.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A row takes either one group (middle only) or three (left, middle, right).
    #[error("a key row takes 1 or 3 key groups, got {0}")]
    InvalidGroupCount(usize),

    /// The flexbox pass that stacks rows failed.
    #[error("row stacking failed: {0}")]
    RowStack(String),
}

/// Errors raised while loading a layout profile table.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid profile table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("profile table has no entries")]
    Empty,
}
