//! Recursive series/parallel layout.
//!
//! Every node gets a size and a position relative to its parent's origin in a
//! single recursive pass:
//!
//! 1. Lay out all children (bottom-up sizes)
//! 2. Derive the block's own size from its children
//! 3. Place each child inside the now-known block (top-down offsets)
//!
//! ```text
//!  Series                 Parallel
//!  ┌──────┐               ┌──────┐  ┌──────┐
//!  │  c0  │               │  c0  │  │      │
//!  └──────┘ v_spacing     │      │  │  c1  │
//!  ┌──────┐               └──────┘  │      │
//!  │  c1  │                h_spacing└──────┘
//!  └──────┘
//! ```
//!
//! Series children are centered horizontally, parallel children vertically.

mod engine;

pub use engine::{calculate_layout, LayoutConfig, LayoutEngine, LayoutNode};

/// Side of the square footprint of one transistor.
pub const DEFAULT_TRANSISTOR_SIZE: f64 = 60.0;

/// Horizontal gap between parallel branches.
pub const DEFAULT_H_SPACING: f64 = 40.0;

/// Vertical gap between chained series elements.
pub const DEFAULT_V_SPACING: f64 = 40.0;
