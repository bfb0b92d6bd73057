//! # CMOS Diagram
//!
//! Layout and rendering of CMOS pull-up/pull-down transistor networks.
//!
//! This library provides:
//! - A canonical series/parallel transistor network model
//! - A tolerant normalizer for the synthesis service's network JSON
//! - A recursive layout engine (bottom-up sizes, top-down placement)
//! - Composition of layouts into wires and transistor glyphs, and SVG output
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`network`] - Canonical network tree and transistor counts
//! - [`normalize`] - Upstream response shapes and their normalization
//! - [`layout`] - Size and position assignment
//! - [`render`] - Primitive composition, glyph geometry and SVG
//! - [`io`] - Input/output for the CLI (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! cmosdraw response.json --not '!' > gate.svg
//! ```
//!
//! ### Library
//!
//! ```
//! use cmos_diagram::{layout::calculate_layout, network::{DeviceType, NetworkNode}, render};
//!
//! let net = NetworkNode::series(vec![
//!     NetworkNode::transistor("A", DeviceType::Nmos),
//!     NetworkNode::transistor("B", DeviceType::Nmos),
//! ]);
//! let layout = calculate_layout(&net);
//! assert_eq!((layout.width, layout.height), (60.0, 160.0));
//!
//! let primitives = render::compose(&layout, &render::GlyphConfig::default());
//! assert_eq!(primitives.len(), 3);
//! ```
//!
//! ## Pipeline
//!
//! 1. Parse the JSON document and normalize each network into a [`NetworkNode`]
//! 2. Lay out each network into a fresh [`LayoutNode`] tree
//! 3. Compose the layout into primitives, translating into each child's frame
//!
//! Every step is a pure function of its input; nothing is cached between
//! calls.

pub mod config;
pub mod error;
pub mod layout;
pub mod network;
pub mod normalize;
pub mod render;

#[cfg(feature = "cli")]
pub mod io;

// Re-export main types for convenience
pub use config::Config;
pub use error::{DiagramError, Result};
pub use layout::{LayoutEngine, LayoutNode};
pub use network::{CmosNetwork, NetworkNode};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmDiagram;
