//! # PaperBox CAM Tools
//!
//! Generates cut/crease/mark layouts for foldable paper boxes and turns them
//! into output a laser or plotter can consume.
//!
//! ## Tools Included
//!
//! - **Paper Box Maker**: wide box and tuck box layouts as one closed turtle path
//! - **Plotter**: rendering collaborator with scoped style switching and a
//!   stroke-recording tracer
//! - **Arc Expander**: arc tessellation into line segments
//! - **G-code Writer**: laser G-code with per-layer power and feed
//! - **SVG Writer**: layer-colored vector output

pub mod arc_expander;
pub mod error;
pub mod gcode;
pub mod paper_box;
pub mod plotter;
pub mod svg;

pub use arc_expander::{ArcExpander, ArcExpanderConfig};
pub use error::{CamToolError, CamToolResult};
pub use gcode::{GcodeWriter, LaserSettings};
pub use paper_box::{AssembledPath, Design, PaperBoxMaker, PaperBoxParameters};
pub use plotter::{Bounds, Plotter, Point, Stroke, StyleGuard, Tracer};
pub use svg::SvgWriter;
