//! # PaperBox Core
//!
//! Turtle path primitives shared by the PaperBox crates.
//! Provides the step/fragment model that box layouts are built from and the
//! explicit pose that running a fragment folds over.

pub mod path;
pub mod turtle;

pub use path::{Layer, PathFragment, PathOp, Step};
pub use turtle::{trace, Pose};
