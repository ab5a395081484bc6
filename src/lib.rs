//! # PaperBox
//!
//! Generates laser cut/crease layouts for foldable paper boxes.
//!
//! ## Architecture
//!
//! PaperBox is organized as a workspace with multiple crates:
//!
//! 1. **paperbox-core** - Turtle path primitives, layers and pose tracking
//! 2. **paperbox-camtools** - Paper box maker, plotter, G-code and SVG writers
//! 3. **paperbox-settings** - Configuration files
//! 4. **paperbox** - Command line binary that integrates all crates

pub mod cli;

pub use paperbox_core::{Layer, PathFragment, PathOp, Pose, Step};

pub use paperbox_camtools::{
    ArcExpander, AssembledPath, CamToolError, CamToolResult, Design, GcodeWriter, LaserSettings,
    PaperBoxMaker, PaperBoxParameters, Plotter, Stroke, StyleGuard, SvgWriter, Tracer,
};

pub use paperbox_settings::{Config, OutputFormat, OutputSettings, SettingsError};

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("PAPERBOX_BUILD_DATE");

/// Version string shown by `--version`
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("PAPERBOX_BUILD_DATE"),
    ")"
);

/// Initialize logging with the default configuration
///
/// Logs go to stderr so generated output can be piped from stdout.
/// `RUST_LOG` is honoured.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
