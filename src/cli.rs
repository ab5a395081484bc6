//! Command line interface
//!
//! Every flag is optional; unset flags fall back to the config file, then to
//! built-in defaults.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;

use paperbox_camtools::{Design, PaperBoxMaker};
use paperbox_settings::{Config, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "paperbox")]
#[command(about = "Generate laser cut/crease layouts for foldable paper boxes")]
#[command(version, long_version = crate::LONG_VERSION)]
pub struct Cli {
    /// Inner width of the box (mm)
    #[arg(short = 'x', long = "x", visible_alias = "width")]
    pub x: Option<f64>,

    /// Inner length of the box (mm)
    #[arg(short = 'y', long = "y", visible_alias = "length")]
    pub y: Option<f64>,

    /// Inner height of the box (mm)
    #[arg(long = "h", visible_alias = "height")]
    pub h: Option<f64>,

    /// Layout variant
    #[arg(short, long, value_enum)]
    pub design: Option<DesignArg>,

    /// Height of the lid flap (mm)
    #[arg(long)]
    pub lid_height: Option<f64>,

    /// Corner radius of the lid flap (mm)
    #[arg(long)]
    pub lid_radius: Option<f64>,

    /// Width of the glued lid sides, widebox only (mm)
    #[arg(long)]
    pub lid_sides: Option<f64>,

    /// Clearance removed from glue tabs (mm)
    #[arg(long)]
    pub margin: Option<f64>,

    /// Length of the fold marks, 0 disables them (mm)
    #[arg(long)]
    pub mark_length: Option<f64>,

    /// Shear of the glue tabs' sides (degrees)
    #[arg(long)]
    pub tab_angle: Option<f64>,

    /// Diameter of the finger notch (mm)
    #[arg(long)]
    pub finger_hole_diameter: Option<f64>,

    /// Material thickness (mm)
    #[arg(short, long)]
    pub thickness: Option<f64>,

    /// Kerf compensation (mm)
    #[arg(long)]
    pub burn: Option<f64>,

    /// Number of laser passes over cut lines
    #[arg(long)]
    pub passes: Option<u32>,

    /// Laser power (S) for cut lines
    #[arg(long)]
    pub cut_power: Option<u32>,

    /// Feed rate for cut lines (mm/min)
    #[arg(long)]
    pub cut_feed_rate: Option<f64>,

    /// Laser power (S) for creases
    #[arg(long)]
    pub crease_power: Option<u32>,

    /// Feed rate for creases (mm/min)
    #[arg(long)]
    pub crease_feed_rate: Option<f64>,

    /// Laser power (S) for fold marks
    #[arg(long)]
    pub mark_power: Option<u32>,

    /// Feed rate for fold marks (mm/min)
    #[arg(long)]
    pub mark_feed_rate: Option<f64>,

    /// Output format; guessed from the output file name when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum chord length when flattening arcs (mm)
    #[arg(long)]
    pub arc_segment_length: Option<f64>,

    /// Config file (.toml or .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the effective configuration to this file
    #[arg(long)]
    pub save_config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DesignArg {
    /// Tuckbox when taller than long, widebox otherwise
    #[value(alias = "auto")]
    Automatic,
    /// Wide box with glued lid sides
    Widebox,
    /// Tall box with a tuck lid
    Tuckbox,
}

impl From<DesignArg> for Design {
    fn from(arg: DesignArg) -> Self {
        match arg {
            DesignArg::Automatic => Design::Automatic,
            DesignArg::Widebox => Design::Widebox,
            DesignArg::Tuckbox => Design::Tuckbox,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Svg,
    Gcode,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Svg => OutputFormat::Svg,
            FormatArg::Gcode => OutputFormat::Gcode,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

impl Cli {
    /// Override config values with the flags that were given
    pub fn apply(&self, config: &mut Config) {
        let params = &mut config.paper_box;
        let overrides = [
            (self.x, &mut params.x),
            (self.y, &mut params.y),
            (self.h, &mut params.h),
            (self.lid_height, &mut params.lid_height),
            (self.lid_radius, &mut params.lid_radius),
            (self.lid_sides, &mut params.lid_sides),
            (self.margin, &mut params.margin),
            (self.mark_length, &mut params.mark_length),
            (self.finger_hole_diameter, &mut params.finger_hole_diameter),
            (self.thickness, &mut params.thickness),
            (self.burn, &mut params.burn),
        ];
        for (value, target) in overrides {
            if let Some(value) = value {
                *target = value;
            }
        }
        if let Some(degrees) = self.tab_angle {
            params.tab_angle = degrees.to_radians();
        }
        if let Some(design) = self.design {
            params.design = design.into();
        }

        let laser = &mut config.laser;
        for (value, target) in [
            (self.passes, &mut laser.passes),
            (self.cut_power, &mut laser.cut_power),
            (self.crease_power, &mut laser.crease_power),
            (self.mark_power, &mut laser.mark_power),
        ] {
            if let Some(value) = value {
                *target = value;
            }
        }
        for (value, target) in [
            (self.cut_feed_rate, &mut laser.cut_feed_rate),
            (self.crease_feed_rate, &mut laser.crease_feed_rate),
            (self.mark_feed_rate, &mut laser.mark_feed_rate),
        ] {
            if let Some(value) = value {
                *target = value;
            }
        }

        if let Some(length) = self.arc_segment_length {
            config.output.arc_segment_length = length;
        }
        if let Some(format) = self.format {
            config.output.format = format.into();
        } else if let Some(format) = self.output.as_deref().and_then(OutputFormat::from_path) {
            config.output.format = format;
        }
    }
}

/// Generate the requested layout and write it out
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    if let Some(path) = &cli.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
    }

    let maker = PaperBoxMaker::new(config.paper_box.clone())?;
    let arc_segment_length = config.output.arc_segment_length;
    let content = match config.output.format {
        OutputFormat::Svg => maker.to_svg(arc_segment_length),
        OutputFormat::Gcode => maker.to_gcode(&config.laser, arc_segment_length),
        OutputFormat::Json => maker.generate().to_json()?,
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                "Wrote {} {} layout to {}",
                config.output.format,
                maker.design(),
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush()?;
        }
    }

    Ok(())
}
