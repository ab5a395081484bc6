//! Type definitions for the Paper Box Maker

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

use crate::error::{CamToolError, CamToolResult};

/// Sheet layout variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Design {
    /// Tuckbox when the box is taller than long, widebox otherwise
    #[default]
    Automatic,
    /// Lid-side walls glued with long tabs, lid on the short edge
    Widebox,
    /// Tall layout with a locking tuck lid
    Tuckbox,
}

impl Design {
    /// Resolve [`Design::Automatic`] for a box of the given length and height.
    ///
    /// Concrete designs are returned unchanged.
    pub fn resolve(self, length: f64, height: f64) -> Design {
        match self {
            Design::Automatic if height > length => Design::Tuckbox,
            Design::Automatic => Design::Widebox,
            concrete => concrete,
        }
    }
}

impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Automatic => write!(f, "automatic"),
            Self::Widebox => write!(f, "widebox"),
            Self::Tuckbox => write!(f, "tuckbox"),
        }
    }
}

impl FromStr for Design {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "automatic" | "auto" => Ok(Self::Automatic),
            "widebox" => Ok(Self::Widebox),
            "tuckbox" => Ok(Self::Tuckbox),
            _ => Err(format!("Unknown design: {}", s)),
        }
    }
}

/// Default shear of the glued tabs: a 2 mm inset over a 25 mm tab.
pub fn default_tab_angle() -> f64 {
    (2.0_f64 / 25.0).atan()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperBoxParameters {
    /// Inner width of the box (mm)
    pub x: f64,
    /// Inner length of the box (mm)
    pub y: f64,
    /// Inner height of the box (mm)
    pub h: f64,
    pub design: Design,
    /// Height of the lid flap that slides inside the box
    pub lid_height: f64,
    /// Radius of the lid flap's rounded corners
    pub lid_radius: f64,
    /// Width of the two glued sides the widebox lid rests on
    pub lid_sides: f64,
    /// Clearance removed from glued tabs
    pub margin: f64,
    /// Length of the fold marks outside the outline, 0 disables them
    pub mark_length: f64,
    /// Shear of the glued tabs' sides, in radians
    pub tab_angle: f64,
    /// Diameter of the notch that helps catch the lid
    pub finger_hole_diameter: f64,
    /// Material thickness
    pub thickness: f64,
    /// Kerf compensation
    pub burn: f64,
}

impl Default for PaperBoxParameters {
    fn default() -> Self {
        Self {
            x: 100.0,
            y: 100.0,
            h: 100.0,
            design: Design::Automatic,
            lid_height: 15.0,
            lid_radius: 7.0,
            lid_sides: 20.0,
            margin: 0.0,
            mark_length: 1.5,
            tab_angle: default_tab_angle(),
            finger_hole_diameter: 15.0,
            thickness: 0.3,
            burn: 0.05,
        }
    }
}

impl PaperBoxParameters {
    /// The design that will actually be generated
    pub fn resolved_design(&self) -> Design {
        self.design.resolve(self.y, self.h)
    }

    /// Length of the tuckbox lid slits
    pub fn lid_cut_length(&self) -> f64 {
        10.0_f64.min(self.y / 2.0).min(self.x / 5.0)
    }

    /// Depth and corner radius of the tuckbox ear for a slit of `lid_cut_length`
    pub fn ear_geometry(&self, lid_cut_length: f64) -> (f64, f64) {
        let ear_depth = lid_cut_length.max(self.lid_height);
        let radius = self.lid_radius.min(ear_depth - lid_cut_length);
        (ear_depth, radius)
    }

    /// Tip width of a glue tab protruding `height` along an edge of `width`
    pub fn tab_end_width(&self, height: f64, width: f64) -> f64 {
        width - 2.0 * height * self.tab_angle.tan()
    }

    /// Check every precondition of the resolved design's generators.
    ///
    /// Reports the first violated constraint.
    pub fn validate(&self) -> CamToolResult<()> {
        positive("x", self.x)?;
        positive("y", self.y)?;
        positive("h", self.h)?;
        for (name, value) in [
            ("thickness", self.thickness),
            ("burn", self.burn),
            ("margin", self.margin),
            ("mark_length", self.mark_length),
            ("lid_radius", self.lid_radius),
            ("finger_hole_diameter", self.finger_hole_diameter),
        ] {
            non_negative(name, value)?;
        }

        positive("lid_height", self.lid_height)?;
        if self.lid_height <= self.lid_radius {
            return Err(CamToolError::invalid(
                "lid_height",
                self.lid_height,
                format!("must exceed lid_radius ({})", self.lid_radius),
            ));
        }

        if !self.tab_angle.is_finite() || self.tab_angle < 0.0 || self.tab_angle >= FRAC_PI_2 {
            return Err(CamToolError::invalid(
                "tab_angle",
                self.tab_angle,
                "must be in [0, pi/2) radians",
            ));
        }

        if self.finger_hole_diameter > self.x {
            return Err(CamToolError::invalid(
                "finger_hole_diameter",
                self.finger_hole_diameter,
                format!("exceeds the side width x ({})", self.x),
            ));
        }

        match self.resolved_design() {
            Design::Tuckbox => self.validate_tuckbox(),
            _ => self.validate_widebox(),
        }
    }

    fn validate_widebox(&self) -> CamToolResult<()> {
        let glue_tab = self.y / 2.0 - self.margin;
        if glue_tab <= 0.0 {
            return Err(CamToolError::invalid(
                "margin",
                self.margin,
                format!("leaves no glue tab (y/2 - margin = {})", glue_tab),
            ));
        }
        self.check_tab_end("tab_angle", self.tab_angle, glue_tab, self.h)?;

        positive("lid_sides", self.lid_sides)?;
        self.check_tab_end("lid_sides", self.lid_sides, self.lid_sides, self.y)?;

        self.check_lid_width(self.x)
    }

    fn validate_tuckbox(&self) -> CamToolResult<()> {
        let lid_width = self.x - 2.0 * self.thickness;
        if lid_width <= 0.0 {
            return Err(CamToolError::invalid(
                "thickness",
                self.thickness,
                format!("leaves no lid (x - 2 * thickness = {})", lid_width),
            ));
        }
        self.check_lid_width(lid_width)?;

        let lid_cut_length = self.lid_cut_length();
        if lid_width - 2.0 * lid_cut_length <= 0.0 {
            return Err(CamToolError::invalid(
                "thickness",
                self.thickness,
                "leaves no lid fold between the lid slits",
            ));
        }

        for (name, value) in [("y", self.y), ("h", self.h)] {
            if value <= 2.0 {
                return Err(CamToolError::invalid(name, value, "too short to crease (<= 2)"));
            }
        }

        let (_, ear_radius) = self.ear_geometry(lid_cut_length);
        let ear_run = self.y - ear_radius - self.thickness - 2.0 * self.burn;
        if ear_run <= 0.0 {
            return Err(CamToolError::invalid(
                "y",
                self.y,
                format!("too short for the lid ear (ear run = {})", ear_run),
            ));
        }

        let glue_tab = self.y - self.margin - self.thickness;
        if glue_tab <= 0.0 {
            return Err(CamToolError::invalid(
                "margin",
                self.margin,
                format!("leaves no glue tab (y - margin - thickness = {})", glue_tab),
            ));
        }
        self.check_tab_end("tab_angle", self.tab_angle, glue_tab, self.h)
    }

    fn check_lid_width(&self, lid_width: f64) -> CamToolResult<()> {
        if lid_width <= 2.0 * self.lid_radius {
            return Err(CamToolError::invalid(
                "lid_radius",
                self.lid_radius,
                format!("exceeds half the lid width ({})", lid_width),
            ));
        }
        Ok(())
    }

    fn check_tab_end(&self, name: &str, value: f64, height: f64, width: f64) -> CamToolResult<()> {
        let end = self.tab_end_width(height, width);
        if end <= 0.0 {
            return Err(CamToolError::invalid(
                name,
                value,
                format!(
                    "narrows a {} x {} tab to a non-positive tip ({})",
                    height, width, end
                ),
            ));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> CamToolResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CamToolError::invalid(
            name,
            value,
            "must be a positive finite number",
        ));
    }
    Ok(())
}

fn non_negative(name: &str, value: f64) -> CamToolResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CamToolError::invalid(
            name,
            value,
            "must be a non-negative finite number",
        ));
    }
    Ok(())
}
