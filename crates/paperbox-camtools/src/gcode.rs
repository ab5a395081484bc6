//! Laser G-code output for traced box layouts

use paperbox_core::Layer;
use serde::{Deserialize, Serialize};

use crate::error::{CamToolError, CamToolResult};
use crate::paper_box::{Design, PaperBoxParameters};
use crate::plotter::{Bounds, Stroke};

/// Laser power and feed per layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserSettings {
    /// Spindle value (S) for through cuts
    pub cut_power: u32,
    /// Spindle value (S) for scored creases
    pub crease_power: u32,
    /// Spindle value (S) for alignment marks
    pub mark_power: u32,
    /// Feed rate for through cuts (mm/min)
    pub cut_feed_rate: f64,
    pub crease_feed_rate: f64,
    pub mark_feed_rate: f64,
    /// Number of passes over cut strokes
    pub passes: u32,
    /// Desired minimum X of the emitted job
    pub offset_x: f64,
    /// Desired minimum Y of the emitted job
    pub offset_y: f64,
}

impl Default for LaserSettings {
    fn default() -> Self {
        Self {
            cut_power: 1000,
            crease_power: 250,
            mark_power: 400,
            cut_feed_rate: 500.0,
            crease_feed_rate: 1500.0,
            mark_feed_rate: 1500.0,
            passes: 1,
            offset_x: 10.0,
            offset_y: 10.0,
        }
    }
}

impl LaserSettings {
    pub fn power(&self, layer: Layer) -> u32 {
        match layer {
            Layer::Cut => self.cut_power,
            Layer::Crease => self.crease_power,
            Layer::Mark => self.mark_power,
            Layer::Travel => 0,
        }
    }

    pub fn feed_rate(&self, layer: Layer) -> f64 {
        match layer {
            Layer::Cut => self.cut_feed_rate,
            Layer::Crease => self.crease_feed_rate,
            Layer::Mark | Layer::Travel => self.mark_feed_rate,
        }
    }

    /// Passes applied to strokes on `layer`
    pub fn passes_for(&self, layer: Layer) -> u32 {
        match layer {
            Layer::Cut => self.passes,
            _ => 1,
        }
    }

    pub fn validate(&self) -> CamToolResult<()> {
        if self.passes == 0 {
            return Err(CamToolError::invalid("passes", 0.0, "must be at least 1"));
        }
        for (name, value) in [
            ("cut_feed_rate", self.cut_feed_rate),
            ("crease_feed_rate", self.crease_feed_rate),
            ("mark_feed_rate", self.mark_feed_rate),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CamToolError::invalid(name, value, "must be positive"));
            }
        }
        for (name, value) in [("offset_x", self.offset_x), ("offset_y", self.offset_y)] {
            if !value.is_finite() {
                return Err(CamToolError::invalid(name, value, "must be finite"));
            }
        }
        Ok(())
    }
}

/// Writes strokes as laser G-code
#[derive(Debug, Clone, Default)]
pub struct GcodeWriter {
    settings: LaserSettings,
}

impl GcodeWriter {
    pub fn new(settings: LaserSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &LaserSettings {
        &self.settings
    }

    pub fn write(&self, params: &PaperBoxParameters, design: Design, strokes: &[Stroke]) -> String {
        let settings = &self.settings;
        let mut gcode = String::new();

        gcode.push_str("; Paper Box Maker G-code\n");
        gcode.push_str(";\n");
        gcode.push_str("; --- Box Dimensions ---\n");
        gcode.push_str(&format!(
            "; Dimensions: {}x{}x{} mm\n",
            params.x, params.y, params.h
        ));
        gcode.push_str(&format!("; Design: {}\n", design));
        gcode.push_str(&format!(
            "; Lid: height {} mm, radius {} mm\n",
            params.lid_height, params.lid_radius
        ));
        gcode.push_str(&format!(
            "; Finger hole: {} mm\n",
            params.finger_hole_diameter
        ));
        gcode.push_str(";\n");

        gcode.push_str("; --- Material Settings ---\n");
        gcode.push_str(&format!("; Material thickness: {} mm\n", params.thickness));
        gcode.push_str(&format!("; Burn: {} mm\n", params.burn));
        gcode.push_str(";\n");

        gcode.push_str("; --- Laser Settings ---\n");
        gcode.push_str(&format!("; Laser passes: {}\n", settings.passes));
        for layer in [Layer::Cut, Layer::Crease, Layer::Mark] {
            gcode.push_str(&format!(
                "; {}: S{} at {:.0} mm/min\n",
                layer,
                settings.power(layer),
                settings.feed_rate(layer)
            ));
        }
        gcode.push_str(";\n");

        gcode.push_str("; --- Work Origin Offsets ---\n");
        gcode.push_str(&format!("; Offset X: {} mm\n", settings.offset_x));
        gcode.push_str(&format!("; Offset Y: {} mm\n", settings.offset_y));
        gcode.push_str(";\n");

        gcode.push_str("; Initialization\n");
        gcode.push_str("G21 ; Set units to millimeters\n");
        gcode.push_str("G90 ; Absolute positioning\n");
        gcode.push_str("G17 ; XY plane selection\n");
        gcode.push('\n');

        // Offsets are the desired minimum XY of the job.
        let (shift_x, shift_y) = match Bounds::of(strokes) {
            Some(bounds) => (
                settings.offset_x - bounds.min_x,
                settings.offset_y - bounds.min_y,
            ),
            None => (0.0, 0.0),
        };

        for (i, stroke) in strokes.iter().enumerate() {
            let Some(first) = stroke.points.first() else {
                continue;
            };
            let passes = settings.passes_for(stroke.layer);
            let power = settings.power(stroke.layer);
            let feed_rate = settings.feed_rate(stroke.layer);

            gcode.push_str(&format!("; Stroke {}: {}\n", i + 1, stroke.layer));
            gcode.push_str(&format!(
                "G0 X{:.2} Y{:.2} ; Rapid to start\n",
                first.x + shift_x,
                first.y + shift_y
            ));

            for pass_num in 1..=passes {
                if passes > 1 {
                    gcode.push_str(&format!("; Pass {}/{}\n", pass_num, passes));
                }
                gcode.push_str(&format!("M3 S{} ; Laser on\n", power));

                for (idx, point) in stroke.points.iter().skip(1).enumerate() {
                    if idx == 0 {
                        gcode.push_str(&format!(
                            "G1 X{:.2} Y{:.2} F{:.0}\n",
                            point.x + shift_x,
                            point.y + shift_y,
                            feed_rate
                        ));
                    } else {
                        gcode.push_str(&format!(
                            "G1 X{:.2} Y{:.2}\n",
                            point.x + shift_x,
                            point.y + shift_y
                        ));
                    }
                }

                gcode.push_str("M5 ; Laser off\n");

                if pass_num < passes {
                    gcode.push_str(&format!(
                        "G0 X{:.2} Y{:.2} ; Return to start\n",
                        first.x + shift_x,
                        first.y + shift_y
                    ));
                }
            }
            gcode.push('\n');
        }

        gcode.push_str("; End of job\n");
        gcode.push_str("M5 ; Ensure laser is off\n");
        gcode.push_str(&format!(
            "G0 X{:.2} Y{:.2} ; Return to origin\n",
            settings.offset_x, settings.offset_y
        ));
        gcode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotter::Point;

    fn square_stroke(layer: Layer, origin: f64) -> Stroke {
        Stroke {
            layer,
            points: vec![
                Point::new(origin, origin),
                Point::new(origin + 10.0, origin),
                Point::new(origin + 10.0, origin + 10.0),
            ],
        }
    }

    #[test]
    fn test_layer_lookup() {
        let settings = LaserSettings::default();
        assert_eq!(settings.power(Layer::Crease), 250);
        assert_eq!(settings.feed_rate(Layer::Cut), 500.0);
        assert_eq!(settings.power(Layer::Travel), 0);
    }

    #[test]
    fn test_validation() {
        assert!(LaserSettings::default().validate().is_ok());
        let settings = LaserSettings {
            passes: 0,
            ..Default::default()
        };
        assert_eq!(settings.validate().unwrap_err().parameter(), Some("passes"));
        let settings = LaserSettings {
            crease_feed_rate: -1.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_header_and_moves() {
        let writer = GcodeWriter::default();
        let strokes = vec![square_stroke(Layer::Cut, -5.0)];
        let gcode = writer.write(&PaperBoxParameters::default(), Design::Widebox, &strokes);

        assert!(gcode.contains("; Design: widebox"));
        assert!(gcode.contains("G21 ; Set units to millimeters"));
        // Minimum XY is moved onto the offsets.
        assert!(gcode.contains("G0 X10.00 Y10.00 ; Rapid to start"));
        assert!(gcode.contains("G1 X20.00 Y10.00 F500"));
        assert!(gcode.contains("G1 X20.00 Y20.00\n"));
        assert_eq!(gcode.matches("M3 S1000").count(), 1);
    }

    #[test]
    fn test_multiple_passes_only_for_cuts() {
        let writer = GcodeWriter::new(LaserSettings {
            passes: 3,
            ..Default::default()
        });
        let strokes = vec![
            square_stroke(Layer::Cut, 0.0),
            square_stroke(Layer::Crease, 20.0),
        ];
        let gcode = writer.write(&PaperBoxParameters::default(), Design::Tuckbox, &strokes);

        assert_eq!(gcode.matches("M3 S1000").count(), 3);
        assert_eq!(gcode.matches("M3 S250").count(), 1);
        assert!(gcode.contains("; Pass 3/3"));
        assert!(gcode.contains("F1500"));
    }
}
