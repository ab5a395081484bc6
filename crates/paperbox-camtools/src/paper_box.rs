//! Paper Box Maker
//!
//! Lays out a foldable paper box as one continuous turtle path: the outline is
//! cut, fold lines are creased, and short ticks outside the outline mark where
//! to fold. Two layouts are available, a wide box with glued lid sides and a
//! tall tuck box with a locking lid.
//!
//! Both layouts are built the same way: a half-side fragment is followed by
//! the lid and then by the literal reversal of the same half, which draws its
//! mirror image. The traversal runs counter-clockwise, so the material is on
//! the left of the cursor.

pub mod types;

pub use types::{default_tab_angle, Design, PaperBoxParameters};

use paperbox_core::{Layer, PathFragment, PathOp};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::arc_expander::ArcExpander;
use crate::error::CamToolResult;
use crate::gcode::{GcodeWriter, LaserSettings};
use crate::plotter::{Plotter, Stroke, Tracer};
use crate::svg::SvgWriter;

use PathOp::{Arc, Line, Turn};

/// A generated layout together with the design it was built for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledPath {
    pub design: Design,
    pub path: PathFragment,
}

impl AssembledPath {
    /// Total distance travelled, creases and travel included
    pub fn length(&self) -> f64 {
        self.path.length()
    }

    pub fn is_closed(&self, tolerance: f64) -> bool {
        self.path.is_closed(tolerance)
    }

    pub fn to_json(&self) -> CamToolResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Generator for paper box layouts.
///
/// Parameters are validated once on construction; the generators below
/// assume valid input and never fail.
#[derive(Debug, Clone)]
pub struct PaperBoxMaker {
    params: PaperBoxParameters,
    design: Design,
}

impl PaperBoxMaker {
    pub fn new(params: PaperBoxParameters) -> CamToolResult<Self> {
        params.validate()?;
        let design = params.resolved_design();
        debug!(
            "Paper box {}x{}x{} resolved to {} (requested {})",
            params.x, params.y, params.h, design, params.design
        );
        Ok(Self { params, design })
    }

    pub fn params(&self) -> &PaperBoxParameters {
        &self.params
    }

    /// The concrete design this maker generates
    pub fn design(&self) -> Design {
        self.design
    }

    /// Fold tick to the right of travel, outside the outline.
    ///
    /// Empty when `mark_length` is zero.
    pub fn mark(&self) -> PathFragment {
        let length = self.params.mark_length;
        if length == 0.0 {
            return PathFragment::new();
        }
        PathFragment::on(
            Layer::Mark,
            [
                Line(0.0),
                Turn(-90.0),
                Line(length),
                Turn(180.0),
                Line(length),
                Turn(-90.0),
            ],
        )
    }

    /// Fold line across the material on the left, inset 1 from both ends
    pub fn crease(&self, length: f64) -> PathFragment {
        self.crease_inset(length, 1.0)
    }

    /// Fold line of `length - 2 * inset`, perpendicular to the heading on the
    /// left. Leaves the cursor where it was.
    pub fn crease_inset(&self, length: f64, inset: f64) -> PathFragment {
        let mut crease = PathFragment::on(
            Layer::Travel,
            [Turn(90.0), Line(length - inset), Turn(-180.0)],
        );
        crease.push(Line(length - 2.0 * inset), Layer::Crease);
        crease += PathFragment::on(Layer::Travel, [Line(inset), Turn(90.0)]);
        crease
    }

    /// Rounded lid flap across `width`, ending turned around
    pub fn lid(&self, width: f64) -> PathFragment {
        let height = self.params.lid_height;
        let radius = self.params.lid_radius;
        PathFragment::cut([
            Line(height - radius),
            Arc {
                angle: 90.0,
                radius,
            },
            Line(width - 2.0 * radius),
            Arc {
                angle: 90.0,
                radius,
            },
            Line(height - radius),
        ])
    }

    /// Edge of `width` with a semicircular notch of `diameter` in its middle
    pub fn side_with_finger_hole(&self, width: f64, diameter: f64) -> PathFragment {
        let half = (width - diameter) / 2.0;
        PathFragment::cut([
            Line(half),
            Turn(90.0),
            Line(0.0),
            Arc {
                angle: -180.0,
                radius: diameter / 2.0,
            },
            Line(0.0),
            Turn(90.0),
            Line(half),
        ])
    }

    /// Trapezoidal glue tab spanning `width` and protruding `height` to the
    /// right, its sides sheared inward by `tab_angle`
    pub fn tab_description(&self, height: f64, width: f64) -> PathFragment {
        let angle = self.params.tab_angle;
        let degrees = angle.to_degrees();
        let side = height / angle.cos();
        let end = self.params.tab_end_width(height, width);
        PathFragment::cut([
            Line(0.0),
            Turn(degrees - 90.0),
            Line(side),
            Turn(90.0 - degrees),
            Line(end),
            Turn(90.0 - degrees),
            Line(side),
            Turn(degrees - 90.0),
        ])
    }

    /// Slit the lid tucks into, widened by the material thickness.
    ///
    /// `reverse` puts the thickness on the other end of the slit.
    pub fn lid_cut(&self, length: f64, reverse: bool) -> PathFragment {
        let forward = PathFragment::cut([
            Turn(90.0),
            Line(length + self.params.thickness),
            Turn(-180.0),
            Line(length),
            Turn(90.0),
        ]);
        if reverse {
            forward.reversed()
        } else {
            forward
        }
    }

    /// Ear on the side of the tuck lid that locks into the lid slit
    pub fn ear_description(&self, length: f64, lid_cut_length: f64, reverse: bool) -> PathFragment {
        let (ear_depth, radius) = self.params.ear_geometry(lid_cut_length);
        let start = self.params.thickness;
        let end = 2.0 * self.params.burn;
        let forward = PathFragment::cut([
            Line(start),
            Turn(-90.0),
            Line(lid_cut_length),
            Turn(90.0),
            Line(0.0),
            Arc {
                angle: -90.0,
                radius,
            },
            Line(0.0),
            Turn(90.0),
            Line(length - radius - start - end),
            Turn(90.0),
            Line(ear_depth),
            Turn(-90.0),
            Line(end),
        ]);
        if reverse {
            forward.reversed()
        } else {
            forward
        }
    }

    /// Same as [`PaperBoxMaker::ear_description`]
    pub fn dented_tab_description(
        &self,
        length: f64,
        lid_cut_length: f64,
        reverse: bool,
    ) -> PathFragment {
        self.ear_description(length, lid_cut_length, reverse)
    }

    /// One side of the wide box, from the bottom corner to the lid
    pub fn widebox_half(&self, length: f64, height: f64) -> PathFragment {
        let glue_tab = length / 2.0 - self.params.margin;
        let mut half = self.mark();
        half += Turn(90.0);
        half += self.tab_description(glue_tab, height);
        half += Turn(-90.0);
        half += Line(height);
        half += self.mark();
        half += Turn(90.0);
        half += self.tab_description(self.params.lid_sides, length);
        half += Turn(90.0);
        half += self.mark();
        half += Line(height);
        half += Turn(-90.0);
        half += self.tab_description(glue_tab, height);
        half += Line(length);
        half += self.mark();
        half
    }

    pub fn widebox(&self, width: f64, length: f64, height: f64) -> PathFragment {
        let half = self.widebox_half(length, height);
        let mirrored = half.reversed();
        self.side_with_finger_hole(width, self.params.finger_hole_diameter)
            + half
            + self.lid(width)
            + mirrored
    }

    /// One side of the tuck box, from the front panel to the lid slit
    pub fn tuckbox_half(&self, width: f64, length: f64, height: f64) -> PathFragment {
        let lid_cut_length = lid_cut_length(width, length);
        let mut half = self.mark();
        half += self.crease(length);
        half += Turn(90.0);
        half += self.ear_description(length, lid_cut_length, false);
        half += self.crease(height);
        half += Turn(-90.0);
        half += Line(length);
        half += self.lid_cut(lid_cut_length, false);
        half
    }

    /// Tall layout with a tuck lid.
    ///
    /// Meant for boxes taller than long. When forced with `height < length`
    /// the outline still closes, but fold marks along the bottom can land
    /// over the neighbouring flaps instead of outside the cut.
    pub fn tuckbox(&self, width: f64, length: f64, height: f64) -> PathFragment {
        let thickness = self.params.thickness;
        let lid_width = width - 2.0 * thickness;
        let half = self.tuckbox_half(width, length, height);
        let mirrored = half.reversed();

        let mut path = PathFragment::cut([Line(height)]);
        path += half;
        path += self.crease_inset(lid_width, lid_cut_length(width, length));
        path += self.lid(lid_width);
        path += mirrored;

        // Front panel with the finger hole, then the glue tab and bottom.
        path += Turn(-90.0);
        path += self.crease(height);
        path += self.mark();
        path += self.side_with_finger_hole(width, self.params.finger_hole_diameter);
        path += self.crease(height);
        path += self.mark();
        path += Turn(90.0);
        path += self.tab_description(length - self.params.margin - thickness, height);
        path += Turn(90.0);
        for edge in [width, length, width] {
            path += self.mark();
            path += Line(edge);
        }
        path += self.mark();
        path += Line(length);
        path += Turn(90.0);
        path
    }

    /// Generate the layout for the resolved design
    pub fn generate(&self) -> AssembledPath {
        let PaperBoxParameters { x, y, h, .. } = self.params;
        let path = match self.design {
            Design::Tuckbox => self.tuckbox(x, y, h),
            _ => self.widebox(x, y, h),
        };
        info!(
            "Generated {} layout: {} steps, {:.2} mm cut, {:.2} mm creased",
            self.design,
            path.len(),
            path.layer_length(Layer::Cut),
            path.layer_length(Layer::Crease)
        );
        AssembledPath {
            design: self.design,
            path,
        }
    }

    /// Draw the generated layout on `plotter`, starting at its origin
    pub fn render<P: Plotter + ?Sized>(&self, plotter: &mut P) {
        plotter.move_to(0.0, 0.0, 0.0);
        plotter.polyline(&self.generate().path);
    }

    /// World-space strokes of the generated layout
    pub fn trace(&self, expander: ArcExpander) -> Vec<Stroke> {
        let mut tracer = Tracer::new(expander);
        self.render(&mut tracer);
        tracer.into_strokes()
    }

    pub fn to_gcode(&self, settings: &LaserSettings, arc_segment_length: f64) -> String {
        let strokes = self.trace(ArcExpander::with_segment_length(arc_segment_length));
        GcodeWriter::new(settings.clone()).write(&self.params, self.design, &strokes)
    }

    pub fn to_svg(&self, arc_segment_length: f64) -> String {
        let strokes = self.trace(ArcExpander::with_segment_length(arc_segment_length));
        SvgWriter::default().write(&strokes)
    }
}

fn lid_cut_length(width: f64, length: f64) -> f64 {
    10.0_f64.min(length / 2.0).min(width / 5.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn maker() -> PaperBoxMaker {
        PaperBoxMaker::new(PaperBoxParameters::default()).unwrap()
    }

    #[test]
    fn test_invalid_parameters_rejected_on_construction() {
        let params = PaperBoxParameters {
            x: -5.0,
            ..Default::default()
        };
        let err = PaperBoxMaker::new(params).unwrap_err();
        assert_eq!(err.parameter(), Some("x"));
    }

    #[test]
    fn test_mark_has_no_net_effect() {
        let mark = maker().mark();
        assert_eq!(mark.len(), 6);
        assert!(mark.is_closed(EPS));
        assert!((mark.layer_length(Layer::Mark) - 3.0).abs() < EPS);

        let params = PaperBoxParameters {
            mark_length: 0.0,
            ..Default::default()
        };
        assert!(PaperBoxMaker::new(params).unwrap().mark().is_empty());
    }

    #[test]
    fn test_crease_returns_to_start() {
        let crease = maker().crease(40.0);
        assert!(crease.is_closed(EPS));
        assert_eq!(crease.net_rotation(), 0.0);
        assert!((crease.layer_length(Layer::Crease) - 38.0).abs() < EPS);
        assert!((crease.layer_length(Layer::Travel) - 40.0).abs() < EPS);
    }

    #[test]
    fn test_crease_lies_on_the_left() {
        let crease = maker().crease_inset(20.0, 5.0);
        let poses = paperbox_core::trace(paperbox_core::Pose::origin(), crease.ops());
        // Before and after the scored run.
        let (before, after) = (poses[3], poses[4]);
        assert!((before.y - 15.0).abs() < EPS && before.x.abs() < EPS);
        assert!((after.y - 5.0).abs() < EPS && after.x.abs() < EPS);
    }

    #[test]
    fn test_lid_profile() {
        let lid = maker().lid(100.0);
        let end = lid.end_pose(paperbox_core::Pose::origin());
        assert!((lid.net_rotation() - 180.0).abs() < EPS);
        assert!(end.x.abs() < EPS);
        assert!((end.y - 100.0).abs() < EPS);
    }

    #[test]
    fn test_finger_hole_spans_width() {
        let side = maker().side_with_finger_hole(100.0, 15.0);
        let end = side.end_pose(paperbox_core::Pose::origin());
        assert!((end.x - 100.0).abs() < EPS);
        assert!(end.y.abs() < EPS);
        assert!((side.net_rotation()).abs() < EPS);
        assert_eq!(side.steps()[0].op, Line(42.5));
    }

    #[test]
    fn test_tab_spans_width() {
        let tab = maker().tab_description(25.0, 40.0);
        let end = tab.end_pose(paperbox_core::Pose::origin());
        assert!((end.x - 40.0).abs() < EPS);
        assert!(end.y.abs() < EPS);
        assert!(tab.net_rotation().abs() < EPS);
        // 2 mm inset on each side of a 25 mm tab.
        let PathOp::Line(end_width) = tab.steps()[4].op else {
            panic!("tab tip is not a line");
        };
        assert!((end_width - 36.0).abs() < EPS);
    }

    #[test]
    fn test_lid_cut_offsets_by_thickness() {
        let maker = maker();
        let end = maker.lid_cut(10.0, false).end_pose(paperbox_core::Pose::origin());
        assert!(end.x.abs() < EPS);
        assert!((end.y - 0.3).abs() < EPS);
        assert_eq!(maker.lid_cut(10.0, true), maker.lid_cut(10.0, false).reversed());
    }

    #[test]
    fn test_ear_spans_length() {
        let maker = maker();
        let ear = maker.ear_description(100.0, 10.0, false);
        let end = ear.end_pose(paperbox_core::Pose::origin());
        assert!((end.x - 100.0).abs() < EPS, "{}", end);
        assert!(end.y.abs() < EPS, "{}", end);
        assert!(ear.net_rotation().abs() < EPS);
        assert_eq!(
            maker.dented_tab_description(100.0, 10.0, true),
            ear.reversed()
        );
    }

    #[test]
    fn test_generate_follows_design() {
        let tall = PaperBoxParameters {
            x: 60.0,
            y: 40.0,
            h: 100.0,
            ..Default::default()
        };
        let assembled = PaperBoxMaker::new(tall).unwrap().generate();
        assert_eq!(assembled.design, Design::Tuckbox);
        assert!(assembled.path.layer_length(Layer::Crease) > 0.0);

        let assembled = maker().generate();
        assert_eq!(assembled.design, Design::Widebox);
        assert_eq!(assembled.path.layer_length(Layer::Crease), 0.0);
    }

    #[test]
    fn test_json_output() {
        let json = maker().generate().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["design"], "widebox");
        assert!(value["path"].as_array().map_or(false, |steps| !steps.is_empty()));
    }
}
