//! SVG output for traced box layouts
//!
//! Coordinates are millimetres. The turtle's y axis points up, so it is
//! flipped into SVG's downward y.

use paperbox_core::Layer;
use tracing::warn;

use crate::plotter::{Bounds, Stroke};

#[derive(Debug, Clone)]
pub struct SvgWriter {
    /// Blank border around the drawing
    pub margin: f64,
    pub stroke_width: f64,
}

impl Default for SvgWriter {
    fn default() -> Self {
        Self {
            margin: 5.0,
            stroke_width: 0.2,
        }
    }
}

impl SvgWriter {
    pub fn color(layer: Layer) -> &'static str {
        match layer {
            Layer::Cut => "#ff0000",
            Layer::Crease => "#0000ff",
            Layer::Mark | Layer::Travel => "#000000",
        }
    }

    pub fn write(&self, strokes: &[Stroke]) -> String {
        let bounds = Bounds::of(strokes).unwrap_or_else(|| {
            warn!("No strokes to write, emitting an empty drawing");
            Bounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 0.0,
                max_y: 0.0,
            }
        });
        let width = bounds.width() + 2.0 * self.margin;
        let height = bounds.height() + 2.0 * self.margin;

        let mut svg = String::new();
        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.3}mm\" height=\"{h:.3}mm\" viewBox=\"0 0 {w:.3} {h:.3}\">\n",
            w = width,
            h = height
        ));

        for stroke in strokes.iter().filter(|stroke| stroke.points.len() > 1) {
            let mut data = String::new();
            for (i, point) in stroke.points.iter().enumerate() {
                let command = if i == 0 { 'M' } else { 'L' };
                data.push_str(&format!(
                    "{} {:.3} {:.3} ",
                    command,
                    point.x - bounds.min_x + self.margin,
                    bounds.max_y - point.y + self.margin
                ));
            }
            svg.push_str(&format!(
                "  <path class=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
                stroke.layer,
                data.trim_end(),
                Self::color(stroke.layer),
                self.stroke_width
            ));
        }

        svg.push_str("</svg>\n");
        svg
    }
}
