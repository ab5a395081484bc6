//! Arc Expander
//!
//! Converts turtle arcs into linear segments for output formats and
//! controllers that only move in straight lines.

use paperbox_core::Pose;

/// Arc expansion configuration
#[derive(Debug, Clone)]
pub struct ArcExpanderConfig {
    /// Maximum segment length
    pub segment_length: f64,
    /// Minimum number of segments per arc
    pub min_segments: usize,
}

impl Default for ArcExpanderConfig {
    fn default() -> Self {
        Self {
            segment_length: 0.5,
            min_segments: 4,
        }
    }
}

/// Converts arcs to line segments
#[derive(Debug, Clone)]
pub struct ArcExpander {
    config: ArcExpanderConfig,
}

impl ArcExpander {
    /// Create a new arc expander
    pub fn new(config: ArcExpanderConfig) -> Self {
        Self { config }
    }

    /// Expander with the given maximum segment length
    pub fn with_segment_length(segment_length: f64) -> Self {
        Self::new(ArcExpanderConfig {
            segment_length,
            ..Default::default()
        })
    }

    /// Number of segments used for an arc of the given sweep and radius
    pub fn segment_count(&self, angle: f64, radius: f64) -> usize {
        let arc_length = angle.to_radians().abs() * radius.abs();
        let by_length = if self.config.segment_length > 0.0 {
            (arc_length / self.config.segment_length).ceil() as usize
        } else {
            0
        };
        by_length.max(self.config.min_segments).max(1)
    }

    /// Expand an arc starting at `start` into the points along it.
    ///
    /// The start point is not included; the last point is the arc's end.
    pub fn expand_arc(&self, start: &Pose, angle: f64, radius: f64) -> Vec<(f64, f64)> {
        if radius == 0.0 || angle == 0.0 {
            return Vec::new();
        }

        let (center_x, center_y) = start.arc_center(angle, radius);
        let start_angle = (start.y - center_y).atan2(start.x - center_x);
        let sweep = angle.to_radians();
        let segments = self.segment_count(angle, radius);

        (1..=segments)
            .map(|i| {
                let fraction = i as f64 / segments as f64;
                let theta = start_angle + sweep * fraction;
                (
                    center_x + radius * theta.cos(),
                    center_y + radius * theta.sin(),
                )
            })
            .collect()
    }
}

impl Default for ArcExpander {
    fn default() -> Self {
        Self::new(ArcExpanderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperbox_core::PathOp;

    #[test]
    fn test_segment_count() {
        let expander = ArcExpander::with_segment_length(1.0);
        // Quarter circle of radius 10 is ~15.7 long.
        assert_eq!(expander.segment_count(90.0, 10.0), 16);
        // Tiny arcs still get the minimum.
        assert_eq!(expander.segment_count(90.0, 0.1), 4);
    }

    #[test]
    fn test_expanded_arc_ends_where_turtle_ends() {
        let expander = ArcExpander::default();
        for (angle, radius) in [(90.0, 7.0), (-180.0, 7.5), (-90.0, 5.0)] {
            let start = Pose::new(3.0, -2.0, 30.0);
            let points = expander.expand_arc(&start, angle, radius);
            let end = start.advance(PathOp::Arc { angle, radius });
            let last = points.last().copied().unwrap();
            assert!((last.0 - end.x).abs() < 1e-9, "{} {}", last.0, end.x);
            assert!((last.1 - end.y).abs() < 1e-9, "{} {}", last.1, end.y);
        }
    }

    #[test]
    fn test_points_stay_on_circle() {
        let expander = ArcExpander::default();
        let start = Pose::origin();
        let (cx, cy) = start.arc_center(-90.0, 4.0);
        for (x, y) in expander.expand_arc(&start, -90.0, 4.0) {
            assert!(((x - cx).hypot(y - cy) - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_degenerate_arc() {
        let expander = ArcExpander::default();
        assert!(expander.expand_arc(&Pose::origin(), 90.0, 0.0).is_empty());
    }
}
