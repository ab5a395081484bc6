//! Explicit turtle state
//!
//! The cursor of a turtle program is a [`Pose`]: a position plus a heading in
//! degrees (0 = +X, counter-clockwise positive). Running a program is a fold of
//! [`Pose::advance`] over its operations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::path::PathOp;

/// Cursor position and heading
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Heading in degrees, not normalized
    pub heading: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    /// Origin, heading along +X
    pub fn origin() -> Self {
        Self::default()
    }

    /// Unit vector along the heading
    pub fn direction(&self) -> (f64, f64) {
        let radians = self.heading.to_radians();
        (radians.cos(), radians.sin())
    }

    /// Move `distance` along the heading
    pub fn forward(&self, distance: f64) -> Pose {
        let (dx, dy) = self.direction();
        Pose::new(self.x + dx * distance, self.y + dy * distance, self.heading)
    }

    /// Rotate in place
    pub fn turned(&self, angle: f64) -> Pose {
        Pose::new(self.x, self.y, self.heading + angle)
    }

    /// Point at `offset` to the left of the heading (negative = right)
    pub fn left_of(&self, offset: f64) -> (f64, f64) {
        let (dx, dy) = self.direction();
        (self.x - dy * offset, self.y + dx * offset)
    }

    /// Center of the circle an arc of `angle` and `radius` follows from here
    pub fn arc_center(&self, angle: f64, radius: f64) -> (f64, f64) {
        self.left_of(radius * angle.signum())
    }

    /// Apply one operation
    pub fn advance(&self, op: PathOp) -> Pose {
        match op {
            PathOp::Line(length) => self.forward(length),
            PathOp::Turn(angle) => self.turned(angle),
            PathOp::Arc { angle, radius } => {
                // Chord from start to end bisects the heading change.
                let chord = 2.0 * radius * (angle.to_radians().abs() / 2.0).sin();
                let mid = self.turned(angle / 2.0).forward(chord);
                Pose::new(mid.x, mid.y, self.heading + angle)
            }
        }
    }

    /// Heading folded into `[0, 360)`
    pub fn normalized_heading(&self) -> f64 {
        self.heading.rem_euclid(360.0)
    }

    /// Euclidean distance between two poses, ignoring heading
    pub fn distance_to(&self, other: &Pose) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.3}, {:.3}) @ {:.1}°",
            self.x,
            self.y,
            self.normalized_heading()
        )
    }
}

/// Every pose visited by a sequence of operations, starting pose included
pub fn trace(start: Pose, ops: impl IntoIterator<Item = PathOp>) -> Vec<Pose> {
    let mut poses = vec![start];
    let mut pose = start;
    for op in ops {
        pose = pose.advance(op);
        poses.push(pose);
    }
    poses
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_pose(pose: Pose, x: f64, y: f64, heading: f64) {
        assert!(
            (pose.x - x).abs() < EPS && (pose.y - y).abs() < EPS,
            "expected ({}, {}), got {}",
            x,
            y,
            pose
        );
        assert!((pose.heading - heading).abs() < EPS, "heading {}", pose.heading);
    }

    #[test]
    fn test_line_and_turn() {
        let pose = Pose::origin()
            .advance(PathOp::Line(10.0))
            .advance(PathOp::Turn(90.0))
            .advance(PathOp::Line(5.0));
        assert_pose(pose, 10.0, 5.0, 90.0);
    }

    #[test]
    fn test_left_quarter_arc() {
        let pose = Pose::origin().advance(PathOp::Arc {
            angle: 90.0,
            radius: 7.0,
        });
        assert_pose(pose, 7.0, 7.0, 90.0);
        assert_eq!(Pose::origin().arc_center(90.0, 7.0), (0.0, 7.0));
    }

    #[test]
    fn test_right_half_arc() {
        // Heading north, half circle to the right ends two radii east, heading south.
        let pose = Pose::new(0.0, 0.0, 90.0).advance(PathOp::Arc {
            angle: -180.0,
            radius: 7.5,
        });
        assert_pose(pose, 15.0, 0.0, -90.0);
    }

    #[test]
    fn test_zero_radius_arc_is_a_turn() {
        let pose = Pose::new(3.0, 4.0, 0.0).advance(PathOp::Arc {
            angle: 45.0,
            radius: 0.0,
        });
        assert_pose(pose, 3.0, 4.0, 45.0);
    }

    #[test]
    fn test_trace_records_every_pose() {
        let poses = trace(
            Pose::origin(),
            [PathOp::Line(1.0), PathOp::Turn(90.0), PathOp::Line(1.0)],
        );
        assert_eq!(poses.len(), 4);
        assert_pose(poses[3], 1.0, 1.0, 90.0);
    }

    #[test]
    fn test_normalized_heading() {
        assert_eq!(Pose::new(0.0, 0.0, -90.0).normalized_heading(), 270.0);
        assert_eq!(Pose::new(0.0, 0.0, 720.0).normalized_heading(), 0.0);
    }
}
