//! Path primitives
//!
//! A box layout is described as a turtle program: a flat, ordered list of
//! [`Step`]s, each one a primitive [`PathOp`] drawn on a [`Layer`].
//!
//! - `Line` moves forward along the current heading
//! - `Turn` rotates the heading in place (positive = counter-clockwise)
//! - `Arc` follows a circle of the given radius while rotating
//!
//! Fragments concatenate with `+` and reverse with [`PathFragment::reversed`].
//! Reversal is a literal reversal of the step list: traversed from the same
//! start pose, the reversed fragment draws the mirror image of the forward one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

use crate::turtle::Pose;

/// Stroke layer a step is drawn on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Through-cut outline
    #[default]
    Cut,
    /// Scored fold line
    Crease,
    /// Alignment tick outside the outline
    Mark,
    /// Pen-up move
    Travel,
}

impl Layer {
    /// Whether steps on this layer leave a visible stroke
    pub fn is_drawn(self) -> bool {
        !matches!(self, Layer::Travel)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cut => write!(f, "cut"),
            Self::Crease => write!(f, "crease"),
            Self::Mark => write!(f, "mark"),
            Self::Travel => write!(f, "travel"),
        }
    }
}

/// Primitive turtle operation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathOp {
    /// Move forward by `length` (may be zero)
    Line(f64),
    /// Rotate the heading by the given angle in degrees
    Turn(f64),
    /// Sweep `angle` degrees along a circle of `radius`
    Arc { angle: f64, radius: f64 },
}

impl PathOp {
    /// Distance travelled by this operation
    pub fn length(&self) -> f64 {
        match *self {
            PathOp::Line(length) => length.abs(),
            PathOp::Turn(_) => 0.0,
            PathOp::Arc { angle, radius } => angle.to_radians().abs() * radius.abs(),
        }
    }

    /// Heading change in degrees
    pub fn rotation(&self) -> f64 {
        match *self {
            PathOp::Line(_) => 0.0,
            PathOp::Turn(angle) | PathOp::Arc { angle, .. } => angle,
        }
    }
}

/// A primitive tagged with the layer it is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub op: PathOp,
    pub layer: Layer,
}

impl Step {
    pub fn new(op: PathOp, layer: Layer) -> Self {
        Self { op, layer }
    }
}

/// Ordered sequence of steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathFragment {
    steps: Vec<Step>,
}

impl PathFragment {
    /// Create an empty fragment
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fragment with every operation on one layer
    pub fn on(layer: Layer, ops: impl IntoIterator<Item = PathOp>) -> Self {
        ops.into_iter().map(|op| Step::new(op, layer)).collect()
    }

    /// Build a fragment on the [`Layer::Cut`] layer
    pub fn cut(ops: impl IntoIterator<Item = PathOp>) -> Self {
        Self::on(Layer::Cut, ops)
    }

    /// Append a single operation
    pub fn push(&mut self, op: PathOp, layer: Layer) {
        self.steps.push(Step::new(op, layer));
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The operations without their layers
    pub fn ops(&self) -> impl Iterator<Item = PathOp> + '_ {
        self.steps.iter().map(|step| step.op)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Literal reversal of the step order.
    pub fn reversed(&self) -> Self {
        self.steps.iter().rev().copied().collect()
    }

    /// Sum of all `Line` and `Arc` magnitudes, travel included
    pub fn length(&self) -> f64 {
        self.ops().fold(0.0, |total, op| total + op.length())
    }

    /// Sum of `Line` and `Arc` magnitudes drawn on `layer`
    pub fn layer_length(&self, layer: Layer) -> f64 {
        self.steps
            .iter()
            .filter(|step| step.layer == layer)
            .fold(0.0, |total, step| total + step.op.length())
    }

    /// Accumulated heading change in degrees
    pub fn net_rotation(&self) -> f64 {
        self.ops().fold(0.0, |total, op| total + op.rotation())
    }

    /// Pose reached by running the fragment from `start`
    pub fn end_pose(&self, start: Pose) -> Pose {
        self.ops().fold(start, |pose, op| pose.advance(op))
    }

    /// Whether the fragment returns to its start point and heading
    ///
    /// Checked from the origin: net displacement within `tolerance` and net
    /// rotation a multiple of 360 degrees.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        let end = self.end_pose(Pose::origin());
        let turns = self.net_rotation() / 360.0;
        end.x.abs() <= tolerance
            && end.y.abs() <= tolerance
            && (turns - turns.round()).abs() * 360.0 <= tolerance
    }
}

impl FromIterator<Step> for PathFragment {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PathFragment {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl<'a> IntoIterator for &'a PathFragment {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl Add for PathFragment {
    type Output = PathFragment;

    fn add(mut self, rhs: PathFragment) -> Self::Output {
        self.steps.extend(rhs.steps);
        self
    }
}

impl AddAssign for PathFragment {
    fn add_assign(&mut self, rhs: PathFragment) {
        self.steps.extend(rhs.steps);
    }
}

impl AddAssign<PathOp> for PathFragment {
    /// Append an operation on the cut layer
    fn add_assign(&mut self, op: PathOp) {
        self.push(op, Layer::Cut);
    }
}
