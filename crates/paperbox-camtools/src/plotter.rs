//! Rendering collaborator
//!
//! A [`Plotter`] receives turtle moves and turns them into strokes. Style is
//! the [`Layer`] the next moves are drawn on; [`StyleGuard`] switches it for a
//! scope and restores the previous layer when dropped.

use std::ops::{Deref, DerefMut};

use paperbox_core::{Layer, PathFragment, PathOp, Pose};
use serde::{Deserialize, Serialize};

use crate::arc_expander::ArcExpander;

/// Sink for turtle moves
pub trait Plotter {
    /// Reposition without drawing
    fn move_to(&mut self, x: f64, y: f64, angle: f64);

    /// Stroke a straight segment of `length` along the heading
    fn edge(&mut self, length: f64);

    /// Turn in place (`radius == 0`) or follow an arc of `radius`
    fn corner(&mut self, angle: f64, radius: f64);

    /// Current layer
    fn style(&self) -> Layer;

    fn set_style(&mut self, layer: Layer);

    /// Stroke a whole fragment, switching style per step
    fn polyline(&mut self, path: &PathFragment) {
        for step in path {
            let mut plotter = StyleGuard::new(&mut *self, step.layer);
            match step.op {
                PathOp::Line(length) => plotter.edge(length),
                PathOp::Turn(angle) => plotter.corner(angle, 0.0),
                PathOp::Arc { angle, radius } => plotter.corner(angle, radius),
            }
        }
    }
}

/// Scoped style switch
///
/// Derefs to the wrapped plotter; the previous layer is restored on drop.
pub struct StyleGuard<'a, P: Plotter + ?Sized> {
    plotter: &'a mut P,
    previous: Layer,
}

impl<'a, P: Plotter + ?Sized> StyleGuard<'a, P> {
    pub fn new(plotter: &'a mut P, layer: Layer) -> Self {
        let previous = plotter.style();
        plotter.set_style(layer);
        Self { plotter, previous }
    }
}

impl<P: Plotter + ?Sized> Deref for StyleGuard<'_, P> {
    type Target = P;

    fn deref(&self) -> &Self::Target {
        self.plotter
    }
}

impl<P: Plotter + ?Sized> DerefMut for StyleGuard<'_, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.plotter
    }
}

impl<P: Plotter + ?Sized> Drop for StyleGuard<'_, P> {
    fn drop(&mut self) {
        self.plotter.set_style(self.previous);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Continuous run of points drawn on one layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub layer: Layer,
    pub points: Vec<Point>,
}

impl Stroke {
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }
}

/// Axis-aligned bounds of a set of strokes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn of(strokes: &[Stroke]) -> Option<Bounds> {
        let mut points = strokes.iter().flat_map(|stroke| stroke.points.iter());
        let first = points.next()?;
        let mut bounds = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for point in points {
            bounds.min_x = bounds.min_x.min(point.x);
            bounds.min_y = bounds.min_y.min(point.y);
            bounds.max_x = bounds.max_x.max(point.x);
            bounds.max_y = bounds.max_y.max(point.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Plotter that records world-space strokes
///
/// Travel moves only advance the pose. Consecutive drawn moves on the same
/// layer are merged into one stroke.
#[derive(Debug, Clone)]
pub struct Tracer {
    pose: Pose,
    style: Layer,
    strokes: Vec<Stroke>,
    expander: ArcExpander,
    pen_down: bool,
}

impl Tracer {
    pub fn new(expander: ArcExpander) -> Self {
        Self {
            pose: Pose::origin(),
            style: Layer::Cut,
            strokes: Vec::new(),
            expander,
            pen_down: false,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn into_strokes(self) -> Vec<Stroke> {
        self.strokes
    }

    fn draw_to(&mut self, points: impl IntoIterator<Item = (f64, f64)>) {
        let start = Point::new(self.pose.x, self.pose.y);
        let continues = self.pen_down
            && self
                .strokes
                .last()
                .map_or(false, |stroke| stroke.layer == self.style);
        if !continues {
            self.strokes.push(Stroke {
                layer: self.style,
                points: vec![start],
            });
            self.pen_down = true;
        }
        if let Some(stroke) = self.strokes.last_mut() {
            stroke
                .points
                .extend(points.into_iter().map(|(x, y)| Point::new(x, y)));
        }
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new(ArcExpander::default())
    }
}

impl Plotter for Tracer {
    fn move_to(&mut self, x: f64, y: f64, angle: f64) {
        self.pose = Pose::new(x, y, angle);
        self.pen_down = false;
    }

    fn edge(&mut self, length: f64) {
        let end = self.pose.forward(length);
        if length != 0.0 {
            if self.style.is_drawn() {
                self.draw_to([(end.x, end.y)]);
            } else {
                self.pen_down = false;
            }
        }
        self.pose = end;
    }

    fn corner(&mut self, angle: f64, radius: f64) {
        let end = self.pose.advance(PathOp::Arc { angle, radius });
        if radius != 0.0 && angle != 0.0 {
            if self.style.is_drawn() {
                let points = self.expander.expand_arc(&self.pose, angle, radius);
                self.draw_to(points);
            } else {
                self.pen_down = false;
            }
        }
        self.pose = end;
    }

    fn style(&self) -> Layer {
        self.style
    }

    fn set_style(&mut self, layer: Layer) {
        self.style = layer;
    }
}
