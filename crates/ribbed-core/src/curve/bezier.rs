//! Arbitrary-degree Bezier curves

use super::{Curve, POINT_EPSILON};
use crate::{Error, Result};
use glam::DVec3;

/// A Bezier curve defined by its control polygon
#[derive(Debug, Clone)]
pub struct BezierCurve {
    control_points: Vec<DVec3>,
}

impl BezierCurve {
    /// Create a Bezier curve; at least two control points are required
    pub fn new(control_points: Vec<DVec3>) -> Result<Self> {
        if control_points.len() < 2 {
            return Err(Error::DegenerateCurve {
                curve: "bezier",
                t: 0.0,
            });
        }
        Ok(Self { control_points })
    }

    pub fn control_points(&self) -> &[DVec3] {
        &self.control_points
    }

    pub fn degree(&self) -> usize {
        self.control_points.len() - 1
    }

    /// Run de Casteljau down to the last two points
    fn reduce(&self, t: f64) -> (DVec3, DVec3) {
        let mut points = self.control_points.clone();
        for level in (2..points.len()).rev() {
            for i in 0..level {
                points[i] = points[i].lerp(points[i + 1], t);
            }
        }
        (points[0], points[1])
    }
}

impl Curve for BezierCurve {
    fn kind(&self) -> &'static str {
        "bezier"
    }

    fn position(&self, t: f64) -> DVec3 {
        let (a, b) = self.reduce(t);
        a.lerp(b, t)
    }

    fn derivative(&self, t: f64) -> DVec3 {
        let (a, b) = self.reduce(t);
        (b - a) * self.degree() as f64
    }

    /// Closed when the control polygon starts and ends at the same point
    fn is_closed(&self) -> bool {
        let first = self.control_points[0];
        let last = self.control_points[self.control_points.len() - 1];
        first.distance_squared(last) <= POINT_EPSILON
    }
}
