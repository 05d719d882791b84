//! Uniform B-spline curves, open or periodic

use super::Curve;
use crate::{Error, Result};
use glam::DVec3;

/// Default B-spline degree (cubic)
pub const DEFAULT_DEGREE: usize = 3;

/// A uniform B-spline curve
///
/// The unit parameter range maps onto the knot span with full support,
/// `[degree, n]` for open curves. Closed curves wrap `degree` control points
/// around, giving a periodic curve whose start and end coincide smoothly.
#[derive(Debug, Clone)]
pub struct BSplineCurve {
    control_points: Vec<DVec3>,
    degree: usize,
    closed: bool,
}

impl BSplineCurve {
    /// Create a B-spline; the degree is reduced when there are too few points
    pub fn new(control_points: Vec<DVec3>, degree: usize, closed: bool) -> Result<Self> {
        if control_points.len() < 2 || degree == 0 {
            return Err(Error::DegenerateCurve {
                curve: "b-spline",
                t: 0.0,
            });
        }
        let degree = degree.min(control_points.len() - 1);
        Ok(Self {
            control_points,
            degree,
            closed,
        })
    }

    /// A cubic B-spline
    pub fn cubic(control_points: Vec<DVec3>, closed: bool) -> Result<Self> {
        Self::new(control_points, DEFAULT_DEGREE, closed)
    }

    pub fn control_points(&self) -> &[DVec3] {
        &self.control_points
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of control points including the periodic wrap
    fn effective_count(&self) -> usize {
        if self.closed {
            self.control_points.len() + self.degree
        } else {
            self.control_points.len()
        }
    }

    /// Evaluate with de Boor's algorithm, returning position and derivative
    fn de_boor(&self, t: f64) -> (DVec3, DVec3) {
        let degree = self.degree;
        let count = self.effective_count();
        let span = (count - degree) as f64;
        let x = degree as f64 + t * span;
        let k = (x.floor() as usize).clamp(degree, count - 1);

        let n = self.control_points.len();
        let mut bases: Vec<DVec3> = (0..=degree)
            .map(|i| self.control_points[(k - degree + i) % n])
            .collect();

        // Stop one level short so the last two points give the derivative
        for power in 1..degree {
            for i in 0..=(degree - power) {
                let knot = (k - degree + power + i) as f64;
                let knot_end = knot + (degree - power + 1) as f64;
                let a = (x - knot) / (knot_end - knot);
                bases[i] = bases[i].lerp(bases[i + 1], a);
            }
        }

        let a = x - k as f64;
        let position = bases[0].lerp(bases[1], a);
        let derivative = (bases[1] - bases[0]) * degree as f64 * span;
        (position, derivative)
    }
}

impl Curve for BSplineCurve {
    fn kind(&self) -> &'static str {
        "b-spline"
    }

    fn position(&self, t: f64) -> DVec3 {
        self.de_boor(t).0
    }

    fn derivative(&self, t: f64) -> DVec3 {
        self.de_boor(t).1
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
