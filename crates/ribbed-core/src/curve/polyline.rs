//! Explicit point-sequence curves parameterized by chord length

use super::{Curve, POINT_EPSILON};
use crate::{Error, Result};
use glam::DVec3;

/// A piecewise-linear curve through explicit sample points
///
/// The parameter is normalized accumulated chord length, so `t = 0` is the
/// first point and `t = 1` the last (or, when closed, the first point again
/// after the closing segment). Tangents are blended across vertices so that
/// they vary continuously along the curve.
#[derive(Debug, Clone)]
pub struct Polyline {
    /// Path nodes; a closed polyline repeats its first point at the end
    nodes: Vec<DVec3>,
    /// Normalized parameter of every node, `params[0] == 0`, last `== 1`
    params: Vec<f64>,
    /// Unit tangent at every node
    node_tangents: Vec<DVec3>,
    length: f64,
    closed: bool,
}

impl Polyline {
    /// Build a polyline, dropping consecutive duplicate points
    ///
    /// For closed polylines a trailing point equal to the first is treated as
    /// the explicit closing point and dropped as well.
    pub fn new(points: impl IntoIterator<Item = DVec3>, closed: bool) -> Result<Self> {
        let mut nodes: Vec<DVec3> = Vec::new();
        for p in points {
            if nodes
                .last()
                .is_none_or(|last| last.distance_squared(p) > POINT_EPSILON)
            {
                nodes.push(p);
            }
        }
        if closed
            && nodes.len() > 1
            && nodes[0].distance_squared(nodes[nodes.len() - 1]) <= POINT_EPSILON
        {
            nodes.pop();
        }
        if nodes.len() < 2 {
            return Err(Error::DegenerateCurve {
                curve: "polyline",
                t: 0.0,
            });
        }
        if closed {
            nodes.push(nodes[0]);
        }

        let mut params = Vec::with_capacity(nodes.len());
        let mut accumulated = 0.0;
        params.push(0.0);
        for pair in nodes.windows(2) {
            accumulated += pair[0].distance(pair[1]);
            params.push(accumulated);
        }
        let length = accumulated;
        for p in &mut params {
            *p /= length;
        }
        if let Some(last) = params.last_mut() {
            *last = 1.0;
        }

        let segments: Vec<DVec3> = nodes
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).normalize())
            .collect();
        let last_segment = segments.len() - 1;
        let node_tangents = (0..nodes.len())
            .map(|i| {
                let (before, after) = if i == 0 || i == nodes.len() - 1 {
                    if closed {
                        (segments[last_segment], segments[0])
                    } else if i == 0 {
                        (segments[0], segments[0])
                    } else {
                        (segments[last_segment], segments[last_segment])
                    }
                } else {
                    (segments[i - 1], segments[i])
                };
                let blended = before + after;
                // Hairpin turns have no bisecting direction
                if blended.length_squared() < POINT_EPSILON {
                    after
                } else {
                    blended.normalize()
                }
            })
            .collect();

        Ok(Self {
            nodes,
            params,
            node_tangents,
            length,
            closed,
        })
    }

    /// Points on `center + cos(a) * x_axis + sin(a) * y_axis` for `samples`
    /// angles from `start` to `end` inclusive (radians)
    ///
    /// A full turn gives a closed polyline.
    pub fn arc(
        center: DVec3,
        x_axis: DVec3,
        y_axis: DVec3,
        start: f64,
        end: f64,
        samples: usize,
    ) -> Result<Self> {
        let last = samples.saturating_sub(1).max(1) as f64;
        let points = (0..samples).map(|i| {
            let angle = start + (end - start) * i as f64 / last;
            center + x_axis * angle.cos() + y_axis * angle.sin()
        });
        let closed = ((end - start).abs() - std::f64::consts::TAU).abs() < 1e-9;
        Self::new(points, closed)
    }

    /// The distinct points of the polyline (without the closing repeat)
    pub fn points(&self) -> &[DVec3] {
        let n = if self.closed {
            self.nodes.len() - 1
        } else {
            self.nodes.len()
        };
        &self.nodes[..n]
    }

    /// Parameter values of the distinct points, in order
    pub fn point_params(&self) -> &[f64] {
        &self.params[..self.points().len()]
    }

    /// Total arc length
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Index of the segment containing `t` and the fraction along it
    fn locate(&self, t: f64) -> (usize, f64) {
        let segment = self
            .params
            .partition_point(|&p| p <= t)
            .saturating_sub(1)
            .min(self.nodes.len() - 2);
        let start = self.params[segment];
        let width = self.params[segment + 1] - start;
        let fraction = ((t - start) / width).clamp(0.0, 1.0);
        (segment, fraction)
    }
}

impl Curve for Polyline {
    fn kind(&self) -> &'static str {
        "polyline"
    }

    fn position(&self, t: f64) -> DVec3 {
        let (segment, fraction) = self.locate(t);
        self.nodes[segment].lerp(self.nodes[segment + 1], fraction)
    }

    fn derivative(&self, t: f64) -> DVec3 {
        let (segment, fraction) = self.locate(t);
        let blended = self.node_tangents[segment].lerp(self.node_tangents[segment + 1], fraction);
        let direction = if blended.length_squared() < POINT_EPSILON {
            (self.nodes[segment + 1] - self.nodes[segment]).normalize()
        } else {
            blended.normalize()
        };
        direction * self.length
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn native_samples(&self) -> Option<Vec<f64>> {
        Some(self.point_params().to_vec())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn chord_length_parameterization() {
        let line = Polyline::new(
            [DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0), DVec3::new(1.0, 3.0, 0.0)],
            false,
        )
        .unwrap();

        assert_relative_eq!(line.length(), 4.0);
        assert_eq!(line.point_params(), &[0.0, 0.25, 1.0]);
        let mid = line.position(0.625);
        assert_relative_eq!(mid.x, 1.0);
        assert_relative_eq!(mid.y, 1.5);
    }

    #[test]
    fn arcs_close_only_on_full_turns() {
        let half = Polyline::arc(DVec3::ZERO, DVec3::X, DVec3::Y, 0.0, PI, 9).unwrap();
        assert!(!half.is_closed());
        assert_eq!(half.points().len(), 9);
        assert!(half.position(1.0).distance(-DVec3::X) < 1e-12);

        let full = Polyline::arc(DVec3::Z, DVec3::X, DVec3::Y, 0.0, TAU, 9).unwrap();
        assert!(full.is_closed());
        // The repeated end point is dropped
        assert_eq!(full.points().len(), 8);
        assert!(full.position(0.0).distance(DVec3::new(1.0, 0.0, 1.0)) < 1e-12);
    }

    #[test]
    fn duplicate_points_are_removed() {
        let line = Polyline::new(
            [DVec3::ZERO, DVec3::ZERO, DVec3::X, DVec3::X, DVec3::Y],
            false,
        )
        .unwrap();
        assert_eq!(line.points().len(), 3);
    }

    #[test]
    fn closed_polyline_returns_to_start() {
        let square = Polyline::new(
            [DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y, DVec3::ZERO],
            true,
        )
        .unwrap();

        assert_eq!(square.points().len(), 4);
        assert_relative_eq!(square.length(), 4.0);
        assert!(square.position(1.0).distance(DVec3::ZERO) < 1e-12);
        assert!(square.position(0.875).distance(DVec3::new(0.0, 0.5, 0.0)) < 1e-12);
    }

    #[test]
    fn tangent_is_blended_at_vertices() {
        let corner = Polyline::new([DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0)], false)
            .unwrap();
        let d = corner.derivative(0.5).normalize();
        let expected = DVec3::new(1.0, 1.0, 0.0).normalize();
        assert!(d.distance(expected) < 1e-12);
    }

    #[test]
    fn collapsed_polyline_is_degenerate() {
        let result = Polyline::new([DVec3::ONE, DVec3::ONE, DVec3::ONE], false);
        assert!(matches!(
            result,
            Err(Error::DegenerateCurve {
                curve: "polyline",
                ..
            })
        ));
    }
}
