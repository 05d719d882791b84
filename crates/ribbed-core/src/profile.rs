//! Cross-section profiles swept along rails

use crate::curve::POINT_EPSILON;
use crate::{Error, Result};
use glam::DVec2;
use std::f64::consts::TAU;

/// An ordered loop (or strip) of 2D offsets
///
/// During a sweep `x` is laid along the rail's normal and `y` along its
/// binormal; the origin sits on the rail.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSectionProfile {
    points: Vec<DVec2>,
    closed: bool,
}

impl CrossSectionProfile {
    /// Create a profile from explicit offsets
    ///
    /// A closed profile whose last point repeats the first drops the repeat.
    pub fn new(mut points: Vec<DVec2>, closed: bool) -> Result<Self> {
        if closed
            && points.len() > 1
            && points[0].distance_squared(points[points.len() - 1]) <= POINT_EPSILON
        {
            points.pop();
        }
        let required = if closed { 3 } else { 2 };
        if points.len() < required {
            return Err(Error::InvalidProfile(format!(
                "{} profile needs at least {} points, got {}",
                if closed { "closed" } else { "open" },
                required,
                points.len()
            )));
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(Error::InvalidProfile("non-finite offset".into()));
        }
        Ok(Self { points, closed })
    }

    /// A closed circle of `segments` evenly spaced points
    pub fn circle(radius: f64, segments: usize) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::InvalidProfile(format!(
                "circle radius must be positive, got {radius}"
            )));
        }
        let points = (0..segments)
            .map(|i| {
                let angle = TAU * i as f64 / segments as f64;
                DVec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();
        Self::new(points, true)
    }

    /// Points on the ellipse `center + cos(a) * x_axis + sin(a) * y_axis` for
    /// `samples` angles from `start` to `end` inclusive
    ///
    /// The profile is closed when the arc returns to its starting point.
    pub fn arc(
        center: DVec2,
        x_axis: DVec2,
        y_axis: DVec2,
        start: f64,
        end: f64,
        samples: usize,
    ) -> Result<Self> {
        let divisor = samples.saturating_sub(1).max(1) as f64;
        let points: Vec<DVec2> = (0..samples)
            .map(|i| {
                let angle = start + (end - start) * i as f64 / divisor;
                center + x_axis * angle.cos() + y_axis * angle.sin()
            })
            .collect();
        let closed = points.len() > 2
            && points[0].distance_squared(points[points.len() - 1]) <= 1e-18;
        Self::new(points, closed)
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Average of the offsets
    pub fn centroid(&self) -> DVec2 {
        self.points.iter().copied().sum::<DVec2>() / self.points.len() as f64
    }

    /// Offsets scaled by `factor` along the unit direction `axis` only
    pub(crate) fn stretched(&self, axis: DVec2, factor: f64) -> Vec<DVec2> {
        self.points
            .iter()
            .map(|&p| p + axis * (p.dot(axis) * (factor - 1.0)))
            .collect()
    }
}
