//! Ribbed surfaces: families of swept ribs spanning two rails
//!
//! Rib `i` of `count` connects the frame of rail A at
//! `interval_a.lerp(u_i)` with the frame of rail B at `interval_b.lerp(u_i)`,
//! where `u_i` is `i / (count - 1)` passed through a [`RibSpacing`]. The
//! rib's path is a cubic Hermite blend whose end tangents come from the two
//! handle points returned by a [`Perturbation`], and the cross-section is
//! swept along it.

use crate::curve::{Frame, RailCurve};
use crate::mesh::Mesh;
use crate::profile::CrossSectionProfile;
use crate::sweep::{SweepConfig, sweep_with};
use crate::{Error, Result};
use glam::DVec3;
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

/// Points sampled along each rib path
pub const RIB_PATH_SAMPLES: usize = 50;

// ============================================================================
// Intervals and spacing
// ============================================================================

/// A parameter sub-range of a rail, possibly reversed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    /// The whole rail
    pub const FULL: Interval = Interval::new(0.0, 1.0);

    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn lerp(&self, u: f64) -> f64 {
        self.start + (self.end - self.start) * u
    }

    /// The same range traversed the other way
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

impl From<(f64, f64)> for Interval {
    fn from((start, end): (f64, f64)) -> Self {
        Self::new(start, end)
    }
}

/// How rib positions are distributed over `[0, 1]`
#[derive(Clone, Default)]
pub enum RibSpacing {
    /// `u_i = i / (count - 1)`
    #[default]
    Uniform,
    /// Blend of uniform spacing with a cubic that crowds ribs toward the
    /// middle of the intervals; `strength` 0 is uniform, 1 the full cubic
    Eased { strength: f64 },
    /// Arbitrary remapping; results outside `[0, 1]` are rejected
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl RibSpacing {
    pub fn custom(remap: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        RibSpacing::Custom(Arc::new(remap))
    }

    pub fn remap(&self, s: f64) -> f64 {
        match self {
            RibSpacing::Uniform => s,
            RibSpacing::Eased { strength } => {
                strength * (4.0 * (s - 0.5).powi(3) + 0.5) + (1.0 - strength) * s
            }
            RibSpacing::Custom(remap) => remap(s),
        }
    }
}

impl fmt::Debug for RibSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RibSpacing::Uniform => write!(f, "Uniform"),
            RibSpacing::Eased { strength } => {
                f.debug_struct("Eased").field("strength", strength).finish()
            }
            RibSpacing::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

// ============================================================================
// Perturbations
// ============================================================================

/// Chooses the two Hermite handle points of a rib
///
/// `start` and `end` are the rail frames the rib connects (their positions
/// are the rib's endpoints) and `u` is the rib's normalized position in its
/// set. The returned handles pull the rib's path away from a straight line:
/// the path leaves `start` heading toward the first handle and arrives at
/// `end` coming from the second.
pub trait Perturbation: Send + Sync {
    fn handles(&self, start: &Frame, end: &Frame, u: f64) -> (DVec3, DVec3);
}

impl<F> Perturbation for F
where
    F: Fn(&Frame, &Frame, f64) -> (DVec3, DVec3) + Send + Sync,
{
    fn handles(&self, start: &Frame, end: &Frame, u: f64) -> (DVec3, DVec3) {
        self(start, end, u)
    }
}

/// Handles on the endpoints, giving straight ribs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Straight;

impl Perturbation for Straight {
    fn handles(&self, start: &Frame, end: &Frame, _u: f64) -> (DVec3, DVec3) {
        (start.position, end.position)
    }
}

/// Handles offset along each rail's normal by a fixed amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalOffset {
    pub magnitude: f64,
}

impl Perturbation for NormalOffset {
    fn handles(&self, start: &Frame, end: &Frame, _u: f64) -> (DVec3, DVec3) {
        (
            start.position + start.normal * self.magnitude,
            end.position + end.normal * self.magnitude,
        )
    }
}

/// Handles along each rail's binormal, swinging from `-magnitude` at the
/// first rib to `+magnitude` at the last
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinormalSwing {
    pub magnitude: f64,
}

impl Perturbation for BinormalSwing {
    fn handles(&self, start: &Frame, end: &Frame, u: f64) -> (DVec3, DVec3) {
        let offset = (2.0 * u - 1.0) * self.magnitude;
        (
            start.position + start.binormal * offset,
            end.position + end.binormal * offset,
        )
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Sample a cubic Hermite curve from `p0` to `p1`
///
/// End tangents are `3 * (h0 - p0)` and `3 * (p1 - h1)`, which makes the curve
/// identical to the cubic Bezier with control polygon `[p0, h0, h1, p1]`.
pub fn hermite_path(p0: DVec3, h0: DVec3, h1: DVec3, p1: DVec3, samples: usize) -> Vec<DVec3> {
    let m0 = (h0 - p0) * 3.0;
    let m1 = (p1 - h1) * 3.0;
    let divisor = samples.saturating_sub(1).max(1) as f64;
    (0..samples)
        .map(|k| {
            let s = k as f64 / divisor;
            let s2 = s * s;
            let s3 = s2 * s;
            p0 * (2.0 * s3 - 3.0 * s2 + 1.0)
                + m0 * (s3 - 2.0 * s2 + s)
                + p1 * (-2.0 * s3 + 3.0 * s2)
                + m1 * (s3 - s2)
        })
        .collect()
}

/// Builds ordered sets of rib meshes between two rails
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibSurfaceGenerator {
    /// Points per rib path
    pub path_samples: usize,
    /// Sweep options applied to every rib
    pub sweep: SweepConfig,
}

impl Default for RibSurfaceGenerator {
    fn default() -> Self {
        Self {
            path_samples: RIB_PATH_SAMPLES,
            sweep: SweepConfig::default(),
        }
    }
}

impl RibSurfaceGenerator {
    pub fn with_path_samples(mut self, samples: usize) -> Self {
        self.path_samples = samples;
        self
    }

    pub fn with_sweep(mut self, sweep: SweepConfig) -> Self {
        self.sweep = sweep;
        self
    }

    /// Generate `count` ribs, returned in rib order
    ///
    /// Ribs are built in parallel. If any fail, the error of the lowest
    /// failing index is returned wrapped in [`Error::Rib`].
    pub fn generate(
        &self,
        rail_a: &RailCurve,
        interval_a: Interval,
        rail_b: &RailCurve,
        interval_b: Interval,
        perturb: &dyn Perturbation,
        count: usize,
        spacing: &RibSpacing,
        profile: &CrossSectionProfile,
    ) -> Result<Vec<Mesh>> {
        for interval in [interval_a, interval_b] {
            if !(interval.start.is_finite() && interval.end.is_finite()) {
                return Err(Error::InvalidInterval(format!(
                    "interval ({}, {}) is not finite",
                    interval.start, interval.end
                )));
            }
        }

        let results: Vec<Result<Mesh>> = (0..count)
            .into_par_iter()
            .map(|i| {
                self.rib(
                    rail_a, interval_a, rail_b, interval_b, perturb, i, count, spacing, profile,
                )
                .map_err(|e| e.in_rib(i))
            })
            .collect();
        let ribs = results.into_iter().collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "Generated {} ribs between {} and {} rails",
            ribs.len(),
            rail_a.kind(),
            rail_b.kind()
        );
        Ok(ribs)
    }

    fn rib(
        &self,
        rail_a: &RailCurve,
        interval_a: Interval,
        rail_b: &RailCurve,
        interval_b: Interval,
        perturb: &dyn Perturbation,
        index: usize,
        count: usize,
        spacing: &RibSpacing,
        profile: &CrossSectionProfile,
    ) -> Result<Mesh> {
        let s = if count > 1 {
            index as f64 / (count - 1) as f64
        } else {
            0.0
        };
        let u = spacing.remap(s);
        if !(0.0..=1.0).contains(&u) {
            return Err(Error::InvalidInterval(format!(
                "remapped rib position {u} is outside [0, 1]"
            )));
        }

        let start = rail_a.evaluate(interval_a.lerp(u))?;
        let end = rail_b.evaluate(interval_b.lerp(u))?;
        let (h0, h1) = perturb.handles(&start, &end, u);
        let path = hermite_path(start.position, h0, h1, end.position, self.path_samples);
        let rail = RailCurve::polyline(path, false)?;
        let mesh = sweep_with(profile, &rail, &self.sweep)?;

        tracing::trace!("Rib {} at u = {:.4}: {} rings", index, u, mesh.ring_count());
        Ok(mesh)
    }
}

/// Generate a rib set with the default generator settings
pub fn hermite_ribbed_surface(
    rail_a: &RailCurve,
    interval_a: Interval,
    rail_b: &RailCurve,
    interval_b: Interval,
    perturb: &dyn Perturbation,
    count: usize,
    spacing: &RibSpacing,
    profile: &CrossSectionProfile,
) -> Result<Vec<Mesh>> {
    RibSurfaceGenerator::default().generate(
        rail_a, interval_a, rail_b, interval_b, perturb, count, spacing, profile,
    )
}
