//! Sweeping cross-section profiles along rails

use crate::curve::{Frame, RailCurve};
use crate::mesh::Mesh;
use crate::profile::CrossSectionProfile;
use crate::{Error, Result};
use glam::DVec2;

/// Rings placed along analytic rails (polylines use their own points)
pub const SWEEP_SAMPLES: usize = 1000;

/// Smallest `sin(angle / 2)` used when widening sharp corners
const MIN_CORNER_SINE: f64 = 0.1;

/// Configuration for sweeping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    /// Ring count for rails without native sample points
    pub samples: usize,
    /// Close open tubes with fan caps
    pub end_caps: bool,
    /// Total rotation of the profile about the rail, in radians
    pub twist: f64,
    /// Widen the profile at polyline corners to keep the tube thickness
    pub corner_compensation: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            samples: SWEEP_SAMPLES,
            end_caps: true,
            twist: 0.0,
            corner_compensation: true,
        }
    }
}

impl SweepConfig {
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_end_caps(mut self, end_caps: bool) -> Self {
        self.end_caps = end_caps;
        self
    }

    pub fn with_twist(mut self, twist: f64) -> Self {
        self.twist = twist;
        self
    }

    pub fn with_corner_compensation(mut self, enabled: bool) -> Self {
        self.corner_compensation = enabled;
        self
    }
}

/// Sweep `profile` along `rail` with the default configuration
pub fn sweep(profile: &CrossSectionProfile, rail: &RailCurve) -> Result<Mesh> {
    sweep_with(profile, rail, &SweepConfig::default())
}

/// Sweep `profile` along `rail`, one ring per rail sample
///
/// The profile's `x` axis follows the rail normal and `y` the binormal. Rails
/// that are closed produce a seamless tube whose last ring joins the first.
pub fn sweep_with(
    profile: &CrossSectionProfile,
    rail: &RailCurve,
    config: &SweepConfig,
) -> Result<Mesh> {
    let params = rail.sweep_params(config.samples);
    if params.len() < 2 {
        return Err(Error::InvalidInterval(format!(
            "sweep needs at least 2 samples, got {}",
            params.len()
        )));
    }

    let closed = rail.is_closed();
    let frames = params
        .iter()
        .map(|&t| {
            let frame = rail.evaluate(t)?;
            Ok(if config.twist == 0.0 {
                frame
            } else {
                frame.twisted(config.twist * t)
            })
        })
        .collect::<Result<Vec<Frame>>>()?;

    let rings: Vec<_> = frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let stretch = if config.corner_compensation {
                corner_stretch(&frames, i, closed)
            } else {
                None
            };
            match stretch {
                Some((axis, factor)) => profile
                    .stretched(axis, factor)
                    .into_iter()
                    .map(|p| frame.to_world(p))
                    .collect(),
                None => profile.points().iter().map(|&p| frame.to_world(p)).collect(),
            }
        })
        .collect();

    let mesh = Mesh::from_rings(rings, closed, profile.is_closed(), config.end_caps);
    tracing::debug!(
        "Swept {} rail: {} rings, {} vertices, {} triangles",
        rail.kind(),
        mesh.ring_count(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Direction (in profile space) and factor to widen the profile at a corner
///
/// The profile is scaled along the corner bisector by `1 / sin(angle / 2)`,
/// where `angle` is the interior angle between the adjacent segments.
fn corner_stretch(frames: &[Frame], i: usize, closed: bool) -> Option<(DVec2, f64)> {
    let n = frames.len();
    let (prev, next) = if closed {
        ((i + n - 1) % n, (i + 1) % n)
    } else if i == 0 || i == n - 1 {
        return None;
    } else {
        (i - 1, i + 1)
    };

    let here = &frames[i];
    let incoming = (here.position - frames[prev].position).normalize_or_zero();
    let outgoing = (frames[next].position - here.position).normalize_or_zero();
    let turn = incoming.dot(outgoing).clamp(-1.0, 1.0).acos();
    // sin of half the interior angle equals cos of half the turn
    let factor = 1.0 / (turn * 0.5).cos().max(MIN_CORNER_SINE);
    if factor - 1.0 < 1e-9 {
        return None;
    }

    let bend = outgoing - incoming;
    let axis = DVec2::new(bend.dot(here.normal), bend.dot(here.binormal)).normalize_or_zero();
    (axis != DVec2::ZERO).then_some((axis, factor))
}
