//! Rail curves and their orientation frames
//!
//! Every rail is parameterized over `[0, 1]`. A [`RailCurve`] wraps one of the
//! concrete curve shapes and adds orientation: [`RailCurve::evaluate`] returns
//! a [`Frame`] whose normal and binormal are transported along the curve with
//! rotation-minimizing double reflection, so they never flip at inflections
//! or along straight runs where the Frenet normal is undefined.

mod bezier;
mod bspline;
mod polyline;

use crate::{Error, Result};
use glam::{DQuat, DVec2, DVec3};
use std::fmt::Debug;
use std::sync::Arc;

pub use bezier::BezierCurve;
pub use bspline::{BSplineCurve, DEFAULT_DEGREE};
pub use polyline::Polyline;

/// Squared distance below which two points are considered coincident
pub const POINT_EPSILON: f64 = 1e-20;

/// Derivative magnitude below which a curve has no usable tangent
pub const DERIVATIVE_EPSILON: f64 = 1e-12;

/// Number of reference frames transported along each rail
pub const FRAME_SAMPLES: usize = 512;

// ============================================================================
// Frame
// ============================================================================

/// A position with an orthonormal orientation on a curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub position: DVec3,
    pub tangent: DVec3,
    pub normal: DVec3,
    pub binormal: DVec3,
}

impl Frame {
    /// Build a frame from a tangent and a reference direction for the normal
    ///
    /// The reference is projected onto the plane perpendicular to the tangent.
    /// If it is parallel to the tangent an arbitrary perpendicular is used.
    pub fn new(position: DVec3, tangent: DVec3, reference: DVec3) -> Self {
        let tangent = tangent.normalize();
        let mut normal = (reference - tangent * reference.dot(tangent)).normalize_or_zero();
        if normal == DVec3::ZERO {
            normal = tangent.any_orthonormal_vector();
        }
        Self {
            position,
            tangent,
            normal,
            binormal: tangent.cross(normal),
        }
    }

    /// Map a cross-section offset to world space: `x` along the normal, `y`
    /// along the binormal
    pub fn to_world(&self, offset: DVec2) -> DVec3 {
        self.position + self.normal * offset.x + self.binormal * offset.y
    }

    /// Rotate the normal and binormal about the tangent
    pub fn twisted(&self, angle: f64) -> Self {
        let normal = DQuat::from_axis_angle(self.tangent, angle) * self.normal;
        Self::new(self.position, self.tangent, normal)
    }
}

// ============================================================================
// Curve trait
// ============================================================================

/// A parametric curve over `[0, 1]`
///
/// Implement this to plug custom rail shapes into [`RailCurve`].
pub trait Curve: Debug + Send + Sync {
    /// Short name used in error messages
    fn kind(&self) -> &'static str;

    fn position(&self, t: f64) -> DVec3;

    /// Derivative of the position with respect to `t`
    fn derivative(&self, t: f64) -> DVec3;

    fn is_closed(&self) -> bool;

    /// Parameters of the curve's own sample points, if it has any
    ///
    /// Sweeps place one ring at each of these instead of sampling uniformly.
    fn native_samples(&self) -> Option<Vec<f64>> {
        None
    }
}

/// The concrete shape behind a rail
#[derive(Debug, Clone)]
pub enum CurveShape {
    Polyline(Polyline),
    Bezier(BezierCurve),
    BSpline(BSplineCurve),
    Custom(Arc<dyn Curve>),
}

impl CurveShape {
    fn as_curve(&self) -> &dyn Curve {
        match self {
            CurveShape::Polyline(c) => c,
            CurveShape::Bezier(c) => c,
            CurveShape::BSpline(c) => c,
            CurveShape::Custom(c) => c.as_ref(),
        }
    }
}

impl From<Polyline> for CurveShape {
    fn from(curve: Polyline) -> Self {
        CurveShape::Polyline(curve)
    }
}

impl From<BezierCurve> for CurveShape {
    fn from(curve: BezierCurve) -> Self {
        CurveShape::Bezier(curve)
    }
}

impl From<BSplineCurve> for CurveShape {
    fn from(curve: BSplineCurve) -> Self {
        CurveShape::BSpline(curve)
    }
}

// ============================================================================
// RailCurve
// ============================================================================

/// Reference frames at `t = j / FRAME_SAMPLES`, before twist correction
#[derive(Debug, Clone)]
struct FrameTable {
    frames: Vec<Frame>,
    /// Angle distributed linearly along a closed curve so its frames are periodic
    twist: f64,
}

/// A curve with continuous orientation frames
#[derive(Debug, Clone)]
pub struct RailCurve {
    shape: CurveShape,
    table: FrameTable,
}

impl RailCurve {
    /// Wrap a curve shape, precomputing its transported frames
    ///
    /// Fails with [`Error::DegenerateCurve`] if the curve has no usable
    /// tangent anywhere.
    pub fn new(shape: impl Into<CurveShape>) -> Result<Self> {
        let shape = shape.into();
        let table = build_frame_table(shape.as_curve())?;
        tracing::trace!(
            "Built {} rail frames (closed: {}, twist correction: {:.4})",
            shape.as_curve().kind(),
            shape.as_curve().is_closed(),
            table.twist
        );
        Ok(Self { shape, table })
    }

    /// Rail through explicit points
    pub fn polyline(points: impl IntoIterator<Item = DVec3>, closed: bool) -> Result<Self> {
        Self::new(Polyline::new(points, closed)?)
    }

    /// Bezier rail from its control polygon
    pub fn bezier(control_points: Vec<DVec3>) -> Result<Self> {
        Self::new(BezierCurve::new(control_points)?)
    }

    /// Uniform B-spline rail
    pub fn bspline(control_points: Vec<DVec3>, degree: usize, closed: bool) -> Result<Self> {
        Self::new(BSplineCurve::new(control_points, degree, closed)?)
    }

    /// Rail over a user-supplied curve
    pub fn custom(curve: Arc<dyn Curve>) -> Result<Self> {
        Self::new(CurveShape::Custom(curve))
    }

    pub fn shape(&self) -> &CurveShape {
        &self.shape
    }

    pub fn kind(&self) -> &'static str {
        self.shape.as_curve().kind()
    }

    pub fn is_closed(&self) -> bool {
        self.shape.as_curve().is_closed()
    }

    pub fn position(&self, t: f64) -> DVec3 {
        self.shape.as_curve().position(self.wrap(t))
    }

    /// Closed curves wrap `t` modulo 1, open curves clamp it to `[0, 1]`
    fn wrap(&self, t: f64) -> f64 {
        if self.is_closed() {
            t.rem_euclid(1.0)
        } else {
            t.clamp(0.0, 1.0)
        }
    }

    /// Position and orientation at `t`
    ///
    /// Fails with [`Error::DegenerateCurve`] where the derivative vanishes.
    pub fn evaluate(&self, t: f64) -> Result<Frame> {
        let curve = self.shape.as_curve();
        if !t.is_finite() {
            return Err(Error::DegenerateCurve {
                curve: curve.kind(),
                t,
            });
        }
        let t = self.wrap(t);
        let position = curve.position(t);
        let tangent = unit_tangent(curve.derivative(t)).ok_or(Error::DegenerateCurve {
            curve: curve.kind(),
            t,
        })?;

        let index = ((t * FRAME_SAMPLES as f64).floor() as usize).min(FRAME_SAMPLES);
        let frame = transport(&self.table.frames[index], position, tangent);
        if self.table.twist == 0.0 {
            Ok(frame)
        } else {
            Ok(frame.twisted(self.table.twist * t))
        }
    }

    /// `count` frames in parameter order
    ///
    /// Open curves include both endpoints; closed curves use `t = i / count`
    /// so the start is not repeated.
    pub fn sample_frames(&self, count: usize) -> Result<Vec<Frame>> {
        uniform_params(count, self.is_closed())
            .into_iter()
            .map(|t| self.evaluate(t))
            .collect()
    }

    /// Parameters at which a sweep places its rings
    ///
    /// Polylines use their own points; other shapes are sampled uniformly.
    pub fn sweep_params(&self, samples: usize) -> Vec<f64> {
        self.shape
            .as_curve()
            .native_samples()
            .unwrap_or_else(|| uniform_params(samples, self.is_closed()))
    }
}

fn uniform_params(count: usize, closed: bool) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let divisor = if closed { count } else { count - 1 };
            (0..count).map(|i| i as f64 / divisor as f64).collect()
        }
    }
}

fn unit_tangent(derivative: DVec3) -> Option<DVec3> {
    let length = derivative.length();
    (length.is_finite() && length > DERIVATIVE_EPSILON).then(|| derivative / length)
}

/// Carry `frame` to a new position and tangent by double reflection
///
/// The first reflection maps the segment between the two positions onto
/// itself, the second aligns the reflected tangent with the new one. The
/// result has minimal rotation about the tangent.
fn transport(frame: &Frame, position: DVec3, tangent: DVec3) -> Frame {
    let v1 = position - frame.position;
    let c1 = v1.length_squared();
    let (normal, reflected_tangent) = if c1 <= POINT_EPSILON {
        (frame.normal, frame.tangent)
    } else {
        (
            frame.normal - v1 * (2.0 / c1 * v1.dot(frame.normal)),
            frame.tangent - v1 * (2.0 / c1 * v1.dot(frame.tangent)),
        )
    };

    let v2 = tangent - reflected_tangent;
    let c2 = v2.length_squared();
    let normal = if c2 <= POINT_EPSILON {
        normal
    } else {
        normal - v2 * (2.0 / c2 * v2.dot(normal))
    };
    Frame::new(position, tangent, normal)
}

/// Initial normal: the curvature direction if the curve bends at its start,
/// otherwise the world axis least aligned with the tangent
fn seed_normal(tangent: DVec3, next_tangent: DVec3) -> DVec3 {
    let bend = next_tangent - tangent;
    let curvature = bend - tangent * bend.dot(tangent);
    if curvature.length_squared() > 1e-18 {
        return curvature;
    }
    if tangent.dot(DVec3::Y).abs() > 0.9 {
        DVec3::X
    } else {
        DVec3::Y
    }
}

fn build_frame_table(curve: &dyn Curve) -> Result<FrameTable> {
    let n = FRAME_SAMPLES;
    let positions: Vec<DVec3> = (0..=n)
        .map(|j| curve.position(j as f64 / n as f64))
        .collect();
    let raw: Vec<Option<DVec3>> = (0..=n)
        .map(|j| unit_tangent(curve.derivative(j as f64 / n as f64)))
        .collect();

    // Degenerate samples borrow the nearest usable tangent
    let first = raw
        .iter()
        .flatten()
        .copied()
        .next()
        .ok_or(Error::DegenerateCurve {
            curve: curve.kind(),
            t: 0.0,
        })?;
    let mut tangents = Vec::with_capacity(n + 1);
    let mut last = first;
    for tangent in &raw {
        if let Some(tangent) = tangent {
            last = *tangent;
        }
        tangents.push(last);
    }

    let mut frames = Vec::with_capacity(n + 1);
    frames.push(Frame::new(
        positions[0],
        tangents[0],
        seed_normal(tangents[0], tangents[1]),
    ));
    for j in 1..=n {
        let next = transport(&frames[j - 1], positions[j], tangents[j]);
        frames.push(next);
    }

    let twist = if curve.is_closed() {
        let start = &frames[0];
        let end = &frames[n];
        // Signed angle carrying the transported end normal back onto the start
        let sin = start.tangent.dot(end.normal.cross(start.normal));
        let cos = end.normal.dot(start.normal);
        sin.atan2(cos)
    } else {
        0.0
    };

    Ok(FrameTable { frames, twist })
}
