//! Built-in sculptures
//!
//! A sculpture declares its parameters once and then rebuilds its whole
//! scene from a resolved parameter set on every update. Builds are pure:
//! the same parameters always give the same scene.

mod arch;
mod balcony;
mod dodec;
mod fig8;
mod mace;
mod simple;

pub use arch::Arch;
pub use balcony::Balcony;
pub use dodec::Dodec;
pub use fig8::Fig8;
pub use mace::Mace;
pub use simple::Simple;

use crate::error::GeometryContext;
use crate::params::{ParamRegistry, Params};
use crate::scene::SceneBuilder;
use crate::{Error, Result};
use glam::DVec3;
use ribbed_core::curve::{Polyline, RailCurve};
use ribbed_core::profile::CrossSectionProfile;
use std::f64::consts::PI;

/// Segments in the circular cross-section of every rib and rail
pub const PROFILE_SEGMENTS: usize = 8;

/// A parametric sculpture
pub trait Sculpture: Send + Sync {
    /// Name used to select the sculpture
    fn name(&self) -> &'static str;

    /// One-line description for listings
    fn description(&self) -> &'static str;

    /// Declare parameters in display order
    fn declare(&self, registry: &mut ParamRegistry) -> Result<()>;

    /// Build the scene from a fully resolved parameter set
    fn build(&self, params: &Params, scene: &mut SceneBuilder) -> Result<()>;
}

/// Every built-in sculpture
pub fn builtin() -> Vec<Box<dyn Sculpture>> {
    vec![
        Box::new(Simple),
        Box::new(Arch),
        Box::new(Balcony),
        Box::new(Fig8),
        Box::new(Mace),
        Box::new(Dodec),
    ]
}

/// Look up a built-in sculpture by name
pub fn by_name(name: &str) -> Result<Box<dyn Sculpture>> {
    builtin()
        .into_iter()
        .find(|s| s.name() == name)
        .ok_or_else(|| Error::UnknownSculpture(name.to_string()))
}

// ============================================================================
// Shared construction helpers
// ============================================================================

/// An open polyline rail through `samples` points of the half ellipse
/// `center + cos(a) * x_axis + sin(a) * y_axis`, `a` from 0 to pi
pub(crate) fn half_ellipse_rail(
    center: DVec3,
    x_axis: DVec3,
    y_axis: DVec3,
    samples: usize,
) -> ribbed_core::Result<RailCurve> {
    RailCurve::new(Polyline::arc(center, x_axis, y_axis, 0.0, PI, samples)?)
}

/// Circular tube cross-section read from a radius parameter
pub(crate) fn tube_profile(params: &Params, name: &str) -> Result<CrossSectionProfile> {
    let radius = params.float(name)?;
    CrossSectionProfile::circle(radius, PROFILE_SEGMENTS).stage(name)
}

/// Rib count read from an integer parameter
pub(crate) fn rib_count(params: &Params, name: &str) -> Result<usize> {
    let count = params.int(name)?;
    usize::try_from(count).map_err(|_| Error::Geometry {
        stage: name.to_string(),
        source: ribbed_core::Error::InvalidInterval(format!("rib count {count} is negative")),
    })
}
