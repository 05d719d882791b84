//! # Ribbed Core
//!
//! Swept-tube geometry for ribbed sculptures.
//!
//! Rails are parametric curves with continuous orientation frames. Profiles
//! are swept along rails into tube meshes, and families of ribs are swept
//! along Hermite paths that span two rails. A [`Group`](scene::Group)
//! hierarchy places the shared meshes in the world.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ribbed_core::prelude::*;
//!
//! let a = RailCurve::polyline(points_a, false)?;
//! let b = RailCurve::polyline(points_b, false)?;
//! let profile = CrossSectionProfile::circle(0.25, 8)?;
//!
//! let ribs = RibSurfaceGenerator::default().generate(
//!     &a, Interval::FULL,
//!     &b, Interval::FULL,
//!     &NormalOffset { magnitude: -10.0 },
//!     50, &RibSpacing::Uniform, &profile,
//! )?;
//!
//! let mut sculpture = Group::new();
//! sculpture.add_elements(ribs);
//! sculpture.add_element(sweep(&profile, &a)?);
//! let instances = sculpture.flatten(Color::WHITE);
//! ```
//!
//! ## Units and Conventions
//!
//! - **Parameters**: every rail is parameterized over `[0, 1]`; closed rails
//!   wrap, open rails clamp
//! - **Angles**: all rotation functions use **radians**
//! - **Precision**: all geometry uses `f64`
//! - **Profiles**: `x` follows the rail normal, `y` the binormal

pub mod color;
pub mod curve;
pub mod mesh;
pub mod profile;
pub mod rib;
pub mod scene;
pub mod sweep;
pub mod transform;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    // Curves
    pub use crate::curve::{BSplineCurve, BezierCurve, Curve, Frame, Polyline, RailCurve};

    // Surfaces
    pub use crate::mesh::{Aabb, Mesh, Vertex};
    pub use crate::profile::CrossSectionProfile;
    pub use crate::rib::{
        BinormalSwing, Interval, NormalOffset, Perturbation, RibSpacing, RibSurfaceGenerator,
        Straight, hermite_ribbed_surface,
    };
    pub use crate::sweep::{SweepConfig, sweep, sweep_with};

    // Scene graph
    pub use crate::color::Color;
    pub use crate::scene::{Element, Group, Instance};
    pub use crate::transform::{Transform, concatenate};

    // Math (re-export glam)
    pub use glam::{DMat4, DQuat, DVec2, DVec3};

    // Error handling
    pub use crate::{Error, Result};
}
