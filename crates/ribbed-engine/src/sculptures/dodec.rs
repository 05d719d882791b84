//! A ribbed pentagonal cap replicated onto the faces of a dodecahedron
//!
//! Five Bezier rails rise from a regular pentagon; ribs join neighbouring
//! rails. The cap is copied onto five tilted satellites around it, and the
//! whole hemisphere is mirrored to close the solid.

use super::{Sculpture, rib_count, tube_profile};
use crate::Result;
use crate::error::GeometryContext;
use crate::params::{ParamRegistry, Params};
use crate::scene::SceneBuilder;
use glam::DVec3;
use ribbed_core::color::Color;
use ribbed_core::curve::RailCurve;
use ribbed_core::rib::{Interval, RibSpacing, RibSurfaceGenerator, Straight};
use ribbed_core::scene::Group;
use ribbed_core::sweep::sweep;
use ribbed_core::transform::{Transform, concatenate};
use std::f64::consts::{PI, TAU};

/// Apothem of a regular pentagon with unit circumradius, `cos(36 deg)`
const APOTHEM_RATIO: f64 = 0.809_017;

/// Dihedral angle of the dodecahedron, supplemented: `pi - 116.57 deg`
const FACE_TILT: f64 = 1.107_15;

/// Interior angle of a regular pentagon
const PENTAGON_INTERIOR: f64 = 108.0;

pub struct Dodec;

/// Five rails from the pentagon corners up to the (optionally scaled and
/// rotated) cap
fn cap_rails(radius: f64, cap_scale: f64, cap_rotation: f64) -> ribbed_core::Result<Vec<RailCurve>> {
    let scaled = |x: f64| radius + x * (radius * cap_scale - radius);
    let step = cap_rotation / 3.0;

    (0..5)
        .map(|i| {
            let mut angle = TAU / 5.0 * f64::from(i);
            let mut points = vec![radius * DVec3::new(angle.cos(), angle.sin(), 0.0)];
            for height in [0.25, 0.75, 1.0] {
                angle += step;
                let r = scaled(height);
                points.push(DVec3::new(r * angle.cos(), r * angle.sin(), radius * height));
            }
            RailCurve::bezier(points)
        })
        .collect()
}

impl Sculpture for Dodec {
    fn name(&self) -> &'static str {
        "dodec"
    }

    fn description(&self) -> &'static str {
        "A ribbed pentagonal cap replicated over a dodecahedron with groups"
    }

    fn declare(&self, registry: &mut ParamRegistry) -> Result<()> {
        registry.int_slider("num_ribs", 3, 20, 1, 4)?;
        registry.float_slider("rib_radius", 0.05, 2.0, 0.05, 0.1)?;
        registry.float_slider("rail_radius", 0.05, 2.0, 0.05, 0.25)?;
        registry.float_slider("radius", 3.0, 15.0, 0.1, 5.0)?;
        registry.float_slider("separation", 0.0, 20.0, 0.1, 13.0)?;
        registry.float_slider("cap_scale", 0.0, 3.0, 0.1, 1.0)?;
        registry.float_slider("cap_rotation", 0.0, 360.0, 1.0, 0.0)?;
        registry.color("background_color", Color::BLACK)?;
        registry.color("sculpture_color", Color::WHITE)?;
        Ok(())
    }

    fn build(&self, params: &Params, scene: &mut SceneBuilder) -> Result<()> {
        scene.background(params.color("background_color")?);

        let radius = params.float("radius")?;
        let rails = cap_rails(
            radius,
            params.float("cap_scale")?,
            params.float("cap_rotation")?.to_radians(),
        )
        .stage("cap rails")?;
        let rib_profile = tube_profile(params, "rib_radius")?;
        let rail_profile = tube_profile(params, "rail_radius")?;
        let count = rib_count(params, "num_ribs")?;

        let generator = RibSurfaceGenerator::default();
        let mut center = Group::new();
        for (i, rail) in rails.iter().enumerate() {
            let next = &rails[(i + 1) % rails.len()];
            let ribs = generator
                .generate(
                    rail,
                    Interval::FULL,
                    next,
                    Interval::FULL,
                    &Straight,
                    count,
                    &RibSpacing::Uniform,
                    &rib_profile,
                )
                .stage(format!("ribs between rails {i} and {}", (i + 1) % rails.len()))?;
            center.add_elements(ribs);
        }
        for (i, rail) in rails.iter().enumerate() {
            center.add_element(sweep(&rail_profile, rail).stage(format!("rail {i} sweep"))?);
        }

        // Tilt a copy of the cap onto the face sharing the edge at -x, then
        // spin that copy around the remaining four edges
        let apothem = radius * APOTHEM_RATIO;
        let to_edge = DVec3::new(-apothem, 0.0, 0.0);
        let spin = Transform::from_axis_angle(DVec3::Z, PENTAGON_INTERIOR.to_radians())
            .with_translation(to_edge);
        let tilt = Transform::from_axis_angle(DVec3::NEG_Y, FACE_TILT).with_translation(to_edge);
        let mut satellite = center.copy();
        satellite.set_transform(concatenate(&tilt, &spin));

        let others: Vec<Group> = (1..5)
            .map(|k| {
                let mut group =
                    Group::with_transform(Transform::from_axis_angle(DVec3::Z, TAU / 5.0 * f64::from(k)));
                group.add_element(satellite.copy());
                group
            })
            .collect();
        center.add_element(satellite);
        center.add_elements(others);

        let mut mirrored = center.copy();
        mirrored.set_transform(
            Transform::from_axis_angle(DVec3::Y, PI).with_translation(DVec3::new(
                0.0,
                0.0,
                -params.float("separation")?,
            )),
        );

        let mut solid = Group::new();
        solid.add_element(center).add_element(mirrored);
        tracing::debug!(
            "Dodecahedron: {} leaves at depth {}",
            solid.leaf_count(),
            solid.depth()
        );
        scene.instantiate(&solid, params.color("sculpture_color")?);

        scene.light(DVec3::splat(50.0), Color::WHITE, 1.0);
        scene.light(
            DVec3::new(-50.0, 50.0, -50.0),
            Color::new(0.4, 0.1, 1.0),
            0.1,
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rails_start_on_the_pentagon() {
        let rails = cap_rails(5.0, 1.0, 0.0).unwrap();
        assert_eq!(rails.len(), 5);
        for (i, rail) in rails.iter().enumerate() {
            let angle = TAU / 5.0 * i as f64;
            let corner = 5.0 * DVec3::new(angle.cos(), angle.sin(), 0.0);
            assert!(rail.position(0.0).distance(corner) < 1e-12);
            // Unscaled caps rise straight up
            assert!(rail.position(1.0).distance(corner + DVec3::Z * 5.0) < 1e-12);
        }
    }

    #[test]
    fn collapsed_cap_meets_at_the_apex() {
        let rails = cap_rails(5.0, 0.0, 0.0).unwrap();
        for rail in &rails {
            assert!(rail.position(1.0).distance(DVec3::new(0.0, 0.0, 5.0)) < 1e-12);
        }
    }
}
