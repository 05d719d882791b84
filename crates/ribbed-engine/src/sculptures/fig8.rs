//! A closed B-spline knot ribbed against itself

use super::{Sculpture, rib_count, tube_profile};
use crate::Result;
use crate::error::GeometryContext;
use crate::params::{ParamRegistry, Params};
use crate::scene::SceneBuilder;
use glam::DVec3;
use ribbed_core::color::Color;
use ribbed_core::curve::RailCurve;
use ribbed_core::rib::{Interval, NormalOffset, RibSpacing, RibSurfaceGenerator};
use ribbed_core::sweep::sweep;

/// Control polygon of the closed rail
const CONTROL_POINTS: [[f64; 3]; 12] = [
    [0.0, 10.0, 10.0],
    [10.0, 0.0, 10.0],
    [9.0, -6.0, 0.0],
    [-10.0, 0.0, -10.0],
    [0.0, 10.0, -10.0],
    [6.0, 9.0, 0.0],
    [0.0, -10.0, 10.0],
    [-10.0, 0.0, 10.0],
    [-9.0, 6.0, 0.0],
    [10.0, 0.0, -10.0],
    [0.0, -10.0, -10.0],
    [-6.0, -9.0, 0.0],
];

pub struct Fig8;

impl Fig8 {
    fn rail() -> ribbed_core::Result<RailCurve> {
        let points = CONTROL_POINTS.iter().map(|&p| DVec3::from_array(p)).collect();
        RailCurve::bspline(points, 3, true)
    }
}

impl Sculpture for Fig8 {
    fn name(&self) -> &'static str {
        "fig8"
    }

    fn description(&self) -> &'static str {
        "A closed B-spline loop with ribs joining two phases of itself"
    }

    fn declare(&self, registry: &mut ParamRegistry) -> Result<()> {
        registry.int_slider("num_ribs", 20, 200, 4, 50)?;
        registry.float_slider("rib_radius", 0.05, 2.0, 0.05, 0.1)?;
        registry.float_slider("rail_radius", 0.05, 2.0, 0.05, 0.25)?;
        registry.float_slider("rib_start", -5.0, 5.0, 0.05, 0.0)?;
        registry.float_slider("rib_end", -5.0, 5.0, 0.05, 0.5)?;
        registry.float_slider("rib_bend", -15.0, 15.0, 0.1, 0.0)?;
        registry.color("background_color", Color::WHITE)?;
        registry.color("sculpture_color", Color::new(0.8, 0.8, 0.2))?;
        Ok(())
    }

    fn build(&self, params: &Params, scene: &mut SceneBuilder) -> Result<()> {
        scene.background(params.color("background_color")?);
        let color = params.color("sculpture_color")?;

        let rail = Self::rail().stage("rail")?;
        let rib_profile = tube_profile(params, "rib_radius")?;
        let rail_profile = tube_profile(params, "rail_radius")?;

        // Both rib ends travel once around the loop, out of phase
        let start = params.float("rib_start")?;
        let end = params.float("rib_end")?;
        let perturb = NormalOffset {
            magnitude: -params.float("rib_bend")?,
        };

        let ribs = RibSurfaceGenerator::default()
            .generate(
                &rail,
                Interval::new(start, start + 1.0),
                &rail,
                Interval::new(end, end + 1.0),
                &perturb,
                rib_count(params, "num_ribs")?,
                &RibSpacing::Uniform,
                &rib_profile,
            )
            .stage("ribs")?;
        for rib in ribs {
            scene.instance(rib, color);
        }
        scene.instance(sweep(&rail_profile, &rail).stage("rail sweep")?, color);

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
    fn rail_is_a_closed_loop() {
        let rail = Fig8::rail().unwrap();
        assert!(rail.is_closed());
        assert!(rail.position(0.0).distance(rail.position(1.0)) < 1e-9);
        // Half a turn lands somewhere else on the loop
        assert!(rail.position(0.0).distance(rail.position(0.5)) > 1.0);
    }
}
