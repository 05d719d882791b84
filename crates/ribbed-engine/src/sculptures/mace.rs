//! Two rails twisting around a half-elliptical spine, laced with ribs that
//! swing along the rail binormals

use super::{Sculpture, rib_count, tube_profile};
use crate::Result;
use crate::error::GeometryContext;
use crate::params::{ParamRegistry, Params};
use crate::scene::SceneBuilder;
use glam::DVec3;
use ribbed_core::color::Color;
use ribbed_core::curve::RailCurve;
use ribbed_core::rib::{BinormalSwing, Interval, RibSpacing, RibSurfaceGenerator};
use ribbed_core::sweep::sweep;
use std::f64::consts::{PI, TAU};

const SEGMENTS: usize = 1000;

pub struct Mace;

/// Shape of the twisted rails
#[derive(Debug, Clone, Copy)]
struct Spine {
    width: f64,
    height: f64,
    base_radius: f64,
    apex_radius: f64,
    twists: f64,
    /// Radians
    twist_offset: f64,
}

impl Spine {
    fn from_params(params: &Params) -> Result<Self> {
        Ok(Self {
            width: params.float("width")?,
            height: params.float("height")?,
            base_radius: params.float("base_radius")?,
            apex_radius: params.float("apex_radius")?,
            twists: params.int("twists")? as f64,
            twist_offset: params.float("twist_offset")?.to_radians(),
        })
    }

    fn center(&self, t: f64) -> DVec3 {
        let angle = t * PI;
        DVec3::new(0.5 * self.width * angle.cos(), self.height * angle.sin(), 0.0)
    }

    /// Inward direction in the spine's plane
    fn inward(&self, t: f64) -> DVec3 {
        let angle = t * PI;
        DVec3::new(-self.width * angle.cos(), -self.height * angle.sin(), 0.0).normalize_or_zero()
    }

    fn radius(&self, t: f64) -> f64 {
        (self.apex_radius - self.base_radius) * (t * PI).sin() + self.base_radius
    }

    /// Point on the rail at phase `phase` around the spine
    fn point(&self, t: f64, phase: f64) -> DVec3 {
        let angle = TAU * t * self.twists + self.twist_offset + phase;
        let direction = self.inward(t) * angle.cos() + DVec3::Z * angle.sin();
        self.center(t) + direction * self.radius(t)
    }

    fn rails(&self) -> ribbed_core::Result<(RailCurve, RailCurve)> {
        let ts = (0..=SEGMENTS).map(|i| i as f64 / SEGMENTS as f64);
        let first = RailCurve::polyline(ts.clone().map(|t| self.point(t, 0.0)), false)?;
        let second = RailCurve::polyline(ts.map(|t| self.point(t, PI)), false)?;
        Ok((first, second))
    }
}

impl Sculpture for Mace {
    fn name(&self) -> &'static str {
        "mace"
    }

    fn description(&self) -> &'static str {
        "Two rails twisting around an arch, laced with swinging ribs"
    }

    fn declare(&self, registry: &mut ParamRegistry) -> Result<()> {
        registry.int_slider("num_ribs", 20, 200, 4, 50)?;
        registry.float_slider("rib_radius", 0.05, 2.0, 0.05, 0.05)?;
        registry.float_slider("rail_radius", 0.05, 2.0, 0.05, 0.08)?;
        registry.float_slider("width", 5.0, 40.0, 1.0, 7.0)?;
        registry.float_slider("height", 5.0, 40.0, 1.0, 10.0)?;
        registry.float_slider("base_radius", 0.5, 10.0, 0.5, 2.0)?;
        registry.float_slider("apex_radius", 0.5, 10.0, 0.5, 2.0)?;
        registry.float_slider("rib_bend", 0.0, 5.0, 0.5, 1.0)?;
        registry.int_slider("twists", 0, 100, 1, 10)?;
        registry.float_slider("twist_offset", 0.0, 360.0, 10.0, 180.0)?;
        registry.color("background_color", Color::WHITE)?;
        Ok(())
    }

    fn build(&self, params: &Params, scene: &mut SceneBuilder) -> Result<()> {
        scene.background(params.color("background_color")?);

        let (first, second) = Spine::from_params(params)?.rails().stage("twisted rails")?;
        let rib_profile = tube_profile(params, "rib_radius")?;
        let rail_profile = tube_profile(params, "rail_radius")?;
        let interval = Interval::new(0.02, 0.98);

        let ribs = RibSurfaceGenerator::default()
            .generate(
                &first,
                interval,
                &second,
                interval,
                &BinormalSwing {
                    magnitude: params.float("rib_bend")?,
                },
                rib_count(params, "num_ribs")?,
                &RibSpacing::Uniform,
                &rib_profile,
            )
            .stage("ribs")?;
        for rib in ribs {
            scene.instance(rib, Color::WHITE);
        }
        scene.instance(
            sweep(&rail_profile, &first).stage("first rail sweep")?,
            Color::WHITE,
        );
        scene.instance(
            sweep(&rail_profile, &second).stage("second rail sweep")?,
            Color::WHITE,
        );

        scene.light(DVec3::splat(50.0), Color::WHITE, 1.0);
        scene.light(DVec3::splat(-50.0), Color::new(0.4, 0.1, 1.0), 0.1);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spine() -> Spine {
        Spine {
            width: 7.0,
            height: 10.0,
            base_radius: 2.0,
            apex_radius: 4.0,
            twists: 10.0,
            twist_offset: PI,
        }
    }

    #[test]
    fn rails_are_opposite_across_the_spine() {
        let spine = spine();
        for t in [0.0, 0.13, 0.5, 0.77, 1.0] {
            let a = spine.point(t, 0.0);
            let b = spine.point(t, PI);
            assert!(((a + b) * 0.5).distance(spine.center(t)) < 1e-9);
            assert_relative_eq!(a.distance(b), 2.0 * spine.radius(t), epsilon = 1e-9);
        }
    }

    #[test]
    fn radius_swells_to_the_apex() {
        let spine = spine();
        assert_relative_eq!(spine.radius(0.0), 2.0);
        assert_relative_eq!(spine.radius(0.5), 4.0);
        assert_relative_eq!(spine.radius(1.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn rails_have_every_segment_point() {
        let (first, second) = spine().rails().unwrap();
        assert!(!first.is_closed());
        assert_eq!(first.sweep_params(0).len(), SEGMENTS + 1);
        assert_eq!(second.sweep_params(0).len(), SEGMENTS + 1);
    }
}
