//! A single band of ribs between two orthogonal semicircles, crowded toward
//! the crown and bent along the rail normals

use super::{Sculpture, half_ellipse_rail, rib_count, tube_profile};
use crate::Result;
use crate::error::GeometryContext;
use crate::params::{ParamRegistry, Params};
use crate::scene::SceneBuilder;
use glam::DVec3;
use ribbed_core::color::Color;
use ribbed_core::rib::{Interval, NormalOffset, RibSpacing, RibSurfaceGenerator};
use ribbed_core::sweep::sweep;

const RAIL_SAMPLES: usize = 100;

pub struct Arch;

impl Sculpture for Arch {
    fn name(&self) -> &'static str {
        "arch"
    }

    fn description(&self) -> &'static str {
        "Orthogonal semicircles joined by one band of eased, bendable ribs"
    }

    fn declare(&self, registry: &mut ParamRegistry) -> Result<()> {
        registry.int_slider("num_ribs", 20, 100, 4, 50)?;
        registry.float_slider("rib_radius", 0.05, 2.0, 0.05, 0.25)?;
        registry.float_slider("rail_radius", 0.05, 2.0, 0.05, 0.3)?;
        registry.color("background_color", Color::new(0.7, 0.85, 1.0))?;
        registry.color("sculpture_color", Color::WHITE)?;
        registry.float_slider("distribution", 0.0, 1.0, 0.1, 0.7)?;
        registry.float_slider("rib_bend", -15.0, 15.0, 0.1, 0.0)?;
        Ok(())
    }

    fn build(&self, params: &Params, scene: &mut SceneBuilder) -> Result<()> {
        scene.background(params.color("background_color")?);
        let color = params.color("sculpture_color")?;

        let yz = half_ellipse_rail(
            DVec3::ZERO,
            DVec3::new(0.0, 20.0, 0.0),
            DVec3::new(0.0, 0.0, 20.0),
            RAIL_SAMPLES,
        )
        .stage("yz rail")?;
        let xz = half_ellipse_rail(
            DVec3::ZERO,
            DVec3::new(20.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, -20.0),
            RAIL_SAMPLES,
        )
        .stage("xz rail")?;
        let rib_profile = tube_profile(params, "rib_radius")?;
        let rail_profile = tube_profile(params, "rail_radius")?;

        let count = rib_count(params, "num_ribs")?;
        let offset = 0.25 / (count + 2) as f64;
        let interval = Interval::new(offset, 1.0 - offset);
        let spacing = RibSpacing::Eased {
            strength: params.float("distribution")?,
        };
        let perturb = NormalOffset {
            magnitude: -params.float("rib_bend")?,
        };

        let ribs = RibSurfaceGenerator::default()
            .generate(
                &yz,
                interval,
                &xz,
                interval,
                &perturb,
                count,
                &spacing,
                &rib_profile,
            )
            .stage("ribs")?;
        for rib in ribs {
            scene.instance(rib, color);
        }
        scene.instance(sweep(&rail_profile, &yz).stage("yz rail sweep")?, color);
        scene.instance(sweep(&rail_profile, &xz).stage("xz rail sweep")?, color);

        scene.light(DVec3::splat(50.0), Color::WHITE, 1.0);
        scene.light(DVec3::splat(-50.0), Color::new(0.4, 0.4, 0.2), 0.1);
        Ok(())
    }
}
