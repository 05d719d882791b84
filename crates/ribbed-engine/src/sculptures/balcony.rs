//! Two offset semicircles joined by interleaved rib sets bowing in
//! opposite directions

use super::{Sculpture, half_ellipse_rail, rib_count, tube_profile};
use crate::Result;
use crate::error::GeometryContext;
use crate::params::{ParamRegistry, Params};
use crate::scene::SceneBuilder;
use glam::DVec3;
use ribbed_core::color::Color;
use ribbed_core::rib::{Interval, NormalOffset, RibSpacing, RibSurfaceGenerator};
use ribbed_core::sweep::sweep;

const RAIL_SAMPLES: usize = 50;
const RIB_BOW: f64 = 2.0;

pub struct Balcony;

impl Sculpture for Balcony {
    fn name(&self) -> &'static str {
        "balcony"
    }

    fn description(&self) -> &'static str {
        "Offset semicircles joined by two interleaved, oppositely bowed rib sets"
    }

    fn declare(&self, registry: &mut ParamRegistry) -> Result<()> {
        registry.int_slider("num_ribs", 20, 200, 4, 50)?;
        registry.float_slider("rib_radius", 0.05, 2.0, 0.05, 0.1)?;
        registry.float_slider("rail_radius", 0.05, 2.0, 0.05, 0.2)?;
        registry.color("background_color", Color::WHITE)?;
        Ok(())
    }

    fn build(&self, params: &Params, scene: &mut SceneBuilder) -> Result<()> {
        scene.background(params.color("background_color")?);

        let inner = half_ellipse_rail(
            DVec3::ZERO,
            DVec3::new(18.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 18.0),
            RAIL_SAMPLES,
        )
        .stage("inner rail")?;
        let outer = half_ellipse_rail(
            DVec3::new(0.0, -5.0, 0.0),
            DVec3::new(20.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 20.0),
            RAIL_SAMPLES,
        )
        .stage("outer rail")?;
        let rib_profile = tube_profile(params, "rib_radius")?;
        let rail_profile = tube_profile(params, "rail_radius")?;

        // Each set steps one rib spacing along the outer rail, in opposite
        // directions, so the two sets cross
        let per_set = rib_count(params, "num_ribs")? / 2;
        let spacing = 0.96 / (per_set * 2) as f64;
        let sets = [
            (
                Interval::new(0.02, 0.98 - spacing),
                Interval::new(0.02 + spacing, 0.98),
                RIB_BOW,
            ),
            (
                Interval::new(0.98, 0.02 + spacing),
                Interval::new(0.98 - spacing, 0.02),
                -RIB_BOW,
            ),
        ];

        let generator = RibSurfaceGenerator::default();
        for (set, (on_inner, on_outer, bow)) in sets.into_iter().enumerate() {
            let ribs = generator
                .generate(
                    &inner,
                    on_inner,
                    &outer,
                    on_outer,
                    &NormalOffset { magnitude: bow },
                    per_set,
                    &RibSpacing::Uniform,
                    &rib_profile,
                )
                .stage(format!("rib set {set}"))?;
            for rib in ribs {
                scene.instance(rib, Color::WHITE);
            }
        }
        scene.instance(
            sweep(&rail_profile, &inner).stage("inner rail sweep")?,
            Color::WHITE,
        );
        scene.instance(
            sweep(&rail_profile, &outer).stage("outer rail sweep")?,
            Color::WHITE,
        );

        scene.light(DVec3::splat(50.0), Color::WHITE, 1.0);
        scene.light(DVec3::splat(-50.0), Color::new(0.4, 0.1, 1.0), 0.1);
        Ok(())
    }
}
