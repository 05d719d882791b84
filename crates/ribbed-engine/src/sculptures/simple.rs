//! Two orthogonal semicircles joined by four bands of ribs

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
const END_OFFSET: f64 = 0.01;
const RIB_BEND: f64 = -10.0;

pub struct Simple;

impl Sculpture for Simple {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn description(&self) -> &'static str {
        "Two orthogonal semicircles joined by four crossing bands of ribs"
    }

    fn declare(&self, registry: &mut ParamRegistry) -> Result<()> {
        registry.int_slider("num_ribs", 20, 100, 4, 50)?;
        registry.float_slider("rib_radius", 0.05, 2.0, 0.05, 0.25)?;
        registry.float_slider("rail_radius", 0.05, 2.0, 0.05, 0.3)?;
        registry.color("background_color", Color::WHITE)?;
        registry.color("sculpture_color", Color::WHITE)?;
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

        let per_band = rib_count(params, "num_ribs")? / 4;
        let bands = band_intervals(per_band);
        let pairs = [
            (bands[0], bands[2]),
            (bands[1], bands[0].reversed()),
            (bands[2], bands[3].reversed()),
            (bands[3], bands[1]),
        ];

        let generator = RibSurfaceGenerator::default();
        let perturb = NormalOffset {
            magnitude: RIB_BEND,
        };
        for (band, (on_yz, on_xz)) in pairs.into_iter().enumerate() {
            let ribs = generator
                .generate(
                    &yz,
                    on_yz,
                    &xz,
                    on_xz,
                    &perturb,
                    per_band,
                    &RibSpacing::Uniform,
                    &rib_profile,
                )
                .stage(format!("rib band {band}"))?;
            for rib in ribs {
                scene.instance(rib, color);
            }
        }

        scene.instance(sweep(&rail_profile, &yz).stage("yz rail sweep")?, color);
        scene.instance(sweep(&rail_profile, &xz).stage("xz rail sweep")?, color);

        scene.light(DVec3::splat(50.0), Color::WHITE, 1.0);
        Ok(())
    }
}

/// Four equal, evenly separated intervals covering `[0.01, 0.99]`
///
/// Rib spacing is the same within and between bands.
fn band_intervals(per_band: usize) -> [Interval; 4] {
    let gaps = (4 * per_band).saturating_sub(1).max(1) as f64;
    let separation = (1.0 - 2.0 * END_OFFSET) / gaps;
    let width = separation * per_band.saturating_sub(1) as f64;
    std::array::from_fn(|i| {
        let start = END_OFFSET + i as f64 * (width + separation);
        Interval::new(start, start + width)
    })
}
