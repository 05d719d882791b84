//! Parameter-driven regeneration with atomic publishing
//!
//! A [`Pipeline`] owns one sculpture and the last scene it produced. Each
//! update resolves the parameters, rebuilds the scene from scratch and, only
//! if the build succeeds, swaps the new scene into the published slot.
//! Readers holding a [`SceneHandle`] always see a complete generation.

use crate::params::{ParamRegistry, Params};
use crate::scene::{SceneBuilder, SceneOutput};
use crate::sculptures::{self, Sculpture};
use crate::{Error, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;

/// A published generation
#[derive(Debug, Clone)]
pub struct Published {
    /// Starts at 0 (empty scene) and increases by one per successful build
    pub generation: u64,
    pub output: Arc<SceneOutput>,
}

/// Shared read access to the latest published scene
#[derive(Debug, Clone)]
pub struct SceneHandle {
    slot: Arc<RwLock<Published>>,
}

impl SceneHandle {
    pub fn current(&self) -> Published {
        self.slot.read().clone()
    }

    pub fn generation(&self) -> u64 {
        self.slot.read().generation
    }
}

/// What an update did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A new scene was built and published
    Regenerated { generation: u64 },
    /// The resolved parameters matched the last build; nothing was done
    Unchanged,
}

/// Rebuilds a sculpture whenever its parameters change
pub struct Pipeline {
    sculpture: Box<dyn Sculpture>,
    registry: ParamRegistry,
    applied: Option<Params>,
    slot: Arc<RwLock<Published>>,
}

impl Pipeline {
    /// Create a pipeline and collect the sculpture's parameter declarations
    ///
    /// Nothing is built until the first [`Pipeline::update`].
    pub fn new(sculpture: Box<dyn Sculpture>) -> Result<Self> {
        let mut registry = ParamRegistry::new();
        sculpture
            .declare(&mut registry)
            .map_err(|e| in_sculpture(sculpture.name(), e))?;

        Ok(Self {
            sculpture,
            registry,
            applied: None,
            slot: Arc::new(RwLock::new(Published {
                generation: 0,
                output: Arc::new(SceneBuilder::new().finish()),
            })),
        })
    }

    /// Create a pipeline for a built-in sculpture
    pub fn by_name(name: &str) -> Result<Self> {
        Self::new(sculptures::by_name(name)?)
    }

    pub fn sculpture(&self) -> &dyn Sculpture {
        self.sculpture.as_ref()
    }

    pub fn registry(&self) -> &ParamRegistry {
        &self.registry
    }

    /// Parameters of the published scene, if anything has been built
    pub fn params(&self) -> Option<&Params> {
        self.applied.as_ref()
    }

    pub fn handle(&self) -> SceneHandle {
        SceneHandle {
            slot: Arc::clone(&self.slot),
        }
    }

    pub fn current(&self) -> Published {
        self.slot.read().clone()
    }

    /// Build with every parameter at its default
    pub fn update_defaults(&mut self) -> Result<UpdateOutcome> {
        self.update(&Params::new())
    }

    /// Resolve `overrides` against the defaults and rebuild if they changed
    ///
    /// On failure the previously published scene stays in place and the
    /// error names the sculpture.
    pub fn update(&mut self, overrides: &Params) -> Result<UpdateOutcome> {
        let name = self.sculpture.name();
        let result = self.rebuild(overrides);
        if let Err(ref e) = result {
            tracing::warn!(
                "Update of '{}' failed, keeping generation {}: {}",
                name,
                self.slot.read().generation,
                e
            );
        }
        result.map_err(|e| in_sculpture(name, e))
    }

    fn rebuild(&mut self, overrides: &Params) -> Result<UpdateOutcome> {
        let params = self.registry.resolve(overrides)?;
        if self.applied.as_ref() == Some(&params) {
            tracing::debug!("Parameters of '{}' unchanged", self.sculpture.name());
            return Ok(UpdateOutcome::Unchanged);
        }

        let started = Instant::now();
        let mut builder = SceneBuilder::new();
        self.sculpture.build(&params, &mut builder)?;
        let output = Arc::new(builder.finish());
        let instances = output.instances.len();

        let generation = {
            let mut slot = self.slot.write();
            slot.generation += 1;
            slot.output = output;
            slot.generation
        };
        self.applied = Some(params);

        tracing::info!(
            "Built '{}' generation {}: {} instances in {:.2?}",
            self.sculpture.name(),
            generation,
            instances,
            started.elapsed()
        );
        Ok(UpdateOutcome::Regenerated { generation })
    }
}

fn in_sculpture(name: &str, source: Error) -> Error {
    Error::Sculpture {
        name: name.to_string(),
        source: Box::new(source),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::GeometryContext;
    use glam::DVec3;
    use ribbed_core::color::Color;
    use ribbed_core::curve::RailCurve;
    use ribbed_core::profile::CrossSectionProfile;
    use ribbed_core::sweep::sweep;

    /// A straight tube whose length is a parameter
    struct Rod;

    impl Sculpture for Rod {
        fn name(&self) -> &'static str {
            "rod"
        }

        fn description(&self) -> &'static str {
            "A single tube"
        }

        fn declare(&self, registry: &mut ParamRegistry) -> Result<()> {
            registry.float_slider("length", 0.0, 10.0, 0.5, 2.0)?;
            registry.color("background_color", Color::BLACK)
        }

        fn build(&self, params: &Params, scene: &mut SceneBuilder) -> Result<()> {
            let length = params.float("length")?;
            let rail = RailCurve::polyline([DVec3::ZERO, DVec3::Z * length], false).stage("rail")?;
            let profile = CrossSectionProfile::circle(0.1, 6).stage("profile")?;
            scene
                .background(params.color("background_color")?)
                .instance(sweep(&profile, &rail).stage("sweep")?, Color::WHITE);
            Ok(())
        }
    }

    #[test]
    fn starts_empty_at_generation_zero() {
        let pipeline = Pipeline::new(Box::new(Rod)).unwrap();
        let current = pipeline.current();
        assert_eq!(current.generation, 0);
        assert!(current.output.instances.is_empty());
        assert!(pipeline.params().is_none());
    }

    #[test]
    fn unchanged_parameters_skip_the_build() {
        let mut pipeline = Pipeline::new(Box::new(Rod)).unwrap();
        assert_eq!(
            pipeline.update_defaults().unwrap(),
            UpdateOutcome::Regenerated { generation: 1 }
        );
        // Explicitly passing a default resolves to the same set
        let same = Params::new().with("length", 2.0);
        assert_eq!(pipeline.update(&same).unwrap(), UpdateOutcome::Unchanged);
        assert_eq!(pipeline.current().generation, 1);
    }

    #[test]
    fn failed_build_keeps_previous_scene() {
        let mut pipeline = Pipeline::new(Box::new(Rod)).unwrap();
        let handle = pipeline.handle();
        pipeline.update_defaults().unwrap();
        let before = handle.current();

        let err = pipeline
            .update(&Params::new().with("length", 0.0))
            .unwrap_err();
        assert!(matches!(&err, Error::Sculpture { name, .. } if name == "rod"));
        assert!(matches!(
            err.geometry_cause(),
            Some(ribbed_core::Error::DegenerateCurve { .. })
        ));

        let after = handle.current();
        assert_eq!(after.generation, before.generation);
        assert!(Arc::ptr_eq(&after.output, &before.output));
        assert_eq!(pipeline.params(), Some(&pipeline.registry().defaults()));
    }

    #[test]
    fn handles_see_new_generations() {
        let mut pipeline = Pipeline::new(Box::new(Rod)).unwrap();
        let handle = pipeline.handle();
        pipeline.update_defaults().unwrap();
        pipeline
            .update(&Params::new().with("length", 4.0))
            .unwrap();

        assert_eq!(handle.generation(), 2);
        let bounds = handle.current().output.bounds().unwrap();
        assert!((bounds.max.z - 4.0).abs() < 1e-9);
    }
}
