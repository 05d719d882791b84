//! Scene output produced by a sculpture build
//!
//! A [`SceneOutput`] is the complete renderable state of one generation:
//! placed mesh instances, point lights and a background color.

use glam::DVec3;
use ribbed_core::color::Color;
use ribbed_core::mesh::{Aabb, Mesh};
use ribbed_core::scene::{Group, Instance};
use ribbed_core::transform::Transform;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Background used when a sculpture does not set one
pub const DEFAULT_BACKGROUND: Color = Color::gray(0.6);

/// A point light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: DVec3,
    pub color: Color,
    pub intensity: f64,
}

impl Light {
    pub fn new(position: DVec3, color: Color, intensity: f64) -> Self {
        Self {
            position,
            color,
            intensity,
        }
    }
}

/// Everything a viewer needs to draw one generation
#[derive(Debug, Clone)]
pub struct SceneOutput {
    pub instances: Vec<Instance>,
    pub lights: Vec<Light>,
    pub background: Color,
}

impl SceneOutput {
    /// Number of distinct meshes referenced by the instances
    pub fn unique_meshes(&self) -> usize {
        self.instances
            .iter()
            .map(|i| Arc::as_ptr(&i.mesh))
            .collect::<HashSet<_>>()
            .len()
    }

    /// World-space bounds of every instance
    pub fn bounds(&self) -> Option<Aabb> {
        self.instances
            .iter()
            .filter_map(|instance| {
                let local = instance.mesh.bounds()?;
                Aabb::from_points(corners(&local).map(|c| instance.transform.transform_point(c)))
            })
            .reduce(|a, b| a.union(&b))
    }

    /// Summarize for logging and JSON output
    pub fn summary(&self, sculpture: &str, generation: u64) -> SceneSummary {
        SceneSummary {
            sculpture: sculpture.to_string(),
            generation,
            instances: self.instances.len(),
            unique_meshes: self.unique_meshes(),
            vertices: self.instances.iter().map(|i| i.mesh.vertex_count()).sum(),
            triangles: self.instances.iter().map(|i| i.mesh.triangle_count()).sum(),
            lights: self.lights.clone(),
            background: self.background,
            bounds: self.bounds().map(|b| [b.min, b.max]),
        }
    }
}

fn corners(aabb: &Aabb) -> [DVec3; 8] {
    let (lo, hi) = (aabb.min, aabb.max);
    [
        DVec3::new(lo.x, lo.y, lo.z),
        DVec3::new(hi.x, lo.y, lo.z),
        DVec3::new(lo.x, hi.y, lo.z),
        DVec3::new(hi.x, hi.y, lo.z),
        DVec3::new(lo.x, lo.y, hi.z),
        DVec3::new(hi.x, lo.y, hi.z),
        DVec3::new(lo.x, hi.y, hi.z),
        DVec3::new(hi.x, hi.y, hi.z),
    ]
}

/// Serializable overview of a scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub sculpture: String,
    pub generation: u64,
    pub instances: usize,
    pub unique_meshes: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub lights: Vec<Light>,
    pub background: Color,
    pub bounds: Option<[DVec3; 2]>,
}

/// Collects instances, lights and the background during a build
#[derive(Debug)]
pub struct SceneBuilder {
    instances: Vec<Instance>,
    lights: Vec<Light>,
    background: Color,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self {
            instances: Vec::new(),
            lights: Vec::new(),
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(&mut self, color: Color) -> &mut Self {
        self.background = color;
        self
    }

    /// Place a mesh at the origin
    pub fn instance(&mut self, mesh: impl Into<Arc<Mesh>>, color: Color) -> &mut Self {
        self.instance_with(mesh, Transform::IDENTITY, color)
    }

    pub fn instance_with(
        &mut self,
        mesh: impl Into<Arc<Mesh>>,
        transform: Transform,
        color: Color,
    ) -> &mut Self {
        self.instances.push(Instance {
            mesh: mesh.into(),
            transform,
            color,
        });
        self
    }

    /// Place every mesh of a group hierarchy, depth-first in child order
    pub fn instantiate(&mut self, group: &Group, color: Color) -> &mut Self {
        self.instances.extend(group.flatten(color));
        self
    }

    pub fn light(&mut self, position: DVec3, color: Color, intensity: f64) -> &mut Self {
        self.lights.push(Light::new(position, color, intensity));
        self
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn finish(self) -> SceneOutput {
        SceneOutput {
            instances: self.instances,
            lights: self.lights,
            background: self.background,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ribbed_core::curve::RailCurve;
    use ribbed_core::profile::CrossSectionProfile;
    use ribbed_core::sweep::sweep;

    fn tube() -> Arc<Mesh> {
        let rail = RailCurve::polyline([DVec3::ZERO, DVec3::new(0.0, 0.0, 4.0)], false).unwrap();
        Arc::new(sweep(&CrossSectionProfile::circle(0.5, 8).unwrap(), &rail).unwrap())
    }

    #[test]
    fn builder_defaults() {
        let scene = SceneBuilder::new().finish();
        assert!(scene.instances.is_empty());
        assert!(scene.lights.is_empty());
        assert_eq!(scene.background, DEFAULT_BACKGROUND);
        assert!(scene.bounds().is_none());
    }

    #[test]
    fn instantiate_appends_in_order() {
        let (a, b) = (tube(), tube());
        let mut group = Group::new();
        group.add_element(Arc::clone(&a)).add_element(Arc::clone(&b));

        let mut builder = SceneBuilder::new();
        builder
            .instance(Arc::clone(&b), Color::BLACK)
            .instantiate(&group, Color::WHITE)
            .light(DVec3::splat(50.0), Color::WHITE, 1.0);
        let scene = builder.finish();

        assert_eq!(scene.instances.len(), 3);
        assert!(Arc::ptr_eq(&scene.instances[0].mesh, &b));
        assert!(Arc::ptr_eq(&scene.instances[1].mesh, &a));
        assert_eq!(scene.instances[0].color, Color::BLACK);
        assert_eq!(scene.instances[2].color, Color::WHITE);
        assert_eq!(scene.unique_meshes(), 2);
    }

    #[test]
    fn bounds_follow_instance_transforms() {
        let mesh = tube();
        let mut builder = SceneBuilder::new();
        builder.instance(Arc::clone(&mesh), Color::WHITE).instance_with(
            mesh,
            Transform::from_translation(DVec3::new(10.0, 0.0, 0.0)),
            Color::WHITE,
        );
        let scene = builder.finish();

        let bounds = scene.bounds().unwrap();
        assert_relative_eq!(bounds.max.x, 10.5, epsilon = 1e-9);
        assert_relative_eq!(bounds.min.x, -0.5, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.z, 4.0, epsilon = 1e-9);

        let summary = scene.summary("test", 3);
        assert_eq!(summary.instances, 2);
        assert_eq!(summary.unique_meshes, 1);
        assert_eq!(summary.generation, 3);
        assert_eq!(summary.vertices, 2 * scene.instances[0].mesh.vertex_count());
    }
}
