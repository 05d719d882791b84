//! Transform hierarchy placing shared meshes into the world
//!
//! A [`Group`] owns its nested groups and shares its meshes. Copying a group
//! duplicates the transform tree but not the geometry, which is how symmetric
//! replicas are made cheaply. Because nested groups are owned values, the
//! hierarchy is always a tree.

use crate::color::Color;
use crate::mesh::Mesh;
use crate::transform::{Transform, concatenate};
use crate::{Error, Result};
use std::sync::Arc;

/// A child of a group
#[derive(Debug, Clone)]
pub enum Element {
    Group(Group),
    Geometry(Arc<Mesh>),
}

impl From<Group> for Element {
    fn from(group: Group) -> Self {
        Element::Group(group)
    }
}

impl From<Arc<Mesh>> for Element {
    fn from(mesh: Arc<Mesh>) -> Self {
        Element::Geometry(mesh)
    }
}

impl From<Mesh> for Element {
    fn from(mesh: Mesh) -> Self {
        Element::Geometry(Arc::new(mesh))
    }
}

/// One placed mesh in the flattened scene
#[derive(Debug, Clone)]
pub struct Instance {
    pub mesh: Arc<Mesh>,
    pub transform: Transform,
    pub color: Color,
}

/// A node with a local transform and ordered children
#[derive(Debug, Clone, Default)]
pub struct Group {
    transform: Transform,
    children: Vec<Element>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transform(transform: Transform) -> Self {
        Self {
            transform,
            children: Vec::new(),
        }
    }

    /// Append a nested group or a mesh
    pub fn add_element(&mut self, element: impl Into<Element>) -> &mut Self {
        self.children.push(element.into());
        self
    }

    /// Append several elements, keeping their order
    pub fn add_elements<E: Into<Element>>(
        &mut self,
        elements: impl IntoIterator<Item = E>,
    ) -> &mut Self {
        self.children.extend(elements.into_iter().map(Into::into));
        self
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Structural copy: nested groups and transforms are duplicated, meshes
    /// are shared with the original
    pub fn copy(&self) -> Group {
        self.clone()
    }

    /// Visit every mesh depth-first in child order with its world transform
    ///
    /// The world transform of this group is `concatenate(parent, local)`.
    pub fn instantiate<F>(&self, callback: &mut F, parent: &Transform)
    where
        F: FnMut(&Arc<Mesh>, &Transform),
    {
        let world = concatenate(parent, &self.transform);
        for child in &self.children {
            match child {
                Element::Group(group) => group.instantiate(callback, &world),
                Element::Geometry(mesh) => callback(mesh, &world),
            }
        }
    }

    /// Flatten into instances of a single color
    pub fn flatten(&self, color: Color) -> Vec<Instance> {
        let mut instances = Vec::with_capacity(self.leaf_count());
        self.instantiate(
            &mut |mesh, transform| {
                instances.push(Instance {
                    mesh: Arc::clone(mesh),
                    transform: *transform,
                    color,
                });
            },
            &Transform::IDENTITY,
        );
        instances
    }

    /// Number of meshes in the whole subtree
    pub fn leaf_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Element::Group(group) => group.leaf_count(),
                Element::Geometry(_) => 1,
            })
            .sum()
    }

    /// Levels of nesting, 1 for a group without nested groups
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .filter_map(|child| match child {
                Element::Group(group) => Some(group.depth()),
                Element::Geometry(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// The nested group reached by following child indices
    pub fn group_at(&self, path: &[usize]) -> Result<&Group> {
        let mut group = self;
        for (depth, &index) in path.iter().enumerate() {
            group = match group.children.get(index) {
                Some(Element::Group(child)) => child,
                other => return Err(bad_path(path, depth, other.is_some())),
            };
        }
        Ok(group)
    }

    /// Mutable access to the nested group reached by following child indices
    pub fn group_at_mut(&mut self, path: &[usize]) -> Result<&mut Group> {
        let mut group = self;
        for (depth, &index) in path.iter().enumerate() {
            group = match group.children.get_mut(index) {
                Some(Element::Group(child)) => child,
                other => return Err(bad_path(path, depth, other.is_some())),
            };
        }
        Ok(group)
    }
}

fn bad_path(path: &[usize], depth: usize, is_mesh: bool) -> Error {
    let what = if is_mesh { "a mesh" } else { "missing" };
    Error::InvalidGroupStructure(format!(
        "path {:?}: child {} at depth {} is {}",
        path, path[depth], depth, what
    ))
}
