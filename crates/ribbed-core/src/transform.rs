//! Rigid transforms with uniform scale
//!
//! A [`Transform`] applies a uniform scale, then a rotation, then a
//! translation. Transforms compose with [`concatenate`], which applies the
//! right-hand (child) transform first and the left-hand (parent) second.

use glam::{DMat4, DQuat, DVec3};
use std::ops::Mul;

/// Uniform scale followed by rotation followed by translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub rotation: DQuat,
    pub translation: DVec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        rotation: DQuat::IDENTITY,
        translation: DVec3::ZERO,
    };

    pub fn new(scale: f64, rotation: DQuat, translation: DVec3) -> Self {
        Self {
            scale,
            rotation,
            translation,
        }
    }

    /// Pure rotation of `angle` radians about `axis` (need not be unit length)
    pub fn from_axis_angle(axis: DVec3, angle: f64) -> Self {
        Self::from_rotation(DQuat::from_axis_angle(axis.normalize(), angle))
    }

    pub fn from_rotation(rotation: DQuat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    /// Replace the translation component, keeping scale and rotation
    pub fn with_translation(mut self, translation: DVec3) -> Self {
        self.translation = translation;
        self
    }

    /// Replace the rotation component, keeping scale and translation
    pub fn with_rotation(mut self, rotation: DQuat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.rotation * (point * self.scale) + self.translation
    }

    /// Transform a direction, ignoring translation and scale
    pub fn transform_direction(&self, direction: DVec3) -> DVec3 {
        self.rotation * direction
    }

    pub fn inverse(&self) -> Self {
        let scale = 1.0 / self.scale;
        let rotation = self.rotation.inverse();
        Self {
            scale,
            rotation,
            translation: -(rotation * self.translation) * scale,
        }
    }

    /// Column-major 4x4 matrix for renderers
    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(
            DVec3::splat(self.scale),
            self.rotation,
            self.translation,
        )
    }

    /// Compare the mapped matrices so that `q` and `-q` rotations are equal
    pub fn abs_diff_eq(&self, other: &Transform, max_abs_diff: f64) -> bool {
        self.to_matrix()
            .abs_diff_eq(other.to_matrix(), max_abs_diff)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Compose two transforms so that `child` is applied first and `parent` second
///
/// `concatenate(p, c).transform_point(x) == p.transform_point(c.transform_point(x))`
pub fn concatenate(parent: &Transform, child: &Transform) -> Transform {
    Transform {
        scale: parent.scale * child.scale,
        rotation: parent.rotation * child.rotation,
        translation: parent.translation
            + parent.rotation * (child.translation * parent.scale),
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, child: Transform) -> Transform {
        concatenate(&self, &child)
    }
}
