//! Homogeneous transforms and their composition.
//!
//! A [`HomogeneousTransform`] is a 4×4 matrix of the block form `[[R, t], [0 0 0, 1]]`.
//! The wrapper only exposes constructors that preserve that shape, so the bottom row is
//! always exactly `[0, 0, 0, 1]`.

use crate::rotation::RotationMatrix;
use glam::{DMat3, DMat4, DVec3, DVec4};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Mul;

/// A translation expressed in the parent frame's coordinates.
pub type Translation = DVec3;

/// Tolerance used when checking that deserialized data is a rigid transform.
const RIGID_TOLERANCE: f64 = 1e-6;

/// A rigid-body transform placing a child frame inside its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HomogeneousTransform(DMat4);

impl Default for HomogeneousTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl HomogeneousTransform {
    /// The transform that leaves every frame where it is.
    pub const IDENTITY: Self = Self(DMat4::IDENTITY);

    /// Embeds `rotation` and `translation` into block form.
    pub fn from_rotation_translation(rotation: RotationMatrix, translation: Translation) -> Self {
        Self(DMat4::from_cols(
            rotation.x_axis.extend(0.0),
            rotation.y_axis.extend(0.0),
            rotation.z_axis.extend(0.0),
            translation.extend(1.0),
        ))
    }

    /// Chains `child` (expressed in this frame) into this frame's parent.
    ///
    /// Not commutative: `a.then(b)` and `b.then(a)` differ in general.
    #[must_use]
    pub fn then(&self, child: &Self) -> Self {
        Self(self.0 * child.0)
    }

    /// The upper-left rotation block.
    pub fn rotation(&self) -> RotationMatrix {
        DMat3::from_mat4(self.0)
    }

    /// The origin of this frame in parent coordinates.
    pub fn translation(&self) -> Translation {
        self.0.w_axis.truncate()
    }

    /// Row `index` of the 4×4 matrix (row 3 is always `[0, 0, 0, 1]`), or `None`
    /// if `index > 3`.
    pub fn row(&self, index: usize) -> Option<DVec4> {
        (index < 4).then(|| self.0.row(index))
    }

    /// Row-major copy of the matrix, the layout most renderers accept.
    pub fn to_rows(&self) -> [[f64; 4]; 4] {
        self.0.transpose().to_cols_array_2d()
    }

    /// Maps a point given in this frame's local coordinates into the parent frame.
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.0.transform_point3(point)
    }

    /// The underlying glam matrix.
    pub fn matrix(&self) -> DMat4 {
        self.0
    }

    /// Returns `true` if every entry is within `max_abs_diff` of `other`.
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f64) -> bool {
        self.0.abs_diff_eq(other.0, max_abs_diff)
    }

    fn from_rows(rows: [[f64; 4]; 4]) -> Option<Self> {
        if rows[3] != [0.0, 0.0, 0.0, 1.0] {
            return None;
        }
        let m = DMat4::from_cols_array_2d(&rows).transpose();
        let r = DMat3::from_mat4(m);
        let orthonormal = (r.transpose() * r).abs_diff_eq(DMat3::IDENTITY, RIGID_TOLERANCE);
        let proper = (r.determinant() - 1.0).abs() <= RIGID_TOLERANCE;
        (orthonormal && proper).then_some(Self(m))
    }
}

impl From<HomogeneousTransform> for DMat4 {
    fn from(t: HomogeneousTransform) -> Self {
        t.0
    }
}

impl Mul for HomogeneousTransform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.then(&rhs)
    }
}

impl Serialize for HomogeneousTransform {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_rows().serialize(s)
    }
}

impl<'de> Deserialize<'de> for HomogeneousTransform {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let rows = <[[f64; 4]; 4]>::deserialize(d)?;
        Self::from_rows(rows).ok_or_else(|| {
            serde::de::Error::custom(
                "not a rigid transform: bottom row must be [0, 0, 0, 1] and the upper-left block a proper rotation",
            )
        })
    }
}

/// Builds the local frame of a joint from its rotation and its offset in the parent frame.
pub fn local_frame(rotation: RotationMatrix, translation: Translation) -> HomogeneousTransform {
    HomogeneousTransform::from_rotation_translation(rotation, translation)
}

/// Expresses `child` (given relative to `parent`) in `parent`'s own parent frame.
///
/// Equivalent to the matrix product `parent · child`. Order matters.
pub fn compose(parent: &HomogeneousTransform, child: &HomogeneousTransform) -> HomogeneousTransform {
    parent.then(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::{Axis, rotation};
    use approx::assert_relative_eq;

    #[test]
    fn local_frame_block_layout() {
        let t = local_frame(rotation(90.0, Axis::Z), DVec3::new(1.0, 2.0, 3.0));
        let rows = t.to_rows();

        assert_eq!(rows[3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(rows[0][3], 1.0);
        assert_eq!(rows[1][3], 2.0);
        assert_eq!(rows[2][3], 3.0);
        assert_relative_eq!(rows[0][1], -1.0, epsilon = 1e-12);
        assert_relative_eq!(rows[1][0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn accessors_recover_parts() {
        let r = rotation(33.0, Axis::Y);
        let p = DVec3::new(-4.0, 0.5, 7.25);
        let t = local_frame(r, p);

        assert_eq!(t.rotation(), r);
        assert_eq!(t.translation(), p);
        assert_eq!(t.row(3), Some(DVec4::new(0.0, 0.0, 0.0, 1.0)));
        assert_eq!(t.row(0), Some(DVec4::new(r.x_axis.x, r.y_axis.x, r.z_axis.x, p.x)));
        assert_eq!(t.row(4), None);
    }

    #[test]
    fn compose_with_identity_is_noop() {
        let t = local_frame(rotation(12.0, Axis::X), DVec3::new(1.0, -1.0, 2.0));
        assert_eq!(compose(&HomogeneousTransform::IDENTITY, &t), t);
        assert_eq!(compose(&t, &HomogeneousTransform::IDENTITY), t);
    }

    #[test]
    fn compose_places_child_origin_in_grandparent() {
        // Parent: turned 90 degrees about Z, sitting at (1, 0, 0).
        let parent = local_frame(rotation(90.0, Axis::Z), DVec3::new(1.0, 0.0, 0.0));
        // Child: one unit along the parent's X axis.
        let child = local_frame(DMat3::IDENTITY, DVec3::X);

        let world = compose(&parent, &child);
        assert!(world.translation().abs_diff_eq(DVec3::new(1.0, 1.0, 0.0), 1e-12));
    }

    #[test]
    fn compose_is_not_commutative() {
        let a = local_frame(rotation(90.0, Axis::Z), DVec3::new(1.0, 0.0, 0.0));
        let b = local_frame(rotation(45.0, Axis::Y), DVec3::new(0.0, 2.0, 0.0));

        let ab = compose(&a, &b);
        let ba = compose(&b, &a);
        assert!(!ab.abs_diff_eq(&ba, 1e-6));
    }

    #[test]
    fn mul_matches_compose() {
        let a = local_frame(rotation(10.0, Axis::X), DVec3::new(0.0, 1.0, 0.0));
        let b = local_frame(rotation(-20.0, Axis::Z), DVec3::new(3.0, 0.0, 1.0));
        assert_eq!(a * b, compose(&a, &b));
    }

    #[test]
    fn transform_point_applies_rotation_then_translation() {
        let t = local_frame(rotation(90.0, Axis::Z), DVec3::new(0.0, 0.0, 5.0));
        let p = t.transform_point(DVec3::X);
        assert!(p.abs_diff_eq(DVec3::new(0.0, 1.0, 5.0), 1e-12));
    }

    #[test]
    fn serializes_row_major() {
        let t = local_frame(DMat3::IDENTITY, DVec3::new(3.0, 3.0, 0.9));
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(
            json,
            "[[1.0,0.0,0.0,3.0],[0.0,1.0,0.0,3.0],[0.0,0.0,1.0,0.9],[0.0,0.0,0.0,1.0]]"
        );

        let back: HomogeneousTransform = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn deserialize_rejects_bad_bottom_row() {
        let json = "[[1,0,0,0],[0,1,0,0],[0,0,1,0],[0,0,1,1]]";
        assert!(serde_json::from_str::<HomogeneousTransform>(json).is_err());
    }

    #[test]
    fn deserialize_rejects_non_rotation_block() {
        let json = "[[2,0,0,0],[0,1,0,0],[0,0,1,0],[0,0,0,1]]";
        assert!(serde_json::from_str::<HomogeneousTransform>(json).is_err());
    }
}
