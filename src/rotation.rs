//! Elementary rotations about the principal axes.

use crate::error::{KinematicsError, Result};
use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 3×3 proper rotation matrix (orthonormal, determinant 1).
pub type RotationMatrix = DMat3;

/// One of the three principal axes a joint can rotate about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// The unit vector along this axis.
    pub const fn unit(self) -> DVec3 {
        match self {
            Self::X => DVec3::X,
            Self::Y => DVec3::Y,
            Self::Z => DVec3::Z,
        }
    }
}

impl FromStr for Axis {
    type Err = KinematicsError;

    /// Parses `x`, `y` or `z` (case-insensitive). Anything else is rejected
    /// rather than defaulted.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "x" | "X" => Ok(Self::X),
            "y" | "Y" => Ok(Self::Y),
            "z" | "Z" => Ok(Self::Z),
            other => Err(KinematicsError::unsupported_axis(other)),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        f.write_str(label)
    }
}

/// Rotation of `theta_degrees` about `axis`.
///
/// The angle is unrestricted; it is converted to radians without wrapping.
/// `rotation(0.0, axis)` is the identity for every axis.
pub fn rotation(theta_degrees: f64, axis: Axis) -> RotationMatrix {
    let (s, c) = theta_degrees.to_radians().sin_cos();

    // glam is column-major: each DVec3 below is a column.
    match axis {
        Axis::X => DMat3::from_cols(
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, c, s),
            DVec3::new(0.0, -s, c),
        ),
        Axis::Y => DMat3::from_cols(
            DVec3::new(c, 0.0, -s),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(s, 0.0, c),
        ),
        Axis::Z => DMat3::from_cols(
            DVec3::new(c, s, 0.0),
            DVec3::new(-s, c, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
        ),
    }
}

/// Like [`rotation`], but with the axis given as a label (`"x"`, `"y"` or `"z"`).
///
/// # Errors
///
/// [`KinematicsError::UnsupportedAxis`] for any other label.
pub fn rotation_about(theta_degrees: f64, axis: &str) -> Result<RotationMatrix> {
    Ok(rotation(theta_degrees, axis.parse()?))
}
