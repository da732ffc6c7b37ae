//! Error types for the kinematics core.

use thiserror::Error;

/// Errors that can occur while building a chain or solving its poses.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KinematicsError {
    /// An axis label outside `x`, `y`, `z`.
    #[error("unsupported axis: {0:?} (expected one of x, y, z)")]
    UnsupportedAxis(String),

    /// The joint-angle vector does not match the chain's degrees of freedom.
    #[error("arity mismatch: expected {expected} joint angles, got {actual}")]
    ArityMismatch {
        /// Actuated joints in the chain.
        expected: usize,
        /// Angles supplied.
        actual: usize,
    },

    /// A link length is negative or not finite.
    #[error("invalid link length: l{} = {value}", .index + 1)]
    InvalidLinkLength {
        /// Zero-based link index.
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// A joint angle is NaN or infinite.
    #[error("non-finite joint angle: angles[{index}] = {value}")]
    NonFiniteAngle {
        /// Zero-based position in the angle vector.
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// Clearance or base placement cannot produce a rigid transform.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A data-driven chain description is inconsistent.
    #[error("invalid joint spec: {0}")]
    InvalidJointSpec(String),
}

impl KinematicsError {
    /// Creates an unsupported axis error.
    #[must_use]
    pub fn unsupported_axis(label: impl Into<String>) -> Self {
        Self::UnsupportedAxis(label.into())
    }

    /// Creates an arity mismatch error.
    #[must_use]
    pub const fn arity_mismatch(expected: usize, actual: usize) -> Self {
        Self::ArityMismatch { expected, actual }
    }

    /// Creates an invalid link length error.
    #[must_use]
    pub const fn invalid_link_length(index: usize, value: f64) -> Self {
        Self::InvalidLinkLength { index, value }
    }

    /// Creates a non-finite angle error.
    #[must_use]
    pub const fn non_finite_angle(index: usize, value: f64) -> Self {
        Self::NonFiniteAngle { index, value }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates an invalid joint spec error.
    #[must_use]
    pub fn invalid_joint_spec(reason: impl Into<String>) -> Self {
        Self::InvalidJointSpec(reason.into())
    }
}

/// Result type for kinematics operations.
pub type Result<T> = std::result::Result<T, KinematicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_unsupported_axis() {
        let err = KinematicsError::unsupported_axis("w");
        assert!(err.to_string().contains("unsupported axis"));
        assert!(err.to_string().contains("\"w\""));
    }

    #[test]
    fn error_arity_mismatch() {
        let err = KinematicsError::arity_mismatch(4, 3);
        assert!(err.to_string().contains("expected 4"));
        assert!(err.to_string().contains("got 3"));
    }

    #[test]
    fn error_invalid_link_length_is_one_based() {
        let err = KinematicsError::invalid_link_length(2, -1.5);
        assert_eq!(err.to_string(), "invalid link length: l3 = -1.5");
    }

    #[test]
    fn error_non_finite_angle() {
        let err = KinematicsError::non_finite_angle(0, f64::INFINITY);
        assert_eq!(err.to_string(), "non-finite joint angle: angles[0] = inf");
    }

    #[test]
    fn error_invalid_config() {
        let err = KinematicsError::invalid_config("clearance must be finite");
        assert!(err.to_string().contains("invalid configuration"));
    }

    #[test]
    fn error_invalid_joint_spec() {
        let err = KinematicsError::invalid_joint_spec("link index 7 out of range");
        assert!(err.to_string().contains("link index 7"));
    }
}
