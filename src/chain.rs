//! Static geometry of the serial arm.
//!
//! A [`KinematicChain`] is an ordered list of [`JointSpec`] records plus the
//! [`ChainConfig`] they are evaluated against. The chain is built once and only
//! read afterwards; nothing in it changes between solves.

use crate::error::{KinematicsError, Result};
use crate::frame::{HomogeneousTransform, Translation, local_frame};
use crate::rotation::{Axis, rotation};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Number of links the arm geometry is parametrized by (`l1..l4`).
pub const LINK_COUNT: usize = 4;

/// Spacing added between adjoining link frames so the joint markers do not overlap.
pub const DEFAULT_CLEARANCE: f64 = 0.4;

/// Link lengths used by the reference scenario.
pub const DEFAULT_LINK_LENGTHS: [f64; LINK_COUNT] = [1.8, 6.0, 4.0, 4.0];

/// Where the chain's root sits in the world, before the half-height lift of the base link.
///
/// This is scene placement rather than a property of the arm.
pub const DEFAULT_BASE_PLACEMENT: DVec3 = DVec3::new(3.0, 3.0, 0.0);

/// Numeric parameters the joint offsets are evaluated against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Link lengths `l1..l4`. Must be finite and non-negative.
    pub link_lengths: [f64; LINK_COUNT],
    /// Clearance radius between adjoining links.
    pub clearance: f64,
    /// World placement of the root joint. The root frame sits at
    /// `base_placement + (0, 0, l1 / 2)`.
    pub base_placement: DVec3,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            link_lengths: DEFAULT_LINK_LENGTHS,
            clearance: DEFAULT_CLEARANCE,
            base_placement: DEFAULT_BASE_PLACEMENT,
        }
    }
}

impl ChainConfig {
    /// Default clearance and base placement with the given link lengths.
    pub fn with_link_lengths(link_lengths: [f64; LINK_COUNT]) -> Self {
        Self {
            link_lengths,
            ..Default::default()
        }
    }

    /// Rejects negative or non-finite link lengths, a negative or non-finite
    /// clearance, and a non-finite base placement.
    ///
    /// Negative lengths still produce well-defined matrices, but they describe
    /// no physical arm, so they are refused here.
    pub fn validate(&self) -> Result<()> {
        for (index, &value) in self.link_lengths.iter().enumerate() {
            if !(value.is_finite() && value >= 0.0) {
                warn!(index, value, "rejecting link length");
                return Err(KinematicsError::invalid_link_length(index, value));
            }
        }
        if !(self.clearance.is_finite() && self.clearance >= 0.0) {
            warn!(clearance = self.clearance, "rejecting clearance");
            return Err(KinematicsError::invalid_config(format!(
                "clearance must be finite and non-negative, got {}",
                self.clearance
            )));
        }
        if !self.base_placement.is_finite() {
            warn!(base_placement = %self.base_placement, "rejecting base placement");
            return Err(KinematicsError::invalid_config(format!(
                "base placement must be finite, got {}",
                self.base_placement
            )));
        }
        Ok(())
    }
}

/// How a joint's origin is offset from its parent frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Offset {
    /// The root joint: `base_placement + Z · (l1 / 2)`.
    Root,
    /// `along · (link_scale · l[link] + clearances · clearance)`.
    Link {
        along: Axis,
        link: usize,
        link_scale: f64,
        clearances: f64,
    },
}

impl Offset {
    /// Evaluates the offset against `config`.
    ///
    /// # Errors
    ///
    /// [`KinematicsError::InvalidJointSpec`] if a link offset names a link index
    /// outside `0..4`.
    pub fn evaluate(&self, config: &ChainConfig) -> Result<Translation> {
        match *self {
            Self::Root => Ok(config.base_placement + DVec3::Z * (config.link_lengths[0] / 2.0)),
            Self::Link {
                along,
                link,
                link_scale,
                clearances,
            } => {
                let length = config.link_lengths.get(link).copied().ok_or_else(|| {
                    KinematicsError::invalid_joint_spec(format!(
                        "link index {link} out of range, expected < {LINK_COUNT}"
                    ))
                })?;
                Ok(along.unit() * (link_scale * length + clearances * config.clearance))
            }
        }
    }

    fn is_finite(&self) -> bool {
        match *self {
            Self::Root => true,
            Self::Link {
                link_scale,
                clearances,
                ..
            } => link_scale.is_finite() && clearances.is_finite(),
        }
    }
}

/// Where a joint's angle comes from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drive {
    /// Reads `angles[index]` (degrees).
    Actuated(usize),
    /// A constant angle in degrees, independent of the input vector.
    Fixed(f64),
}

/// A single joint of the chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    /// Human-readable name, used in logs and render hand-off.
    pub name: String,
    /// The principal axis the joint rotates about, in its own frame.
    pub axis: Axis,
    /// Offset of the joint's origin in the parent frame.
    pub offset: Offset,
    /// Source of the joint angle.
    pub drive: Drive,
}

impl JointSpec {
    pub fn actuated(name: impl Into<String>, axis: Axis, offset: Offset, index: usize) -> Self {
        Self {
            name: name.into(),
            axis,
            offset,
            drive: Drive::Actuated(index),
        }
    }

    pub fn fixed(name: impl Into<String>, axis: Axis, offset: Offset, degrees: f64) -> Self {
        Self {
            name: name.into(),
            axis,
            offset,
            drive: Drive::Fixed(degrees),
        }
    }

    /// The joint's angle for the given input vector, in degrees.
    ///
    /// # Errors
    ///
    /// - [`KinematicsError::ArityMismatch`] if `angles` has no entry for this joint.
    /// - [`KinematicsError::NonFiniteAngle`] if the entry is NaN or infinite.
    pub fn angle(&self, angles: &[f64]) -> Result<f64> {
        match self.drive {
            Drive::Actuated(index) => {
                let value = *angles
                    .get(index)
                    .ok_or_else(|| KinematicsError::arity_mismatch(index + 1, angles.len()))?;
                if !value.is_finite() {
                    return Err(KinematicsError::non_finite_angle(index, value));
                }
                Ok(value)
            }
            Drive::Fixed(degrees) => Ok(degrees),
        }
    }

    /// The joint's transform relative to its parent frame.
    ///
    /// # Errors
    ///
    /// Whatever [`JointSpec::angle`] or [`Offset::evaluate`] reject.
    pub fn local_transform(
        &self,
        angles: &[f64],
        config: &ChainConfig,
    ) -> Result<HomogeneousTransform> {
        Ok(local_frame(
            rotation(self.angle(angles)?, self.axis),
            self.offset.evaluate(config)?,
        ))
    }
}

/// The ordered joints of the arm and the geometry they are evaluated against.
///
/// Only [`KinematicChain::new`] constructs one, so every chain has been validated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KinematicChain {
    joints: Vec<JointSpec>,
    config: ChainConfig,
}

impl KinematicChain {
    /// Builds a chain from arbitrary joint records.
    ///
    /// # Errors
    ///
    /// - [`KinematicsError::InvalidLinkLength`] if `config` has a bad link length.
    /// - [`KinematicsError::InvalidConfig`] if `config` has a bad clearance or base
    ///   placement.
    /// - [`KinematicsError::InvalidJointSpec`] if the chain is empty, if an offset
    ///   names a link index outside `0..4` or has a non-finite factor, if a fixed
    ///   angle is not finite, or if actuated joints do not read `angles[0]`,
    ///   `angles[1]`, … in order.
    pub fn new(joints: Vec<JointSpec>, config: ChainConfig) -> Result<Self> {
        config.validate()?;

        if joints.is_empty() {
            return Err(KinematicsError::invalid_joint_spec("chain has no joints"));
        }

        let mut next_actuated = 0;
        for joint in &joints {
            if let Offset::Link { link, .. } = joint.offset
                && link >= LINK_COUNT
            {
                return Err(KinematicsError::invalid_joint_spec(format!(
                    "joint {:?} offsets along link index {link}, expected < {LINK_COUNT}",
                    joint.name
                )));
            }
            if !joint.offset.is_finite() {
                return Err(KinematicsError::invalid_joint_spec(format!(
                    "joint {:?} has a non-finite offset factor",
                    joint.name
                )));
            }
            if let Drive::Fixed(degrees) = joint.drive
                && !degrees.is_finite()
            {
                return Err(KinematicsError::invalid_joint_spec(format!(
                    "joint {:?} has a non-finite fixed angle {degrees}",
                    joint.name
                )));
            }
            if let Drive::Actuated(index) = joint.drive {
                if index != next_actuated {
                    return Err(KinematicsError::invalid_joint_spec(format!(
                        "joint {:?} reads angle {index}, expected {next_actuated}",
                        joint.name
                    )));
                }
                next_actuated += 1;
            }
        }

        let chain = Self { joints, config };
        debug!(
            joints = chain.joints.len(),
            dof = chain.dof(),
            "built kinematic chain"
        );
        Ok(chain)
    }

    /// The fixed four-joint arm: a yaw base followed by three pitch joints and a
    /// rigid end-effector offset.
    ///
    /// | joint        | axis | offset (parent frame)         | angle       |
    /// |--------------|------|-------------------------------|-------------|
    /// | base         | Z    | placement + (0, 0, l1/2)      | `angles[0]` |
    /// | shoulder     | Y    | (0, 0, l1/2 + cr)             | `angles[1]` |
    /// | elbow        | Y    | (l2 + 2·cr, 0, 0)             | `angles[2]` |
    /// | wrist        | Y    | (l3 + 2·cr, 0, 0)             | `angles[3]` |
    /// | end_effector | Y    | (l4 + cr, 0, 0)               | fixed 0°    |
    pub fn four_joint_arm(config: ChainConfig) -> Result<Self> {
        let link = |along: Axis, link: usize, link_scale: f64, clearances: f64| Offset::Link {
            along,
            link,
            link_scale,
            clearances,
        };

        let joints = vec![
            JointSpec::actuated("base", Axis::Z, Offset::Root, 0),
            JointSpec::actuated("shoulder", Axis::Y, link(Axis::Z, 0, 0.5, 1.0), 1),
            JointSpec::actuated("elbow", Axis::Y, link(Axis::X, 1, 1.0, 2.0), 2),
            JointSpec::actuated("wrist", Axis::Y, link(Axis::X, 2, 1.0, 2.0), 3),
            JointSpec::fixed("end_effector", Axis::Y, link(Axis::X, 3, 1.0, 1.0), 0.0),
        ];

        Self::new(joints, config)
    }

    /// Number of actuated joints, i.e. the expected length of the angle vector.
    pub fn dof(&self) -> usize {
        self.joints
            .iter()
            .filter(|j| matches!(j.drive, Drive::Actuated(_)))
            .count()
    }

    pub fn joints(&self) -> &[JointSpec] {
        &self.joints
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Joint names in chain order.
    pub fn joint_names(&self) -> Vec<&str> {
        self.joints.iter().map(|j| j.name.as_str()).collect()
    }
}
