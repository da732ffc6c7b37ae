//! Forward kinematics over a [`KinematicChain`].
//!
//! The entry point is [`ForwardKinematicsSolver`]. Build it from a validated chain,
//! then call [`ForwardKinematicsSolver::solve`] with one angle per actuated joint.
//! For the reference arm the free function [`solve`] does both steps at once.

use crate::chain::{ChainConfig, KinematicChain};
use crate::error::{KinematicsError, Result};
use crate::frame::{HomogeneousTransform, compose};
use glam::DVec3;
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

/// The three angle sets (degrees) the reference scenario drives through the arm.
pub const REFERENCE_ANGLE_SETS: [[f64; 4]; 3] = [
    [0.0, -30.0, 20.0, -60.0],
    [30.0, -55.0, 40.0, -80.0],
    [50.0, -70.0, 60.0, -90.0],
];

/// World-frame poses of every joint in a chain, in chain order.
///
/// Only produced by a successful solve; the last entry is the end effector.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainPoses {
    frames: Vec<HomogeneousTransform>,
}

impl ChainPoses {
    /// World transform of joint `index` (0-based: `joint(0)` is `T1`).
    pub fn joint(&self, index: usize) -> Option<&HomogeneousTransform> {
        self.frames.get(index)
    }

    /// World transforms of the joints before the end effector (`T1..Tn`).
    pub fn joints(&self) -> &[HomogeneousTransform] {
        &self.frames[..self.frames.len() - 1]
    }

    /// World pose of the end effector (`Tend`).
    pub fn end_effector(&self) -> &HomogeneousTransform {
        // Chains are never empty, so there is always a last frame.
        &self.frames[self.frames.len() - 1]
    }

    /// Position of the end effector in world coordinates.
    pub fn end_effector_position(&self) -> DVec3 {
        self.end_effector().translation()
    }

    /// Every frame in chain order, end effector last.
    pub fn frames(&self) -> &[HomogeneousTransform] {
        &self.frames
    }
}

impl Serialize for ChainPoses {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'a> {
            joints: &'a [HomogeneousTransform],
            end_effector: &'a HomogeneousTransform,
        }

        Repr {
            joints: self.joints(),
            end_effector: self.end_effector(),
        }
        .serialize(s)
    }
}

/// Turns joint-angle vectors into world-frame poses.
///
/// Holds the chain read-only, so a single solver can be shared across threads.
#[derive(Clone, Debug)]
pub struct ForwardKinematicsSolver {
    chain: KinematicChain,
}

impl ForwardKinematicsSolver {
    pub fn new(chain: KinematicChain) -> Self {
        Self { chain }
    }

    /// Solver for the reference four-joint arm with the given geometry.
    pub fn four_joint_arm(config: ChainConfig) -> Result<Self> {
        KinematicChain::four_joint_arm(config).map(Self::new)
    }

    pub fn chain(&self) -> &KinematicChain {
        &self.chain
    }

    /// Computes the world transform of every joint for `angles` (degrees).
    ///
    /// Each joint's local transform depends only on its own angle and the chain
    /// geometry. World transforms are accumulated left to right:
    /// `T_k = T_{k-1} · local_k`, starting from the identity.
    ///
    /// # Errors
    ///
    /// - [`KinematicsError::ArityMismatch`] if `angles.len()` differs from the chain's
    ///   degrees of freedom.
    /// - [`KinematicsError::NonFiniteAngle`] if any angle is NaN or infinite.
    ///
    /// Nothing is computed in either case.
    pub fn solve(&self, angles: &[f64]) -> Result<ChainPoses> {
        let dof = self.chain.dof();
        if angles.len() != dof {
            warn!(expected = dof, actual = angles.len(), "rejecting angle vector");
            return Err(KinematicsError::arity_mismatch(dof, angles.len()));
        }
        if let Some((index, &value)) = angles.iter().enumerate().find(|(_, a)| !a.is_finite()) {
            warn!(index, value, "rejecting angle vector");
            return Err(KinematicsError::non_finite_angle(index, value));
        }

        let config = self.chain.config();
        let mut world = HomogeneousTransform::IDENTITY;
        let frames = self
            .chain
            .joints()
            .iter()
            .map(|joint| {
                world = compose(&world, &joint.local_transform(angles, config)?);
                Ok(world)
            })
            .collect::<Result<Vec<_>>>()?;

        let poses = ChainPoses { frames };
        debug!(
            ?angles,
            end_effector = %poses.end_effector_position(),
            "solved forward kinematics"
        );
        Ok(poses)
    }

    /// Solves independent angle vectors in parallel.
    ///
    /// Results are returned in input order; one bad vector does not affect the others.
    pub fn solve_batch<A>(&self, angle_sets: &[A]) -> Vec<Result<ChainPoses>>
    where
        A: AsRef<[f64]> + Sync,
    {
        angle_sets
            .par_iter()
            .map(|angles| self.solve(angles.as_ref()))
            .collect()
    }
}

/// Forward kinematics of the reference arm with link lengths `l1..l4`.
///
/// Uses the default clearance and base placement. Returns `T1..T4` as
/// [`ChainPoses::joints`] and `Tend` as [`ChainPoses::end_effector`].
///
/// # Errors
///
/// - [`KinematicsError::InvalidLinkLength`] if any length is negative or not finite.
/// - [`KinematicsError::ArityMismatch`] if `angles` does not hold exactly four entries.
pub fn solve(angles: &[f64], l1: f64, l2: f64, l3: f64, l4: f64) -> Result<ChainPoses> {
    ForwardKinematicsSolver::four_joint_arm(ChainConfig::with_link_lengths([l1, l2, l3, l4]))?
        .solve(angles)
}
