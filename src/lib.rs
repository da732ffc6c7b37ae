//! # arm-kinematics
//!
//! Forward kinematics for a fixed four-joint serial arm.
//!
//! Given a vector of joint angles (degrees) and the arm's link lengths, the crate
//! computes the world-frame homogeneous transform of every joint and of the end
//! effector. Transforms are plain [`glam::DMat4`] values wrapped in
//! [`HomogeneousTransform`], ready to be applied to meshes by any renderer.
//!
//! ```
//! use arm_kinematics::solve;
//!
//! let poses = solve(&[0.0, -30.0, 20.0, -60.0], 1.8, 6.0, 4.0, 4.0).unwrap();
//! let tip = poses.end_effector_position();
//! assert!((tip.x - 15.120938590825727).abs() < 1e-9);
//! ```

pub mod chain;
pub mod error;
pub mod frame;
pub mod render;
pub mod rotation;
pub mod solver;

pub use chain::*;
pub use error::*;
pub use frame::*;
pub use render::*;
pub use rotation::*;
pub use solver::*;
