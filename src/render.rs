//! Hand-off of solved poses to a renderer.
//!
//! Mesh construction and drawing live outside this crate. A renderer only has to
//! accept a homogeneous transform per drawable and apply it to that drawable's
//! local coordinates.

use crate::frame::HomogeneousTransform;
use crate::solver::ChainPoses;
use std::fmt;

/// Which part of the arm a pose belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkRole {
    /// The root frame (drawn as the base block).
    Base,
    /// An intermediate link, numbered from 1 after the base.
    Link(usize),
    /// The distal tool frame.
    EndEffector,
}

impl fmt::Display for LinkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("base"),
            Self::Link(n) => write!(f, "link{n}"),
            Self::EndEffector => f.write_str("end_effector"),
        }
    }
}

/// Something that positions drawables from world-frame poses.
pub trait PoseSink {
    /// Places the drawable for `role` at `pose`.
    fn place(&mut self, role: LinkRole, pose: &HomogeneousTransform);
}

impl<F> PoseSink for F
where
    F: FnMut(LinkRole, &HomogeneousTransform),
{
    fn place(&mut self, role: LinkRole, pose: &HomogeneousTransform) {
        self(role, pose)
    }
}

impl ChainPoses {
    /// Hands every pose to `sink` in chain order: base, links, end effector.
    pub fn present<S: PoseSink + ?Sized>(&self, sink: &mut S) {
        let last = self.frames().len() - 1;
        for (index, pose) in self.frames().iter().enumerate() {
            let role = match index {
                0 => LinkRole::Base,
                i if i == last => LinkRole::EndEffector,
                i => LinkRole::Link(i),
            };
            sink.place(role, pose);
        }
    }
}
