//! Read-only copies of joint and chain state
//!
//! Snapshots are plain data for renderers and serializers: they hold no
//! reference to the live joints and never change after they are taken.

use nalgebra::Point3;

use crate::angle::Rotations;
use crate::chain::Chain;
use crate::frame::ReferenceFrame;
use crate::joint::Joint;
use crate::kind::JointKind;

/// State of one joint at the moment it was captured
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointSnapshot {
    pub kind: JointKind,
    pub origin: Point3<f64>,
    pub tip: Point3<f64>,
    pub length: f64,
    pub translation: f64,
    pub frame: ReferenceFrame,
    pub rotations: Rotations,
    pub visible: bool,
    pub reference_frame_visible: bool,
}

impl From<&Joint> for JointSnapshot {
    fn from(joint: &Joint) -> Self {
        Self {
            kind: *joint.kind(),
            origin: *joint.origin(),
            tip: *joint.tip(),
            length: joint.length(),
            translation: joint.translation(),
            frame: *joint.frame(),
            rotations: *joint.rotations(),
            visible: joint.is_visible(),
            reference_frame_visible: joint.is_reference_frame_visible(),
        }
    }
}

/// State of a whole chain at the moment it was captured
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainSnapshot {
    pub visible: bool,
    pub end_effector: Option<Point3<f64>>,
    pub joints: Vec<JointSnapshot>,
}

impl From<&Chain> for ChainSnapshot {
    fn from(chain: &Chain) -> Self {
        Self {
            visible: chain.is_visible(),
            end_effector: chain.end_effector(),
            joints: chain.joints().iter().map(JointSnapshot::from).collect(),
        }
    }
}

impl Joint {
    /// Capture the current state
    pub fn snapshot(&self) -> JointSnapshot {
        JointSnapshot::from(self)
    }
}

impl Chain {
    /// Capture the current state of every joint
    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot::from(self)
    }
}
