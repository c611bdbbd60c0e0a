//! Ordered chains of joints
//!
//! A [`Chain`] owns its joints from base to end-effector and keeps them glued
//! together: after every call that returns, joint `i` starts exactly where
//! joint `i - 1` ends. Joints are only reachable mutably through the chain so
//! that a move can never skip the downstream pass.

use nalgebra::{Point3, Vector3};

use crate::joint::Joint;
use crate::kind::{CommandOutcome, JointCommand};
use crate::{Error, Result};

/// An articulated mechanism made of connected joints
#[derive(Debug)]
pub struct Chain {
    joints: Vec<Joint>,
    visible: bool,
}

impl Chain {
    /// Build a chain and attach every joint to the tip of the one before it
    ///
    /// # Example
    /// ```rust
    /// use robot_arm::{Chain, Joint, Point3};
    ///
    /// let chain = Chain::new(vec![
    ///     Joint::fixed(Point3::origin(), Point3::new(1.0, 0.0, 0.0))?,
    ///     Joint::fixed(Point3::origin(), Point3::new(1.0, 0.0, 0.0))?,
    /// ]);
    /// assert_eq!(chain.end_effector(), Some(Point3::new(2.0, 0.0, 0.0)));
    /// # Ok::<(), robot_arm::Error>(())
    /// ```
    pub fn new(joints: Vec<Joint>) -> Self {
        let mut chain = Self {
            joints,
            visible: true,
        };
        chain.realign();
        chain
    }

    /// Append a joint at the end-effector side
    pub fn push(&mut self, joint: Joint) {
        self.joints.push(joint);
        self.propagate_from(self.joints.len() - 1);
    }

    /// Re-run the full base-to-tip attachment pass
    pub fn realign(&mut self) {
        self.propagate_from(1);
    }

    /// Number of joints
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Whether the chain has no joints
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Get the joints in base-to-tip order
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Get a joint by index
    pub fn joint(&self, index: usize) -> Option<&Joint> {
        self.joints.get(index)
    }

    /// Get the base joint
    pub fn base(&self) -> Option<&Joint> {
        self.joints.first()
    }

    /// Tip of the last joint
    pub fn end_effector(&self) -> Option<Point3<f64>> {
        self.joints.last().map(|joint| *joint.tip())
    }

    /// Whether the whole chain is shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Check that every joint starts at its predecessor's tip
    pub fn is_contiguous(&self, tolerance: f64) -> bool {
        self.joints
            .windows(2)
            .all(|pair| (pair[1].origin() - pair[0].tip()).norm() <= tolerance)
    }

    /// Apply a motion command to one joint and carry the result downstream
    ///
    /// # Errors
    /// [`Error::JointIndexOutOfRange`] if `index` is not a joint of this chain
    pub fn apply(&mut self, index: usize, command: JointCommand) -> Result<CommandOutcome> {
        let outcome = self.joint_mut(index)?.apply(command);
        if outcome != CommandOutcome::Ignored {
            self.propagate_from(index + 1);
        }
        Ok(outcome)
    }

    /// Turn joint `index` to an absolute angle
    pub fn set_angle(&mut self, index: usize, angle: f64) -> Result<CommandOutcome> {
        self.apply(index, JointCommand::SetAngle(angle))
    }

    /// Extend joint `index` to an absolute translation
    pub fn translate(&mut self, index: usize, translation: f64) -> Result<CommandOutcome> {
        self.apply(index, JointCommand::Translate(translation))
    }

    /// Rotate joint `index` by `angle` about one of its axes
    pub fn reorient(&mut self, index: usize, angle: f64, axis: &Vector3<f64>) -> Result<()> {
        self.joint_mut(index)?.reorient(angle, axis);
        self.propagate_from(index + 1);
        Ok(())
    }

    /// Move the base of the chain; every other joint follows
    pub fn reposition(&mut self, base_origin: Point3<f64>) {
        if let Some(base) = self.joints.first_mut() {
            base.reposition(base_origin);
            self.propagate_from(1);
        }
    }

    /// Run an arbitrary mutation on one joint, then restore attachment
    ///
    /// The joint is re-attached to its predecessor afterwards, so moving a
    /// non-base joint's origin is undone; its orientation changes are kept.
    pub fn with_joint_mut<R>(&mut self, index: usize, f: impl FnOnce(&mut Joint) -> R) -> Result<R> {
        let result = f(self.joint_mut(index)?);
        self.propagate_from(index);
        Ok(result)
    }

    /// Show or hide every joint; nothing happens if already in that state
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        for joint in &mut self.joints {
            joint.set_visible(visible);
        }
    }

    /// Show or hide the reference-frame indicator of every joint
    pub fn set_reference_frame_visible(&mut self, visible: bool) {
        for joint in &mut self.joints {
            joint.set_reference_frame_visible(visible);
        }
    }

    fn joint_mut(&mut self, index: usize) -> Result<&mut Joint> {
        let len = self.joints.len();
        self.joints
            .get_mut(index)
            .ok_or(Error::JointIndexOutOfRange { index, len })
    }

    /// Attach joints `start..` to their predecessors, base to tip
    fn propagate_from(&mut self, start: usize) {
        let start = start.max(1);
        if start >= self.joints.len() {
            return;
        }
        for index in start..self.joints.len() {
            let anchor = *self.joints[index - 1].tip();
            self.joints[index].reposition(anchor);
        }
        tracing::debug!(
            start,
            joints = self.joints.len(),
            end_effector = ?self.end_effector(),
            "propagated chain"
        );
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Chain with {} joint(s)", self.joints.len())?;
        for (index, joint) in self.joints.iter().enumerate() {
            writeln!(f, "  [{index}] {joint}")?;
        }
        Ok(())
    }
}
