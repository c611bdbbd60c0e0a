//! Joint variants and the commands they accept
//!
//! All joints share the state machine in [`crate::joint`]. A [`JointKind`]
//! only decides how an external command maps onto that state:
//!
//! | kind       | `SetAngle`                       | `Translate`          |
//! |------------|----------------------------------|----------------------|
//! | Rotational | delta reorientation about axis   | ignored              |
//! | Prismatic  | ignored                          | clamped extension    |
//! | Static     | ignored                          | ignored              |
//! | Gripper    | ignored                          | ignored              |

use std::fmt;

use crate::angle::Angle;
use crate::frame::Axis;
use crate::joint::Joint;
use crate::{Error, Result};

/// Travel range of a prismatic joint along its local x-axis
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TranslationLimits {
    pub min: f64,
    pub max: f64,
}

impl TranslationLimits {
    /// Create validated limits
    ///
    /// # Errors
    /// [`Error::InvalidTranslationLimits`] unless both bounds are finite and
    /// `min <= max`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        let limits = Self { min, max };
        limits.validate()?;
        Ok(limits)
    }

    /// Check that the bounds are finite and ordered
    pub fn validate(&self) -> Result<()> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(Error::InvalidTranslationLimits {
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Clamp a requested translation into range
    pub fn clamp(&self, translation: f64) -> f64 {
        translation.clamp(self.min, self.max)
    }

    /// Check whether a translation is within range
    pub fn contains(&self, translation: f64) -> bool {
        (self.min..=self.max).contains(&translation)
    }
}

/// Variant tag of a joint
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum JointKind {
    /// Structurally rigid segment
    Static,
    /// Turns about one fixed principal axis
    Rotational { rotation_axis: Axis },
    /// Extends its tip along local x
    Prismatic(TranslationLimits),
    /// End-effector stub
    Gripper,
}

impl JointKind {
    /// Short lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            JointKind::Static => "static",
            JointKind::Rotational { .. } => "rotational",
            JointKind::Prismatic(_) => "prismatic",
            JointKind::Gripper => "gripper",
        }
    }
}

impl fmt::Display for JointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Motion command addressed to a joint
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JointCommand {
    /// Turn to an absolute angle in radians
    SetAngle(f64),
    /// Extend to an absolute translation along local x
    Translate(f64),
}

/// What a joint did with a [`JointCommand`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CommandOutcome {
    /// Rotated by `delta` to reach the requested angle
    Rotated { delta: Angle },
    /// Extended to `applied`; differs from `requested` when clamped
    Translated { requested: f64, applied: f64 },
    /// The joint kind does not respond to this command
    Ignored,
}

impl CommandOutcome {
    /// Whether a translation request was clamped to the limits
    pub fn is_clamped(&self) -> bool {
        matches!(self, CommandOutcome::Translated { requested, applied } if requested != applied)
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Rotated { delta } => write!(f, "rotated by {delta}"),
            CommandOutcome::Translated { requested, applied } if requested != applied => {
                write!(f, "translated to {applied:.4} (clamped from {requested:.4})")
            }
            CommandOutcome::Translated { applied, .. } => write!(f, "translated to {applied:.4}"),
            CommandOutcome::Ignored => f.write_str("ignored"),
        }
    }
}

impl Joint {
    /// Apply a motion command according to the joint kind
    pub fn apply(&mut self, command: JointCommand) -> CommandOutcome {
        match (*self.kind(), command) {
            (JointKind::Rotational { rotation_axis }, JointCommand::SetAngle(target)) => {
                self.rotate_to(rotation_axis, target)
            }
            (JointKind::Prismatic(limits), JointCommand::Translate(requested)) => {
                self.translate_within(limits, requested)
            }
            (kind, command) => {
                tracing::trace!(%kind, ?command, "command ignored");
                CommandOutcome::Ignored
            }
        }
    }

    /// Turn a rotational joint to an absolute angle
    ///
    /// The angle is wrapped to (-π, π] and reached by rotating through the
    /// shortest delta from the current accumulated angle. Other kinds ignore
    /// the request, as does every kind when the angle is not finite.
    ///
    /// # Example
    /// ```rust
    /// use robot_arm::{Axis, Joint, Point3};
    ///
    /// let mut joint = Joint::rotational(Point3::origin(), Point3::new(1.0, 0.0, 0.0), Axis::Y)?;
    /// joint.set_angle(1.0);
    /// joint.set_angle(1.0);
    /// assert!((joint.rotation_about(Axis::Y).radians() - 1.0).abs() < 1e-12);
    /// # Ok::<(), robot_arm::Error>(())
    /// ```
    pub fn set_angle(&mut self, angle: f64) -> CommandOutcome {
        self.apply(JointCommand::SetAngle(angle))
    }

    /// Extend a prismatic joint to an absolute translation
    ///
    /// Requests outside the limits are clamped and reported as such. Other
    /// kinds ignore the request.
    pub fn translate(&mut self, translation: f64) -> CommandOutcome {
        self.apply(JointCommand::Translate(translation))
    }

    fn rotate_to(&mut self, axis: Axis, target: f64) -> CommandOutcome {
        if !target.is_finite() {
            tracing::warn!(%axis, target, "ignoring non-finite joint angle");
            return CommandOutcome::Ignored;
        }
        let target = Angle::from_radians(target);
        let delta = self.rotation_about(axis).delta_to(target);
        self.reorient_about(delta.radians(), axis);
        CommandOutcome::Rotated { delta }
    }

    fn translate_within(&mut self, limits: TranslationLimits, requested: f64) -> CommandOutcome {
        let applied = if requested.is_nan() {
            self.translation()
        } else {
            limits.clamp(requested)
        };
        if applied != requested {
            tracing::warn!(
                requested,
                applied,
                min = limits.min,
                max = limits.max,
                "prismatic translation clamped"
            );
        }
        self.set_translation(applied);
        CommandOutcome::Translated { requested, applied }
    }
}
