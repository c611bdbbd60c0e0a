//! # Robot Arm Library
//!
//! Pose bookkeeping for articulated robot arms drawn as chains of rigid
//! segments. Each [`Joint`] tracks its connection points, a reference frame
//! and the angle it has been turned through about each axis; a [`Chain`]
//! keeps every joint attached to the tip of the one before it.
//!
//! ## Features
//!
//! - Rotational, prismatic, static and gripper joints over one shared state machine
//! - Angles kept wrapped to (-π, π] on every write
//! - Reference frames built from forward and up vectors only
//! - Renderer-agnostic [`Representation`] sink for poses and visibility
//! - Optional `serde` support for snapshots
//!
//! ## Example
//!
//! ```rust
//! use robot_arm::{Axis, Chain, Joint, Point3};
//! use std::f64::consts::FRAC_PI_2;
//!
//! let mut arm = Chain::new(vec![
//!     Joint::rotational(Point3::origin(), Point3::new(1.0, 0.0, 0.0), Axis::Y)?,
//!     Joint::gripper(Point3::origin(), Point3::new(0.2, 0.0, 0.0))?,
//! ]);
//! arm.set_angle(0, FRAC_PI_2)?;
//!
//! let end = arm.end_effector().unwrap();
//! assert!((end - Point3::new(0.2, 0.0, -1.0)).norm() < 1e-9);
//! # Ok::<(), robot_arm::Error>(())
//! ```

pub mod angle;
pub mod chain;
pub mod frame;
pub mod joint;
pub mod kind;
pub mod representation;
pub mod snapshot;

pub use angle::{Angle, Rotations, wrap_to_pi};
pub use chain::Chain;
pub use frame::{Axis, ReferenceFrame};
pub use joint::{Joint, JointGeometry};
pub use kind::{CommandOutcome, JointCommand, JointKind, TranslationLimits};
pub use nalgebra::{Point3, UnitQuaternion, Vector3};
pub use representation::{Pose, Primitive, Representation, Shape};
pub use snapshot::{ChainSnapshot, JointSnapshot};

/// Common result type for this library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for joint construction and chain access
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Origin and tip coincide, or the representation has no extent
    #[error("Joint segment has zero length")]
    ZeroLength,

    /// An axis vector is (nearly) zero
    #[error("Axis '{name}' has zero length")]
    ZeroAxis { name: &'static str },

    /// A point or axis has NaN or infinite coordinates
    #[error("'{name}' has non-finite coordinates")]
    NonFinite { name: &'static str },

    /// Forward and up axes are not perpendicular
    #[error("Forward and up axes are not orthogonal (cos = {cosine:.6})")]
    NonOrthogonalAxes { cosine: f64 },

    /// The supplied x-axis does not point from origin toward tip
    #[error("x-axis does not point from origin toward tip (cos = {cosine:.6})")]
    MisalignedXAxis { cosine: f64 },

    /// Prismatic limits are not finite or not ordered
    #[error("Invalid translation limits: min {min} must not exceed max {max}")]
    InvalidTranslationLimits { min: f64, max: f64 },

    /// A chain operation named a joint that does not exist
    #[error("Joint index {index} out of range for chain of {len} joint(s)")]
    JointIndexOutOfRange { index: usize, len: usize },
}
