//! Principal axes and joint reference frames
//!
//! A reference frame is built from two directions only: a forward direction
//! (the local +x, pointing from origin to tip) and an up direction (local +y).
//! The third axis is always `forward × up`. Nothing here depends on the
//! axis-setting order of any rendering library.

use nalgebra::{Matrix3, Rotation3, Unit, UnitQuaternion, Vector3};

use crate::{Error, Result};

/// Tolerance used when matching a vector against a principal axis
pub const AXIS_TOLERANCE: f64 = 1e-12;

/// Largest |cos| between forward and up that is still treated as orthogonal
pub const ORTHOGONALITY_TOLERANCE: f64 = 1e-6;

/// Vectors shorter than this are treated as zero
pub const MIN_AXIS_NORM: f64 = 1e-9;

/// One of the three principal axes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// All principal axes in x, y, z order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit vector along this axis
    pub fn unit(self) -> Unit<Vector3<f64>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }

    /// Match a vector against the principal unit directions
    ///
    /// Returns `None` for anything that is not exactly (within
    /// [`AXIS_TOLERANCE`]) +x, +y or +z.
    pub fn from_vector(vector: &Vector3<f64>) -> Option<Axis> {
        Axis::ALL
            .into_iter()
            .find(|axis| (vector - axis.unit().into_inner()).amax() <= AXIS_TOLERANCE)
    }

    /// Interpret a vector as a principal axis, falling back to y
    ///
    /// Non-principal vectors are not an error: joint operations treat them as
    /// the y axis.
    ///
    /// # Example
    /// ```rust
    /// use robot_arm::{Axis, Vector3};
    ///
    /// assert_eq!(Axis::classify(&Vector3::z()), Axis::Z);
    /// assert_eq!(Axis::classify(&Vector3::new(1.0, 1.0, 0.0)), Axis::Y);
    /// ```
    pub fn classify(vector: &Vector3<f64>) -> Axis {
        Axis::from_vector(vector).unwrap_or_else(|| {
            tracing::trace!(?vector, "non-principal axis, using y");
            Axis::Y
        })
    }

    /// Index into xyz-ordered arrays
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl From<Axis> for Vector3<f64> {
    fn from(axis: Axis) -> Self {
        axis.unit().into_inner()
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(format!("unknown axis '{other}', expected x, y or z")),
        }
    }
}

/// Build the rotation that maps the world axes onto a local frame
///
/// `forward` becomes local +x and `up` local +y; local +z is `forward × up`.
/// Neither vector needs to be unit length. `up` is cleaned of any residual
/// forward component inside [`ORTHOGONALITY_TOLERANCE`].
///
/// # Errors
/// * [`Error::ZeroAxis`] if either vector is (nearly) zero
/// * [`Error::NonOrthogonalAxes`] if the vectors are not perpendicular
pub fn frame_rotation(forward: &Vector3<f64>, up: &Vector3<f64>) -> Result<UnitQuaternion<f64>> {
    let forward = unit_or_err(forward, "forward")?;
    let up = unit_or_err(up, "up")?;

    let cosine = forward.dot(&up);
    if cosine.abs() > ORTHOGONALITY_TOLERANCE {
        return Err(Error::NonOrthogonalAxes { cosine });
    }

    let up = Unit::new_normalize(up.into_inner() - forward.into_inner() * cosine);
    let side = forward.cross(&up);
    let basis = Matrix3::from_columns(&[forward.into_inner(), up.into_inner(), side]);

    Ok(UnitQuaternion::from_rotation_matrix(
        &Rotation3::from_matrix_unchecked(basis),
    ))
}

/// Pick an up direction perpendicular to `forward`
///
/// World +y with its forward component removed, or world +z when forward is
/// (anti)parallel to +y.
pub fn default_up(forward: &Vector3<f64>) -> Result<Vector3<f64>> {
    let forward = unit_or_err(forward, "forward")?;
    let candidates = [Vector3::y(), Vector3::z()];

    candidates
        .iter()
        .map(|candidate| candidate - forward.into_inner() * forward.dot(candidate))
        .find(|projected| projected.norm() > 1e-3)
        .map(|projected| projected.normalize())
        .ok_or(Error::ZeroAxis { name: "up" })
}

pub(crate) fn unit_or_err(vector: &Vector3<f64>, name: &'static str) -> Result<Unit<Vector3<f64>>> {
    if !vector.iter().all(|c| c.is_finite()) {
        return Err(Error::NonFinite { name });
    }
    Unit::try_new(*vector, MIN_AXIS_NORM).ok_or(Error::ZeroAxis { name })
}

/// Three mutually orthogonal axes, each scaled to the segment length
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferenceFrame {
    /// Forward axis, toward the tip
    pub x_axis: Vector3<f64>,
    /// Up axis
    pub y_axis: Vector3<f64>,
    /// `x_axis × y_axis`
    pub z_axis: Vector3<f64>,
}

impl ReferenceFrame {
    /// Compute the frame for an orientation and a segment length
    pub fn from_orientation(orientation: &UnitQuaternion<f64>, length: f64) -> Self {
        let x_axis = orientation.transform_vector(&Vector3::x()) * length;
        let y_axis = orientation.transform_vector(&Vector3::y()) * length;
        let z_axis = x_axis.cross(&y_axis).normalize() * length;
        Self {
            x_axis,
            y_axis,
            z_axis,
        }
    }

    /// Get the scaled axis matching a principal axis
    pub fn axis(&self, axis: Axis) -> &Vector3<f64> {
        match axis {
            Axis::X => &self.x_axis,
            Axis::Y => &self.y_axis,
            Axis::Z => &self.z_axis,
        }
    }

    /// Unit forward direction
    pub fn forward(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.x_axis)
    }

    /// Unit up direction
    pub fn up(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.y_axis)
    }

    /// Check pairwise orthogonality relative to the axis magnitudes
    pub fn is_orthogonal(&self, tolerance: f64) -> bool {
        let scale = self.x_axis.norm_squared().max(f64::MIN_POSITIVE);
        [
            self.x_axis.dot(&self.y_axis),
            self.y_axis.dot(&self.z_axis),
            self.x_axis.dot(&self.z_axis),
        ]
        .iter()
        .all(|dot| (dot / scale).abs() <= tolerance)
    }
}
