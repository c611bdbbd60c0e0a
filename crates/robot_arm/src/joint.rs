use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

use crate::angle::{Angle, Rotations};
use crate::frame::{Axis, MIN_AXIS_NORM, ReferenceFrame, default_up, frame_rotation, unit_or_err};
use crate::kind::{JointKind, TranslationLimits};
use crate::representation::{Pose, Representation, Shape};
use crate::{Error, Result};

/// Cosine above which a supplied x-axis counts as pointing at the tip
const X_AXIS_ALIGNMENT: f64 = 1.0 - 1e-6;

/// Construction input for a [`Joint`]
///
/// Only `origin` and `tip` are required. The local x-axis defaults to the
/// direction from origin to tip, the up axis to world +y made perpendicular
/// to it, and the representation to a thin placeholder box spanning the
/// segment.
#[derive(Debug)]
pub struct JointGeometry {
    origin: Point3<f64>,
    tip: Point3<f64>,
    x_axis: Option<Vector3<f64>>,
    up: Option<Vector3<f64>>,
    representation: Option<Box<dyn Representation>>,
}

impl JointGeometry {
    /// Describe a segment from its two connection points
    pub fn new(origin: Point3<f64>, tip: Point3<f64>) -> Self {
        Self {
            origin,
            tip,
            x_axis: None,
            up: None,
            representation: None,
        }
    }

    /// Set the initial local x-axis; must point from origin toward tip
    pub fn with_x_axis(mut self, x_axis: Vector3<f64>) -> Self {
        self.x_axis = Some(x_axis);
        self
    }

    /// Set the initial local up axis; must be perpendicular to the x-axis
    pub fn with_up(mut self, up: Vector3<f64>) -> Self {
        self.up = Some(up);
        self
    }

    /// Use a caller-provided representation instead of the placeholder box
    pub fn with_representation(mut self, representation: Box<dyn Representation>) -> Self {
        self.representation = Some(representation);
        self
    }
}

/// One rigid segment of an articulated arm
///
/// A joint owns its two connection points, its orientation and the angles it
/// has been rotated by. Every mutation recomputes the reference frame before
/// anything is pushed to the representation, so the pose a renderer sees is
/// always self-consistent.
#[derive(Debug)]
pub struct Joint {
    /// Variant tag and its fixed parameters
    kind: JointKind,

    /// Attachment point to the previous segment
    origin: Point3<f64>,

    /// Attachment point to the next segment
    tip: Point3<f64>,

    /// Vector from origin to tip at zero translation; rotates with the joint
    segment: Vector3<f64>,

    /// Current prismatic extension along local x
    translation: f64,

    /// Longest bounding dimension of the representation
    length: f64,

    /// Rotation from world axes to the local frame
    orientation: UnitQuaternion<f64>,

    /// Local axes scaled to `length`
    frame: ReferenceFrame,

    /// Accumulated rotation per axis
    rotations: Rotations,

    visible: bool,
    reference_frame_visible: bool,
    representation: Box<dyn Representation>,
}

impl Joint {
    /// Create a joint of the given kind
    ///
    /// # Errors
    /// * [`Error::NonFinite`] if a point or axis has non-finite coordinates
    /// * [`Error::ZeroLength`] if origin and tip coincide or the
    ///   representation has no extent
    /// * [`Error::MisalignedXAxis`] if the supplied x-axis does not point at the tip
    /// * [`Error::NonOrthogonalAxes`] if the supplied up axis is not perpendicular
    /// * [`Error::InvalidTranslationLimits`] for a prismatic joint with bad limits
    ///
    /// # Example
    /// ```rust
    /// use robot_arm::{Joint, JointGeometry, JointKind, Point3};
    ///
    /// let joint = Joint::new(
    ///     JointKind::Static,
    ///     JointGeometry::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0)),
    /// )?;
    /// assert_eq!(joint.length(), 1.0);
    /// # Ok::<(), robot_arm::Error>(())
    /// ```
    pub fn new(kind: JointKind, geometry: JointGeometry) -> Result<Self> {
        let JointGeometry {
            origin,
            tip,
            x_axis,
            up,
            representation,
        } = geometry;

        check_point(&origin, "origin")?;
        check_point(&tip, "tip")?;
        if let JointKind::Prismatic(limits) = &kind {
            limits.validate()?;
        }

        let segment = tip - origin;
        let segment_length = segment.norm();
        if segment_length < MIN_AXIS_NORM {
            return Err(Error::ZeroLength);
        }

        let forward = match x_axis {
            Some(x_axis) => {
                let unit = unit_or_err(&x_axis, "x_axis")?;
                let cosine = unit.dot(&segment) / segment_length;
                if cosine < X_AXIS_ALIGNMENT {
                    return Err(Error::MisalignedXAxis { cosine });
                }
                unit.into_inner()
            }
            None => segment / segment_length,
        };
        let up = match up {
            Some(up) => up,
            None => default_up(&forward)?,
        };
        let orientation = frame_rotation(&forward, &up)?;

        let mut representation =
            representation.unwrap_or_else(|| Box::new(Shape::placeholder(segment_length)));
        let length = representation.size().amax();
        if !(length.is_finite() && length >= MIN_AXIS_NORM) {
            return Err(Error::ZeroLength);
        }

        let frame = ReferenceFrame::from_orientation(&orientation, length);
        representation.draw_reference_frame(&tip, &frame, false);

        let mut joint = Self {
            kind,
            origin,
            tip,
            segment,
            translation: 0.0,
            length,
            orientation,
            frame,
            rotations: Rotations::default(),
            visible: true,
            reference_frame_visible: false,
            representation,
        };
        joint.draw();

        tracing::debug!(kind = %joint.kind, length, "created joint");
        Ok(joint)
    }

    /// Rotational joint turning about `rotation_axis`
    pub fn rotational(origin: Point3<f64>, tip: Point3<f64>, rotation_axis: Axis) -> Result<Self> {
        Self::new(
            JointKind::Rotational { rotation_axis },
            JointGeometry::new(origin, tip),
        )
    }

    /// Prismatic joint extending its tip along local x within `limits`
    pub fn prismatic(origin: Point3<f64>, tip: Point3<f64>, limits: TranslationLimits) -> Result<Self> {
        Self::new(JointKind::Prismatic(limits), JointGeometry::new(origin, tip))
    }

    /// Rigid segment that ignores motion commands
    pub fn fixed(origin: Point3<f64>, tip: Point3<f64>) -> Result<Self> {
        Self::new(JointKind::Static, JointGeometry::new(origin, tip))
    }

    /// End-effector stub that ignores motion commands
    pub fn gripper(origin: Point3<f64>, tip: Point3<f64>) -> Result<Self> {
        Self::new(JointKind::Gripper, JointGeometry::new(origin, tip))
    }

    /// Get the joint kind
    pub fn kind(&self) -> &JointKind {
        &self.kind
    }

    /// Get the origin (connection to the previous segment)
    pub fn origin(&self) -> &Point3<f64> {
        &self.origin
    }

    /// Get the tip (connection to the next segment)
    pub fn tip(&self) -> &Point3<f64> {
        &self.tip
    }

    /// Get the vector from origin to tip
    pub fn segment(&self) -> Vector3<f64> {
        self.tip - self.origin
    }

    /// Get the segment length
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Get the current prismatic extension
    pub fn translation(&self) -> f64 {
        self.translation
    }

    /// Get the orientation relative to the world axes
    pub fn orientation(&self) -> &UnitQuaternion<f64> {
        &self.orientation
    }

    /// Get the reference frame
    pub fn frame(&self) -> &ReferenceFrame {
        &self.frame
    }

    /// Get the local x-axis scaled to the segment length
    pub fn x_axis(&self) -> &Vector3<f64> {
        &self.frame.x_axis
    }

    /// Get the local y-axis scaled to the segment length
    pub fn y_axis(&self) -> &Vector3<f64> {
        &self.frame.y_axis
    }

    /// Get the local z-axis scaled to the segment length
    pub fn z_axis(&self) -> &Vector3<f64> {
        &self.frame.z_axis
    }

    /// Get all accumulated rotations
    pub fn rotations(&self) -> &Rotations {
        &self.rotations
    }

    /// Accumulated rotation about `axis`
    ///
    /// Any vector that is not +x, +y or +z reads the y angle.
    pub fn rotation_angle(&self, axis: &Vector3<f64>) -> Angle {
        self.rotation_about(Axis::classify(axis))
    }

    /// Accumulated rotation about a principal axis
    pub fn rotation_about(&self, axis: Axis) -> Angle {
        self.rotations.get(axis)
    }

    /// Whether the joint is shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the reference-frame indicator is shown
    pub fn is_reference_frame_visible(&self) -> bool {
        self.reference_frame_visible
    }

    /// Get the representation
    pub fn representation(&self) -> &dyn Representation {
        self.representation.as_ref()
    }

    /// Pose pushed to the representation
    pub fn pose(&self) -> Pose {
        Pose {
            position: self.origin,
            forward: self.frame.forward(),
            up: self.frame.up(),
        }
    }

    /// Move the joint so its origin sits at `new_origin`
    ///
    /// The whole segment is translated; shape and orientation are unchanged.
    pub fn reposition(&mut self, new_origin: Point3<f64>) {
        self.origin = new_origin;
        self.update_tip();
        tracing::trace!(kind = %self.kind, origin = ?self.origin, "repositioned joint");

        self.refresh_indicator();
        self.draw();
    }

    /// Rotate the joint by `angle` radians about `axis`, pivoting at the origin
    ///
    /// `axis` selects one of the joint's own x, y or z axes; anything other
    /// than a principal unit vector selects y. The rotation is relative to
    /// the current pose.
    pub fn reorient(&mut self, angle: f64, axis: &Vector3<f64>) {
        self.reorient_about(angle, Axis::classify(axis));
    }

    /// Rotate the joint by `angle` radians about one of its own axes
    ///
    /// A non-finite angle leaves the joint untouched.
    pub fn reorient_about(&mut self, angle: f64, axis: Axis) {
        if !angle.is_finite() {
            tracing::warn!(kind = %self.kind, %axis, angle, "ignoring non-finite rotation");
            return;
        }
        let pivot: Unit<Vector3<f64>> = Unit::new_normalize(*self.frame.axis(axis));
        let rotation = UnitQuaternion::from_axis_angle(&pivot, angle);

        self.rotations.accumulate(axis, Angle::from_radians(angle));
        self.orientation = rotation * self.orientation;
        self.segment = rotation.transform_vector(&self.segment);
        self.update_reference_frame();
        self.update_tip();
        tracing::trace!(
            kind = %self.kind,
            %axis,
            angle,
            tip = ?self.tip,
            "reoriented joint"
        );

        self.refresh_indicator();
        self.draw();
    }

    /// Show or hide the joint together with its reference-frame indicator
    ///
    /// Does nothing when the joint is already in the requested state.
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        self.reference_frame_visible = visible;
        self.representation.set_visible(visible);
        self.representation
            .draw_reference_frame(&self.tip, &self.frame, visible);
    }

    /// Show or hide the reference-frame indicator at the tip
    ///
    /// Always pushes the current tip and frame, even when hiding.
    pub fn set_reference_frame_visible(&mut self, visible: bool) {
        self.reference_frame_visible = visible;
        self.representation
            .draw_reference_frame(&self.tip, &self.frame, visible);
    }

    /// Set the prismatic extension, which must already be within limits
    pub(crate) fn set_translation(&mut self, translation: f64) {
        self.translation = translation;
        self.update_tip();
        tracing::trace!(kind = %self.kind, translation, tip = ?self.tip, "translated joint");

        self.refresh_indicator();
        self.draw();
    }

    fn update_reference_frame(&mut self) {
        self.frame = ReferenceFrame::from_orientation(&self.orientation, self.length);
    }

    fn update_tip(&mut self) {
        let extension = self.frame.forward().into_inner() * self.translation;
        self.tip = self.origin + self.segment + extension;
    }

    fn refresh_indicator(&mut self) {
        if self.reference_frame_visible {
            self.representation
                .draw_reference_frame(&self.tip, &self.frame, true);
        }
    }

    fn draw(&mut self) {
        let pose = self.pose();
        self.representation.redraw(&pose);
    }
}

impl std::fmt::Display for Joint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} joint ({:.3}, {:.3}, {:.3}) -> ({:.3}, {:.3}, {:.3})",
            self.kind,
            self.origin.x,
            self.origin.y,
            self.origin.z,
            self.tip.x,
            self.tip.y,
            self.tip.z
        )
    }
}

fn check_point(point: &Point3<f64>, name: &'static str) -> Result<()> {
    if point.coords.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(Error::NonFinite { name })
    }
}
