//! Visual representations of joint segments
//!
//! The pose engine never draws anything. It pushes poses and visibility into
//! a [`Representation`], which a renderer implements however it likes. The
//! only thing the engine reads back is the bounding-box size, from which the
//! segment length is taken.

use nalgebra::{Point3, Unit, Vector3};

use crate::frame::ReferenceFrame;

/// Cross-section of the placeholder box generated for joints without a shape
pub const PLACEHOLDER_THICKNESS: f64 = 0.1;

/// Placement pushed to a representation on every redraw
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    /// Joint origin
    pub position: Point3<f64>,
    /// Local +x
    pub forward: Unit<Vector3<f64>>,
    /// Local +y
    pub up: Unit<Vector3<f64>>,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            forward: Vector3::x_axis(),
            up: Vector3::y_axis(),
        }
    }
}

/// Pose sink for one joint segment
pub trait Representation: std::fmt::Debug {
    /// Bounding-box dimensions (length, width, height)
    fn size(&self) -> Vector3<f64>;

    /// Move the representation to a new pose
    fn redraw(&mut self, pose: &Pose);

    /// Show or hide the representation
    fn set_visible(&mut self, visible: bool);

    /// Place the reference-frame indicator at the joint tip
    ///
    /// Called with `visible == false` to hide the indicator while still
    /// keeping its placement current.
    fn draw_reference_frame(&mut self, tip: &Point3<f64>, frame: &ReferenceFrame, visible: bool) {
        let _ = (tip, frame, visible);
    }
}

/// Geometric primitive backing a [`Shape`]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Primitive {
    /// Box with the given edge lengths along local x, y, z
    Cuboid { size: Vector3<f64> },
    /// Cylinder running along local x
    Cylinder { radius: f64, length: f64 },
    /// Sphere centred on the joint origin
    Sphere { radius: f64 },
}

impl Primitive {
    /// Axis-aligned bounding box dimensions in the local frame
    pub fn bounding_size(&self) -> Vector3<f64> {
        match *self {
            Primitive::Cuboid { size } => size.abs(),
            Primitive::Cylinder { radius, length } => {
                let diameter = 2.0 * radius.abs();
                Vector3::new(length.abs(), diameter, diameter)
            }
            Primitive::Sphere { radius } => Vector3::repeat(2.0 * radius.abs()),
        }
    }
}

/// Reference-frame indicator state as last drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameIndicator {
    pub position: Point3<f64>,
    pub frame: ReferenceFrame,
    pub visible: bool,
}

/// A primitive shape that records the pose and visibility it was given
///
/// This is the default representation, and a convenient sink for renderers
/// that poll joint state instead of receiving callbacks.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    primitive: Primitive,
    pose: Pose,
    visible: bool,
    indicator: Option<FrameIndicator>,
    redraws: usize,
}

impl Shape {
    /// Create a shape from a primitive
    pub fn new(primitive: Primitive) -> Self {
        Self {
            primitive,
            pose: Pose::default(),
            visible: true,
            indicator: None,
            redraws: 0,
        }
    }

    /// Box with the given edge lengths
    pub fn cuboid(size: Vector3<f64>) -> Self {
        Self::new(Primitive::Cuboid { size })
    }

    /// Cylinder along local x
    pub fn cylinder(radius: f64, length: f64) -> Self {
        Self::new(Primitive::Cylinder { radius, length })
    }

    /// Sphere
    pub fn sphere(radius: f64) -> Self {
        Self::new(Primitive::Sphere { radius })
    }

    /// Thin box spanning a segment, used when a joint is given no shape
    ///
    /// # Example
    /// ```rust
    /// use robot_arm::{Representation, Shape, Vector3};
    ///
    /// let shape = Shape::placeholder(2.0);
    /// assert_eq!(shape.size(), Vector3::new(2.0, 0.1, 0.1));
    /// ```
    pub fn placeholder(segment_length: f64) -> Self {
        Self::cuboid(Vector3::new(
            segment_length,
            PLACEHOLDER_THICKNESS,
            PLACEHOLDER_THICKNESS,
        ))
    }

    /// Get the primitive
    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    /// Get the last pose drawn
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Whether the shape is currently shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Get the reference-frame indicator, if one has been drawn
    pub fn indicator(&self) -> Option<&FrameIndicator> {
        self.indicator.as_ref()
    }

    /// Number of redraws received
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }
}

impl Representation for Shape {
    fn size(&self) -> Vector3<f64> {
        self.primitive.bounding_size()
    }

    fn redraw(&mut self, pose: &Pose) {
        self.pose = *pose;
        self.redraws += 1;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn draw_reference_frame(&mut self, tip: &Point3<f64>, frame: &ReferenceFrame, visible: bool) {
        self.indicator = Some(FrameIndicator {
            position: *tip,
            frame: *frame,
            visible,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_bounding_sizes() {
        assert_eq!(
            Primitive::Cuboid {
                size: Vector3::new(-1.0, 2.0, 3.0)
            }
            .bounding_size(),
            Vector3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(
            Primitive::Cylinder {
                radius: 0.25,
                length: 1.5
            }
            .bounding_size(),
            Vector3::new(1.5, 0.5, 0.5)
        );
        assert_eq!(
            Primitive::Sphere { radius: 0.5 }.bounding_size(),
            Vector3::new(1.0, 1.0, 1.0)
        );
    }

    #[test]
    fn test_placeholder_size() {
        let shape = Shape::placeholder(0.75);
        assert_eq!(shape.size(), Vector3::new(0.75, 0.1, 0.1));
        assert!(shape.is_visible());
        assert_eq!(shape.redraw_count(), 0);
        assert!(shape.indicator().is_none());
    }

    #[test]
    fn test_shape_records_pose() {
        let mut shape = Shape::sphere(0.2);
        let pose = Pose {
            position: Point3::new(1.0, 2.0, 3.0),
            forward: Vector3::z_axis(),
            up: Vector3::x_axis(),
        };

        shape.redraw(&pose);
        shape.set_visible(false);

        assert_eq!(shape.pose(), &pose);
        assert_eq!(shape.redraw_count(), 1);
        assert!(!shape.is_visible());
    }

    #[test]
    fn test_shape_records_indicator() {
        let mut shape = Shape::cylinder(0.1, 1.0);
        let frame = ReferenceFrame {
            x_axis: Vector3::x(),
            y_axis: Vector3::y(),
            z_axis: Vector3::z(),
        };
        let tip = Point3::new(1.0, 0.0, 0.0);

        shape.draw_reference_frame(&tip, &frame, false);

        let indicator = shape.indicator().copied();
        assert_eq!(
            indicator,
            Some(FrameIndicator {
                position: tip,
                frame,
                visible: false,
            })
        );
    }
}
