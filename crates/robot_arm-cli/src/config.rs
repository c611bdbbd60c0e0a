//! Arm description files
//!
//! An arm is described by a list of joints in base → end-effector order.
//! Files are YAML unless their extension says JSON.

use std::path::{Path, PathBuf};

use robot_arm::{
    Axis, Chain, Joint, JointGeometry, JointKind, Point3, Representation, Shape,
    TranslationLimits, Vector3,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration-specific errors with path context
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read arm description from '{path}'")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse arm description '{path}'")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("Invalid YAML syntax")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON syntax")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Arm name must not be empty")]
    EmptyName,

    #[error("Arm '{name}' has no joints")]
    NoJoints { name: String },

    #[error("Joint {index} is rotational but names no rotation_axis")]
    MissingRotationAxis { index: usize },

    #[error("Joint {index} is prismatic but is missing min_translation or max_translation")]
    MissingTranslationLimits { index: usize },

    #[error("Joint {index} could not be built")]
    InvalidJoint {
        index: usize,
        #[source]
        source: robot_arm::Error,
    },
}

type Result<T> = std::result::Result<T, ConfigError>;

/// Joint variant named in a description file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindName {
    Static,
    Rotational,
    Prismatic,
    Gripper,
}

/// Visual stand-in for a joint
///
/// Written as a single-key map, `cuboid: [x, y, z]`, in both YAML and JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeConfig {
    Cuboid([f64; 3]),
    Cylinder { radius: f64, length: f64 },
    Sphere { radius: f64 },
}

impl ShapeConfig {
    fn to_representation(&self) -> Box<dyn Representation> {
        let shape = match *self {
            ShapeConfig::Cuboid([x, y, z]) => Shape::cuboid(Vector3::new(x, y, z)),
            ShapeConfig::Cylinder { radius, length } => Shape::cylinder(radius, length),
            ShapeConfig::Sphere { radius } => Shape::sphere(radius),
        };
        Box::new(shape)
    }
}

/// One joint of an arm description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JointConfig {
    pub kind: KindName,
    #[serde(default)]
    pub origin: [f64; 3],
    pub tip: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_axis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<[f64; 3]>,
    #[serde(
        default,
        with = "serde_yaml::with::singleton_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub shape: Option<ShapeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_translation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_translation: Option<f64>,
}

impl JointConfig {
    /// Resolve the joint variant, checking the fields it depends on
    pub fn joint_kind(&self, index: usize) -> Result<JointKind> {
        match self.kind {
            KindName::Static => Ok(JointKind::Static),
            KindName::Gripper => Ok(JointKind::Gripper),
            KindName::Rotational => self
                .rotation_axis
                .map(|rotation_axis| JointKind::Rotational { rotation_axis })
                .ok_or(ConfigError::MissingRotationAxis { index }),
            KindName::Prismatic => match (self.min_translation, self.max_translation) {
                (Some(min), Some(max)) => Ok(JointKind::Prismatic(TranslationLimits { min, max })),
                _ => Err(ConfigError::MissingTranslationLimits { index }),
            },
        }
    }

    fn build(&self, index: usize) -> Result<Joint> {
        let kind = self.joint_kind(index)?;
        let mut geometry = JointGeometry::new(point(self.origin), point(self.tip));
        if let Some(x_axis) = self.x_axis {
            geometry = geometry.with_x_axis(vector(x_axis));
        }
        if let Some(up) = self.up {
            geometry = geometry.with_up(vector(up));
        }
        if let Some(shape) = &self.shape {
            geometry = geometry.with_representation(shape.to_representation());
        }
        Joint::new(kind, geometry).map_err(|source| ConfigError::InvalidJoint { index, source })
    }
}

/// A complete arm description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArmConfig {
    pub name: String,
    #[serde(default)]
    pub reference_frames: bool,
    pub joints: Vec<JointConfig>,
}

impl ArmConfig {
    /// Load an arm description from a file, picking the parser by extension
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = if is_json(path) {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        };

        parsed.map_err(|source| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
    }

    /// Parse and validate a YAML description
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ArmConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON description
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ArmConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the description is complete enough to build a chain
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.joints.is_empty() {
            return Err(ConfigError::NoJoints {
                name: self.name.clone(),
            });
        }
        for (index, joint) in self.joints.iter().enumerate() {
            joint.joint_kind(index)?;
        }
        Ok(())
    }

    /// Build the described chain, each joint attached to the tip of the one before
    pub fn build_chain(&self) -> Result<Chain> {
        self.validate()?;
        let joints = self
            .joints
            .iter()
            .enumerate()
            .map(|(index, joint)| joint.build(index))
            .collect::<Result<Vec<_>>>()?;

        let mut chain = Chain::new(joints);
        if self.reference_frames {
            chain.set_reference_frame_visible(true);
        }
        tracing::debug!(arm = %self.name, joints = chain.len(), "built chain");
        Ok(chain)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn point([x, y, z]: [f64; 3]) -> Point3<f64> {
    Point3::new(x, y, z)
}

fn vector([x, y, z]: [f64; 3]) -> Vector3<f64> {
    Vector3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::fs;
    use tempfile::TempDir;
    use test_log::test;

    const PLANAR_ARM: &str = r#"
name: planar-arm
joints:
  - kind: rotational
    origin: [0.0, 0.0, 0.0]
    tip: [1.0, 0.0, 0.0]
    rotation_axis: y
  - kind: prismatic
    tip: [0.5, 0.0, 0.0]
    min_translation: 0.0
    max_translation: 0.25
  - kind: gripper
    tip: [0.1, 0.0, 0.0]
    shape:
      sphere: { radius: 0.05 }
"#;

    #[test]
    fn test_valid_yaml_parsing() -> Result<()> {
        let config = ArmConfig::from_yaml(PLANAR_ARM)?;
        assert_eq!(config.name, "planar-arm");
        assert!(!config.reference_frames);
        assert_eq!(config.joints.len(), 3);
        assert_eq!(config.joints[0].rotation_axis, Some(Axis::Y));
        assert_eq!(config.joints[1].origin, [0.0, 0.0, 0.0]);
        assert_eq!(
            config.joints[2].shape,
            Some(ShapeConfig::Sphere { radius: 0.05 })
        );
        Ok(())
    }

    #[test]
    fn test_valid_json_parsing() -> Result<()> {
        let json = r#"{
            "name": "stub",
            "reference_frames": true,
            "joints": [
                { "kind": "static", "tip": [0.0, 0.0, 0.3],
                  "shape": { "cuboid": [0.1, 0.1, 0.3] } }
            ]
        }"#;
        let config = ArmConfig::from_json(json)?;
        assert!(config.reference_frames);
        assert_eq!(
            config.joints[0].shape,
            Some(ShapeConfig::Cuboid([0.1, 0.1, 0.3]))
        );
        Ok(())
    }

    #[test]
    fn test_yaml_shape_forms() -> Result<()> {
        let yaml = r#"
name: shapes
joints:
  - kind: static
    tip: [1.0, 0.0, 0.0]
    shape:
      cuboid: [1.0, 0.2, 0.2]
  - kind: static
    tip: [0.0, 0.0, 0.5]
    shape: { cylinder: { radius: 0.05, length: 0.5 } }
  - kind: gripper
    tip: [0.1, 0.0, 0.0]
    shape:
      sphere:
        radius: 0.05
"#;
        let config = ArmConfig::from_yaml(yaml)?;

        let shapes: Vec<_> = config.joints.iter().map(|j| j.shape.clone()).collect();
        assert_eq!(
            shapes,
            vec![
                Some(ShapeConfig::Cuboid([1.0, 0.2, 0.2])),
                Some(ShapeConfig::Cylinder { radius: 0.05, length: 0.5 }),
                Some(ShapeConfig::Sphere { radius: 0.05 }),
            ]
        );

        // Written back out in the same single-key form
        let written = serde_yaml::to_string(&config)?;
        assert!(written.contains("cuboid:"));
        assert!(!written.contains('!'));
        assert_eq!(ArmConfig::from_yaml(&written)?, config);
        Ok(())
    }

    #[test]
    fn test_invalid_yaml() {
        let result = ArmConfig::from_yaml("name: [unterminated");
        assert!(matches!(result, Err(ConfigError::InvalidYaml(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "name: a\njoints:\n  - kind: static\n    tip: [1, 0, 0]\n    colour: red\n";
        assert!(matches!(
            ArmConfig::from_yaml(yaml),
            Err(ConfigError::InvalidYaml(_))
        ));
    }

    #[test]
    fn test_empty_name() {
        let yaml = "name: '  '\njoints:\n  - kind: static\n    tip: [1, 0, 0]\n";
        assert!(matches!(
            ArmConfig::from_yaml(yaml),
            Err(ConfigError::EmptyName)
        ));
    }

    #[test]
    fn test_no_joints() {
        let result = ArmConfig::from_yaml("name: empty\njoints: []\n");
        match result {
            Err(ConfigError::NoJoints { name }) => assert_eq!(name, "empty"),
            other => panic!("expected NoJoints, got {other:?}"),
        }
    }

    #[test]
    fn test_rotational_requires_axis() {
        let yaml = "name: a\njoints:\n  - kind: static\n    tip: [1, 0, 0]\n  - kind: rotational\n    tip: [1, 0, 0]\n";
        assert!(matches!(
            ArmConfig::from_yaml(yaml),
            Err(ConfigError::MissingRotationAxis { index: 1 })
        ));
    }

    #[test]
    fn test_prismatic_requires_both_limits() {
        let yaml = "name: a\njoints:\n  - kind: prismatic\n    tip: [1, 0, 0]\n    max_translation: 0.5\n";
        assert!(matches!(
            ArmConfig::from_yaml(yaml),
            Err(ConfigError::MissingTranslationLimits { index: 0 })
        ));
    }

    #[test]
    fn test_build_chain_is_contiguous() -> Result<()> {
        let chain = ArmConfig::from_yaml(PLANAR_ARM)?.build_chain()?;

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.joints()[1].origin(), &Point3::new(1.0, 0.0, 0.0));
        assert_eq!(chain.joints()[2].origin(), &Point3::new(1.5, 0.0, 0.0));
        assert!(chain.is_contiguous(1e-12));
        // Sphere of radius 0.05 spans 0.1 in every direction
        assert!((chain.joints()[2].length() - 0.1).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_build_chain_shows_reference_frames() -> Result<()> {
        let mut config = ArmConfig::from_yaml(PLANAR_ARM)?;
        config.reference_frames = true;

        let chain = config.build_chain()?;

        assert!(chain.joints().iter().all(|j| j.is_reference_frame_visible()));
        Ok(())
    }

    #[test]
    fn test_build_chain_reports_joint_index() -> Result<()> {
        let yaml = "name: a\njoints:\n  - kind: static\n    tip: [1, 0, 0]\n  - kind: gripper\n    origin: [2, 2, 2]\n    tip: [2, 2, 2]\n";
        let config = ArmConfig::from_yaml(yaml)?;

        let err = config.build_chain().unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidJoint {
                index: 1,
                source: robot_arm::Error::ZeroLength
            }
        ));
        Ok(())
    }

    #[test]
    fn test_inverted_limits_fail_at_build() -> Result<()> {
        let yaml = "name: a\njoints:\n  - kind: prismatic\n    tip: [1, 0, 0]\n    min_translation: 1.0\n    max_translation: 0.0\n";
        let config = ArmConfig::from_yaml(yaml)?;

        assert!(matches!(
            config.build_chain(),
            Err(ConfigError::InvalidJoint {
                index: 0,
                source: robot_arm::Error::InvalidTranslationLimits { .. }
            })
        ));
        Ok(())
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let yaml_path = temp_dir.path().join("arm.yaml");
        fs::write(&yaml_path, PLANAR_ARM).unwrap();
        let json_path = temp_dir.path().join("arm.JSON");
        fs::write(
            &json_path,
            r#"{"name": "j", "joints": [{"kind": "gripper", "tip": [0.1, 0, 0]}]}"#,
        )
        .unwrap();

        assert_eq!(ArmConfig::load_from_file(&yaml_path)?.name, "planar-arm");
        assert_eq!(ArmConfig::load_from_file(&json_path)?.name, "j");
        Ok(())
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = ArmConfig::load_from_file("/nonexistent/arm.yaml");
        match result {
            Err(ConfigError::FileRead { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/arm.yaml"));
            }
            other => panic!("expected FileRead, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_failure_keeps_path_and_cause() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.yaml");
        fs::write(&path, "name: a\njoints: []\n").unwrap();

        let err = ArmConfig::load_from_file(&path).unwrap_err();

        assert!(err.to_string().contains("broken.yaml"));
        let cause = err.source().expect("parse failure has a cause");
        assert_eq!(cause.to_string(), "Arm 'a' has no joints");
    }
}
