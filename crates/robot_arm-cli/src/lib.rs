//! armpose - Robot Arm Pose Inspector
//!
//! Loads an arm description, drives its joints to requested positions and
//! reports the resulting pose of every segment.

pub mod config;
pub mod pose;
pub mod report;

pub use config::{ArmConfig, ConfigError, JointConfig};
pub use pose::{CommandRecord, JointSetting, apply_settings};
pub use report::{PoseReport, ReportFormat};

/// Main result type using color-eyre for error handling
pub type Result<T> = color_eyre::Result<T>;
