//! Pose report generation
//!
//! A report is the arm's name, the position requests that were applied and
//! a snapshot of every joint afterwards.

use std::fmt::Write as _;
use std::path::Path;

use color_eyre::{Result, eyre::Context};
use robot_arm::{Chain, ChainSnapshot};
use serde::{Deserialize, Serialize};

use crate::pose::CommandRecord;

/// Pose of a whole arm after a set of commands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoseReport {
    /// Arm name from the description file
    pub arm: String,
    /// Requests applied before the snapshot, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandRecord>,
    /// State of every joint
    pub chain: ChainSnapshot,
}

impl PoseReport {
    /// Capture the chain as it stands now
    pub fn new(arm: impl Into<String>, chain: &Chain, commands: Vec<CommandRecord>) -> Self {
        Self {
            arm: arm.into(),
            commands,
            chain: chain.snapshot(),
        }
    }

    /// Export to JSON format
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize pose report to JSON")
    }

    /// Export to YAML format
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize pose report to YAML")
    }

    /// Render in the requested format
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => self.to_json(),
            ReportFormat::Yaml => self.to_yaml(),
        }
    }

    /// Save to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P, format: ReportFormat) -> Result<()> {
        let path = path.as_ref();
        let content = self.render(format)?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;

        Ok(())
    }

    /// Human readable per-joint summary
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Pose Summary ===");
        let _ = writeln!(out, "Arm: {}", self.arm);
        let _ = writeln!(out, "Joints: {}", self.chain.joints.len());

        for (index, joint) in self.chain.joints.iter().enumerate() {
            let tip = joint.tip;
            let _ = write!(
                out,
                "  [{index}] {:<10} tip ({:.3}, {:.3}, {:.3})",
                joint.kind.name(),
                tip.x,
                tip.y,
                tip.z
            );
            for record in self.commands.iter().filter(|r| r.index == index) {
                let _ = write!(out, "  {}", record.outcome);
            }
            let _ = writeln!(out);
        }

        if let Some(end) = self.chain.end_effector {
            let _ = writeln!(
                out,
                "End effector: ({:.3}, {:.3}, {:.3})",
                end.x, end.y, end.z
            );
        }
        out
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Yaml,
}

impl ReportFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Yaml => "yaml",
        }
    }

    /// Parse format from a name or file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ReportFormat::Json),
            "yaml" | "yml" => Some(ReportFormat::Yaml),
            _ => None,
        }
    }
}
