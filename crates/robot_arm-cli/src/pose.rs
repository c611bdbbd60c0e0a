//! Joint position requests from the command line

use std::fmt;
use std::str::FromStr;

use robot_arm::{Chain, CommandOutcome, JointCommand, JointKind};
use serde::{Deserialize, Serialize};

/// A single `INDEX=VALUE` request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSetting {
    pub index: usize,
    pub value: f64,
}

impl FromStr for JointSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected INDEX=VALUE, got '{s}'"))?;
        let index = index
            .trim()
            .parse()
            .map_err(|_| format!("invalid joint index '{}'", index.trim()))?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| format!("invalid joint value '{}'", value.trim()))?;
        if !value.is_finite() {
            return Err(format!("joint value must be finite, got '{value}'"));
        }
        Ok(Self { index, value })
    }
}

impl fmt::Display for JointSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.index, self.value)
    }
}

/// What happened to one requested setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub index: usize,
    pub kind: String,
    pub requested: f64,
    pub outcome: String,
    pub clamped: bool,
}

/// Map a raw value onto the command a joint of this kind understands
///
/// Prismatic joints take a translation; every other kind takes an angle,
/// which static joints and grippers ignore.
pub fn command_for(kind: &JointKind, value: f64, degrees: bool) -> JointCommand {
    match kind {
        JointKind::Prismatic(_) => JointCommand::Translate(value),
        _ if degrees => JointCommand::SetAngle(value.to_radians()),
        _ => JointCommand::SetAngle(value),
    }
}

/// Apply settings to the chain in order, recording each outcome
pub fn apply_settings(
    chain: &mut Chain,
    settings: &[JointSetting],
    degrees: bool,
) -> robot_arm::Result<Vec<CommandRecord>> {
    let mut records = Vec::with_capacity(settings.len());
    for setting in settings {
        let kind = match chain.joint(setting.index) {
            Some(joint) => *joint.kind(),
            None => {
                return Err(robot_arm::Error::JointIndexOutOfRange {
                    index: setting.index,
                    len: chain.len(),
                });
            }
        };
        let outcome = chain.apply(setting.index, command_for(&kind, setting.value, degrees))?;
        if matches!(outcome, CommandOutcome::Ignored) {
            tracing::info!(index = setting.index, kind = %kind, "joint ignores position requests");
        }
        records.push(CommandRecord {
            index: setting.index,
            kind: kind.name().to_string(),
            requested: setting.value,
            outcome: outcome.to_string(),
            clamped: outcome.is_clamped(),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_arm::{Axis, Joint, Point3, TranslationLimits};
    use std::f64::consts::FRAC_PI_2;
    use test_log::test;

    fn arm() -> Chain {
        Chain::new(vec![
            Joint::rotational(Point3::origin(), Point3::new(1.0, 0.0, 0.0), Axis::Y).unwrap(),
            Joint::prismatic(
                Point3::origin(),
                Point3::new(0.5, 0.0, 0.0),
                TranslationLimits::new(0.0, 0.25).unwrap(),
            )
            .unwrap(),
            Joint::gripper(Point3::origin(), Point3::new(0.1, 0.0, 0.0)).unwrap(),
        ])
    }

    #[test]
    fn test_parse_setting() {
        assert_eq!(
            "1=0.5".parse::<JointSetting>(),
            Ok(JointSetting { index: 1, value: 0.5 })
        );
        assert_eq!(
            " 0 = -1.25 ".parse::<JointSetting>(),
            Ok(JointSetting { index: 0, value: -1.25 })
        );
    }

    #[test]
    fn test_parse_setting_errors() {
        assert!("1".parse::<JointSetting>().unwrap_err().contains("INDEX=VALUE"));
        assert!("a=1".parse::<JointSetting>().unwrap_err().contains("index 'a'"));
        assert!("-1=1".parse::<JointSetting>().is_err());
        assert!("0=abc".parse::<JointSetting>().unwrap_err().contains("value 'abc'"));
        assert!("0=NaN".parse::<JointSetting>().unwrap_err().contains("finite"));
    }

    #[test]
    fn test_command_for_kind() {
        let rotational = JointKind::Rotational { rotation_axis: Axis::Z };
        let prismatic = JointKind::Prismatic(TranslationLimits { min: 0.0, max: 1.0 });

        assert_eq!(command_for(&rotational, 0.5, false), JointCommand::SetAngle(0.5));
        assert_eq!(
            command_for(&rotational, 90.0, true),
            JointCommand::SetAngle(90.0f64.to_radians())
        );
        assert_eq!(command_for(&prismatic, 90.0, true), JointCommand::Translate(90.0));
        assert_eq!(command_for(&JointKind::Static, 1.0, false), JointCommand::SetAngle(1.0));
    }

    #[test]
    fn test_apply_settings_in_order() {
        let mut chain = arm();
        let settings = [
            JointSetting { index: 0, value: FRAC_PI_2 },
            JointSetting { index: 1, value: 0.75 },
            JointSetting { index: 2, value: 1.0 },
        ];

        let records = apply_settings(&mut chain, &settings, false).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].kind, "rotational");
        assert!(!records[0].clamped);
        assert_eq!(records[1].kind, "prismatic");
        assert!(records[1].clamped);
        assert_eq!(records[2].outcome, "ignored");
        assert!(chain.is_contiguous(1e-9));
        assert!((chain.joints()[1].translation() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_apply_settings_out_of_range() {
        let mut chain = arm();
        let err = apply_settings(&mut chain, &[JointSetting { index: 7, value: 0.0 }], false)
            .unwrap_err();
        assert!(matches!(
            err,
            robot_arm::Error::JointIndexOutOfRange { index: 7, len: 3 }
        ));
    }
}
