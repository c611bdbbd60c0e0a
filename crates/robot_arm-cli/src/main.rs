//! armpose CLI - Robot Arm Pose Inspector
//!
//! Builds a joint chain from an arm description and prints the pose of every
//! segment, optionally after driving joints to requested positions.

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::{Result, eyre::Context};
use robot_arm_cli::{ArmConfig, JointSetting, PoseReport, ReportFormat, apply_settings};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "armpose",
    about = "Robot arm pose inspector",
    long_about = "Build a robot arm from a YAML or JSON description, move its joints and report where every segment ends up"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the pose of an arm as described
    Show {
        /// Path to the arm description
        config: PathBuf,
        /// Output file for the report
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format (json, yaml)
        #[arg(short, long, default_value = "json")]
        format: String,
        /// Show every joint's reference frame
        #[arg(long)]
        reference_frames: bool,
    },
    /// Move joints, then print the resulting pose
    Pose {
        /// Path to the arm description
        config: PathBuf,
        /// Joint position request, applied in order
        #[arg(short, long = "set", value_name = "INDEX=VALUE")]
        settings: Vec<JointSetting>,
        /// Read angles in degrees instead of radians
        #[arg(long)]
        degrees: bool,
        /// Output file for the report
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format (json, yaml)
        #[arg(short, long, default_value = "json")]
        format: String,
    },
}

fn main() {
    color_eyre::config::HookBuilder::default()
        .capture_span_trace_by_default(true)
        .display_location_section(true)
        .display_env_section(false)
        .install()
        .expect("Failed to install color-eyre");

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Show {
            config,
            output,
            format,
            reference_frames,
        } => show_arm(config, output, format, reference_frames),
        Commands::Pose {
            config,
            settings,
            degrees,
            output,
            format,
        } => pose_arm(config, settings, degrees, output, format),
    };

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn show_arm(
    config_path: PathBuf,
    output_path: Option<PathBuf>,
    format: String,
    reference_frames: bool,
) -> Result<()> {
    let report_format = parse_format(&format)?;

    let mut config = load_config(&config_path)?;
    config.reference_frames |= reference_frames;
    let chain = config
        .build_chain()
        .with_context(|| format!("Failed to build arm '{}'", config.name))?;

    let report = PoseReport::new(&config.name, &chain, Vec::new());
    emit(&report, output_path, report_format)
}

fn pose_arm(
    config_path: PathBuf,
    settings: Vec<JointSetting>,
    degrees: bool,
    output_path: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let report_format = parse_format(&format)?;

    let config = load_config(&config_path)?;
    let mut chain = config
        .build_chain()
        .with_context(|| format!("Failed to build arm '{}'", config.name))?;

    let records = apply_settings(&mut chain, &settings, degrees)
        .with_context(|| format!("Failed to move arm '{}'", config.name))?;

    let report = PoseReport::new(&config.name, &chain, records);
    emit(&report, output_path, report_format)
}

fn load_config(path: &Path) -> Result<ArmConfig> {
    ArmConfig::load_from_file(path)
        .with_context(|| format!("Failed to load arm description {}", path.display()))
}

fn emit(report: &PoseReport, output_path: Option<PathBuf>, format: ReportFormat) -> Result<()> {
    if let Some(output_path) = output_path {
        report.save_to_file(&output_path, format)?;
        eprintln!("Report saved to: {}", output_path.display());
    } else {
        println!("{}", report.render(format)?);
    }

    // Summary goes to stderr so it doesn't interfere with stdout output
    eprintln!();
    eprint!("{}", report.summary());
    Ok(())
}

fn parse_format(format: &str) -> Result<ReportFormat> {
    ReportFormat::from_extension(format).ok_or_else(|| {
        color_eyre::eyre::eyre!(
            "Unsupported format '{}'. Supported formats: json, yaml",
            format
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use test_log::test;

    #[test]
    fn test_parse_format() -> Result<()> {
        assert_eq!(parse_format("json")?, ReportFormat::Json);
        assert_eq!(parse_format("yaml")?, ReportFormat::Yaml);
        assert_eq!(parse_format("yml")?, ReportFormat::Yaml);

        assert!(parse_format("xml").is_err());
        assert!(parse_format("urdf").is_err());

        Ok(())
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_pose_settings() {
        let cli = Cli::try_parse_from([
            "armpose", "pose", "arm.yaml", "--set", "0=1.5", "-s", "2=-0.25", "--degrees",
        ])
        .unwrap();

        match cli.command {
            Commands::Pose {
                settings, degrees, ..
            } => {
                assert!(degrees);
                assert_eq!(
                    settings,
                    vec![
                        JointSetting { index: 0, value: 1.5 },
                        JointSetting { index: 2, value: -0.25 },
                    ]
                );
            }
            Commands::Show { .. } => panic!("expected pose subcommand"),
        }
    }

    #[test]
    fn test_malformed_setting_rejected() {
        assert!(Cli::try_parse_from(["armpose", "pose", "arm.yaml", "--set", "zero"]).is_err());
    }
}
