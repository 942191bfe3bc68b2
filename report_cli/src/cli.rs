//! Command line structure
//!
//! `menu-offset` runs the popup positioning rule, `payload` previews the body
//! a save would send, and `submit` sends it to the report API.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use report_core::config::CONFIG_ENV_VAR;
use report_core::report::{DeliveryMethod, ReportFormat, ReportTarget, S3SubMethod};

/// Report Forms - schedule chart and dashboard reports from the terminal
#[derive(Parser)]
#[command(name = "report_cli")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute where a context menu opens so it stays inside the viewport
    MenuOffset(MenuOffsetArgs),

    /// Print the JSON body a save would send
    Payload(ReportArgs),

    /// Create or update the report through the report API
    Submit(ReportArgs),
}

#[derive(Args, Debug)]
pub struct MenuOffsetArgs {
    /// Pointer y-coordinate of the click
    #[arg(long)]
    pub y: f32,

    /// Number of menu items
    #[arg(long)]
    pub items: usize,

    /// Window inner height
    #[arg(long)]
    pub window_height: f32,

    /// Document client height, when it differs from the window
    #[arg(long)]
    pub document_height: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TargetKind {
    Chart,
    Dashboard,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DeliveryArg {
    #[default]
    Email,
    S3,
}

impl From<DeliveryArg> for DeliveryMethod {
    fn from(arg: DeliveryArg) -> Self {
        match arg {
            DeliveryArg::Email => DeliveryMethod::Email,
            DeliveryArg::S3 => DeliveryMethod::S3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Png,
    Csv,
    Text,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ReportFormat::Png,
            FormatArg::Csv => ReportFormat::Csv,
            FormatArg::Text => ReportFormat::Text,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum S3MethodArg {
    Credentials,
    Pyconfig,
    Iam,
}

impl From<S3MethodArg> for S3SubMethod {
    fn from(arg: S3MethodArg) -> Self {
        match arg {
            S3MethodArg::Credentials => S3SubMethod::Credentials,
            S3MethodArg::Pyconfig => S3SubMethod::PyConfig,
            S3MethodArg::Iam => S3SubMethod::Iam,
        }
    }
}

/// Report form input shared by `payload` and `submit`
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Resource the report is attached to
    #[arg(long, value_enum, default_value = "chart")]
    pub kind: TargetKind,

    /// Chart or dashboard id
    #[arg(long)]
    pub target_id: i64,

    /// Chart or dashboard name, used in the default report name
    #[arg(long)]
    pub target_name: Option<String>,

    /// Visualization kind of the chart
    #[arg(long)]
    pub viz_type: Option<String>,

    #[arg(long, value_enum, default_value = "email")]
    pub delivery: DeliveryArg,

    /// Edit this existing report instead of creating one
    #[arg(long)]
    pub report_id: Option<i64>,

    /// Report name (defaults to "Weekly Report for <target name>")
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub crontab: Option<String>,

    #[arg(long)]
    pub timezone: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// S3 credential style
    #[arg(long, value_enum)]
    pub s3_method: Option<S3MethodArg>,

    #[arg(long)]
    pub bucket: Option<String>,

    #[arg(long, env = "REPORT_AWS_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    #[arg(long, env = "REPORT_AWS_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    #[arg(long)]
    pub iam_role: Option<String>,
}

impl ReportArgs {
    pub fn target(&self) -> ReportTarget {
        match self.kind {
            TargetKind::Chart => {
                ReportTarget::chart(self.target_id, self.target_name.clone(), self.viz_type.clone())
            }
            TargetKind::Dashboard => ReportTarget::dashboard(self.target_id, self.target_name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submit_arguments() {
        let cli = Cli::try_parse_from([
            "report_cli",
            "submit",
            "--target-id",
            "7",
            "--target-name",
            "Sales",
            "--delivery",
            "s3",
            "--s3-method",
            "iam",
            "--bucket",
            "reports",
        ])
        .unwrap();
        let Commands::Submit(args) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(args.kind, TargetKind::Chart);
        assert_eq!(DeliveryMethod::from(args.delivery), DeliveryMethod::S3);
        assert_eq!(args.s3_method.map(S3SubMethod::from), Some(S3SubMethod::Iam));
        assert!(args.target().is_chart());
    }
}
