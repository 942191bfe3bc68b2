//! # Report Forms CLI
//!
//! Terminal front end for `report_core`. Drives the same report editor the
//! GUI uses, so defaults, validation and payload shape are identical.
//!
//! ```text
//! report_cli menu-offset --y 500 --items 10 --window-height 800
//! report_cli payload --target-id 7 --target-name Sales --viz-type table
//! report_cli submit --target-id 7 --delivery s3 --s3-method iam --bucket reports --iam-role arn:...
//! ```

mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use report_core::api::HttpReportApi;
use report_core::config::AppConfig;
use report_core::editor::{ReportEditor, ReportEditorProps, SaveOutcome};
use report_core::menu::{compute_menu_offset_with, viewport_height};
use report_core::report::{DeliveryMethod, ReportObject};
use report_core::{ReportError, ReportResult};

use cli::{Cli, Commands, MenuOffsetArgs, ReportArgs};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ReportResult<()> {
    let config = AppConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::MenuOffset(args) => {
            println!("{}", menu_offset(&config, &args));
            Ok(())
        }
        Commands::Payload(args) => {
            let editor = build_editor(&config, &args);
            let payload = editor.build_payload();
            payload.validate()?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
        Commands::Submit(args) => submit(&config, &args).await,
    }
}

fn menu_offset(config: &AppConfig, args: &MenuOffsetArgs) -> f32 {
    let viewport = viewport_height(
        args.document_height.unwrap_or(args.window_height),
        args.window_height,
    );
    compute_menu_offset_with(args.y, args.items, viewport, config.menu)
}

/// Open an editor and type the arguments into it, as a user would.
fn build_editor(config: &AppConfig, args: &ReportArgs) -> ReportEditor {
    let delivery_type = DeliveryMethod::from(args.delivery);
    let props = ReportEditorProps::new(args.target(), config.acting_user(), delivery_type)
        .with_options(config.editor.clone());
    let existing = args.report_id.map(|id| ReportObject {
        id: Some(id),
        ..ReportObject::default()
    });
    let mut editor = ReportEditor::open(props, existing);

    if let Some(name) = &args.name {
        editor.set_name(name.clone());
    }
    if let Some(description) = &args.description {
        editor.set_description(description.clone());
    }
    if let Some(crontab) = &args.crontab {
        editor.set_crontab(crontab.clone());
    }
    if let Some(timezone) = &args.timezone {
        editor.set_timezone(Some(timezone.clone()));
    }
    if let Some(format) = args.format {
        editor.set_report_format(format.into());
    }
    if let Some(sub_method) = args.s3_method {
        editor.select_s3_method(sub_method.into());
    }
    if let Some(bucket) = &args.bucket {
        editor.set_bucket_name(bucket.clone());
    }
    if let Some(key) = &args.access_key {
        editor.set_access_key(key.clone());
    }
    if let Some(key) = &args.secret_key {
        editor.set_secret_key(key.clone());
    }
    if let Some(role) = &args.iam_role {
        editor.set_iam_role(role.clone());
    }
    editor
}

async fn submit(config: &AppConfig, args: &ReportArgs) -> ReportResult<()> {
    let api = HttpReportApi::new(&config.api)?;
    let mut editor = build_editor(config, args);

    let mut dismissed = false;
    let outcome = editor.save(&api, || dismissed = true).await;
    match outcome {
        SaveOutcome::Saved(report) => {
            tracing::info!(dismissed, "report submitted");
            println!(
                "Saved report {} ({})",
                report.id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string()),
                report.name.as_deref().unwrap_or(&editor.draft().name)
            );
            Ok(())
        }
        SaveOutcome::Failed(err) => Err(ReportError::Http {
            reason: err.to_string(),
        }),
        SaveOutcome::NotStarted | SaveOutcome::Stale => Err(ReportError::invalid_input(
            "report",
            editor
                .draft()
                .error
                .clone()
                .unwrap_or_else(|| "nothing to save".to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_offset_uses_taller_viewport() {
        let config = AppConfig::default();
        let args = MenuOffsetArgs {
            y: 500.0,
            items: 10,
            window_height: 600.0,
            document_height: Some(800.0),
        };
        assert_eq!(menu_offset(&config, &args), 448.0);
    }

    #[test]
    fn test_build_editor_applies_arguments() {
        let cli = Cli::try_parse_from([
            "report_cli",
            "payload",
            "--target-id",
            "3",
            "--target-name",
            "Ops",
            "--kind",
            "dashboard",
            "--crontab",
            "0 8 * * *",
            "--timezone",
            "UTC",
        ])
        .unwrap();
        let Commands::Payload(args) = cli.command else {
            panic!("expected payload");
        };
        let editor = build_editor(&AppConfig::default(), &args);
        let payload = editor.build_payload();
        assert_eq!(payload.name, "Weekly Report for Ops");
        assert_eq!(payload.crontab, "0 8 * * *");
        assert_eq!(payload.timezone.as_deref(), Some("UTC"));
        assert_eq!(payload.dashboard, Some(3));
        assert!(payload.chart.is_none());
    }
}
