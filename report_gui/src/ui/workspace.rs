//! Workspace Panel (Left)
//!
//! Shows the selected chart or dashboard and the report attached to it.

use iced::widget::{column, container, scrollable, text, Column, Space};
use iced::{Element, Length};

use report_core::api::ReportLookup;
use report_core::report::ReportObject;

use crate::{App, Message};

/// Render the report summary for the selected target
pub fn view_report_summary(app: &App) -> Element<'_, Message> {
    let panel: Column<'_, Message> = match app.current_target() {
        None => column![text("No target selected").size(14).color([0.5, 0.5, 0.5])],
        Some(target) => {
            let heading = format!(
                "{} #{}: {}",
                target.kind.label(),
                target.id,
                target.name.as_deref().unwrap_or("Untitled")
            );
            let mut panel = column![
                text(heading).size(14),
                text(format!(
                    "Visualization: {}",
                    target.viz_type.as_deref().unwrap_or("-")
                ))
                .size(11),
                Space::new().height(12),
            ]
            .spacing(6);

            panel = match app.store.report_for(target.kind, target.id) {
                Some(report) => panel.push(view_report(report)),
                None => panel
                    .push(text("No report scheduled.").size(11).color([0.5, 0.5, 0.5]))
                    .push(
                        text("Use the toolbar or right-click to schedule one.")
                            .size(11)
                            .color([0.5, 0.5, 0.5]),
                    ),
            };
            panel
        }
    };

    container(scrollable(panel.padding(8)))
        .width(Length::FillPortion(50))
        .height(Length::Fill)
        .style(container::bordered_box)
        .padding(5)
        .into()
}

fn view_report(report: ReportObject) -> Element<'static, Message> {
    let line = |label: &str, value: String| text(format!("{}: {}", label, value)).size(11);

    let recipients = report
        .recipients
        .iter()
        .map(|recipient| match recipient.target() {
            Some(target) => format!("{} ({})", target, recipient.recipient_type),
            None => recipient.recipient_type.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ");

    column![
        text("Scheduled report").size(12),
        line("Name", report.name.unwrap_or_default()),
        line("Schedule", report.crontab.unwrap_or_default()),
        line("Timezone", report.timezone.unwrap_or_else(|| "-".to_string())),
        line(
            "Format",
            report
                .report_format
                .map(|format| format.label().to_string())
                .unwrap_or_else(|| "-".to_string())
        ),
        line("Recipients", recipients),
    ]
    .spacing(4)
    .into()
}
