//! Toolbar component
//!
//! Contains the target picker, the report actions and the theme toggle.

use iced::widget::{button, pick_list, row, text, Space};
use iced::{Alignment, Element, Length, Padding};

use report_core::report::DeliveryMethod;

use crate::{App, Message};

/// Render the toolbar
pub fn view_toolbar(app: &App) -> Element<'_, Message> {
    let selected = app.targets.get(app.selected_target).cloned();
    let target_picker = pick_list(app.targets.as_slice(), selected, Message::TargetSelected)
        .width(Length::Fixed(260.0))
        .text_size(11);

    let (email_label, s3_label) = if app.has_report() {
        ("Edit email report", "Edit S3 report")
    } else {
        ("Schedule email report", "Schedule S3 report")
    };

    let report_buttons = row![
        button(text(email_label).size(11))
            .on_press(Message::OpenReport(DeliveryMethod::Email))
            .padding(Padding::from([4, 8]))
            .style(button::primary),
        button(text(s3_label).size(11))
            .on_press(Message::OpenReport(DeliveryMethod::S3))
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
    ]
    .spacing(4);

    let theme_label = if app.dark_mode { "Light Mode" } else { "Dark Mode" };

    row![
        text("Report Forms").size(20),
        Space::new().width(16),
        target_picker,
        Space::new().width(8),
        report_buttons,
        Space::new().width(Length::Fill),
        button(text(theme_label).size(11))
            .on_press(Message::ToggleDarkMode)
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
    ]
    .padding(Padding::from([4, 0]))
    .align_y(Alignment::Center)
    .into()
}
