//! Report scheduling modal
//!
//! Renders the editor's [`ReportFormView`]. Which inputs appear is decided in
//! `report_core`; this module only lays them out.

use iced::widget::{
    button, column, container, pick_list, radio, row, rule, scrollable, text, text_input, Column,
    Space,
};
use iced::{Alignment, Element, Length, Padding};

use report_core::editor::{ErrorBanner, FieldView, ReportFormView};

use super::{labeled_input, modal};
use crate::{Message, ReportModal};

/// Offered in the timezone dropdown
const TIMEZONES: &[&str] = &[
    "UTC",
    "America/New_York",
    "America/Chicago",
    "America/Denver",
    "America/Los_Angeles",
    "Europe/London",
    "Europe/Berlin",
    "Asia/Kolkata",
    "Asia/Tokyo",
    "Australia/Sydney",
];

/// Render the report modal
pub fn view(modal_state: &ReportModal) -> Element<'_, Message> {
    let form = modal_state.editor.view();

    let mut content: Column<'_, Message> = column![
        text(form.title.clone()).size(18),
        Space::new().height(12),
        view_details(&form),
        Space::new().height(12),
        rule::horizontal(1),
        Space::new().height(12),
        view_schedule(&form),
    ]
    .spacing(4);

    if let Some(selector) = &form.format_selector {
        let mut formats = column![text("Message content").size(12)].spacing(4);
        for &format in &selector.options {
            formats = formats.push(
                radio(
                    format.label(),
                    format,
                    Some(selector.selected),
                    Message::ReportFormatSelected,
                )
                .size(14)
                .text_size(11),
            );
        }
        content = content.push(Space::new().height(12)).push(formats);
    }

    if let Some(selector) = &form.s3_method_selector {
        content = content.push(Space::new().height(12)).push(
            row![
                text("Storage method:").size(11).width(Length::Fixed(110.0)),
                pick_list(
                    selector.options.clone(),
                    selector.selected,
                    Message::ReportS3MethodSelected
                )
                .placeholder("Select a method")
                .width(Length::Fill)
                .text_size(11),
            ]
            .align_y(Alignment::Center),
        );
    }

    if !form.s3_inputs.is_empty() {
        content = content.push(view_s3_inputs(&form.s3_inputs));
    }

    if let Some(banner) = &form.error_banner {
        content = content.push(Space::new().height(12)).push(view_error(banner));
    }

    if modal_state.show_payload {
        let payload = serde_json::to_string_pretty(&modal_state.editor.build_payload())
            .unwrap_or_else(|e| format!("Unable to render payload: {}", e));
        content = content.push(Space::new().height(12)).push(
            container(scrollable(text(payload).size(10)).height(Length::Fixed(160.0)))
                .padding(6)
                .width(Length::Fill)
                .style(container::bordered_box),
        );
    }

    content = content
        .push(Space::new().height(20))
        .push(view_footer(&form, modal_state.show_payload));

    modal::centered(scrollable(content.width(Length::Fixed(460.0))).height(Length::Shrink))
}

fn view_details(form: &ReportFormView) -> Column<'static, Message> {
    column![
        text("Report details").size(12),
        labeled_input(
            "Report name",
            &form.name_placeholder,
            &form.name,
            Message::ReportNameChanged
        ),
        labeled_input(
            "Description",
            "Include a description that will be sent with your report",
            &form.description,
            Message::ReportDescriptionChanged
        ),
    ]
    .spacing(6)
}

fn view_schedule(form: &ReportFormView) -> Column<'static, Message> {
    let mut schedule = column![
        text("Schedule").size(12),
        labeled_input(
            "Cron schedule",
            "0 12 * * 1",
            &form.crontab,
            Message::ReportCrontabChanged
        ),
    ]
    .spacing(6);

    if let Some(error) = &form.cron_error {
        schedule = schedule.push(text(error.clone()).size(10).color([0.8, 0.2, 0.2]));
    }

    let timezones: Vec<String> = TIMEZONES.iter().map(|tz| tz.to_string()).collect();
    schedule.push(
        row![
            text("Timezone:").size(11).width(Length::Fixed(110.0)),
            pick_list(timezones, form.timezone.clone(), Message::ReportTimezoneSelected)
                .placeholder("Select a timezone")
                .width(Length::Fill)
                .text_size(11),
        ]
        .align_y(Alignment::Center),
    )
}

fn view_s3_inputs(inputs: &[FieldView]) -> Column<'static, Message> {
    inputs.iter().fold(column![].spacing(6), |col, input| {
        let field = input.field;
        col.push(
            row![
                text(field.label()).size(11).width(Length::Fixed(110.0)),
                text_input(field.placeholder(), &input.value)
                    .on_input(move |value| Message::ReportS3FieldChanged(field, value))
                    .secure(field.is_secret())
                    .width(Length::Fill)
                    .padding(4)
                    .size(11),
            ]
            .align_y(Alignment::Center),
        )
    })
}

fn view_error(banner: &ErrorBanner) -> Element<'static, Message> {
    container(
        column![
            text(banner.message.clone()).size(12),
            text(banner.description.clone()).size(11),
        ]
        .spacing(2),
    )
    .padding(8)
    .width(Length::Fill)
    .style(|_theme: &iced::Theme| container::Style {
        text_color: Some(iced::Color::from_rgb(0.6, 0.1, 0.1)),
        background: Some(iced::Background::Color(iced::Color::from_rgb(0.99, 0.92, 0.92))),
        border: iced::Border {
            color: iced::Color::from_rgb(0.9, 0.6, 0.6),
            width: 1.0,
            radius: 4.0.into(),
        },
        shadow: iced::Shadow::default(),
        snap: false,
    })
    .into()
}

fn view_footer(form: &ReportFormView, show_payload: bool) -> Element<'static, Message> {
    let save_label = if form.save.busy {
        format!("{}...", form.save.label)
    } else {
        form.save.label.clone()
    };
    let can_press = form.save.enabled && !form.save.busy;
    let payload_label = if show_payload { "Hide payload" } else { "Show payload" };

    row![
        button(text(payload_label).size(11))
            .on_press(Message::TogglePayloadPreview)
            .padding(Padding::from([6, 16]))
            .style(button::secondary),
        Space::new().width(Length::Fill),
        button(text("Cancel").size(11))
            .on_press(Message::CloseReport)
            .padding(Padding::from([6, 16]))
            .style(button::secondary),
        Space::new().width(8),
        button(text(save_label).size(11))
            .on_press_maybe(can_press.then_some(Message::SaveReport))
            .padding(Padding::from([6, 16]))
            .style(button::primary),
    ]
    .align_y(Alignment::Center)
    .into()
}
