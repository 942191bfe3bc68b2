//! Notification Methods Panel (Right)
//!
//! Lists the alert's delivery settings. Each row renders the
//! [`NotificationMethodView`] of its editor.

use iced::widget::{
    button, column, container, pick_list, row, rule, scrollable, text, text_input, Column, Space,
};
use iced::{Alignment, Element, Length, Padding};

use report_core::editor::{parse_recipients, NotificationMethodView};

use crate::{App, Message, NotificationRow};

/// Render the notification method list
pub fn view_notification_list(app: &App) -> Element<'_, Message> {
    let mut panel: Column<'_, Message> = column![
        row![
            text("Notification methods").size(14),
            Space::new().width(Length::Fill),
            button(text("+ Add").size(11))
                .on_press(Message::AddNotificationMethod)
                .padding(Padding::from([4, 8]))
                .style(button::secondary),
        ]
        .align_y(Alignment::Center),
        Space::new().height(8),
    ]
    .spacing(6);

    if app.notification_rows.is_empty() {
        panel = panel.push(
            text("No notification methods yet.")
                .size(11)
                .color([0.5, 0.5, 0.5]),
        );
    }

    for row in &app.notification_rows {
        if let Some(method_view) = row.editor.view(Some(&row.setting)) {
            panel = panel
                .push(view_row(row, method_view))
                .push(rule::horizontal(1));
        }
    }

    container(scrollable(panel.padding(8)))
        .width(Length::FillPortion(50))
        .height(Length::Fill)
        .style(container::bordered_box)
        .padding(5)
        .into()
}

fn view_row(entry: &NotificationRow, method_view: NotificationMethodView) -> Element<'_, Message> {
    let id = entry.id;

    let mut header = row![
        text("Notification method").size(11).width(Length::Fixed(130.0)),
        pick_list(method_view.method_options, method_view.method, move |method| {
            Message::NotificationMethodSelected(id, method)
        })
        .placeholder("Select Delivery Method")
        .width(Length::Fill)
        .text_size(11),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    if method_view.show_delete {
        header = header.push(
            button(text("Delete").size(11))
                .on_press(Message::RemoveNotificationMethod(id))
                .padding(Padding::from([4, 8]))
                .style(button::danger),
        );
    }

    let mut body = column![header].spacing(6);

    if let Some(selector) = method_view.s3_method_selector {
        body = body.push(
            row![
                text("Storage method").size(11).width(Length::Fixed(130.0)),
                pick_list(selector.options, selector.selected, move |sub_method| {
                    Message::NotificationS3MethodSelected(id, sub_method)
                })
                .placeholder("Select a method")
                .width(Length::Fill)
                .text_size(11),
            ]
            .spacing(6)
            .align_y(Alignment::Center),
        );
    }

    for input in method_view.s3_inputs {
        let field = input.field;
        body = body.push(
            row![
                text(field.label()).size(11).width(Length::Fixed(130.0)),
                text_input(field.placeholder(), &input.value)
                    .on_input(move |value| Message::NotificationS3FieldChanged(id, field, value))
                    .secure(field.is_secret())
                    .width(Length::Fill)
                    .padding(4)
                    .size(11),
            ]
            .spacing(6)
            .align_y(Alignment::Center),
        );
    }

    if let Some(recipients) = method_view.recipients {
        let count = parse_recipients(&recipients.value).len();
        body = body
            .push(
                row![
                    text(recipients.label).size(11).width(Length::Fixed(130.0)),
                    text_input("", &recipients.value)
                        .on_input(move |value| Message::NotificationRecipientsChanged(id, value))
                        .width(Length::Fill)
                        .padding(4)
                        .size(11),
                ]
                .spacing(6)
                .align_y(Alignment::Center),
            )
            .push(
                text(format!("{} ({} recipients)", recipients.hint, count))
                    .size(10)
                    .color([0.5, 0.5, 0.5]),
            );
    }

    body.into()
}
