//! Right-click context menu
//!
//! Anchored at the cursor. The vertical offset comes from
//! [`report_core::menu::compute_menu_offset_with`] so the menu never runs
//! past the bottom of the window.

use iced::widget::{button, column, container, text};
use iced::{Element, Length, Padding};

use report_core::report::DeliveryMethod;

use crate::{App, ContextMenu, Message};

/// Entries rendered by [`view`]
pub const MENU_ITEM_COUNT: usize = 3;

/// Menu width in logical pixels
const MENU_WIDTH: f32 = 200.0;

/// Render the context menu at its computed position
pub fn view(app: &App, menu: ContextMenu) -> Element<'_, Message> {
    let item_height = app.config.menu.item_height;
    let email_label = if app.has_report() {
        "Edit email report"
    } else {
        "Schedule email report"
    };

    let item = |label: &'static str, message: Message| {
        button(text(label).size(11))
            .on_press(message)
            .padding(Padding::from([4, 12]))
            .width(Length::Fill)
            .height(Length::Fixed(item_height))
            .style(button::secondary)
    };

    let items = column![
        item(email_label, Message::OpenReport(DeliveryMethod::Email)),
        item("Schedule S3 report", Message::OpenReport(DeliveryMethod::S3)),
        item("Add notification method", Message::AddNotificationMethod),
    ]
    .width(Length::Fixed(MENU_WIDTH));

    // Keep the menu horizontally inside the window as well
    let x = menu.x.min((app.window_size.width - MENU_WIDTH).max(0.0));

    container(container(items).padding(4).style(container::bordered_box))
        .padding(Padding {
            top: menu.y.max(0.0),
            left: x,
            ..Padding::ZERO
        })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
