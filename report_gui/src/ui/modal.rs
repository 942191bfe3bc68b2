//! Modal overlay helpers
//!
//! The backdrop dims the workspace and catches clicks outside the overlay.

use iced::widget::{button, container, opaque, Space};
use iced::{Element, Length};

use crate::Message;

/// Render a modal backdrop (semi-transparent overlay that catches clicks)
pub fn view_backdrop(on_dismiss: Message) -> Element<'static, Message> {
    backdrop(on_dismiss, 0.5)
}

/// Invisible overlay that dismisses popups such as the context menu
pub fn view_click_catcher(on_dismiss: Message) -> Element<'static, Message> {
    backdrop(on_dismiss, 0.0)
}

fn backdrop(on_dismiss: Message, alpha: f32) -> Element<'static, Message> {
    button(Space::new())
        .on_press(on_dismiss)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_, _| {
            iced::widget::button::Style::default()
                .with_background(iced::Color::from_rgba(0.0, 0.0, 0.0, alpha))
        })
        .into()
}

/// Center `content` in the window inside a bordered box
pub fn centered<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    let modal_box = container(content)
        .padding(20)
        .style(container::bordered_box);

    // Clicks inside the box must not reach the backdrop
    container(opaque(modal_box))
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(iced::alignment::Horizontal::Center)
        .align_y(iced::alignment::Vertical::Center)
        .into()
}
