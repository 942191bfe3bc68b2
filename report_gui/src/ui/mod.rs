//! UI module for the Report Forms GUI
//!
//! # Panel Structure
//! - `toolbar` - Target picker, report actions, theme toggle
//! - `workspace` - Left panel: report attached to the selected target
//! - `notification_method` - Right panel: the alert's notification methods
//! - `status_bar` - Bottom status messages
//!
//! # Overlays
//! - `modal` - Backdrop shared by overlays
//! - `report_modal` - Report scheduling form
//! - `context_menu` - Right-click menu, kept inside the window

// Panels
pub mod toolbar;
pub mod workspace;
pub mod notification_method;
pub mod status_bar;

// Overlays
pub mod modal;
pub mod report_modal;
pub mod context_menu;

use iced::widget::{row, text, text_input};
use iced::{Alignment, Element, Length};

use crate::Message;

/// Helper to create a labeled text input
pub(crate) fn labeled_input<'a>(
    label: &'a str,
    placeholder: &str,
    value: &str,
    on_change: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    row![
        text(label).size(11).width(Length::Fixed(110.0)),
        text_input(placeholder, value)
            .on_input(on_change)
            .width(Length::Fill)
            .padding(4)
            .size(11),
    ]
    .align_y(Alignment::Center)
    .into()
}
