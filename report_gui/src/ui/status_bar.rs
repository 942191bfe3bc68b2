//! Status Bar (Bottom)
//!
//! Displays:
//! - Number of saved reports
//! - Status messages

use iced::widget::{row, text, Space};
use iced::{Element, Length, Padding};

use crate::Message;

/// Render the status bar
pub fn view_status_bar(status: &str, saved_reports: usize) -> Element<'_, Message> {
    let saved = match saved_reports {
        0 => "No saved reports".to_string(),
        1 => "1 saved report".to_string(),
        n => format!("{} saved reports", n),
    };

    row![
        text(saved).size(10),
        Space::new().width(Length::Fill),
        text(status).size(10),
    ]
    .padding(Padding::from([4, 0]))
    .into()
}
