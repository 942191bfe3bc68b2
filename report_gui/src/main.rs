//! # Report Forms GUI
//!
//! Desktop host for the report scheduling modal and the alert notification
//! method list. Built with Iced; all form state lives in `report_core`.
//!
//! Right-click the workspace to open the context menu. The menu is kept
//! inside the window using the same offset rule the web menu uses.

mod ui;
mod update;

use std::fmt;
use std::sync::Arc;

use iced::widget::{column, container, mouse_area, row, stack, Space};
use iced::{event, mouse, window, Element, Event, Length, Point, Size, Subscription, Task, Theme};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use report_core::api::{ApiError, HttpReportApi, ReportLookup, ReportStore};
use report_core::config::AppConfig;
use report_core::editor::{DeliverySetting, NotificationMethodEditor, ReportEditor};
use report_core::report::{
    DeliveryMethod, ReportFormat, ReportObject, ReportTarget, S3Field, S3SubMethod,
};

/// Initial window size (logical pixels)
const WINDOW_SIZE: Size = Size::new(1100.0, 760.0);

// ============================================================================
// Application State
// ============================================================================

/// A chart or dashboard offered in the toolbar
#[derive(Debug, Clone, PartialEq)]
pub struct TargetOption {
    pub index: usize,
    pub target: ReportTarget,
}

impl fmt::Display for TargetOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.target.name.as_deref().unwrap_or("Untitled");
        write!(f, "{} #{} - {}", self.target.kind.label(), self.target.id, name)
    }
}

/// Resources the workspace can schedule reports for
fn workspace_targets() -> Vec<TargetOption> {
    [
        ReportTarget::chart(1, Some("Sales".to_string()), Some("table".to_string())),
        ReportTarget::chart(2, Some("Revenue Trend".to_string()), Some("echarts_timeseries_line".to_string())),
        ReportTarget::dashboard(3, Some("Executive Overview".to_string())),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, target)| TargetOption { index, target })
    .collect()
}

/// The open report modal
pub struct ReportModal {
    pub editor: ReportEditor,
    pub show_payload: bool,
}

/// One entry of the alert's notification settings
pub struct NotificationRow {
    pub id: Uuid,
    pub setting: DeliverySetting,
    pub editor: NotificationMethodEditor,
}

/// Open context menu, anchored where the right-click happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    pub x: f32,
    pub y: f32,
}

pub struct App {
    pub config: AppConfig,
    api: Option<Arc<HttpReportApi>>,
    pub store: ReportStore,

    pub targets: Vec<TargetOption>,
    pub selected_target: usize,

    pub report_modal: Option<ReportModal>,
    pub notification_rows: Vec<NotificationRow>,

    pub context_menu: Option<ContextMenu>,
    pub cursor: Point,
    pub window_size: Size,

    pub status: String,
    pub dark_mode: bool,
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone)]
pub enum Message {
    // Toolbar
    TargetSelected(TargetOption),
    ToggleDarkMode,

    // Report modal
    OpenReport(DeliveryMethod),
    CloseReport,
    ReportNameChanged(String),
    ReportDescriptionChanged(String),
    ReportCrontabChanged(String),
    ReportTimezoneSelected(String),
    ReportFormatSelected(ReportFormat),
    ReportS3MethodSelected(S3SubMethod),
    ReportS3FieldChanged(S3Field, String),
    TogglePayloadPreview,
    SaveReport,
    ReportSaved(u64, Result<ReportObject, ApiError>),

    // Notification methods
    AddNotificationMethod,
    NotificationMethodSelected(Uuid, DeliveryMethod),
    NotificationRecipientsChanged(Uuid, String),
    NotificationS3MethodSelected(Uuid, S3SubMethod),
    NotificationS3FieldChanged(Uuid, S3Field, String),
    RemoveNotificationMethod(Uuid),

    // Context menu and window tracking
    OpenContextMenu,
    CloseContextMenu,
    CursorMoved(Point),
    WindowResized(Size),
}

impl App {
    fn new(config: AppConfig) -> Self {
        let api = match HttpReportApi::new(&config.api) {
            Ok(api) => Some(Arc::new(api)),
            Err(e) => {
                tracing::error!(error = %e, "report API client unavailable");
                None
            }
        };
        let status = match &api {
            Some(_) => format!("Connected to {}", config.api.base_url),
            None => "Report API unavailable; saving is disabled".to_string(),
        };

        App {
            config,
            api,
            store: ReportStore::new(),
            targets: workspace_targets(),
            selected_target: 0,
            report_modal: None,
            notification_rows: Vec::new(),
            context_menu: None,
            cursor: Point::ORIGIN,
            window_size: WINDOW_SIZE,
            status,
            dark_mode: false,
        }
    }

    pub fn api(&self) -> Option<Arc<HttpReportApi>> {
        self.api.clone()
    }

    pub fn current_target(&self) -> Option<&ReportTarget> {
        self.targets.get(self.selected_target).map(|option| &option.target)
    }

    pub fn has_report(&self) -> bool {
        self.current_target()
            .is_some_and(|target| self.store.report_for(target.kind, target.id).is_some())
    }

    fn title(&self) -> String {
        match self.current_target() {
            Some(target) => format!(
                "Report Forms - {}",
                target.name.as_deref().unwrap_or("Untitled")
            ),
            None => "Report Forms".to_string(),
        }
    }

    fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size)),
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                Some(Message::CursorMoved(position))
            }
            _ => None,
        })
    }

    fn view(&self) -> Element<'_, Message> {
        let workspace = column![
            ui::toolbar::view_toolbar(self),
            Space::new().height(8),
            row![
                ui::workspace::view_report_summary(self),
                ui::notification_method::view_notification_list(self),
            ]
            .spacing(12)
            .height(Length::Fill),
            ui::status_bar::view_status_bar(&self.status, self.store.len()),
        ]
        .padding(10);

        let base: Element<'_, Message> =
            mouse_area(container(workspace).width(Length::Fill).height(Length::Fill))
                .on_right_press(Message::OpenContextMenu)
                .into();

        if let Some(modal) = &self.report_modal {
            stack![
                base,
                ui::modal::view_backdrop(Message::CloseReport),
                ui::report_modal::view(modal),
            ]
            .into()
        } else if let Some(menu) = self.context_menu {
            stack![
                base,
                ui::modal::view_click_catcher(Message::CloseContextMenu),
                ui::context_menu::view(self, menu),
            ]
            .into()
        } else {
            base
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> iced::Result {
    init_tracing();

    let config = AppConfig::resolve(None).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to default configuration");
        AppConfig::default()
    });

    iced::application(
        move || (App::new(config.clone()), Task::none()),
        App::update,
        App::view,
    )
    .title(App::title)
    .theme(App::theme)
    .subscription(App::subscription)
    .window_size(WINDOW_SIZE)
    .run()
}
