//! Message handling for the GUI.
//!
//! Form state changes go straight into the `report_core` editors. The only
//! async work is the report save, which runs as a [`Task`] and comes back
//! tagged with the ticket the editor issued for it.

use iced::Task;
use tracing::{debug, info};
use uuid::Uuid;

use report_core::api::ApiError;
use report_core::editor::{
    DeliverySetting, NotificationEvent, NotificationHooks, NotificationMethodEditor,
    ReportEditor, ReportEditorProps, SaveOutcome,
};
use report_core::menu::compute_menu_offset_with;
use report_core::report::{DeliveryMethod, ReportObject, S3Field};

use crate::ui::context_menu::MENU_ITEM_COUNT;
use crate::{App, ContextMenu, Message, NotificationRow, ReportModal};

/// Cron fields in order, with their allowed value ranges
const CRON_FIELDS: [(&str, u32, u32); 5] = [
    ("minute", 0, 59),
    ("hour", 0, 23),
    ("day", 1, 31),
    ("month", 1, 12),
    ("weekday", 0, 7),
];

/// Host-side cron check: five fields, each a list of `*`, values, ranges or steps
pub fn cron_error(expression: &str) -> Option<String> {
    let fields: Vec<&str> = expression.split_whitespace().collect();
    if fields.len() != CRON_FIELDS.len() {
        return Some(format!(
            "Expected 5 cron fields (minute hour day month weekday), got {}",
            fields.len()
        ));
    }
    fields
        .iter()
        .zip(CRON_FIELDS)
        .find_map(|(field, (name, min, max))| {
            (!cron_field_valid(field, min, max))
                .then(|| format!("Invalid {} field '{}' (allowed {}-{})", name, field, min, max))
        })
}

fn cron_field_valid(field: &str, min: u32, max: u32) -> bool {
    let in_range = |value: &str| value.parse::<u32>().is_ok_and(|v| (min..=max).contains(&v));
    field.split(',').all(|part| {
        let (base, step) = match part.split_once('/') {
            Some((base, step)) => (base, Some(step)),
            None => (part, None),
        };
        if step.is_some_and(|step| !step.parse::<u32>().is_ok_and(|s| s > 0)) {
            return false;
        }
        match base.split_once('-') {
            _ if base == "*" => true,
            Some((start, end)) => {
                in_range(start)
                    && in_range(end)
                    && start.parse::<u32>().ok() <= end.parse::<u32>().ok()
            }
            None => in_range(base),
        }
    })
}

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // ================================================================
            // Toolbar
            // ================================================================
            Message::TargetSelected(option) => {
                self.selected_target = option.index;
                if let Some(modal) = &mut self.report_modal {
                    modal.editor.set_target(option.target);
                }
            }
            Message::ToggleDarkMode => {
                self.dark_mode = !self.dark_mode;
            }

            // ================================================================
            // Report modal
            // ================================================================
            Message::OpenReport(delivery_type) => {
                self.context_menu = None;
                self.open_report(delivery_type);
            }
            Message::CloseReport => self.close_report(),
            Message::ReportNameChanged(name) => {
                self.with_editor(|editor| editor.set_name(name));
            }
            Message::ReportDescriptionChanged(description) => {
                self.with_editor(|editor| editor.set_description(description));
            }
            Message::ReportCrontabChanged(crontab) => {
                self.with_editor(|editor| {
                    editor.set_cron_error(cron_error(&crontab));
                    editor.set_crontab(crontab);
                });
            }
            Message::ReportTimezoneSelected(timezone) => {
                self.with_editor(|editor| editor.set_timezone(Some(timezone)));
            }
            Message::ReportFormatSelected(format) => {
                self.with_editor(|editor| editor.set_report_format(format));
            }
            Message::ReportS3MethodSelected(sub_method) => {
                self.with_editor(|editor| editor.select_s3_method(sub_method));
            }
            Message::ReportS3FieldChanged(field, value) => {
                self.with_editor(|editor| match field {
                    S3Field::BucketName => editor.set_bucket_name(value),
                    S3Field::AccessKey => editor.set_access_key(value),
                    S3Field::SecretKey => editor.set_secret_key(value),
                    S3Field::IamRole => editor.set_iam_role(value),
                });
            }
            Message::TogglePayloadPreview => {
                if let Some(modal) = &mut self.report_modal {
                    modal.show_payload = !modal.show_payload;
                }
            }
            Message::SaveReport => return self.save_report(),
            Message::ReportSaved(ticket, result) => self.report_saved(ticket, result),

            // ================================================================
            // Notification methods
            // ================================================================
            Message::AddNotificationMethod => {
                self.context_menu = None;
                let setting = DeliverySetting::new(DeliveryMethod::ALL.to_vec());
                let index = self.notification_rows.len();
                let editor =
                    NotificationMethodEditor::new(index, Some(&setting), NotificationHooks::default())
                        .with_sub_methods(self.config.editor.s3_sub_methods.clone());
                self.notification_rows.push(NotificationRow {
                    id: Uuid::new_v4(),
                    setting,
                    editor,
                });
            }
            Message::NotificationMethodSelected(id, method) => {
                let event = self
                    .row_mut(id)
                    .and_then(|row| row.editor.on_method_change(&row.setting, method));
                self.apply_notification_event(event);
            }
            Message::NotificationRecipientsChanged(id, text) => {
                let event = self
                    .row_mut(id)
                    .and_then(|row| row.editor.on_recipients_change(&row.setting, text));
                self.apply_notification_event(event);
            }
            Message::NotificationS3MethodSelected(id, sub_method) => {
                if let Some(row) = self.row_mut(id) {
                    row.editor.select_s3_method(sub_method);
                }
            }
            Message::NotificationS3FieldChanged(id, field, value) => {
                if let Some(row) = self.row_mut(id) {
                    match field {
                        S3Field::BucketName => row.editor.set_bucket_name(value),
                        S3Field::AccessKey => row.editor.set_access_key(value),
                        S3Field::SecretKey => row.editor.set_secret_key(value),
                        S3Field::IamRole => row.editor.set_iam_role(value),
                    }
                }
            }
            Message::RemoveNotificationMethod(id) => {
                let event = self
                    .row_mut(id)
                    .and_then(|row| row.editor.on_remove(&row.setting));
                self.apply_notification_event(event);
            }

            // ================================================================
            // Context menu and window tracking
            // ================================================================
            Message::OpenContextMenu => {
                let y = compute_menu_offset_with(
                    self.cursor.y,
                    MENU_ITEM_COUNT,
                    self.window_size.height,
                    self.config.menu,
                );
                debug!(cursor_y = self.cursor.y, offset = y, "opening context menu");
                self.context_menu = Some(ContextMenu { x: self.cursor.x, y });
            }
            Message::CloseContextMenu => {
                self.context_menu = None;
            }
            Message::CursorMoved(position) => {
                self.cursor = position;
            }
            Message::WindowResized(size) => {
                self.window_size = size;
            }
        }
        Task::none()
    }

    fn with_editor(&mut self, f: impl FnOnce(&mut ReportEditor)) {
        if let Some(modal) = &mut self.report_modal {
            f(&mut modal.editor);
        }
    }

    fn open_report(&mut self, delivery_type: DeliveryMethod) {
        let Some(target) = self.current_target().cloned() else {
            return;
        };
        if let Some(mut previous) = self.report_modal.take() {
            previous.editor.dispose();
        }
        let props = ReportEditorProps::new(target, self.config.acting_user(), delivery_type)
            .with_options(self.config.editor.clone());
        let editor = ReportEditor::open_from(props, &self.store);
        info!(edit = editor.is_edit_mode(), %delivery_type, "report modal opened");
        self.report_modal = Some(ReportModal {
            editor,
            show_payload: false,
        });
    }

    fn close_report(&mut self) {
        if let Some(mut modal) = self.report_modal.take() {
            modal.editor.dispose();
        }
    }

    fn save_report(&mut self) -> Task<Message> {
        let Some(api) = self.api() else {
            self.status = "Report API unavailable; nothing was sent".to_string();
            return Task::none();
        };
        let Some(request) = self
            .report_modal
            .as_mut()
            .and_then(|modal| modal.editor.begin_save())
        else {
            return Task::none();
        };

        self.status = "Saving report...".to_string();
        let ticket = request.ticket;
        Task::perform(
            async move { request.send(api.as_ref()).await },
            move |result| Message::ReportSaved(ticket, result),
        )
    }

    fn report_saved(&mut self, ticket: u64, result: Result<ReportObject, ApiError>) {
        let Some(modal) = &mut self.report_modal else {
            debug!(ticket, "save response arrived after the modal closed");
            return;
        };
        match modal.editor.finish_save(ticket, result) {
            SaveOutcome::Saved(report) => {
                let target = modal.editor.props().target.clone();
                self.store.insert(target.kind, target.id, report);
                self.status = format!(
                    "Report saved for {}",
                    target.name.as_deref().unwrap_or("Untitled")
                );
                self.close_report();
            }
            SaveOutcome::Failed(err) => {
                self.status = format!("Save failed: {}", err);
            }
            SaveOutcome::Stale | SaveOutcome::NotStarted => {}
        }
    }

    fn row_mut(&mut self, id: Uuid) -> Option<&mut NotificationRow> {
        self.notification_rows.iter_mut().find(|row| row.id == id)
    }

    /// Apply a child event to the parent-owned list, then let every row re-sync.
    fn apply_notification_event(&mut self, event: Option<NotificationEvent>) {
        match event {
            Some(NotificationEvent::Update { index, setting }) => {
                if let Some(row) = self.notification_rows.get_mut(index) {
                    row.setting = setting;
                }
            }
            Some(NotificationEvent::Remove { index }) => {
                if index < self.notification_rows.len() {
                    self.notification_rows.remove(index);
                }
            }
            None => return,
        }
        for (index, row) in self.notification_rows.iter_mut().enumerate() {
            row.editor.set_index(index);
            row.editor.sync(Some(&row.setting));
        }
    }
}
