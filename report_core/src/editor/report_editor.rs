//! # Report Editor
//!
//! State machine behind the report scheduling modal.
//!
//! ## Lifecycle
//!
//! ```text
//! open(props, existing)
//!   ├── existing = None  -> Reset (create mode, default name + crontab)
//!   └── existing = Some  -> Merge(report) + credential mirrors (edit mode)
//! user edits           -> Merge(patch) / local mirrors
//! begin_save()         -> Merge{is_submitting: true, error: None} + SaveRequest
//! finish_save(ticket)  -> Saved | Failed (Merge{error}) then Merge{is_submitting: false}
//! dispose()            -> later finish_save calls are ignored
//! ```
//!
//! The network call between `begin_save` and `finish_save` runs on the host's
//! executor. [`ReportEditor::save`] drives both halves for hosts that can
//! simply await.

use tracing::{debug, info, warn};

use crate::api::{ApiError, ReportApi, ReportLookup};
use crate::config::EditorOptions;
use crate::draft::{reduce, DraftAction, DraftPatch, ReportDraft};
use crate::errors::ReportError;
use crate::i18n::{IdentityTranslator, Translator};
use crate::report::{
    first_target, ActingUser, CreationMethod, DeliveryMethod, DeliveryType, Recipient,
    ReportFormat, ReportObject, ReportPayload, ReportTarget, ResourceKind, S3Field, S3SubMethod,
};

use super::sync::Observed;
use super::{s3_inputs, FieldView, FormatSelector, SubMethodSelector};

/// Inputs supplied by the host when the modal opens
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEditorProps {
    pub target: ReportTarget,
    pub user: ActingUser,
    pub delivery_type: DeliveryType,
    pub creation_method: CreationMethod,
    pub options: EditorOptions,
}

impl ReportEditorProps {
    /// Props with the creation method implied by the target and default options
    pub fn new(target: ReportTarget, user: ActingUser, delivery_type: DeliveryType) -> Self {
        let creation_method = target.kind.creation_method();
        ReportEditorProps {
            target,
            user,
            delivery_type,
            creation_method,
            options: EditorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EditorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_creation_method(mut self, creation_method: CreationMethod) -> Self {
        self.creation_method = creation_method;
        self
    }
}

/// Which backend call a save issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    Update(i64),
}

/// A save that has been started and awaits its network round-trip.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    /// Matches the request to its editor in [`ReportEditor::finish_save`]
    pub ticket: u64,
    pub mode: SaveMode,
    pub payload: ReportPayload,
}

impl SaveRequest {
    /// Issue the create or update call
    pub async fn send<A: ReportApi + ?Sized>(&self, api: &A) -> Result<ReportObject, ApiError> {
        match self.mode {
            SaveMode::Create => api.create_report(&self.payload).await,
            SaveMode::Update(id) => api.update_report(id, &self.payload).await,
        }
    }
}

/// Result of feeding a save response back into the editor
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Nothing was sent (empty name, save already running, invalid payload, disposed)
    NotStarted,
    /// Persisted; the host should dismiss the modal
    Saved(ReportObject),
    /// The call failed; the error is on the draft
    Failed(ApiError),
    /// The response belongs to a disposed editor or an older request
    Stale,
}

/// Report scheduling form state.
#[derive(Debug, Clone)]
pub struct ReportEditor {
    props: ReportEditorProps,
    initial: ReportDraft,
    draft: ReportDraft,
    existing: Option<ReportObject>,
    observed_report: Observed<Option<ReportObject>>,

    // Local mirrors beside the draft
    s3_method: Option<S3SubMethod>,
    bucket_name: String,
    access_key: String,
    secret_key: String,
    iam_role: String,
    cron_error: Option<String>,

    observed_draft_sub_method: Observed<Option<S3SubMethod>>,
    observed_bucket_inputs: Observed<BucketInputs>,

    next_ticket: u64,
    in_flight: Option<u64>,
    disposed: bool,
}

/// Values the displayed bucket name is derived from
type BucketInputs = (Vec<Recipient>, Option<S3SubMethod>, Option<S3SubMethod>);

impl ReportEditor {
    /// Open the editor; `existing` selects edit mode.
    pub fn open(props: ReportEditorProps, existing: Option<ReportObject>) -> Self {
        Self::open_with(&IdentityTranslator, props, existing)
    }

    /// Open with the report currently attached to the props' target.
    pub fn open_from(props: ReportEditorProps, lookup: &dyn ReportLookup) -> Self {
        let existing = lookup.report_for(props.target.kind, props.target.id);
        Self::open(props, existing)
    }

    pub fn open_with(
        translator: &dyn Translator,
        props: ReportEditorProps,
        existing: Option<ReportObject>,
    ) -> Self {
        let initial = Self::initial_draft(translator, &props);
        let mut editor = ReportEditor {
            draft: initial.clone(),
            initial,
            props,
            existing: None,
            observed_report: Observed::new(),
            s3_method: None,
            bucket_name: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            iam_role: String::new(),
            cron_error: None,
            observed_draft_sub_method: Observed::new(),
            observed_bucket_inputs: Observed::new(),
            next_ticket: 0,
            in_flight: None,
            disposed: false,
        };
        editor.sync_report(existing);
        editor
    }

    fn initial_draft(translator: &dyn Translator, props: &ReportEditorProps) -> ReportDraft {
        ReportDraft::initial_with(
            translator,
            props.target.name.as_deref(),
            props.delivery_type,
            &props.options.default_crontab,
        )
    }

    pub fn draft(&self) -> &ReportDraft {
        &self.draft
    }

    pub fn props(&self) -> &ReportEditorProps {
        &self.props
    }

    /// Edit mode: an existing report was supplied
    pub fn is_edit_mode(&self) -> bool {
        self.existing.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn s3_method(&self) -> Option<S3SubMethod> {
        self.s3_method
    }

    /// Reconcile with the externally fetched report.
    ///
    /// Only acts when the report differs from the last one observed.
    pub fn sync_report(&mut self, existing: Option<ReportObject>) {
        if !self.observed_report.changed(&existing) {
            return;
        }
        match &existing {
            Some(report) => {
                debug!(report_id = ?report.id, "hydrating report draft");
                self.dispatch(DraftAction::Merge(DraftPatch::from_report(report)));
                self.access_key = report.aws_key.clone().unwrap_or_default();
                self.secret_key = report.aws_secret_key.clone().unwrap_or_default();
                self.iam_role = report.aws_arn_role.clone().unwrap_or_default();
                self.s3_method = report.aws_s3_type;
            }
            None => {
                debug!("no existing report, resetting draft");
                self.s3_method = None;
                self.bucket_name.clear();
                self.access_key.clear();
                self.secret_key.clear();
                self.iam_role.clear();
                self.reset_draft();
            }
        }
        self.existing = existing;
        self.derive();
    }

    /// Point the editor at a renamed or different target.
    ///
    /// The initial state is recomputed; in create mode the draft is reset to it.
    pub fn set_target(&mut self, target: ReportTarget) {
        self.props.target = target;
        self.initial = Self::initial_draft(&IdentityTranslator, &self.props);
        if !self.is_edit_mode() {
            self.reset_draft();
        }
    }

    /// Revert to the initial draft. A save in flight stays marked as submitting.
    fn reset_draft(&mut self) {
        self.dispatch(DraftAction::Reset);
        if self.in_flight.is_some() {
            self.dispatch(DraftAction::Merge(DraftPatch::new().submitting(true)));
        }
    }

    /// Apply a reducer action to the draft
    pub fn dispatch(&mut self, action: DraftAction) {
        self.draft = reduce(&self.draft, action, &self.initial);
        self.derive();
    }

    /// Re-evaluate state derived from the draft and the sub-method mirror.
    fn derive(&mut self) {
        if self.observed_draft_sub_method.changed(&self.draft.aws_s3_type) {
            if let Some(recorded) = self.draft.aws_s3_type {
                self.s3_method = Some(recorded);
            }
        }

        let inputs = (
            self.draft.recipients.clone(),
            self.draft.aws_s3_type,
            self.s3_method,
        );
        if self.observed_bucket_inputs.changed(&inputs) && self.draft.aws_s3_type == self.s3_method {
            if let Some(target) = first_target(&self.draft.recipients) {
                debug!("bucket name taken from stored recipients");
                self.bucket_name = target;
            }
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.dispatch(DraftAction::Merge(DraftPatch::new().name(name)));
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.dispatch(DraftAction::Merge(DraftPatch::new().description(description)));
    }

    pub fn set_crontab(&mut self, crontab: impl Into<String>) {
        self.dispatch(DraftAction::Merge(DraftPatch::new().crontab(crontab)));
    }

    /// Validation message emitted by the schedule input
    pub fn set_cron_error(&mut self, error: Option<String>) {
        self.cron_error = error;
    }

    pub fn set_timezone(&mut self, timezone: Option<String>) {
        self.dispatch(DraftAction::Merge(DraftPatch::new().timezone(timezone)));
    }

    pub fn set_report_format(&mut self, format: ReportFormat) {
        self.dispatch(DraftAction::Merge(DraftPatch::new().report_format(format)));
    }

    /// Switch the storage sub-method.
    ///
    /// Choosing one other than the draft's recorded sub-method clears the bucket.
    pub fn select_s3_method(&mut self, sub_method: S3SubMethod) {
        self.s3_method = Some(sub_method);
        if Some(sub_method) != self.draft.aws_s3_type {
            self.bucket_name.clear();
        }
        self.derive();
    }

    pub fn set_bucket_name(&mut self, bucket: impl Into<String>) {
        self.bucket_name = bucket.into();
    }

    // Credential setters also merge into the draft once it holds a stored value,
    // so the displayed input follows typing.

    pub fn set_access_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        if has_value(&self.draft.aws_key) {
            self.dispatch(DraftAction::Merge(DraftPatch::new().aws_key(key.clone())));
        }
        self.access_key = key;
    }

    pub fn set_secret_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        if has_value(&self.draft.aws_secret_key) {
            self.dispatch(DraftAction::Merge(DraftPatch::new().aws_secret_key(key.clone())));
        }
        self.secret_key = key;
    }

    pub fn set_iam_role(&mut self, role: impl Into<String>) {
        let role = role.into();
        if has_value(&self.draft.aws_arn_role) {
            self.dispatch(DraftAction::Merge(DraftPatch::new().aws_arn_role(role.clone())));
        }
        self.iam_role = role;
    }

    fn is_text_based(&self) -> bool {
        self.props
            .target
            .is_text_based(self.props.options.text_based_viz_types.as_slice())
    }

    /// Format used when the draft has none: TEXT for text-based charts, else PNG
    pub fn default_format(&self) -> ReportFormat {
        if self.is_text_based() {
            ReportFormat::Text
        } else {
            ReportFormat::Png
        }
    }

    /// Delivery method of the stored recipients, S3 when there are none
    fn stored_method(&self) -> DeliveryMethod {
        self.draft
            .recipients
            .first()
            .map(|r| r.recipient_type)
            .unwrap_or(DeliveryMethod::S3)
    }

    /// Submission body for the current state
    pub fn build_payload(&self) -> ReportPayload {
        let props = &self.props;
        let target = match props.delivery_type {
            DeliveryMethod::Email => props.user.email.clone(),
            DeliveryMethod::S3 => self.bucket_name.clone(),
        };
        let (dashboard, chart) = match props.target.kind {
            ResourceKind::Dashboard => (Some(props.target.id), None),
            ResourceKind::Chart => (None, Some(props.target.id)),
        };
        ReportPayload {
            report_type: "Report".to_string(),
            active: true,
            force_screenshot: false,
            creation_method: props.creation_method,
            dashboard,
            chart,
            owners: vec![props.user.id],
            recipients: vec![Recipient::new(props.delivery_type, target)],
            name: self.draft.name.clone(),
            description: self.draft.description.clone(),
            crontab: self.draft.crontab.clone(),
            report_format: self.draft.report_format.unwrap_or_else(|| self.default_format()),
            timezone: self.draft.timezone.clone(),
            aws_key: self.access_key.clone(),
            aws_secret_key: self.secret_key.clone(),
            aws_s3_type: self.s3_method,
            aws_arn_role: self.iam_role.clone(),
        }
    }

    /// Save is possible: named, not disposed, nothing in flight
    pub fn can_save(&self) -> bool {
        !self.disposed
            && self.in_flight.is_none()
            && !self.draft.name.is_empty()
            && !self.draft.is_submitting
    }

    /// Start a save. Returns `None` when no network call should be made.
    pub fn begin_save(&mut self) -> Option<SaveRequest> {
        if !self.can_save() {
            debug!(
                submitting = self.draft.is_submitting,
                disposed = self.disposed,
                "save ignored"
            );
            return None;
        }

        let payload = self.build_payload();
        let mode = if self.is_edit_mode() {
            match self.draft.id.or_else(|| self.existing.as_ref().and_then(|r| r.id)) {
                Some(id) => SaveMode::Update(id),
                None => {
                    self.reject(ReportError::missing_field("id"));
                    return None;
                }
            }
        } else {
            SaveMode::Create
        };
        if let Err(err) = payload.validate() {
            self.reject(err);
            return None;
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.in_flight = Some(ticket);
        self.dispatch(DraftAction::Merge(DraftPatch::new().submitting(true).error(None)));
        info!(ticket, ?mode, name = %payload.name, "saving report");
        Some(SaveRequest {
            ticket,
            mode,
            payload,
        })
    }

    fn reject(&mut self, err: ReportError) {
        warn!(error = %err, "report payload rejected before sending");
        self.dispatch(DraftAction::Merge(DraftPatch::new().error(Some(err.to_string()))));
    }

    /// Apply the response of the request issued with `ticket`.
    pub fn finish_save(
        &mut self,
        ticket: u64,
        result: Result<ReportObject, ApiError>,
    ) -> SaveOutcome {
        if self.disposed || self.in_flight != Some(ticket) {
            debug!(ticket, "dropping stale save response");
            return SaveOutcome::Stale;
        }
        self.in_flight = None;

        let outcome = match result {
            Ok(report) => {
                info!(ticket, report_id = ?report.id, "report saved");
                SaveOutcome::Saved(report)
            }
            Err(err) => {
                warn!(ticket, status = ?err.status, error = %err, "report save failed");
                self.dispatch(DraftAction::Merge(
                    DraftPatch::new().error(Some(err.message.clone())),
                ));
                SaveOutcome::Failed(err)
            }
        };
        self.dispatch(DraftAction::Merge(DraftPatch::new().submitting(false)));
        outcome
    }

    /// Save and wait for the response; `on_hide` runs once on success.
    pub async fn save<A, F>(&mut self, api: &A, on_hide: F) -> SaveOutcome
    where
        A: ReportApi + ?Sized,
        F: FnOnce(),
    {
        let Some(request) = self.begin_save() else {
            return SaveOutcome::NotStarted;
        };
        let result = request.send(api).await;
        let outcome = self.finish_save(request.ticket, result);
        if matches!(outcome, SaveOutcome::Saved(_)) {
            on_hide();
        }
        outcome
    }

    /// The modal closed. Responses still in flight are ignored from now on.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.in_flight = None;
    }

    fn title(&self) -> &'static str {
        match (self.props.delivery_type, self.is_edit_mode()) {
            (DeliveryMethod::Email, true) => "Edit email report",
            (DeliveryMethod::Email, false) => "Schedule a new email report",
            (DeliveryMethod::S3, true) => "Edit AWS S3 report",
            (DeliveryMethod::S3, false) => "Schedule a new AWS S3 report",
        }
    }

    fn field_value(&self, field: S3Field) -> String {
        fn draft_or(draft: &Option<String>, mirror: &str) -> String {
            match draft.as_deref() {
                Some(value) if !value.is_empty() => value.to_string(),
                _ => mirror.to_string(),
            }
        }
        match field {
            S3Field::BucketName => self.bucket_name.clone(),
            S3Field::AccessKey => draft_or(&self.draft.aws_key, &self.access_key),
            S3Field::SecretKey => draft_or(&self.draft.aws_secret_key, &self.secret_key),
            S3Field::IamRole => draft_or(&self.draft.aws_arn_role, &self.iam_role),
        }
    }

    /// What the modal shows right now
    pub fn view(&self) -> ReportFormView {
        self.view_with(&IdentityTranslator)
    }

    pub fn view_with(&self, translator: &dyn Translator) -> ReportFormView {
        let t = |key: &str| translator.translate(key, &[]);
        let is_s3 = self.props.delivery_type == DeliveryMethod::S3;

        let format_selector = self.props.target.is_chart().then(|| {
            let mut options = Vec::with_capacity(3);
            if self.is_text_based() {
                options.push(ReportFormat::Text);
            }
            options.extend([ReportFormat::Png, ReportFormat::Csv]);
            FormatSelector {
                options,
                selected: self.draft.report_format.unwrap_or_else(|| self.default_format()),
            }
        });

        let s3_method_selector = (is_s3 && self.stored_method() == DeliveryMethod::S3).then(|| {
            SubMethodSelector {
                options: self.props.options.s3_sub_methods.clone(),
                selected: self.s3_method,
            }
        });

        let s3_inputs = if is_s3 {
            s3_inputs(self.s3_method, |field| self.field_value(field))
        } else {
            Vec::new()
        };

        let error_banner = self.draft.error.as_ref().map(|error| ErrorBanner {
            message: if self.is_edit_mode() {
                t("Failed to update report")
            } else {
                t("Failed to create report")
            },
            description: error.clone(),
        });

        ReportFormView {
            title: t(self.title()),
            name: self.draft.name.clone(),
            name_placeholder: self.initial.name.clone(),
            description: self.draft.description.clone(),
            crontab: self.draft.crontab.clone(),
            cron_error: self.cron_error.clone(),
            timezone: self.draft.timezone.clone(),
            format_selector,
            s3_method_selector,
            s3_inputs,
            save: SaveControl {
                label: if self.is_edit_mode() { t("Save") } else { t("Add") },
                enabled: !self.draft.name.is_empty(),
                busy: self.draft.is_submitting,
            },
            error_banner,
        }
    }
}

fn has_value(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.is_empty())
}

/// Primary footer button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveControl {
    pub label: String,
    pub enabled: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    pub description: String,
}

/// Render model of the report modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFormView {
    pub title: String,
    pub name: String,
    pub name_placeholder: String,
    pub description: String,
    pub crontab: String,
    pub cron_error: Option<String>,
    pub timezone: Option<String>,
    /// Charts only
    pub format_selector: Option<FormatSelector>,
    pub s3_method_selector: Option<SubMethodSelector>,
    pub s3_inputs: Vec<FieldView>,
    pub save: SaveControl,
    pub error_banner: Option<ErrorBanner>,
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::api::ReportStore;

    /// Counts calls and answers with a canned result
    struct FakeApi {
        creates: AtomicUsize,
        updates: AtomicUsize,
        last_payload: Mutex<Option<ReportPayload>>,
        fail_with: Option<ApiError>,
    }

    impl FakeApi {
        fn ok() -> Self {
            FakeApi {
                creates: AtomicUsize::new(0),
                updates: AtomicUsize::new(0),
                last_payload: Mutex::new(None),
                fail_with: None,
            }
        }

        fn failing(message: &str) -> Self {
            FakeApi {
                fail_with: Some(ApiError::new(Some(422), message)),
                ..FakeApi::ok()
            }
        }

        fn calls(&self) -> usize {
            self.creates.load(Ordering::SeqCst) + self.updates.load(Ordering::SeqCst)
        }

        fn answer(&self, payload: &ReportPayload, id: i64) -> Result<ReportObject, ApiError> {
            *self.last_payload.lock().unwrap() = Some(payload.clone());
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(ReportObject {
                    id: Some(id),
                    name: Some(payload.name.clone()),
                    ..ReportObject::default()
                }),
            }
        }
    }

    #[async_trait]
    impl ReportApi for FakeApi {
        async fn create_report(&self, payload: &ReportPayload) -> Result<ReportObject, ApiError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.answer(payload, 100)
        }

        async fn update_report(
            &self,
            id: i64,
            payload: &ReportPayload,
        ) -> Result<ReportObject, ApiError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.answer(payload, id)
        }
    }

    fn user() -> ActingUser {
        ActingUser::new(7, "me@example.com")
    }

    fn chart_props(viz: &str, delivery: DeliveryType) -> ReportEditorProps {
        ReportEditorProps::new(
            ReportTarget::chart(42, Some("Sales".to_string()), Some(viz.to_string())),
            user(),
            delivery,
        )
    }

    fn s3_report(sub_method: S3SubMethod, bucket: &str) -> ReportObject {
        ReportObject {
            id: Some(5),
            name: Some("Nightly export".to_string()),
            crontab: Some("0 1 * * *".to_string()),
            recipients: vec![Recipient {
                recipient_type: DeliveryMethod::S3,
                recipient_config_json: serde_json::Value::String(format!(
                    "{{\"target\": \"{}\"}}",
                    bucket
                )),
            }],
            aws_key: Some("AKIA".to_string()),
            aws_secret_key: Some("secret".to_string()),
            aws_s3_type: Some(sub_method),
            aws_arn_role: None,
            ..ReportObject::default()
        }
    }

    #[test]
    fn test_create_mode_defaults() {
        let editor = ReportEditor::open(chart_props("table", DeliveryMethod::Email), None);
        assert!(!editor.is_edit_mode());
        assert_eq!(editor.draft().name, "Weekly Report for Sales");
        assert_eq!(editor.draft().crontab, "0 12 * * 1");

        let view = editor.view();
        assert_eq!(view.title, "Schedule a new email report");
        assert_eq!(view.save.label, "Add");
        assert!(view.save.enabled);
        assert!(view.error_banner.is_none());
    }

    #[test]
    fn test_dashboard_without_name_uses_generic_name() {
        let props = ReportEditorProps::new(
            ReportTarget::dashboard(3, None),
            user(),
            DeliveryMethod::Email,
        );
        let editor = ReportEditor::open(props, None);
        assert_eq!(editor.draft().name, "Weekly Report");
        assert!(editor.view().format_selector.is_none());
        assert_eq!(editor.build_payload().creation_method, CreationMethod::Dashboards);
        assert_eq!(editor.build_payload().dashboard, Some(3));
        assert_eq!(editor.build_payload().chart, None);
    }

    #[test]
    fn test_format_options_for_text_based_chart() {
        let editor = ReportEditor::open(chart_props("pivot_table_v2", DeliveryMethod::Email), None);
        let selector = editor.view().format_selector.unwrap();
        assert_eq!(
            selector.options,
            vec![ReportFormat::Text, ReportFormat::Png, ReportFormat::Csv]
        );
        assert_eq!(selector.selected, ReportFormat::Text);
        assert_eq!(editor.build_payload().report_format, ReportFormat::Text);
    }

    #[test]
    fn test_format_options_for_image_chart() {
        let mut editor = ReportEditor::open(chart_props("echarts_timeseries", DeliveryMethod::Email), None);
        let selector = editor.view().format_selector.unwrap();
        assert_eq!(selector.options, vec![ReportFormat::Png, ReportFormat::Csv]);
        assert_eq!(selector.selected, ReportFormat::Png);

        editor.set_report_format(ReportFormat::Csv);
        assert_eq!(editor.view().format_selector.unwrap().selected, ReportFormat::Csv);
        assert_eq!(editor.build_payload().report_format, ReportFormat::Csv);
    }

    #[test]
    fn test_text_based_set_comes_from_options() {
        let options = EditorOptions {
            text_based_viz_types: vec!["big_number".to_string()],
            ..EditorOptions::default()
        };
        let editor = ReportEditor::open(
            chart_props("big_number", DeliveryMethod::Email).with_options(options),
            None,
        );
        assert_eq!(editor.default_format(), ReportFormat::Text);
    }

    #[test]
    fn test_empty_name_disables_save() {
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::Email), None);
        editor.set_name("");
        assert!(!editor.view().save.enabled);
        assert!(editor.begin_save().is_none());
        assert!(!editor.draft().is_submitting);
    }

    #[test]
    fn test_edit_mode_hydrates_draft_and_mirrors() {
        let report = s3_report(S3SubMethod::Credentials, "reports-bucket");
        let editor = ReportEditor::open(chart_props("table", DeliveryMethod::S3), Some(report));
        assert!(editor.is_edit_mode());
        assert_eq!(editor.draft().name, "Nightly export");
        assert_eq!(editor.draft().crontab, "0 1 * * *");
        assert_eq!(editor.s3_method(), Some(S3SubMethod::Credentials));
        assert_eq!(editor.bucket_name(), "reports-bucket");

        let view = editor.view();
        assert_eq!(view.title, "Edit AWS S3 report");
        assert_eq!(view.save.label, "Save");
        let fields: Vec<S3Field> = view.s3_inputs.iter().map(|f| f.field).collect();
        assert_eq!(fields, vec![S3Field::BucketName, S3Field::AccessKey, S3Field::SecretKey]);
        assert_eq!(view.s3_inputs[1].value, "AKIA");

        let payload = editor.build_payload();
        assert_eq!(payload.aws_key, "AKIA");
        assert_eq!(payload.aws_secret_key, "secret");
        assert_eq!(payload.aws_s3_type, Some(S3SubMethod::Credentials));
        assert_eq!(payload.recipients[0].target().as_deref(), Some("reports-bucket"));
    }

    #[test]
    fn test_switching_sub_method_clears_bucket_only_when_different() {
        let report = s3_report(S3SubMethod::Credentials, "reports-bucket");
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::S3), Some(report));
        assert_eq!(editor.bucket_name(), "reports-bucket");

        editor.select_s3_method(S3SubMethod::Iam);
        assert_eq!(editor.bucket_name(), "");
        let fields: Vec<S3Field> = editor.view().s3_inputs.iter().map(|f| f.field).collect();
        assert_eq!(fields, vec![S3Field::IamRole, S3Field::BucketName]);

        editor.set_bucket_name("typed");
        editor.select_s3_method(S3SubMethod::PyConfig);
        assert_eq!(editor.bucket_name(), "");

        // Back to the recorded sub-method: bucket comes back from the stored recipient
        editor.select_s3_method(S3SubMethod::Credentials);
        assert_eq!(editor.bucket_name(), "reports-bucket");
    }

    #[test]
    fn test_reselecting_recorded_sub_method_keeps_typed_bucket() {
        let report = ReportObject {
            id: Some(1),
            aws_s3_type: Some(S3SubMethod::PyConfig),
            ..ReportObject::default()
        };
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::S3), Some(report));
        editor.set_bucket_name("typed");
        editor.select_s3_method(S3SubMethod::PyConfig);
        assert_eq!(editor.bucket_name(), "typed");
    }

    #[test]
    fn test_editing_name_does_not_overwrite_typed_bucket() {
        let report = s3_report(S3SubMethod::Iam, "stored");
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::S3), Some(report));
        editor.set_bucket_name("typed");
        editor.set_name("renamed");
        assert_eq!(editor.bucket_name(), "typed");
    }

    #[test]
    fn test_email_delivery_hides_storage_inputs() {
        let report = s3_report(S3SubMethod::Credentials, "b");
        let editor = ReportEditor::open(chart_props("table", DeliveryMethod::Email), Some(report));
        let view = editor.view();
        assert!(view.s3_method_selector.is_none());
        assert!(view.s3_inputs.is_empty());
        assert_eq!(view.title, "Edit email report");
        let payload = editor.build_payload();
        assert_eq!(payload.recipients[0].recipient_type, DeliveryMethod::Email);
        assert_eq!(payload.recipients[0].target().as_deref(), Some("me@example.com"));
    }

    #[test]
    fn test_sub_method_selector_hidden_for_email_recipients() {
        let report = ReportObject {
            id: Some(2),
            recipients: vec![Recipient::new(DeliveryMethod::Email, "x@y.z")],
            ..ReportObject::default()
        };
        let editor = ReportEditor::open(chart_props("table", DeliveryMethod::S3), Some(report));
        assert!(editor.view().s3_method_selector.is_none());

        let fresh = ReportEditor::open(chart_props("table", DeliveryMethod::S3), None);
        let selector = fresh.view().s3_method_selector.unwrap();
        assert_eq!(selector.options.len(), 3);
        assert_eq!(selector.selected, None);
    }

    #[test]
    fn test_typing_credentials_updates_displayed_value() {
        let report = s3_report(S3SubMethod::Credentials, "b");
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::S3), Some(report));
        editor.set_access_key("AKIA2");
        assert_eq!(editor.view().s3_inputs[1].value, "AKIA2");
        assert_eq!(editor.build_payload().aws_key, "AKIA2");
    }

    #[test]
    fn test_sync_report_switches_modes() {
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::S3), None);
        editor.set_name("scratch");

        editor.sync_report(Some(s3_report(S3SubMethod::PyConfig, "fetched")));
        assert!(editor.is_edit_mode());
        assert_eq!(editor.draft().name, "Nightly export");
        assert_eq!(editor.bucket_name(), "fetched");

        // Same report again is not re-applied over local edits
        editor.set_name("local edit");
        editor.sync_report(Some(s3_report(S3SubMethod::PyConfig, "fetched")));
        assert_eq!(editor.draft().name, "local edit");

        editor.sync_report(None);
        assert!(!editor.is_edit_mode());
        assert_eq!(editor.draft().name, "Weekly Report for Sales");
    }

    #[test]
    fn test_leaving_edit_mode_drops_stored_credentials() {
        let report = s3_report(S3SubMethod::Credentials, "old-bucket");
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::S3), Some(report));
        editor.set_bucket_name("typed-bucket");

        editor.sync_report(None);
        assert!(!editor.is_edit_mode());
        assert_eq!(editor.s3_method(), None);
        assert_eq!(editor.bucket_name(), "");

        let payload = editor.build_payload();
        assert_eq!(payload.aws_key, "");
        assert_eq!(payload.aws_secret_key, "");
        assert_eq!(payload.aws_arn_role, "");
        assert_eq!(payload.aws_s3_type, None);
        assert_eq!(payload.recipients[0].target().as_deref(), None);
    }

    #[test]
    fn test_credential_typing_goes_through_the_reducer() {
        let report = s3_report(S3SubMethod::Credentials, "b");
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::S3), Some(report));
        editor.set_secret_key("rotated");
        assert_eq!(editor.draft().aws_secret_key.as_deref(), Some("rotated"));

        // No stored role: only the mirror changes
        editor.set_iam_role("arn:aws:iam::1:role/r");
        assert_eq!(editor.draft().aws_arn_role, None);
        assert_eq!(editor.build_payload().aws_arn_role, "arn:aws:iam::1:role/r");
    }

    #[test]
    fn test_reset_during_save_keeps_it_in_flight() {
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::Email), None);
        let first = editor.begin_save().unwrap();

        editor.set_target(ReportTarget::chart(42, Some("Revenue".to_string()), None));
        assert_eq!(editor.draft().name, "Weekly Report for Revenue");
        assert!(editor.draft().is_submitting);
        assert!(!editor.can_save());
        assert!(editor.begin_save().is_none());

        editor.sync_report(None);
        assert!(editor.draft().is_submitting);
        assert!(editor.begin_save().is_none());

        let outcome = editor.finish_save(first.ticket, Ok(ReportObject::default()));
        assert!(matches!(outcome, SaveOutcome::Saved(_)));
        assert!(!editor.draft().is_submitting);
        assert!(editor.can_save());
    }

    #[test]
    fn test_set_target_resets_create_mode_name() {
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::Email), None);
        editor.set_target(ReportTarget::chart(42, Some("Revenue".to_string()), None));
        assert_eq!(editor.draft().name, "Weekly Report for Revenue");
    }

    #[test]
    fn test_open_from_lookup() {
        let mut store = ReportStore::new();
        store.insert(ResourceKind::Chart, 42, s3_report(S3SubMethod::Iam, "b"));
        let editor = ReportEditor::open_from(chart_props("table", DeliveryMethod::S3), &store);
        assert!(editor.is_edit_mode());

        let other = ReportEditor::open_from(
            ReportEditorProps::new(ReportTarget::chart(1, None, None), user(), DeliveryMethod::S3),
            &store,
        );
        assert!(!other.is_edit_mode());
    }

    #[test]
    fn test_only_one_save_in_flight() {
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::Email), None);
        let first = editor.begin_save().unwrap();
        assert!(editor.draft().is_submitting);
        assert!(editor.view().save.busy);
        assert!(editor.begin_save().is_none());

        let outcome = editor.finish_save(first.ticket, Ok(ReportObject::default()));
        assert!(matches!(outcome, SaveOutcome::Saved(_)));
        assert!(!editor.draft().is_submitting);
    }

    #[test]
    fn test_response_after_dispose_is_ignored() {
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::Email), None);
        let request = editor.begin_save().unwrap();
        editor.dispose();
        let outcome = editor.finish_save(request.ticket, Err(ApiError::new(None, "late")));
        assert_eq!(outcome, SaveOutcome::Stale);
        assert!(editor.draft().error.is_none());
        assert!(editor.begin_save().is_none());
    }

    #[test]
    fn test_oversized_credentials_never_reach_the_api() {
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::S3), None);
        editor.select_s3_method(S3SubMethod::Credentials);
        editor.set_access_key("k".repeat(101));
        assert!(editor.begin_save().is_none());
        assert!(!editor.draft().is_submitting);
        let banner = editor.view().error_banner.unwrap();
        assert_eq!(banner.message, "Failed to create report");
        assert!(banner.description.contains("aws_key"));
    }

    #[tokio::test]
    async fn test_save_with_empty_name_issues_no_call() {
        let api = FakeApi::ok();
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::Email), None);
        editor.set_name("");
        let mut hidden = 0;
        let outcome = editor.save(&api, || hidden += 1).await;
        assert_eq!(outcome, SaveOutcome::NotStarted);
        assert_eq!(api.calls(), 0);
        assert_eq!(hidden, 0);
    }

    #[tokio::test]
    async fn test_create_success_dismisses_once() {
        let api = FakeApi::ok();
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::Email), None);
        let mut hidden = 0;
        let outcome = editor.save(&api, || hidden += 1).await;
        assert!(matches!(outcome, SaveOutcome::Saved(ref r) if r.id == Some(100)));
        assert_eq!(hidden, 1);
        assert_eq!(api.creates.load(Ordering::SeqCst), 1);
        assert_eq!(api.updates.load(Ordering::SeqCst), 0);
        assert!(editor.draft().error.is_none());
        assert!(!editor.draft().is_submitting);

        let sent = api.last_payload.lock().unwrap().clone().unwrap();
        assert_eq!(sent.owners, vec![7]);
        assert_eq!(sent.chart, Some(42));
        assert!(sent.active);
        assert!(!sent.force_screenshot);
    }

    #[tokio::test]
    async fn test_edit_mode_updates_existing_report() {
        let api = FakeApi::ok();
        let report = s3_report(S3SubMethod::PyConfig, "b");
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::S3), Some(report));
        let outcome = editor.save(&api, || {}).await;
        assert!(matches!(outcome, SaveOutcome::Saved(ref r) if r.id == Some(5)));
        assert_eq!(api.updates.load(Ordering::SeqCst), 1);
        assert_eq!(api.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_sets_error_and_clears_submitting() {
        let api = FakeApi::failing("Name must be unique");
        let report = s3_report(S3SubMethod::PyConfig, "b");
        let mut editor = ReportEditor::open(chart_props("table", DeliveryMethod::S3), Some(report));
        let mut hidden = 0;
        let outcome = editor.save(&api, || hidden += 1).await;
        assert!(matches!(outcome, SaveOutcome::Failed(_)));
        assert_eq!(hidden, 0);
        assert!(!editor.draft().is_submitting);
        assert_eq!(editor.draft().error.as_deref(), Some("Name must be unique"));

        let banner = editor.view().error_banner.unwrap();
        assert_eq!(banner.message, "Failed to update report");
        assert_eq!(banner.description, "Name must be unique");

        // Retrying clears the previous error while in flight
        let request = editor.begin_save().unwrap();
        assert!(editor.draft().error.is_none());
        editor.finish_save(request.ticket, Ok(ReportObject::default()));
        assert!(editor.draft().error.is_none());
    }
}
