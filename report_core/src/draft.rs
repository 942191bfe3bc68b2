//! # Report Draft
//!
//! The locally editable copy of a report. Every change goes through
//! [`reduce`], which either resets the draft to its computed initial state or
//! shallow-merges a [`DraftPatch`] into it.
//!
//! ## Example
//!
//! ```rust
//! use report_core::draft::{reduce, DraftAction, DraftPatch, ReportDraft};
//! use report_core::report::DeliveryType;
//!
//! let initial = ReportDraft::initial(Some("Sales"), DeliveryType::Email, "0 12 * * 1");
//! let edited = reduce(&initial, DraftAction::Merge(DraftPatch::new().name("Monday numbers")), &initial);
//! assert_eq!(edited.name, "Monday numbers");
//! assert_eq!(edited.crontab, "0 12 * * 1");
//!
//! let reset = reduce(&edited, DraftAction::Reset, &initial);
//! assert_eq!(reset, initial);
//! ```

use serde::{Deserialize, Serialize};

use crate::i18n::{IdentityTranslator, Translator};
use crate::report::{DeliveryType, Recipient, ReportFormat, ReportObject, S3SubMethod};

/// Locally editable, not yet persisted report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDraft {
    /// Server id, present once hydrated from an existing report
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub crontab: String,
    pub timezone: Option<String>,
    pub report_format: Option<ReportFormat>,
    pub delivery_type: DeliveryType,
    pub recipients: Vec<Recipient>,
    pub aws_key: Option<String>,
    pub aws_secret_key: Option<String>,
    pub aws_s3_type: Option<S3SubMethod>,
    pub aws_arn_role: Option<String>,
    /// A save is in flight
    pub is_submitting: bool,
    /// Message of the last failed save
    pub error: Option<String>,
}

impl ReportDraft {
    /// Initial draft for a new report, named after the target entity.
    pub fn initial(entity_name: Option<&str>, delivery_type: DeliveryType, crontab: &str) -> Self {
        Self::initial_with(&IdentityTranslator, entity_name, delivery_type, crontab)
    }

    /// Same as [`ReportDraft::initial`] with an explicit translator.
    pub fn initial_with(
        translator: &dyn Translator,
        entity_name: Option<&str>,
        delivery_type: DeliveryType,
        crontab: &str,
    ) -> Self {
        ReportDraft {
            id: None,
            name: default_report_name(translator, entity_name),
            description: String::new(),
            crontab: crontab.to_string(),
            timezone: None,
            report_format: None,
            delivery_type,
            recipients: Vec::new(),
            aws_key: None,
            aws_secret_key: None,
            aws_s3_type: None,
            aws_arn_role: None,
            is_submitting: false,
            error: None,
        }
    }
}

/// Templated default name: "Weekly Report for <entity>" or "Weekly Report".
pub fn default_report_name(translator: &dyn Translator, entity_name: Option<&str>) -> String {
    match entity_name.filter(|name| !name.is_empty()) {
        Some(name) => translator.translate("Weekly Report for %s", &[name]),
        None => translator.translate("Weekly Report", &[]),
    }
}

/// Partial draft. Only fields that are `Some` are merged.
///
/// Nullable draft fields use `Option<Option<_>>` so a patch can clear them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftPatch {
    pub id: Option<Option<i64>>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub crontab: Option<String>,
    pub timezone: Option<Option<String>>,
    pub report_format: Option<Option<ReportFormat>>,
    pub recipients: Option<Vec<Recipient>>,
    pub aws_key: Option<Option<String>>,
    pub aws_secret_key: Option<Option<String>>,
    pub aws_s3_type: Option<Option<S3SubMethod>>,
    pub aws_arn_role: Option<Option<String>>,
    pub is_submitting: Option<bool>,
    pub error: Option<Option<String>>,
}

impl DraftPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn crontab(mut self, crontab: impl Into<String>) -> Self {
        self.crontab = Some(crontab.into());
        self
    }

    pub fn timezone(mut self, timezone: Option<String>) -> Self {
        self.timezone = Some(timezone);
        self
    }

    pub fn report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = Some(Some(format));
        self
    }

    pub fn recipients(mut self, recipients: Vec<Recipient>) -> Self {
        self.recipients = Some(recipients);
        self
    }

    pub fn aws_key(mut self, key: impl Into<String>) -> Self {
        self.aws_key = Some(Some(key.into()));
        self
    }

    pub fn aws_secret_key(mut self, key: impl Into<String>) -> Self {
        self.aws_secret_key = Some(Some(key.into()));
        self
    }

    pub fn aws_arn_role(mut self, role: impl Into<String>) -> Self {
        self.aws_arn_role = Some(Some(role.into()));
        self
    }

    pub fn aws_s3_type(mut self, sub_method: Option<S3SubMethod>) -> Self {
        self.aws_s3_type = Some(sub_method);
        self
    }

    pub fn submitting(mut self, is_submitting: bool) -> Self {
        self.is_submitting = Some(is_submitting);
        self
    }

    pub fn error(mut self, error: Option<String>) -> Self {
        self.error = Some(error);
        self
    }

    /// Patch carrying every column of an existing report.
    ///
    /// String columns the backend left null are not merged.
    pub fn from_report(report: &ReportObject) -> Self {
        DraftPatch {
            id: Some(report.id),
            name: report.name.clone(),
            description: report.description.clone(),
            crontab: report.crontab.clone(),
            timezone: Some(report.timezone.clone()),
            report_format: Some(report.report_format),
            recipients: Some(report.recipients.clone()),
            aws_key: Some(report.aws_key.clone()),
            aws_secret_key: Some(report.aws_secret_key.clone()),
            aws_s3_type: Some(report.aws_s3_type),
            aws_arn_role: Some(report.aws_arn_role.clone()),
            is_submitting: None,
            error: None,
        }
    }

    /// Shallow-merge into `draft`.
    pub fn apply(self, draft: &mut ReportDraft) {
        if let Some(value) = self.id {
            draft.id = value;
        }
        if let Some(value) = self.name {
            draft.name = value;
        }
        if let Some(value) = self.description {
            draft.description = value;
        }
        if let Some(value) = self.crontab {
            draft.crontab = value;
        }
        if let Some(value) = self.timezone {
            draft.timezone = value;
        }
        if let Some(value) = self.report_format {
            draft.report_format = value;
        }
        if let Some(value) = self.recipients {
            draft.recipients = value;
        }
        if let Some(value) = self.aws_key {
            draft.aws_key = value;
        }
        if let Some(value) = self.aws_secret_key {
            draft.aws_secret_key = value;
        }
        if let Some(value) = self.aws_s3_type {
            draft.aws_s3_type = value;
        }
        if let Some(value) = self.aws_arn_role {
            draft.aws_arn_role = value;
        }
        if let Some(value) = self.is_submitting {
            draft.is_submitting = value;
        }
        if let Some(value) = self.error {
            draft.error = value;
        }
    }
}

/// Reducer actions
#[derive(Debug, Clone, PartialEq)]
pub enum DraftAction {
    /// Revert to the computed initial state
    Reset,
    /// Shallow-merge the given fields
    Merge(DraftPatch),
}

/// Pure reducer: `(state, action) -> state`.
pub fn reduce(state: &ReportDraft, action: DraftAction, initial: &ReportDraft) -> ReportDraft {
    match action {
        DraftAction::Reset => initial.clone(),
        DraftAction::Merge(patch) => {
            let mut next = state.clone();
            patch.apply(&mut next);
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{DeliveryMethod, DEFAULT_CRONTAB};

    fn initial() -> ReportDraft {
        ReportDraft::initial(Some("Sales"), DeliveryMethod::Email, DEFAULT_CRONTAB)
    }

    #[test]
    fn test_initial_state() {
        let draft = initial();
        assert_eq!(draft.name, "Weekly Report for Sales");
        assert_eq!(draft.crontab, "0 12 * * 1");
        assert!(!draft.is_submitting);
        assert!(draft.error.is_none());

        let unnamed = ReportDraft::initial(None, DeliveryMethod::S3, DEFAULT_CRONTAB);
        assert_eq!(unnamed.name, "Weekly Report");
        let blank = ReportDraft::initial(Some(""), DeliveryMethod::S3, DEFAULT_CRONTAB);
        assert_eq!(blank.name, "Weekly Report");
    }

    #[test]
    fn test_merge_only_touches_given_fields() {
        let start = initial();
        let next = reduce(
            &start,
            DraftAction::Merge(DraftPatch::new().description("weekly numbers")),
            &start,
        );
        assert_eq!(next.description, "weekly numbers");
        assert_eq!(next.name, start.name);
        assert_eq!(next.crontab, start.crontab);
    }

    #[test]
    fn test_merge_can_clear_nullable_fields() {
        let start = initial();
        let with_error = reduce(
            &start,
            DraftAction::Merge(DraftPatch::new().error(Some("boom".to_string())).timezone(Some("UTC".to_string()))),
            &start,
        );
        assert_eq!(with_error.error.as_deref(), Some("boom"));

        let cleared = reduce(&with_error, DraftAction::Merge(DraftPatch::new().error(None)), &start);
        assert!(cleared.error.is_none());
        assert_eq!(cleared.timezone.as_deref(), Some("UTC"));
    }

    #[test]
    fn test_reset_returns_initial() {
        let start = initial();
        let edited = reduce(&start, DraftAction::Merge(DraftPatch::new().name("")), &start);
        assert_eq!(reduce(&edited, DraftAction::Reset, &start), start);
    }

    #[test]
    fn test_hydration_patch_keeps_name_when_backend_sends_null() {
        let report = ReportObject {
            id: Some(3),
            crontab: Some("0 8 * * *".to_string()),
            aws_s3_type: Some(S3SubMethod::Iam),
            ..ReportObject::default()
        };
        let start = initial();
        let hydrated = reduce(&start, DraftAction::Merge(DraftPatch::from_report(&report)), &start);
        assert_eq!(hydrated.id, Some(3));
        assert_eq!(hydrated.name, "Weekly Report for Sales");
        assert_eq!(hydrated.crontab, "0 8 * * *");
        assert_eq!(hydrated.aws_s3_type, Some(S3SubMethod::Iam));
    }
}
