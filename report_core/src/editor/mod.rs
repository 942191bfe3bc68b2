//! # Editors
//!
//! Toolkit-independent state machines behind the two forms:
//!
//! - [`report_editor`] - report scheduling modal (draft reducer, hydration, save)
//! - [`notification_method`] - one delivery setting inside an alert's list
//! - [`sync`] - last-seen tracking used to mirror external values
//!
//! Both editors expose a view model describing which inputs are visible and
//! what they contain. Hosts render the view model and feed input back in.

pub mod notification_method;
pub mod report_editor;
pub mod sync;

pub use notification_method::{
    parse_recipients, DeliverySetting, NotificationEvent, NotificationHooks,
    NotificationMethodEditor, NotificationMethodView, RecipientsInput, RECIPIENTS_HINT,
};
pub use report_editor::{
    ErrorBanner, ReportEditor, ReportEditorProps, ReportFormView, SaveControl, SaveMode,
    SaveOutcome, SaveRequest,
};

use crate::report::{ReportFormat, S3Field, S3SubMethod};

/// A visible S3 input and its current text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub field: S3Field,
    pub value: String,
}

/// Sub-method dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubMethodSelector {
    pub options: Vec<S3SubMethod>,
    pub selected: Option<S3SubMethod>,
}

/// Message format radio group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSelector {
    pub options: Vec<ReportFormat>,
    pub selected: ReportFormat,
}

/// S3 inputs for `sub_method`, in display order
fn s3_inputs(sub_method: Option<S3SubMethod>, value_of: impl Fn(S3Field) -> String) -> Vec<FieldView> {
    sub_method
        .map(|sub| {
            sub.fields()
                .iter()
                .map(|&field| FieldView {
                    field,
                    value: value_of(field),
                })
                .collect()
        })
        .unwrap_or_default()
}
