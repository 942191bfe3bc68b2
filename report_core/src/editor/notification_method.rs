//! # Notification Method Editor
//!
//! Edits one [`DeliverySetting`] of an alert. The parent owns the list; the
//! editor keeps a local recipients mirror for responsive typing and reports
//! changes back as [`NotificationEvent`]s.
//!
//! The S3 inputs (sub-method, bucket, keys, IAM role) are tracked locally and
//! are not part of the emitted setting.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::report::{DeliveryMethod, S3Field, S3SubMethod, S3_SUB_METHODS};

use super::sync::Observed;
use super::{s3_inputs, FieldView, SubMethodSelector};

/// Helper text under the recipients box
pub const RECIPIENTS_HINT: &str = "Recipients are separated by \",\" or \";\"";

/// One delivery setting of an alert
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySetting {
    pub method: Option<DeliveryMethod>,
    /// Free-form recipients, meaningful for Email only
    pub recipients: String,
    /// Methods the parent allows for this entry
    pub options: Vec<DeliveryMethod>,
}

impl DeliverySetting {
    pub fn new(options: Vec<DeliveryMethod>) -> Self {
        DeliverySetting {
            method: None,
            recipients: String::new(),
            options,
        }
    }
}

/// Change reported to the parent list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Update { index: usize, setting: DeliverySetting },
    Remove { index: usize },
}

/// Which parent callbacks are wired up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationHooks {
    pub on_update: bool,
    pub on_remove: bool,
}

impl Default for NotificationHooks {
    fn default() -> Self {
        NotificationHooks {
            on_update: true,
            on_remove: true,
        }
    }
}

/// Split a recipients string on `,` and `;`, dropping blanks.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub struct NotificationMethodEditor {
    index: usize,
    hooks: NotificationHooks,
    sub_methods: Vec<S3SubMethod>,

    recipient_value: String,
    observed_recipients: Observed<String>,

    s3_method: Option<S3SubMethod>,
    bucket_name: String,
    access_key: String,
    secret_key: String,
    iam_role: String,
}

impl NotificationMethodEditor {
    pub fn new(index: usize, setting: Option<&DeliverySetting>, hooks: NotificationHooks) -> Self {
        let recipients = setting.map(|s| s.recipients.clone()).unwrap_or_default();
        NotificationMethodEditor {
            index,
            hooks,
            sub_methods: S3_SUB_METHODS.to_vec(),
            observed_recipients: Observed::seeded(recipients.clone()),
            recipient_value: recipients,
            s3_method: None,
            bucket_name: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            iam_role: String::new(),
        }
    }

    /// Offer a different set of storage sub-methods
    pub fn with_sub_methods(mut self, sub_methods: Vec<S3SubMethod>) -> Self {
        self.sub_methods = sub_methods;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The entry moved within the parent list
    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn recipients(&self) -> &str {
        &self.recipient_value
    }

    pub fn s3_method(&self) -> Option<S3SubMethod> {
        self.s3_method
    }

    /// Mirror the parent's recipients when they changed since last seen.
    pub fn sync(&mut self, setting: Option<&DeliverySetting>) {
        let Some(setting) = setting else {
            return;
        };
        if self.observed_recipients.changed(&setting.recipients) {
            debug!(index = self.index, "recipients overwritten from parent");
            self.recipient_value = setting.recipients.clone();
        }
    }

    fn emit(&mut self, setting: DeliverySetting) -> Option<NotificationEvent> {
        if !self.hooks.on_update {
            return None;
        }
        self.observed_recipients.changed(&setting.recipients);
        Some(NotificationEvent::Update {
            index: self.index,
            setting,
        })
    }

    /// Pick a delivery method. Recipients are cleared.
    pub fn on_method_change(
        &mut self,
        setting: &DeliverySetting,
        method: DeliveryMethod,
    ) -> Option<NotificationEvent> {
        self.recipient_value.clear();
        self.emit(DeliverySetting {
            method: Some(method),
            recipients: String::new(),
            ..setting.clone()
        })
    }

    /// Recipients typed. Not validated here.
    pub fn on_recipients_change(
        &mut self,
        setting: &DeliverySetting,
        text: impl Into<String>,
    ) -> Option<NotificationEvent> {
        let text = text.into();
        self.recipient_value = text.clone();
        self.emit(DeliverySetting {
            recipients: text,
            ..setting.clone()
        })
    }

    /// Delete this entry; only offered once a method is chosen
    pub fn on_remove(&self, setting: &DeliverySetting) -> Option<NotificationEvent> {
        (self.hooks.on_remove && setting.method.is_some())
            .then_some(NotificationEvent::Remove { index: self.index })
    }

    pub fn select_s3_method(&mut self, sub_method: S3SubMethod) {
        self.s3_method = Some(sub_method);
    }

    pub fn set_bucket_name(&mut self, bucket: impl Into<String>) {
        self.bucket_name = bucket.into();
    }

    pub fn set_access_key(&mut self, key: impl Into<String>) {
        self.access_key = key.into();
    }

    pub fn set_secret_key(&mut self, key: impl Into<String>) {
        self.secret_key = key.into();
    }

    pub fn set_iam_role(&mut self, role: impl Into<String>) {
        self.iam_role = role.into();
    }

    fn field_value(&self, field: S3Field) -> String {
        match field {
            S3Field::BucketName => self.bucket_name.clone(),
            S3Field::AccessKey => self.access_key.clone(),
            S3Field::SecretKey => self.secret_key.clone(),
            S3Field::IamRole => self.iam_role.clone(),
        }
    }

    /// Render model; `None` when there is no setting to edit
    pub fn view(&self, setting: Option<&DeliverySetting>) -> Option<NotificationMethodView> {
        let setting = setting?;
        let method = setting.method;

        let s3_method_selector = (method == Some(DeliveryMethod::S3)).then(|| SubMethodSelector {
            options: self.sub_methods.clone(),
            selected: self.s3_method,
        });

        let s3_inputs = if method != Some(DeliveryMethod::Email) {
            s3_inputs(self.s3_method, |field| self.field_value(field))
        } else {
            Vec::new()
        };

        let recipients = (method == Some(DeliveryMethod::Email)).then(|| RecipientsInput {
            label: DeliveryMethod::Email.as_str().to_string(),
            value: self.recipient_value.clone(),
            hint: RECIPIENTS_HINT.to_string(),
        });

        Some(NotificationMethodView {
            method_options: setting.options.clone(),
            method,
            show_delete: self.hooks.on_remove && method.is_some(),
            s3_method_selector,
            s3_inputs,
            recipients,
        })
    }
}

/// Email recipients textarea
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientsInput {
    pub label: String,
    pub value: String,
    pub hint: String,
}

/// Render model of one notification method row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMethodView {
    pub method_options: Vec<DeliveryMethod>,
    pub method: Option<DeliveryMethod>,
    pub show_delete: bool,
    pub s3_method_selector: Option<SubMethodSelector>,
    pub s3_inputs: Vec<FieldView>,
    pub recipients: Option<RecipientsInput>,
}
