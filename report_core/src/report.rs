//! # Report Data Structures
//!
//! Wire types shared with the backend report API plus the small enums the
//! editors are built from. Field names follow the backend schema, so several
//! serde renames keep the camel-case columns (`aws_secretKey`, `aws_S3_types`).
//!
//! ## Structure
//!
//! ```text
//! ReportObject (fetched, existing report)
//! ├── schedule: crontab, timezone
//! ├── content: report_format
//! ├── recipients: Vec<Recipient>  (type + recipient_config_json {target})
//! └── S3 columns: aws_key, aws_secretKey, aws_S3_types, aws_arn_role
//!
//! ReportPayload (what the editor submits)
//! └── same columns plus fixed metadata (type, active, owners, ...)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ReportError, ReportResult};

/// Schedule used for new reports: every Monday at noon
pub const DEFAULT_CRONTAB: &str = "0 12 * * 1";

/// Chart kinds whose report is better sent as embedded text
pub const TEXT_BASED_VISUALIZATION_TYPES: [&str; 4] =
    ["pivot_table", "pivot_table_v2", "table", "paired_ttest"];

/// Storage credential styles offered by the sub-method selector
pub const S3_SUB_METHODS: [S3SubMethod; 3] =
    [S3SubMethod::Credentials, S3SubMethod::PyConfig, S3SubMethod::Iam];

/// Column limits of the report schedule table
pub const AWS_KEY_MAX_LEN: usize = 100;
pub const AWS_SECRET_KEY_MAX_LEN: usize = 100;
pub const AWS_ARN_ROLE_MAX_LEN: usize = 200;
pub const AWS_S3_TYPES_MAX_LEN: usize = 200;

/// Format of the report content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportFormat {
    #[serde(rename = "PNG")]
    Png,
    #[serde(rename = "CSV")]
    Csv,
    #[serde(rename = "TEXT")]
    Text,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Png, ReportFormat::Csv, ReportFormat::Text];

    /// Backend value
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Png => "PNG",
            ReportFormat::Csv => "CSV",
            ReportFormat::Text => "TEXT",
        }
    }

    /// Radio label shown in the message content section
    pub fn label(&self) -> &'static str {
        match self {
            ReportFormat::Png => "Image (PNG) embedded in email",
            ReportFormat::Csv => "Formatted CSV attached in email",
            ReportFormat::Text => "Text embedded in email",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Delivery mechanism of a report or alert notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryMethod {
    Email,
    S3,
}

/// The delivery kind a report editor was opened for
pub type DeliveryType = DeliveryMethod;

impl DeliveryMethod {
    pub const ALL: [DeliveryMethod; 2] = [DeliveryMethod::Email, DeliveryMethod::S3];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Email => "Email",
            DeliveryMethod::S3 => "S3",
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Credential style used for S3 delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum S3SubMethod {
    /// Access key and secret key typed into the form
    #[serde(rename = "AWS_S3_credentials")]
    Credentials,
    /// Keys taken from the server's Python config
    #[serde(rename = "AWS_S3_pyconfig")]
    PyConfig,
    /// Assumed IAM role
    #[serde(rename = "AWS_S3_IAM")]
    Iam,
}

impl S3SubMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            S3SubMethod::Credentials => "AWS_S3_credentials",
            S3SubMethod::PyConfig => "AWS_S3_pyconfig",
            S3SubMethod::Iam => "AWS_S3_IAM",
        }
    }

    /// Inputs shown for this sub-method, in display order
    pub fn fields(&self) -> &'static [S3Field] {
        match self {
            S3SubMethod::Credentials => {
                &[S3Field::BucketName, S3Field::AccessKey, S3Field::SecretKey]
            }
            S3SubMethod::Iam => &[S3Field::IamRole, S3Field::BucketName],
            S3SubMethod::PyConfig => &[S3Field::BucketName],
        }
    }
}

impl fmt::Display for S3SubMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An input belonging to the S3 delivery section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum S3Field {
    BucketName,
    AccessKey,
    SecretKey,
    IamRole,
}

impl S3Field {
    pub fn label(&self) -> &'static str {
        match self {
            S3Field::BucketName => "Bucket Name",
            S3Field::AccessKey => "Access Key",
            S3Field::SecretKey => "Secret Key",
            S3Field::IamRole => "AWS IAM ROLE",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            S3Field::BucketName => "Type[Bucket Name]",
            S3Field::AccessKey => "Type[Access Key]",
            S3Field::SecretKey => "Type[Secret Key]",
            S3Field::IamRole => "Type[ AWS IAM ROLE ]",
        }
    }

    /// Masked inputs
    pub fn is_secret(&self) -> bool {
        !matches!(self, S3Field::BucketName)
    }
}

/// How the report was created, recorded by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationMethod {
    Charts,
    Dashboards,
    AlertsReports,
}

/// Resource a report is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Dashboard,
    Chart,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Dashboard => "Dashboard",
            ResourceKind::Chart => "Chart",
        }
    }

    pub fn creation_method(&self) -> CreationMethod {
        match self {
            ResourceKind::Dashboard => CreationMethod::Dashboards,
            ResourceKind::Chart => CreationMethod::Charts,
        }
    }
}

/// The chart or dashboard a report is scheduled for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTarget {
    pub kind: ResourceKind,
    pub id: i64,
    /// Display name, used in the default report name
    pub name: Option<String>,
    /// Visualization kind (charts only)
    pub viz_type: Option<String>,
}

impl ReportTarget {
    pub fn chart(id: i64, name: Option<String>, viz_type: Option<String>) -> Self {
        ReportTarget {
            kind: ResourceKind::Chart,
            id,
            name,
            viz_type,
        }
    }

    pub fn dashboard(id: i64, name: Option<String>) -> Self {
        ReportTarget {
            kind: ResourceKind::Dashboard,
            id,
            name,
            viz_type: None,
        }
    }

    pub fn is_chart(&self) -> bool {
        self.kind == ResourceKind::Chart
    }

    /// True for charts whose visualization kind is listed in `text_based_kinds`
    pub fn is_text_based<S: AsRef<str>>(&self, text_based_kinds: &[S]) -> bool {
        self.is_chart()
            && self
                .viz_type
                .as_deref()
                .is_some_and(|viz| text_based_kinds.iter().any(|k| k.as_ref() == viz))
    }
}

/// The user acting in the hosting application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActingUser {
    pub id: i64,
    pub email: String,
}

impl ActingUser {
    pub fn new(id: i64, email: impl Into<String>) -> Self {
        ActingUser {
            id,
            email: email.into(),
        }
    }
}

/// Decoded `recipient_config_json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientConfig {
    #[serde(default)]
    pub target: String,
}

/// One notification recipient as stored by the backend.
///
/// `recipient_config_json` arrives as an embedded JSON string from the API but
/// is sent back as an object, so it is kept as a raw [`Value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(rename = "type")]
    pub recipient_type: DeliveryMethod,
    #[serde(default)]
    pub recipient_config_json: Value,
}

impl Recipient {
    pub fn new(recipient_type: DeliveryMethod, target: impl Into<String>) -> Self {
        Recipient {
            recipient_type,
            recipient_config_json: serde_json::json!({ "target": target.into() }),
        }
    }

    /// Target address or bucket.
    ///
    /// Strings are parsed as JSON, objects are read directly. Anything
    /// malformed, or an empty target, yields `None`.
    pub fn target(&self) -> Option<String> {
        let config: Option<RecipientConfig> = match &self.recipient_config_json {
            Value::String(raw) => serde_json::from_str(raw).ok(),
            value @ Value::Object(_) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        };
        config.map(|c| c.target).filter(|target| !target.is_empty())
    }
}

/// First non-empty recipient target, in list order
pub fn first_target(recipients: &[Recipient]) -> Option<String> {
    recipients.iter().find_map(Recipient::target)
}

/// An existing report as returned by the report API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportObject {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub crontab: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub report_format: Option<ReportFormat>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub recipients: Vec<Recipient>,
    #[serde(default)]
    pub aws_key: Option<String>,
    #[serde(default, rename = "aws_secretKey")]
    pub aws_secret_key: Option<String>,
    #[serde(default, rename = "aws_S3_types")]
    pub aws_s3_type: Option<S3SubMethod>,
    #[serde(default)]
    pub aws_arn_role: Option<String>,
}

/// Body of a create or update call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    #[serde(rename = "type")]
    pub report_type: String,
    pub active: bool,
    pub force_screenshot: bool,
    pub creation_method: CreationMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<i64>,
    pub owners: Vec<i64>,
    pub recipients: Vec<Recipient>,
    pub name: String,
    pub description: String,
    pub crontab: String,
    pub report_format: ReportFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub aws_key: String,
    #[serde(rename = "aws_secretKey")]
    pub aws_secret_key: String,
    #[serde(rename = "aws_S3_types")]
    pub aws_s3_type: Option<S3SubMethod>,
    pub aws_arn_role: String,
}

impl ReportPayload {
    /// Check the payload against the backend's column constraints.
    pub fn validate(&self) -> ReportResult<()> {
        if self.name.is_empty() {
            return Err(ReportError::missing_field("name"));
        }
        check_len("aws_key", &self.aws_key, AWS_KEY_MAX_LEN)?;
        check_len("aws_secretKey", &self.aws_secret_key, AWS_SECRET_KEY_MAX_LEN)?;
        check_len("aws_arn_role", &self.aws_arn_role, AWS_ARN_ROLE_MAX_LEN)?;
        if let Some(sub) = self.aws_s3_type {
            check_len("aws_S3_types", sub.as_str(), AWS_S3_TYPES_MAX_LEN)?;
        }
        Ok(())
    }
}

fn check_len(field: &str, value: &str, max: usize) -> ReportResult<()> {
    if value.chars().count() > max {
        return Err(ReportError::invalid_input(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(())
}
