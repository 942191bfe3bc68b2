//! # report_core - Report Delivery Form Engine
//!
//! `report_core` holds the form-state logic behind the report scheduling modal
//! and the notification method editor. Nothing in here knows about a widget
//! toolkit: hosts feed user input in, read view models out, and run the report
//! API call on whatever executor they own.
//!
//! ## Design Philosophy
//!
//! - **Reducer-driven**: the report draft only changes through [`draft::reduce`]
//! - **JSON-First**: wire types implement Serialize/Deserialize with backend names
//! - **Rich Errors**: structured error types, not just strings
//! - **Explicit sync**: external values are mirrored by comparing against the
//!   last value observed, never by re-running side effects
//!
//! ## Quick Start
//!
//! ```rust
//! use report_core::editor::{ReportEditor, ReportEditorProps};
//! use report_core::report::{ActingUser, DeliveryType, ReportTarget};
//!
//! let props = ReportEditorProps::new(
//!     ReportTarget::chart(7, Some("Sales".to_string()), Some("table".to_string())),
//!     ActingUser::new(1, "admin@example.com"),
//!     DeliveryType::Email,
//! );
//! let editor = ReportEditor::open(props, None);
//! assert_eq!(editor.draft().name, "Weekly Report for Sales");
//! ```
//!
//! ## Modules
//!
//! - [`menu`] - Viewport-aware popup menu positioning
//! - [`report`] - Report, recipient, and payload types
//! - [`draft`] - Report draft and its reducer
//! - [`editor`] - Report editor and notification method editor state machines
//! - [`api`] - Report API trait, HTTP client, and report lookup
//! - [`i18n`] - Translation seam
//! - [`config`] - TOML configuration
//! - [`errors`] - Structured error types

pub mod api;
pub mod config;
pub mod draft;
pub mod editor;
pub mod errors;
pub mod i18n;
pub mod menu;
pub mod report;

// Re-export commonly used types at crate root for convenience
pub use api::{ApiError, HttpReportApi, ReportApi, ReportLookup, ReportStore};
pub use config::AppConfig;
pub use draft::{DraftAction, DraftPatch, ReportDraft};
pub use editor::{NotificationMethodEditor, ReportEditor};
pub use errors::{ReportError, ReportResult};
pub use menu::{compute_menu_offset, compute_menu_offset_with, MenuMetrics};
