//! # boop
//!
//! Headless core of the Boop feedback widget. A host renderer (web, native
//! or terminal) draws the button and panel; this crate owns everything else:
//!
//! - layered, partial options and their fully-defaulted resolution
//! - panel placement and animation/motion style descriptors
//! - the submission pipeline (validation, metadata, one JSON POST)
//! - opt-in diagnostics capture attached to submissions
//! - the open/close state machine and a headless widget controller
//! - a shared provider context for several widgets

pub mod animation;
pub mod config;
pub mod diagnostics;
pub mod options;
pub mod positioning;
pub mod provider;
pub mod styles;
pub mod submit;
pub mod transport;
pub mod types;
pub mod url;
pub mod visibility;
pub mod widget;

pub use config::ConfigError;
pub use diagnostics::{DiagnosticsService, StackSnapshot};
pub use options::{DEFAULT_ENDPOINT, ResolvedOptions, combine, resolve};
pub use provider::{BoopProvider, ProviderError, try_use_boop, use_boop};
pub use submit::{FeedbackClient, SubmitError, SubmitRequest};
pub use transport::{FeedbackResponse, FeedbackTransport, HttpTransport};
pub use types::{BoopOptions, Callbacks, FieldName, SubmitPayload};
pub use widget::{FeedbackWidget, SubmitStatus, UiEvent, WidgetView};
