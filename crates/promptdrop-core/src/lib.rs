//! promptdrop-core: File staging and submission state (sans-IO).
//!
//! Models the upload widget's state machine:
//! admission -> preview -> staging -> simulated progress -> submission.
//!
//! This crate has **no browser dependencies** -- timers, file reads, and
//! the remote result provider are injected by callers. All browser
//! interaction lives in `promptdrop-io`.

pub mod config;
pub mod notify;
pub mod options;
pub mod preview;
pub mod progress;
pub mod staging;
pub mod submit;
pub mod validate;

pub use config::{AppConfig, ConfigError};
pub use notify::{Level, Notice, Notifier};
pub use options::{AcceptRule, OptionsError, UploadOptions};
pub use progress::{CancelToken, Progress, ProgressSchedule, SimulationEnd, Tick};
pub use staging::{EntryId, StagedEntry, StagedFile, Staging};
pub use submit::{ProviderError, ResultProvider, SubmitError, Submission};
pub use validate::{Admission, Candidate, RejectReason, Rejection, admit};
