//! promptdrop-io: Browser I/O and Dioxus component library.
//!
//! Reads dropped files, drives progress timers, talks to the remote
//! result provider, and provides the UI components for the promptdrop
//! web application.

pub mod components;
pub mod reader;
pub mod remote;
pub mod ticker;

pub use components::{FileUpload, ProviderHandle, StagedItem, ToastHost, Toasts, UploadContainer};
pub use remote::HttpResultProvider;
