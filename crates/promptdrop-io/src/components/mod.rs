//! Dioxus UI components for promptdrop.
//!
//! Provides the upload widget with its staged file rows, the page
//! container that owns the staging store, and the toast host.

mod container;
mod staged_item;
mod toast;
mod upload;

pub use container::UploadContainer;
pub use staged_item::StagedItem;
pub use toast::{Toast, ToastHost, ToastList, Toasts, use_toasts};
pub use upload::{FileUpload, ProviderHandle};
