//! Page-level container: owns the staging store and wires notifications.

use dioxus::prelude::*;
use promptdrop_core::{AppConfig, Notice, Notifier, Staging};

use super::toast::{ToastHost, use_toasts};
use super::upload::{FileUpload, ProviderHandle};
use crate::remote::HttpResultProvider;

/// Props for the [`UploadContainer`] component.
#[derive(Props, Clone, PartialEq, Eq)]
pub struct UploadContainerProps {
    /// Validated application configuration.
    config: AppConfig,
}

/// Upload widget plus toasts and a summary of staged files.
///
/// The staging store lives exactly as long as this component; unmounting
/// cancels every running progress timer.
#[component]
pub fn UploadContainer(props: UploadContainerProps) -> Element {
    let config = props.config;
    let max_files = config.upload.max_files;
    let mut staging = use_signal(move || Staging::new(max_files));
    let toasts = use_toasts();
    let endpoint = config.endpoint.clone();
    let provider = use_hook(move || {
        let remote = HttpResultProvider::new(&endpoint);
        tracing::info!(endpoint = remote.endpoint(), "result provider ready");
        ProviderHandle::new(remote)
    });

    use_drop(move || {
        if let Ok(mut store) = staging.try_write() {
            store.clear();
        }
    });

    let summary: Vec<(String, String)> = staging
        .read()
        .entries()
        .map(|e| (e.file().name.clone(), e.file().size_mb()))
        .collect();

    rsx! {
        div { class: "container",
            ToastHost { toasts }

            FileUpload {
                staging,
                options: config.upload.clone(),
                schedule: config.simulation,
                provider,
                on_change: move |count: usize| {
                    if let Some(notice) = Notice::staged(count) {
                        toasts.notify(notice);
                    }
                },
                on_remove: move |remaining: usize| {
                    for notice in Notice::after_removal(remaining) {
                        toasts.notify(notice);
                    }
                },
                on_error: move |message: String| toasts.notify(Notice::failed(message)),
            }

            if !summary.is_empty() {
                div { class: "summary",
                    h3 { class: "summary-title", "Uploaded Files:" }
                    div { class: "summary-list",
                        for (i, (name, size)) in summary.into_iter().enumerate() {
                            div { key: "{i}", class: "summary-item", "{name} ({size} MB)" }
                        }
                    }
                }
            }
        }
    }
}
