//! Drag-and-drop upload widget with prompt submission.

use std::rc::Rc;

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdLoader, LdUpload};
use promptdrop_core::{
    CancelToken, EntryId, ProgressSchedule, Rejection, ResultProvider, StagedEntry, Staging,
    Submission, UploadOptions, admit,
};

use super::staged_item::StagedItem;
use crate::{reader, ticker};

/// Shared handle to a [`ResultProvider`]. Equality is pointer identity.
#[derive(Clone)]
pub struct ProviderHandle(Rc<dyn ResultProvider>);

impl ProviderHandle {
    /// Wrap a provider.
    #[must_use]
    pub fn new(provider: impl ResultProvider + 'static) -> Self {
        Self(Rc::new(provider))
    }
}

impl PartialEq for ProviderHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Store of staged files, owned by the caller.
    staging: Signal<Staging>,
    /// Drop surface options.
    options: UploadOptions,
    /// Progress simulation timing.
    #[props(default)]
    schedule: ProgressSchedule,
    /// Where submissions go.
    provider: ProviderHandle,
    /// Called with the new count after files were staged.
    on_change: Option<EventHandler<usize>>,
    /// Called with the remaining count after a file was removed.
    on_remove: Option<EventHandler<usize>>,
    /// Called with the message when a submission fails.
    on_error: Option<EventHandler<String>>,
}

/// Admit, read, and stage dropped files, starting a progress timer for
/// each staged entry.
///
/// Returns the number of staged entries and every rejection.
async fn stage_files(
    files: Vec<FileData>,
    options: &UploadOptions,
    schedule: ProgressSchedule,
    mut staging: Signal<Staging>,
) -> (usize, Vec<Rejection>) {
    let candidates = files.iter().map(reader::candidate).collect();
    let admission = admit(options, staging.peek().len(), candidates);
    let mut rejections = admission.rejections;
    let mut added = 0;

    for (candidate, file) in reader::pair_admitted(files, admission.accepted) {
        match reader::load(candidate, &file).await {
            Ok((staged, preview)) => {
                let token = CancelToken::new();
                let id = staging.write().stage(staged, preview, token.clone());
                if let Some(id) = id {
                    ticker::start(staging, id, schedule, token);
                    added += 1;
                }
            }
            Err(rejection) => rejections.push(rejection),
        }
    }

    (added, rejections)
}

/// Drop surface, staged file list, prompt, and submit button.
///
/// Files enter through drag-and-drop or the file picker. The surface is
/// disabled while the store is full or `options.disabled` is set. Submit
/// forwards the prompt and the first staged file to the provider; the
/// staged files are kept afterwards.
#[component]
#[allow(clippy::too_many_lines)]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut staging = props.staging;
    let mut dragging = use_signal(|| false);
    let mut rejections = use_signal(Vec::<Rejection>::new);
    let mut prompt = use_signal(String::new);
    let mut submission = use_signal(Submission::default);

    let options = props.options;
    let schedule = props.schedule;
    let on_change = props.on_change;
    let on_remove = props.on_remove;
    let on_error = props.on_error;

    let entries: Vec<StagedEntry> = staging.read().entries().cloned().collect();
    let staged_count = entries.len();
    let accepting = options.is_accepting(staged_count);
    let busy = submission.read().is_busy();
    let result_text = submission.read().result().map(str::to_owned);
    let error_text = submission.read().error().map(str::to_owned);
    let rejection_lines: Vec<String> = rejections.read().iter().map(ToString::to_string).collect();

    // Shared by the file-picker and drag-and-drop paths.
    let process_files = move |files: Vec<FileData>, options: UploadOptions| async move {
        let (added, rejected) = stage_files(files, &options, schedule, staging).await;
        rejections.set(rejected);
        if added > 0
            && let Some(handler) = on_change
        {
            handler.call(staging.peek().len());
        }
    };

    let handle_files = {
        let options = options.clone();
        move |evt: FormEvent| process_files(evt.files(), options.clone())
    };

    let handle_drop = {
        let options = options.clone();
        move |evt: DragEvent| {
            evt.prevent_default();
            dragging.set(false);
            process_files(evt.files(), options.clone())
        }
    };

    let remove = move |id: EntryId| {
        let removed = staging.write().remove(id);
        if removed.is_some()
            && let Some(handler) = on_remove
        {
            handler.call(staging.peek().len());
        }
    };

    let submit = {
        let provider = props.provider;
        move |_: MouseEvent| {
            let file = match submission.write().begin(&staging.read()) {
                Ok(file) => file,
                Err(e) => {
                    tracing::debug!(error = %e, "submit ignored");
                    return;
                }
            };
            let provider = provider.clone();
            let prompt_text = prompt.peek().clone();
            spawn(async move {
                let outcome = provider.0.get_result(&prompt_text, &file).await;
                if let (Err(e), Some(handler)) = (&outcome, on_error) {
                    handler.call(e.to_string());
                }
                submission.write().finish(outcome);
            });
        }
    };

    let surface_class = match (accepting, dragging()) {
        (false, _) => "drop-surface drop-disabled",
        (true, true) => "drop-surface drop-active",
        (true, false) => "drop-surface",
    };
    let surface_text = if dragging() {
        "Drop files here..."
    } else {
        "Drag files here or click to upload"
    };
    let max_files = options.max_files;
    let max_size_mb = options.max_size_mb;
    let accept_attr = options.accept_attribute();
    let multiple = options.allows_multiple();

    rsx! {
        div { class: "upload-widget",
            if let Some(ref text) = result_text {
                p { class: "result-text", "{text}" }
            }

            if let Some(ref err) = error_text {
                div { class: "error-box",
                    p { "Submission failed: {err}" }
                }
            }

            textarea {
                class: "prompt-input",
                rows: "10",
                placeholder: "Ask something about the file...",
                value: "{prompt}",
                oninput: move |e| prompt.set(e.value()),
            }

            div { class: "card",
                div { class: "card-header",
                    h2 { class: "card-title", "File Upload" }
                    p { class: "card-description", "Drag and Drop files or click upload" }
                }

                div { class: "card-content",
                    label {
                        class: "{surface_class}",
                        ondragover: move |evt| {
                            evt.prevent_default();
                            if accepting {
                                dragging.set(true);
                            }
                        },
                        ondragleave: move |_| dragging.set(false),
                        ondrop: handle_drop,

                        input {
                            r#type: "file",
                            class: "hidden",
                            accept: "{accept_attr}",
                            multiple,
                            disabled: !accepting,
                            onchange: handle_files,
                        }

                        Icon { icon: LdUpload, width: 32, height: 32, class: "drop-icon" }
                        p { class: "drop-title", "{surface_text}" }
                        p { class: "drop-hint",
                            "Max {max_files} file(s), up to {max_size_mb}MB each"
                        }
                    }

                    if !rejection_lines.is_empty() {
                        div { class: "rejections",
                            for (i, line) in rejection_lines.into_iter().enumerate() {
                                div { key: "{i}", "{line}" }
                            }
                        }
                    }

                    if !entries.is_empty() {
                        div { class: "staged-list",
                            for entry in entries {
                                StagedItem {
                                    key: "{entry.id()}",
                                    entry,
                                    on_remove: remove,
                                }
                            }
                        }
                    }
                }

                div { class: "card-footer",
                    p { class: "footer-count", "{staged_count}/{max_files} files uploaded" }
                    button {
                        class: "submit-button",
                        disabled: busy || staged_count == 0,
                        onclick: submit,
                        if busy {
                            Icon { icon: LdLoader, width: 16, height: 16, class: "spin" }
                        } else {
                            "submit"
                        }
                    }
                }
            }
        }
    }
}
