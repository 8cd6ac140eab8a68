//! One row of the staged file list.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdFile, LdX};
use promptdrop_core::{EntryId, StagedEntry};

/// Props for the [`StagedItem`] component.
#[derive(Props, Clone, PartialEq)]
pub struct StagedItemProps {
    /// Entry to render.
    entry: StagedEntry,
    /// Called with the entry's id when the remove button is clicked.
    on_remove: EventHandler<EntryId>,
}

/// Thumbnail (or file icon), name, size, progress bar, and remove button.
#[component]
pub fn StagedItem(props: StagedItemProps) -> Element {
    let entry = &props.entry;
    let file = entry.file();
    let name = file.name.clone();
    let size = file.size_mb();
    let percent = entry.progress().percent();
    let id = entry.id();
    let on_remove = props.on_remove;

    rsx! {
        div { class: "staged-item",
            div { class: "staged-thumb",
                if let Some(preview) = entry.preview() {
                    img { src: "{preview}", alt: "{name}" }
                } else {
                    Icon { icon: LdFile, width: 20, height: 20 }
                }
            }

            div { class: "staged-body",
                p { class: "staged-name", "{name}" }
                p { class: "staged-size", "{size} MB" }

                if !entry.progress().is_complete() {
                    div { class: "progress-track",
                        div { class: "progress-fill", style: "width: {percent}%" }
                    }
                }

                if entry.success() {
                    p { class: "staged-done", "Upload complete" }
                }
            }

            button {
                r#type: "button",
                class: "staged-remove",
                aria_label: "Remove {name}",
                onclick: move |evt: MouseEvent| {
                    evt.stop_propagation();
                    on_remove.call(id);
                },
                Icon { icon: LdX, width: 16, height: 16 }
            }
        }
    }
}
