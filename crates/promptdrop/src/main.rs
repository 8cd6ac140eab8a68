use dioxus::prelude::*;
use promptdrop_core::AppConfig;
use promptdrop_io::UploadContainer;

/// Configuration bundled into the binary.
const CONFIG_JSON: &str = include_str!("../config/promptdrop.json");

/// Page stylesheet.
const STYLE_CSS: &str = include_str!("../assets/promptdrop.css");

fn main() {
    dioxus::launch(app);
}

/// Parse the bundled configuration, falling back to defaults.
///
/// A broken config file should not take the page down; the error is
/// logged and the documented defaults are used instead.
fn load_config() -> AppConfig {
    AppConfig::from_json(CONFIG_JSON).unwrap_or_else(|e| {
        tracing::error!(error = %e, "invalid bundled config, using defaults");
        AppConfig::default()
    })
}

/// Root application component.
fn app() -> Element {
    let config = use_hook(load_config);

    rsx! {
        style { dangerous_inner_html: STYLE_CSS }

        main { class: "page",
            div { class: "page-inner",
                h1 { class: "page-title", "Drag and Drop file Upload" }
                UploadContainer { config }
            }
        }
    }
}
