//! Toast notifications.
//!
//! [`Toasts`] is a [`Notifier`] backed by a signal; [`ToastHost`] renders
//! whatever it holds. Each toast dismisses itself after
//! [`TOAST_LIFETIME_MS`].

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use promptdrop_core::{Notice, Notifier};

/// How long a toast stays visible.
pub const TOAST_LIFETIME_MS: u32 = 4_000;

/// Most toasts shown at once; older ones are dropped first.
const MAX_VISIBLE: usize = 3;

/// A displayed notice with its own id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Id used for dismissal.
    pub id: u64,
    /// The notice shown.
    pub notice: Notice,
}

/// Bounded, ordered list of visible toasts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastList {
    items: Vec<Toast>,
    next_id: u64,
}

impl ToastList {
    /// Add a toast, evicting the oldest beyond [`MAX_VISIBLE`]. Returns its id.
    pub fn push(&mut self, notice: Notice) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Toast { id, notice });
        if self.items.len() > MAX_VISIBLE {
            let excess = self.items.len() - MAX_VISIBLE;
            self.items.drain(..excess);
        }
        id
    }

    /// Remove the toast with `id`, if still shown.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    /// Visible toasts, oldest first.
    #[must_use]
    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

/// Handle to the page's toast list. Cheap to copy.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Toasts {
    list: Signal<ToastList>,
}

/// Create the toast list for the current component scope.
#[must_use]
pub fn use_toasts() -> Toasts {
    let list = use_signal(ToastList::default);
    Toasts { list }
}

impl Toasts {
    /// Read access for rendering.
    #[must_use]
    pub const fn list(&self) -> Signal<ToastList> {
        self.list
    }
}

impl Notifier for Toasts {
    fn notify(&self, notice: Notice) {
        tracing::info!(level = notice.level.as_str(), message = %notice.message, "notice");
        let mut list = self.list;
        let id = list.write().push(notice);
        spawn(async move {
            TimeoutFuture::new(TOAST_LIFETIME_MS).await;
            if let Ok(mut l) = list.try_write() {
                l.dismiss(id);
            }
        });
    }
}

/// Props for the [`ToastHost`] component.
#[derive(Props, Clone, PartialEq, Eq)]
pub struct ToastHostProps {
    toasts: Toasts,
}

/// Fixed-position stack of toasts. Clicking a toast dismisses it.
#[component]
pub fn ToastHost(props: ToastHostProps) -> Element {
    let mut list = props.toasts.list();
    let items = list.read().items().to_vec();

    rsx! {
        div { class: "toast-stack", role: "status", aria_live: "polite",
            for toast in items {
                div {
                    key: "{toast.id}",
                    class: "toast toast-{toast.notice.level.as_str()}",
                    onclick: move |_| list.write().dismiss(toast.id),
                    "{toast.notice.message}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_evicts_oldest() {
        let mut list = ToastList::default();
        for i in 0..5 {
            list.push(Notice::failed(i));
        }
        let messages: Vec<_> = list.items().iter().map(|t| t.notice.message.as_str()).collect();
        assert_eq!(messages, ["2", "3", "4"]);
    }

    #[test]
    fn dismiss_removes_only_matching() {
        let mut list = ToastList::default();
        let a = list.push(Notice::removed());
        let b = list.push(Notice::removed());
        list.dismiss(a);
        list.dismiss(a);
        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].id, b);
    }
}
