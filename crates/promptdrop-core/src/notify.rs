//! User-facing notifications.
//!
//! The staging logic never looks a notification service up by itself; a
//! [`Notifier`] is handed to whoever owns the store.

use std::fmt;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Something the user asked for succeeded.
    Success,
    /// Neutral information.
    Info,
    /// Something failed.
    Error,
}

impl Level {
    /// Lowercase name, usable as a CSS modifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// A fire-and-forget message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: Level,
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Notice for a change in the staged set, or `None` when it is empty.
    #[must_use]
    pub fn staged(count: usize) -> Option<Self> {
        (count > 0).then(|| Self {
            level: Level::Success,
            message: format!("{count} file(s) uploaded successfully!"),
        })
    }

    /// Notice for a removed file.
    #[must_use]
    pub fn removed() -> Self {
        Self {
            level: Level::Info,
            message: "File removed".to_owned(),
        }
    }

    /// Notices shown after a removal leaves `remaining` files staged: the
    /// refreshed staged count, when any remain, then the removal itself.
    #[must_use]
    pub fn after_removal(remaining: usize) -> Vec<Self> {
        Self::staged(remaining)
            .into_iter()
            .chain(std::iter::once(Self::removed()))
            .collect()
    }

    /// Notice for a failed operation.
    #[must_use]
    pub fn failed(message: impl fmt::Display) -> Self {
        Self {
            level: Level::Error,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Sink for [`Notice`]s.
pub trait Notifier {
    /// Show a notice. Must not fail or block.
    fn notify(&self, notice: Notice);
}
