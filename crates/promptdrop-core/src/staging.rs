//! In-memory store of staged files.
//!
//! Entries keep insertion order, which is also display order. Each entry
//! gets an [`EntryId`] at creation that is never reused, and every
//! mutation from a timer goes through that id rather than through a
//! position, so removals never retarget a running timer.

use std::fmt;
use std::rc::Rc;

use bytes::Bytes;

use crate::progress::{CancelToken, Progress, Tick};

/// Stable identity of a staged entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Raw file content plus the metadata needed to display and submit it.
///
/// Cloning is cheap: the content is reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// File name.
    pub name: String,
    /// MIME type.
    pub mime: String,
    /// File content.
    pub bytes: Bytes,
}

impl StagedFile {
    /// Create a staged file.
    #[must_use]
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Content length in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Size in megabytes formatted with two decimals, e.g. `"2.00"`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // display only
    pub fn size_mb(&self) -> String {
        format!("{:.2}", self.size() as f64 / 1024.0 / 1024.0)
    }
}

/// A file accepted by the widget together with its simulated upload state.
///
/// Cloning is cheap; both the content and the preview are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedEntry {
    id: EntryId,
    file: StagedFile,
    preview: Option<Rc<str>>,
    progress: Progress,
    success: bool,
}

impl StagedEntry {
    /// Stable identity.
    #[must_use]
    pub const fn id(&self) -> EntryId {
        self.id
    }

    /// The staged file.
    #[must_use]
    pub const fn file(&self) -> &StagedFile {
        &self.file
    }

    /// Data URL preview for images.
    #[must_use]
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Simulated upload progress.
    #[must_use]
    pub const fn progress(&self) -> Progress {
        self.progress
    }

    /// Whether the simulated upload finished.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }
}

struct Slot {
    entry: StagedEntry,
    token: CancelToken,
}

/// Ordered, capacity-bounded collection of [`StagedEntry`] values.
///
/// Dropping the store cancels every outstanding timer token.
pub struct Staging {
    slots: Vec<Slot>,
    max_files: usize,
    next_id: u64,
}

impl fmt::Debug for Staging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Staging")
            .field("entries", &self.slots.iter().map(|s| &s.entry).collect::<Vec<_>>())
            .field("max_files", &self.max_files)
            .finish_non_exhaustive()
    }
}

impl Staging {
    /// Create an empty store holding at most `max_files` entries.
    #[must_use]
    pub const fn new(max_files: usize) -> Self {
        Self {
            slots: Vec::new(),
            max_files,
            next_id: 0,
        }
    }

    /// Number of staged entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether the store is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.max_files
    }

    /// Free slots left.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.max_files.saturating_sub(self.slots.len())
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &StagedEntry> {
        self.slots.iter().map(|s| &s.entry)
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&StagedEntry> {
        self.slots.iter().map(|s| &s.entry).find(|e| e.id == id)
    }

    /// Position of an entry by id.
    #[must_use]
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.slots.iter().position(|s| s.entry.id == id)
    }

    /// The file a submission forwards: the first staged one.
    #[must_use]
    pub fn first_file(&self) -> Option<&StagedFile> {
        self.slots.first().map(|s| &s.entry.file)
    }

    /// Append a new entry with zero progress.
    ///
    /// Capacity is checked again here because preview generation runs
    /// between admission and staging. Returns `None`, and cancels `token`,
    /// when the store filled up in the meantime.
    pub fn stage(
        &mut self,
        file: StagedFile,
        preview: Option<String>,
        token: CancelToken,
    ) -> Option<EntryId> {
        if self.is_full() {
            tracing::debug!(name = %file.name, "store full, entry not staged");
            token.cancel();
            return None;
        }
        let id = EntryId(self.next_id);
        self.next_id += 1;
        tracing::debug!(%id, name = %file.name, "staged");
        self.slots.push(Slot {
            entry: StagedEntry {
                id,
                file,
                preview: preview.map(Rc::from),
                progress: Progress::ZERO,
                success: false,
            },
            token,
        });
        Some(id)
    }

    /// Remove the entry at `position` and cancel its timer.
    ///
    /// Out-of-range positions are a no-op.
    pub fn remove_at(&mut self, position: usize) -> Option<StagedEntry> {
        if position >= self.slots.len() {
            tracing::warn!(position, len = self.slots.len(), "remove_at out of range");
            return None;
        }
        let slot = self.slots.remove(position);
        slot.token.cancel();
        tracing::debug!(id = %slot.entry.id, "removed");
        Some(slot.entry)
    }

    /// Remove the entry with `id` and cancel its timer.
    pub fn remove(&mut self, id: EntryId) -> Option<StagedEntry> {
        self.position(id).and_then(|p| self.remove_at(p))
    }

    /// Apply one progress tick to the entry with `id`.
    ///
    /// Marks the entry successful on the tick that reaches 100; later
    /// ticks against a completed entry report [`Tick::Completed`] again
    /// without further writes.
    pub fn tick(&mut self, id: EntryId, increment: u8) -> Tick {
        let Some(slot) = self.slots.iter_mut().find(|s| s.entry.id == id) else {
            return Tick::Missing;
        };
        let entry = &mut slot.entry;
        if entry.success {
            return Tick::Completed;
        }
        entry.progress = entry.progress.advance(increment);
        if entry.progress.is_complete() {
            entry.success = true;
            tracing::debug!(%id, "simulated upload complete");
            Tick::Completed
        } else {
            Tick::Advanced(entry.progress)
        }
    }

    /// Remove every entry, cancelling all timers.
    pub fn clear(&mut self) {
        for slot in self.slots.drain(..) {
            slot.token.cancel();
        }
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        self.clear();
    }
}
