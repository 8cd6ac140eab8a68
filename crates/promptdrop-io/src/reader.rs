//! Reading dropped or picked browser files.
//!
//! Bridges Dioxus [`FileData`] handles to the core's [`Candidate`] and
//! [`StagedFile`] types. Content is only read for admitted candidates.

use dioxus::html::FileData;
use promptdrop_core::{Candidate, RejectReason, Rejection, StagedFile, preview};

/// Describe a browser file by its metadata.
#[must_use]
pub fn candidate(file: &FileData) -> Candidate {
    Candidate::new(file.name(), file.size(), file.content_type())
}

/// Pair each admitted candidate with the browser file it came from.
///
/// Admission keeps drop order and only ever removes candidates, so a
/// single forward scan finds every match even when names repeat.
#[must_use]
pub fn pair_admitted(files: Vec<FileData>, admitted: Vec<Candidate>) -> Vec<(Candidate, FileData)> {
    let mut files = files.into_iter();
    admitted
        .into_iter()
        .filter_map(|c| {
            files
                .by_ref()
                .find(|f| f.name() == c.name && f.size() == c.size)
                .map(|f| (c, f))
        })
        .collect()
}

/// Read a file's content and build its preview.
///
/// # Errors
///
/// Returns an [`RejectReason::Unreadable`] rejection when the browser
/// fails to deliver the content.
pub async fn load(
    candidate: Candidate,
    file: &FileData,
) -> Result<(StagedFile, Option<String>), Rejection> {
    match file.read_bytes().await {
        Ok(bytes) => {
            let staged = StagedFile::new(candidate.name, candidate.mime, bytes);
            let preview = preview::generate(&staged);
            Ok((staged, preview))
        }
        Err(e) => {
            tracing::warn!(name = %candidate.name, error = %e, "failed to read file");
            Err(Rejection::single(candidate.name, RejectReason::Unreadable))
        }
    }
}
