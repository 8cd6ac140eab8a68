//! Admission of dropped or picked files into the staging area.
//!
//! [`admit`] decides, before any file content is read, which candidates
//! become staged entries and which are reported back as rejections.

use std::fmt;

use crate::options::UploadOptions;

/// Fallback MIME type for files whose type cannot be determined.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// A file offered to the drop surface, described by its metadata only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// File name as reported by the browser.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Declared MIME type; empty when the browser did not supply one.
    pub mime: String,
}

impl Candidate {
    /// Create a candidate, inferring the MIME type from the extension when
    /// `mime` is absent or empty.
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64, mime: Option<String>) -> Self {
        let name = name.into();
        let mime = mime
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| mime_from_name(&name).to_owned());
        Self { name, size, mime }
    }
}

/// Guess a MIME type from a file extension.
///
/// Covers the types the default accept rules name. Anything else maps to
/// [`UNKNOWN_MIME`].
#[must_use]
pub fn mime_from_name(name: &str) -> &'static str {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return UNKNOWN_MIME;
    };
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => UNKNOWN_MIME,
    }
}

/// Why a candidate was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// Neither the MIME type nor the extension matched an accept rule.
    #[error("File type must be {accepted}")]
    InvalidType {
        /// Accepted patterns and extensions, for display.
        accepted: String,
    },

    /// The file exceeds the size limit.
    #[error("File is larger than {limit} bytes")]
    TooLarge {
        /// Limit in bytes.
        limit: u64,
    },

    /// Several files were offered to a single-file surface.
    #[error("Too many files")]
    TooManyFiles,

    /// The file content could not be read.
    #[error("File could not be read")]
    Unreadable,
}

/// A refused candidate together with every reason it was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// File name of the refused candidate.
    pub name: String,
    /// One or more reasons, in check order.
    pub reasons: Vec<RejectReason>,
}

impl Rejection {
    /// Reject a file for a single reason.
    #[must_use]
    pub fn single(name: impl Into<String>, reason: RejectReason) -> Self {
        Self {
            name: name.into(),
            reasons: vec![reason],
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        for (i, reason) in self.reasons.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{reason}")?;
        }
        Ok(())
    }
}

/// Outcome of offering candidates to the drop surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Admission {
    /// Candidates to read and stage, in drop order.
    pub accepted: Vec<Candidate>,
    /// Candidates refused with reasons, in drop order.
    pub rejections: Vec<Rejection>,
}

/// Check a single candidate against type and size constraints.
///
/// # Errors
///
/// Returns a [`Rejection`] listing every failed constraint.
pub fn check(options: &UploadOptions, candidate: &Candidate) -> Result<(), Rejection> {
    let mut reasons = Vec::new();
    if options
        .rule_for(&candidate.mime, &candidate.name)
        .is_none()
    {
        reasons.push(RejectReason::InvalidType {
            accepted: options.accept_description(),
        });
    }
    let limit = options.max_size_bytes();
    if candidate.size > limit {
        reasons.push(RejectReason::TooLarge { limit });
    }
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(Rejection {
            name: candidate.name.clone(),
            reasons,
        })
    }
}

/// Split dropped candidates into those to stage and those to report.
///
/// An inert surface (disabled, or already at capacity) ignores the drop
/// entirely. A single-file surface refuses a multi-file drop as a whole.
/// Valid candidates beyond the remaining capacity are dropped without a
/// rejection.
#[must_use]
pub fn admit(options: &UploadOptions, staged: usize, candidates: Vec<Candidate>) -> Admission {
    if !options.is_accepting(staged) {
        tracing::debug!(staged, "drop ignored: surface is not accepting files");
        return Admission::default();
    }

    if !options.allows_multiple() && candidates.len() > 1 {
        return Admission {
            accepted: Vec::new(),
            rejections: candidates
                .into_iter()
                .map(|c| Rejection::single(c.name, RejectReason::TooManyFiles))
                .collect(),
        };
    }

    let room = options.max_files.saturating_sub(staged);
    let mut admission = Admission::default();
    for candidate in candidates {
        match check(options, &candidate) {
            Ok(()) if admission.accepted.len() < room => admission.accepted.push(candidate),
            Ok(()) => tracing::debug!(name = %candidate.name, "over capacity, not staged"),
            Err(rejection) => admission.rejections.push(rejection),
        }
    }
    admission
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    fn jpeg(name: &str, size: u64) -> Candidate {
        Candidate::new(name, size, Some("image/jpeg".into()))
    }

    #[test]
    fn mime_is_inferred_from_extension() {
        let c = Candidate::new("scan.PDF", 10, None);
        assert_eq!(c.mime, "application/pdf");
        let c = Candidate::new("notes", 10, Some(String::new()));
        assert_eq!(c.mime, UNKNOWN_MIME);
    }

    #[test]
    fn oversized_file_is_rejected_with_size_reason() {
        let opts = UploadOptions::default();
        let admission = admit(&opts, 0, vec![jpeg("big.jpg", 25 * MB)]);
        assert!(admission.accepted.is_empty());
        assert_eq!(admission.rejections.len(), 1);
        assert_eq!(
            admission.rejections[0].reasons,
            vec![RejectReason::TooLarge { limit: 20 * MB }]
        );
        assert!(admission.rejections[0].to_string().contains("larger than"));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let opts = UploadOptions::default();
        let c = Candidate::new("a.zip", 10, Some("application/zip".into()));
        let err = check(&opts, &c).err();
        assert!(matches!(
            err.as_ref().map(|r| &r.reasons[..]),
            Some([RejectReason::InvalidType { .. }])
        ));
    }

    #[test]
    fn extension_rescues_generic_mime() {
        let opts = UploadOptions::default();
        let c = Candidate::new("photo.png", 10, Some(UNKNOWN_MIME.into()));
        assert!(check(&opts, &c).is_ok());
    }

    #[test]
    fn both_reasons_are_reported() {
        let opts = UploadOptions::default();
        let c = Candidate::new("movie.mp4", 30 * MB, Some("video/mp4".into()));
        let rejection = check(&opts, &c).err().map(|r| r.reasons.len());
        assert_eq!(rejection, Some(2));
    }

    #[test]
    fn single_file_surface_refuses_multi_drop() {
        let opts = UploadOptions::default();
        let admission = admit(&opts, 0, vec![jpeg("a.jpg", 1), jpeg("b.jpg", 1)]);
        assert!(admission.accepted.is_empty());
        assert_eq!(admission.rejections.len(), 2);
        assert!(
            admission
                .rejections
                .iter()
                .all(|r| r.reasons == [RejectReason::TooManyFiles])
        );
    }

    #[test]
    fn full_surface_ignores_drop() {
        let opts = UploadOptions::default();
        let admission = admit(&opts, 1, vec![jpeg("a.jpg", 1)]);
        assert_eq!(admission, Admission::default());
    }

    #[test]
    fn excess_is_dropped_silently() {
        let opts = UploadOptions {
            max_files: 3,
            ..UploadOptions::default()
        };
        let admission = admit(
            &opts,
            1,
            vec![jpeg("a.jpg", 1), jpeg("b.jpg", 1), jpeg("c.jpg", 1)],
        );
        let names: Vec<_> = admission.accepted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a.jpg", "b.jpg"]);
        assert!(admission.rejections.is_empty());
    }

    #[test]
    fn rejection_display_joins_reasons() {
        let r = Rejection {
            name: "x.bin".into(),
            reasons: vec![RejectReason::TooManyFiles, RejectReason::Unreadable],
        };
        assert_eq!(r.to_string(), "x.bin: Too many files, File could not be read");
    }
}
