//! Configuration of the drop surface: accepted types, capacity, and size limit.

use serde::{Deserialize, Serialize};

/// Bytes per megabyte as used by the size limit.
const BYTES_PER_MB: u64 = 1024 * 1024;

/// One accepted MIME pattern together with the file extensions that map to it.
///
/// The pattern may end in `/*` to accept every subtype of a top-level
/// type (e.g. `image/*`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcceptRule {
    /// MIME type or wildcard pattern, e.g. `image/*` or `application/pdf`.
    pub mime: String,
    /// Extensions including the leading dot, e.g. `.png`.
    pub extensions: Vec<String>,
}

impl AcceptRule {
    /// Create a rule from a MIME pattern and its extensions.
    #[must_use]
    pub fn new(mime: &str, extensions: &[&str]) -> Self {
        Self {
            mime: mime.to_owned(),
            extensions: extensions.iter().map(|&e| e.to_owned()).collect(),
        }
    }

    /// Whether `mime` satisfies this rule's pattern.
    ///
    /// Comparison ignores ASCII case and any `;`-separated parameters.
    #[must_use]
    pub fn matches_mime(&self, mime: &str) -> bool {
        let mime = mime.split(';').next().unwrap_or_default().trim();
        if mime.is_empty() {
            return false;
        }
        self.mime.strip_suffix("/*").map_or_else(
            || self.mime.eq_ignore_ascii_case(mime),
            |top| {
                mime.split_once('/')
                    .is_some_and(|(t, _)| t.eq_ignore_ascii_case(top))
            },
        )
    }

    /// Whether `name` ends in one of this rule's extensions.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        name.rsplit_once('.').is_some_and(|(_, ext)| {
            self.extensions
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
    }
}

/// Errors found while validating [`UploadOptions`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    /// `max_files` was zero.
    #[error("max_files must be at least 1")]
    ZeroMaxFiles,

    /// `max_size_mb` was zero.
    #[error("max_size_mb must be at least 1")]
    ZeroMaxSize,

    /// No accept rules were configured.
    #[error("at least one accepted type is required")]
    EmptyAccept,

    /// A MIME pattern had no `/`.
    #[error("invalid MIME pattern: {0:?}")]
    InvalidMime(String),

    /// An extension did not start with `.`.
    #[error("extension must start with '.': {0:?}")]
    InvalidExtension(String),
}

/// Options for the upload widget.
///
/// Every field has a documented default (see [`Default`]); serialized
/// forms reject unknown keys so misspelled fields fail loudly instead of
/// being silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadOptions {
    /// Accepted types. Defaults to common images and PDF.
    pub accept: Vec<AcceptRule>,

    /// Maximum number of staged files. Defaults to 1.
    pub max_files: usize,

    /// Maximum size of a single file in megabytes. Defaults to 20.
    pub max_size_mb: u32,

    /// Force the drop surface off regardless of capacity.
    pub disabled: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            accept: vec![
                AcceptRule::new("image/*", &[".jpeg", ".jpg", ".png", ".gif", ".webp"]),
                AcceptRule::new("application/pdf", &[".pdf"]),
            ],
            max_files: 1,
            max_size_mb: 20,
            disabled: false,
        }
    }
}

impl UploadOptions {
    /// Check the structural invariants of the options.
    ///
    /// # Errors
    ///
    /// Returns the first [`OptionsError`] encountered.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_files == 0 {
            return Err(OptionsError::ZeroMaxFiles);
        }
        if self.max_size_mb == 0 {
            return Err(OptionsError::ZeroMaxSize);
        }
        if self.accept.is_empty() {
            return Err(OptionsError::EmptyAccept);
        }
        for rule in &self.accept {
            let valid_mime = rule
                .mime
                .split_once('/')
                .is_some_and(|(t, s)| !t.is_empty() && !s.is_empty());
            if !valid_mime {
                return Err(OptionsError::InvalidMime(rule.mime.clone()));
            }
            if let Some(ext) = rule
                .extensions
                .iter()
                .find(|e| !e.starts_with('.') || e.len() < 2)
            {
                return Err(OptionsError::InvalidExtension(ext.clone()));
            }
        }
        Ok(())
    }

    /// Size limit in bytes.
    #[must_use]
    pub fn max_size_bytes(&self) -> u64 {
        u64::from(self.max_size_mb) * BYTES_PER_MB
    }

    /// Whether the file picker should allow selecting several files.
    #[must_use]
    pub const fn allows_multiple(&self) -> bool {
        self.max_files > 1
    }

    /// Whether the drop surface takes new files given the current count.
    #[must_use]
    pub const fn is_accepting(&self, staged: usize) -> bool {
        !self.disabled && staged < self.max_files
    }

    /// Render the `accept` attribute for an `<input type="file">`.
    ///
    /// Lists each MIME pattern followed by its extensions, comma separated.
    #[must_use]
    pub fn accept_attribute(&self) -> String {
        self.join_accepted(",")
    }

    /// Human-readable list of accepted types, used in rejection messages.
    #[must_use]
    pub fn accept_description(&self) -> String {
        self.join_accepted(", ")
    }

    fn join_accepted(&self, separator: &str) -> String {
        self.accept
            .iter()
            .flat_map(|rule| std::iter::once(&rule.mime).chain(&rule.extensions))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Find the rule that accepts a file by MIME type or, failing that,
    /// by extension.
    #[must_use]
    pub fn rule_for(&self, mime: &str, name: &str) -> Option<&AcceptRule> {
        self.accept
            .iter()
            .find(|r| r.matches_mime(mime))
            .or_else(|| self.accept.iter().find(|r| r.matches_name(name)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let opts = UploadOptions::default();
        assert_eq!(opts.validate(), Ok(()));
        assert_eq!(opts.max_files, 1);
        assert_eq!(opts.max_size_bytes(), 20 * 1024 * 1024);
        assert!(!opts.allows_multiple());
    }

    #[test]
    fn wildcard_matches_any_subtype() {
        let rule = AcceptRule::new("image/*", &[".png"]);
        assert!(rule.matches_mime("image/png"));
        assert!(rule.matches_mime("IMAGE/webp"));
        assert!(!rule.matches_mime("application/pdf"));
        assert!(!rule.matches_mime(""));
    }

    #[test]
    fn exact_mime_ignores_parameters() {
        let rule = AcceptRule::new("application/pdf", &[".pdf"]);
        assert!(rule.matches_mime("application/pdf; charset=binary"));
        assert!(!rule.matches_mime("application/pdfx"));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let rule = AcceptRule::new("image/*", &[".jpg"]);
        assert!(rule.matches_name("holiday.JPG"));
        assert!(!rule.matches_name("holiday"));
        assert!(!rule.matches_name("holiday.jpg.txt"));
    }

    #[test]
    fn validate_rejects_bad_fields() {
        let mut opts = UploadOptions {
            max_files: 0,
            ..UploadOptions::default()
        };
        assert_eq!(opts.validate(), Err(OptionsError::ZeroMaxFiles));

        opts.max_files = 2;
        opts.accept = vec![AcceptRule::new("image", &[".png"])];
        assert_eq!(
            opts.validate(),
            Err(OptionsError::InvalidMime("image".into()))
        );

        opts.accept = vec![AcceptRule::new("image/*", &["png"])];
        assert_eq!(
            opts.validate(),
            Err(OptionsError::InvalidExtension("png".into()))
        );

        opts.accept.clear();
        assert_eq!(opts.validate(), Err(OptionsError::EmptyAccept));
    }

    #[test]
    fn accepting_depends_on_capacity_and_flag() {
        let mut opts = UploadOptions::default();
        assert!(opts.is_accepting(0));
        assert!(!opts.is_accepting(1));
        opts.disabled = true;
        assert!(!opts.is_accepting(0));
    }

    #[test]
    fn accept_attribute_lists_patterns_and_extensions() {
        let opts = UploadOptions::default();
        assert_eq!(
            opts.accept_attribute(),
            "image/*,.jpeg,.jpg,.png,.gif,.webp,application/pdf,.pdf"
        );
        assert_eq!(
            opts.accept_description(),
            "image/*, .jpeg, .jpg, .png, .gif, .webp, application/pdf, .pdf"
        );
    }

    #[test]
    fn misspelled_fields_are_rejected() {
        let err = serde_json::from_str::<UploadOptions>(r#"{"maxSizes": 20}"#);
        assert!(err.is_err());
        let ok: UploadOptions = serde_json::from_str(r#"{"max_files": 3}"#).unwrap();
        assert_eq!(ok.max_files, 3);
        assert_eq!(ok.max_size_mb, 20);
    }
}
