//! Preview generation for staged files.
//!
//! Images become `data:` URLs usable directly as an `<img src>`. Every
//! other type, and any file whose content is empty, has no preview.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::staging::StagedFile;
use crate::validate::UNKNOWN_MIME;

/// Build a data URL preview for image files.
///
/// When the declared type is missing or generic, the content is sniffed
/// and an image preview is produced if it is a recognised image format.
#[must_use]
pub fn generate(file: &StagedFile) -> Option<String> {
    if file.bytes.is_empty() {
        return None;
    }
    let mime = image_mime(file)?;
    let payload = STANDARD.encode(&file.bytes);
    Some(format!("data:{mime};base64,{payload}"))
}

/// Resolve the image MIME type to embed in the preview, if any.
fn image_mime(file: &StagedFile) -> Option<String> {
    let declared = file.mime.trim();
    if declared
        .split_once('/')
        .is_some_and(|(top, _)| top.eq_ignore_ascii_case("image"))
    {
        return Some(declared.to_ascii_lowercase());
    }
    if declared.is_empty() || declared.eq_ignore_ascii_case(UNKNOWN_MIME) {
        let format = image::guess_format(&file.bytes).ok()?;
        return Some(format.to_mime_type().to_owned());
    }
    None
}
