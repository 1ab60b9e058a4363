//! MIME type lookup by file name.

/// Guess a MIME type from the file name's extension.
///
/// Unknown or missing extensions fall back to `application/octet-stream`.
pub fn mime_type_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
