//! Content type resolution for staged files.

/// Resolve the content type of a file.
///
/// The declared type wins when present and non-empty (browsers report an
/// empty string for unknown types). Otherwise the type is guessed from the
/// file name extension. Unknown extensions resolve to `None`.
pub fn resolve_content_type(declared: Option<&str>, file_name: &str) -> Option<String> {
    declared
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| guess_from_name(file_name))
}

/// Guess a MIME type from the extension of `file_name`.
pub fn guess_from_name(file_name: &str) -> Option<String> {
    mime_guess::from_path(file_name)
        .first()
        .map(|m| m.essence_str().to_string())
}

/// True for `image/*` types.
pub fn is_image(content_type: &str) -> bool {
    content_type
        .split_once('/')
        .is_some_and(|(top, sub)| top.eq_ignore_ascii_case("image") && !sub.trim().is_empty())
}

/// Human-readable formatting for byte sizes with binary units.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inferred_from_extension() {
        assert_eq!(resolve_content_type(Some(""), "pic.png").as_deref(), Some("image/png"));
        assert_eq!(resolve_content_type(None, "photo.JPG").as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn test_declared_type_wins() {
        assert_eq!(
            resolve_content_type(Some("image/jpeg"), "pic.png").as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(
            resolve_content_type(Some("image/jpeg"), "no-extension").as_deref(),
            Some("image/jpeg")
        );
    }

    #[test]
    fn test_unknown_is_none() {
        assert_eq!(resolve_content_type(None, "README"), None);
        assert_eq!(resolve_content_type(Some("  "), "blob.zzzunknown"), None);
    }

    #[test]
    fn test_is_image() {
        assert!(is_image("image/png"));
        assert!(is_image("image/svg+xml"));
        assert!(!is_image("text/plain"));
        assert!(!is_image("image"));
        assert!(!is_image("image/"));
        assert!(!is_image("image/  "));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
    }
}
