/// File extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

/// True when the filename carries an extension from the allow-set.
pub fn has_allowed_extension(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        }
        _ => false,
    }
}

/// Reduce a client-supplied filename to a safe basename.
///
/// Drops any path components, maps everything outside `[A-Za-z0-9._-]` to
/// `_`, and strips leading dots so the result can never traverse out of the
/// upload directory or become a dotfile. Returns an empty string when
/// nothing usable remains.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();

    // A name of only separators/underscores is as good as no name.
    if cleaned.chars().all(|c| matches!(c, '_' | '-' | '.')) {
        return String::new();
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert!(has_allowed_extension("report.pdf"));
        assert!(has_allowed_extension("photo.PNG"));
        assert!(has_allowed_extension("scan.jpeg"));
        assert!(!has_allowed_extension("script.sh"));
        assert!(!has_allowed_extension("archive.zip"));
        assert!(!has_allowed_extension("noextension"));
        assert!(!has_allowed_extension(".pdf"));
    }

    #[test]
    fn test_sanitize_strips_paths() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\x\\doc.pdf"), "doc.pdf");
        assert_eq!(sanitize_filename("dir/report.pdf"), "report.pdf");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("my report (1).pdf"), "my_report__1_.pdf");
        assert_eq!(sanitize_filename("naïve.png"), "na_ve.png");
    }

    #[test]
    fn test_sanitize_strips_leading_dots() {
        assert_eq!(sanitize_filename(".hidden.pdf"), "hidden.pdf");
        assert_eq!(sanitize_filename("..."), "");
    }

    #[test]
    fn test_sanitize_empty_results() {
        assert_eq!(sanitize_filename(""), "");
        assert_eq!(sanitize_filename("///"), "");
        assert_eq!(sanitize_filename("___"), "");
    }
}
