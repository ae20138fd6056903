use std::path::Path;

/// Decides whether a directory entry name identifies a candidate source
/// file: the name must start with the configured prefix (case-sensitive)
/// and carry an extension from the allow-list (case-insensitive).
///
/// Total over all inputs; names without an extension are simply not
/// candidates.
pub fn is_candidate(name: &str, prefix: &str, extensions: &[String]) -> bool {
    if !name.starts_with(prefix) {
        return false;
    }

    match Path::new(name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) => extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> Vec<String> {
        ["xlsx", "xls", "csv", "xlsb"]
            .iter()
            .map(|ext| ext.to_string())
            .collect()
    }

    #[test]
    fn accepts_prefixed_names_with_allowed_extensions() {
        assert!(is_candidate("19.report.xlsx", "19.", &extensions()));
        assert!(is_candidate("19.report.xlsb", "19.", &extensions()));
        assert!(is_candidate("19.apuracao.csv", "19.", &extensions()));
    }

    #[test]
    fn extension_comparison_ignores_case() {
        assert!(is_candidate("19.report.XLSX", "19.", &extensions()));
        assert!(is_candidate("19.report.XlSb", "19.", &extensions()));
    }

    #[test]
    fn prefix_comparison_is_case_sensitive() {
        assert!(!is_candidate("20.report.xlsx", "19.", &extensions()));
        assert!(!is_candidate("report.xlsx", "19.", &extensions()));
    }

    #[test]
    fn rejects_unknown_or_missing_extensions() {
        assert!(!is_candidate("19.report.pdf", "19.", &extensions()));
        assert!(!is_candidate("19.report", "19.", &extensions()));
        assert!(!is_candidate("19.", "19.", &extensions()));
    }
}
