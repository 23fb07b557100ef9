//! URL-safe slug derivation.

/// Maximum slug length, in characters.
pub const MAX_SLUG_LEN: usize = 80;

/// Derive a URL-safe slug from arbitrary text.
///
/// Lowercases, maps every non-alphanumeric character to `-`, collapses runs of
/// `-`, trims them from both ends, and truncates to [`MAX_SLUG_LEN`]. Total and
/// idempotent; an all-symbol input yields an empty slug.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    // Truncation can expose a hyphen at the new end.
    let truncated: String = slug.chars().take(MAX_SLUG_LEN).collect();
    truncated.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "---",
        "vim vs vscode",
        "  Vim  vs.  VS Code!!  ",
        "C++ / Rust: FFI?",
        "Ünïcödé Straße",
        "İstanbul",
        "ΣΊΣΥΦΟΣ",
        "emoji 🚀 launch",
        "trailing---",
        "a-b--c___d",
    ];

    fn assert_well_formed(slug: &str) {
        assert!(!slug.starts_with('-'), "leading hyphen: {slug:?}");
        assert!(!slug.ends_with('-'), "trailing hyphen: {slug:?}");
        assert!(!slug.contains("--"), "double hyphen: {slug:?}");
        assert!(slug.chars().count() <= MAX_SLUG_LEN, "too long: {slug:?}");
    }

    #[test]
    fn common_titles() {
        assert_eq!(slugify("vim vs vscode"), "vim-vs-vscode");
        assert_eq!(slugify("  Vim  vs.  VS Code!!  "), "vim-vs-vs-code");
        assert_eq!(slugify("C++ / Rust: FFI?"), "c-rust-ffi");
        assert_eq!(slugify("a-b--c___d"), "a-b-c-d");
    }

    #[test]
    fn empty_and_symbol_only_inputs() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("!@#$%^&*()"), "");
    }

    #[test]
    fn keeps_unicode_letters() {
        assert_eq!(slugify("Straße café"), "straße-café");
    }

    #[test]
    fn idempotent() {
        for s in SAMPLES {
            let once = slugify(s);
            assert_eq!(slugify(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn well_formed() {
        for s in SAMPLES {
            assert_well_formed(&slugify(s));
        }
    }

    #[test]
    fn truncates_to_max_length() {
        let long = "word ".repeat(40);
        let slug = slugify(&long);
        assert!(slug.chars().count() <= MAX_SLUG_LEN);
        assert_well_formed(&slug);
        assert!(slug.starts_with("word-word"));
    }

    #[test]
    fn truncation_boundary_on_hyphen() {
        // 79 letters then a separator: the 80th char would be a hyphen.
        let input = format!("{} tail", "a".repeat(79));
        let slug = slugify(&input);
        assert_eq!(slug, "a".repeat(79));
        assert_well_formed(&slug);
    }
}
