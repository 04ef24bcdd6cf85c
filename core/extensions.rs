use log;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Canonical form for extension entries: lowercase with a leading dot.
/// Accepts bare names from the CLI (`js` -> `.js`).
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim();
    if trimmed.starts_with('.') {
        trimmed.to_lowercase()
    } else {
        format!(".{}", trimmed.to_lowercase())
    }
}

/// Second-pass filter: narrows candidates to files whose extension is in the
/// allow-list. An empty set means no extension filtering at all. Force
/// inclusion does not bypass this stage -- it only bypasses discovery's
/// hidden/exclude checks.
pub fn filter_by_extension(
    candidates: Vec<PathBuf>,
    include_extensions: &BTreeSet<String>,
) -> Vec<PathBuf> {
    if include_extensions.is_empty() {
        log::debug!("Extension allow-list empty, keeping all {} candidates.", candidates.len());
        return candidates;
    }

    let before = candidates.len();
    let kept: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| include_extensions.contains(&format!(".{}", e.to_lowercase())))
                .unwrap_or(false)
        })
        .collect();
    log::debug!("Extension filter kept {} of {} candidates.", kept.len(), before);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(exts: &[&str]) -> BTreeSet<String> {
        exts.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn normalizes_bare_and_dotted_forms() {
        assert_eq!(normalize_extension("js"), ".js");
        assert_eq!(normalize_extension(".js"), ".js");
        assert_eq!(normalize_extension(".JS"), ".js");
        assert_eq!(normalize_extension(" Rs "), ".rs");
    }

    #[test]
    fn empty_allow_list_keeps_everything() {
        let candidates = vec![PathBuf::from("a.js"), PathBuf::from("Makefile")];
        let kept = filter_by_extension(candidates.clone(), &BTreeSet::new());
        assert_eq!(kept, candidates);
    }

    #[test]
    fn matches_case_insensitively() {
        let candidates = vec![
            PathBuf::from("src/App.TSX"),
            PathBuf::from("src/main.rs"),
            PathBuf::from("notes.txt"),
        ];
        let kept = filter_by_extension(candidates, &set(&[".tsx", ".rs"]));
        assert_eq!(
            kept,
            vec![PathBuf::from("src/App.TSX"), PathBuf::from("src/main.rs")]
        );
    }

    #[test]
    fn extensionless_files_are_dropped_when_filtering() {
        let candidates = vec![PathBuf::from("LICENSE"), PathBuf::from("a.md")];
        let kept = filter_by_extension(candidates, &set(&[".md"]));
        assert_eq!(kept, vec![PathBuf::from("a.md")]);
    }

    #[test]
    fn forced_paths_get_no_exemption_here() {
        // .github/workflows/ci.yml survives discovery via includePaths, but
        // disappears here unless .yml is in the allow-list.
        let candidates = vec![PathBuf::from(".github/workflows/ci.yml")];
        assert!(filter_by_extension(candidates.clone(), &set(&[".js"])).is_empty());
        assert_eq!(
            filter_by_extension(candidates, &set(&[".yml"])),
            vec![PathBuf::from(".github/workflows/ci.yml")]
        );
    }
}
