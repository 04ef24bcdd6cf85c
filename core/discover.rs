use crate::config::{Config, DEFAULT_CONFIG_FILENAME};
use crate::error::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use log;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Compiled form of the `excludePaths` vocabulary. Three pattern shapes:
/// a bare name matches any path segment, a `name/` entry matches any
/// ancestor directory segment, and a `*`-bearing entry matches the file
/// basename as a glob.
struct ExcludeMatcher {
    segment_names: BTreeSet<String>,
    dir_names: BTreeSet<String>,
    basename_globs: GlobSet,
}

impl ExcludeMatcher {
    fn build<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut segment_names = BTreeSet::new();
        let mut dir_names = BTreeSet::new();
        let mut glob_builder = GlobSetBuilder::new();

        for entry in entries {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if let Some(dir) = entry.strip_suffix('/') {
                dir_names.insert(dir.to_string());
            } else if entry.contains('*') {
                match Glob::new(entry) {
                    Ok(glob) => {
                        glob_builder.add(glob);
                    }
                    Err(e) => {
                        log::warn!("Ignoring invalid exclude glob \"{}\": {}", entry, e);
                    }
                }
            } else {
                segment_names.insert(entry.to_string());
            }
        }

        Ok(Self {
            segment_names,
            dir_names,
            basename_globs: glob_builder.build()?,
        })
    }

    fn is_excluded(&self, relative: &Path) -> bool {
        let segments: Vec<&str> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => name.to_str(),
                _ => None,
            })
            .collect();

        if segments
            .iter()
            .any(|s| self.segment_names.contains(*s))
        {
            return true;
        }
        // Ancestor directories only: the final segment is the file itself.
        if segments.len() > 1
            && segments[..segments.len() - 1]
                .iter()
                .any(|s| self.dir_names.contains(*s))
        {
            return true;
        }
        if let Some(basename) = segments.last() {
            if self.basename_globs.is_match(Path::new(basename)) {
                return true;
            }
        }
        false
    }
}

fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|c| match c {
        Component::Normal(name) => name.to_str().is_some_and(|s| s.starts_with('.')),
        _ => false,
    })
}

/// Force inclusion: an `includePaths` entry matches on whole-path equality,
/// as a leading path prefix, or against any single path segment. A match
/// bypasses both the hidden-file rule and the exclude matcher (gitignore
/// entries included), but never the extension whitelist.
fn is_force_included(relative: &Path, include_paths: &BTreeSet<String>) -> bool {
    if include_paths.is_empty() {
        return false;
    }
    let rel_str = relative.to_string_lossy();
    for entry in include_paths {
        let entry = entry.trim_end_matches('/');
        if entry.is_empty() {
            continue;
        }
        if rel_str == entry || rel_str.starts_with(&format!("{}/", entry)) {
            return true;
        }
        let segment_hit = relative.components().any(|c| match c {
            Component::Normal(name) => name.to_str() == Some(entry),
            _ => false,
        });
        if segment_hit {
            return true;
        }
    }
    false
}

/// Entries from the project's ignore file, re-derived on every run (they are
/// never persisted into `excludePaths`). Comments, blanks and negations are
/// skipped; a leading `/` is stripped so entries fit the exclude vocabulary.
fn gitignore_entries(project_root: &Path) -> Vec<String> {
    let gitignore_path = project_root.join(".gitignore");
    let raw = match fs::read_to_string(&gitignore_path) {
        Ok(raw) => raw,
        Err(_) => return Vec::new(),
    };
    let entries: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .map(|line| line.trim_start_matches('/').to_string())
        .filter(|line| !line.is_empty())
        .collect();
    log::debug!(
        "Folded {} entries from {} into the exclude rules.",
        entries.len(),
        gitignore_path.display()
    );
    entries
}

/// Root-relative paths of the tool's own files for this run: the output
/// document and the resolved config file. Exact relative paths, so an
/// unrelated same-named file deeper in the tree stays a candidate. When no
/// config path is in play the default filename at the root is covered.
fn own_artifacts(
    project_root: &Path,
    config: &Config,
    config_path: Option<&Path>,
) -> BTreeSet<PathBuf> {
    let mut artifacts = BTreeSet::new();

    let output = Path::new(config.output_file.as_str());
    let output_rel = if output.is_absolute() {
        pathdiff::diff_paths(output, project_root)
    } else {
        Some(output.to_path_buf())
    };
    if let Some(rel) = output_rel {
        artifacts.insert(rel);
    }

    let config_rel = match config_path {
        Some(path) if path.is_absolute() => pathdiff::diff_paths(path, project_root),
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILENAME)),
    };
    if let Some(rel) = config_rel {
        artifacts.insert(rel);
    }

    artifacts
}

/// Walks the project root and returns the candidate files (relative paths,
/// lexicographic order) that survive the hidden-file policy, the exclusion
/// patterns and the force-include overrides. Extension filtering is a later,
/// separate stage. `config_path` is the resolved config file for this run,
/// if any.
///
/// An inaccessible root is a soft failure: individual walk errors are logged
/// and skipped, so the caller simply sees zero candidates.
pub fn discover_files(
    project_root: &Path,
    config: &Config,
    config_path: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    log::debug!("Discovering files under: {}", project_root.display());

    let gitignore = if config.use_gitignore {
        gitignore_entries(project_root)
    } else {
        Vec::new()
    };
    let matcher = ExcludeMatcher::build(config.exclude_paths.iter().chain(gitignore.iter()))?;

    // The generated document and the config file are never candidates,
    // otherwise a second run would ingest the first run's output.
    let own_artifacts = own_artifacts(project_root, config, config_path);

    let mut candidates = Vec::new();
    for entry_result in WalkDir::new(project_root).follow_links(false) {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping path during walk: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(relative) = pathdiff::diff_paths(entry.path(), project_root) else {
            log::warn!("Could not relativize path: {}", entry.path().display());
            continue;
        };

        if own_artifacts.contains(&relative) {
            log::trace!("Skipping own artifact: {}", relative.display());
            continue;
        }

        if is_force_included(&relative, &config.include_paths) {
            log::trace!("Force-including: {}", relative.display());
            candidates.push(relative);
            continue;
        }
        if is_hidden(&relative) {
            log::trace!("Dropping hidden path: {}", relative.display());
            continue;
        }
        if matcher.is_excluded(&relative) {
            log::trace!("Dropping excluded path: {}", relative.display());
            continue;
        }
        candidates.push(relative);
    }

    candidates.sort();
    log::info!(
        "Discovery found {} candidate files under {}.",
        candidates.len(),
        project_root.display()
    );
    Ok(candidates)
}
