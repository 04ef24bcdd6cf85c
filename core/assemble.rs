use crate::config::Config;
use crate::error::{AppError, Result};
use crate::tree::render_tree;
use chrono::Utc;
use log;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Divisor for the token estimate: roughly four characters of source text
/// per model token. A deterministic proxy, not a tokenizer; it only has to
/// scale monotonically with content length.
const CHARS_PER_TOKEN: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub files_found: usize,
    pub files_processed: usize,
    pub files_included: usize,
    pub skipped_by_size: usize,
    pub skipped_by_error: usize,
    pub estimated_tokens: usize,
    pub total_content_bytes: u64,
}

pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(CHARS_PER_TOKEN)
}

/// Markdown fence tag for a file, derived from its extension with a handful
/// of basename overrides: shell wrappers (`gradlew`, `mvnw`) are tagged as
/// shell, `proguard-rules.pro` and `*.properties` as properties, license
/// files as plain text, and anything named `readme*` as markdown.
fn language_tag(relative: &Path) -> String {
    let basename = relative
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if basename.starts_with("readme") {
        return "markdown".to_string();
    }
    match basename.as_str() {
        "gradlew" | "mvnw" => return "bash".to_string(),
        "license" | "license.txt" | "license.md" | "licence" | "copying" => {
            return "text".to_string();
        }
        "proguard-rules.pro" => return "properties".to_string(),
        _ => {}
    }

    let ext = relative
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let tag = match ext.as_str() {
        "" => "text",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "jsx",
        "ts" => "typescript",
        "tsx" => "tsx",
        "rs" => "rust",
        "py" | "pyi" => "python",
        "rb" => "ruby",
        "go" => "go",
        "java" => "java",
        "kt" => "kotlin",
        "c" | "h" => "c",
        "cpp" | "hpp" | "cc" => "cpp",
        "cs" => "csharp",
        "php" => "php",
        "sh" | "bash" => "bash",
        "md" | "mdx" => "markdown",
        "yml" | "yaml" => "yaml",
        "json" => "json",
        "toml" => "toml",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" | "sass" => "scss",
        "sql" => "sql",
        "properties" => "properties",
        "txt" => "text",
        other => other,
    };
    tag.to_string()
}

/// Assembles the final document for the already-filtered, sorted candidate
/// list and accumulates statistics. `files_found` is the discovery count,
/// carried through so the report distinguishes found from processed.
///
/// Per-file problems never abort the run: oversized files and read failures
/// degrade to documented placeholders so the document is always produced.
pub fn assemble_document(
    project_root: &Path,
    config: &Config,
    project_name: &str,
    files_found: usize,
    paths: &[PathBuf],
) -> Result<(String, GenerationStats)> {
    log::debug!("Assembling document for {} files.", paths.len());
    let mut stats = GenerationStats {
        files_found,
        files_processed: paths.len(),
        ..Default::default()
    };
    let max_size_bytes = config.max_file_size_kb.saturating_mul(1024);

    let mut doc = String::new();
    doc.push_str(&format!("# Project Context: {}\n\n", project_name));
    doc.push_str(&format!(
        "Generated: {}\n\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    doc.push_str("## Configuration\n\n");
    let applied_presets = if config.presets.is_empty() {
        "(none)".to_string()
    } else {
        config
            .presets
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };
    doc.push_str(&format!("- Presets: {}\n", applied_presets));
    doc.push_str(&format!("- Output file: {}\n", config.output_file));
    doc.push_str(&format!(
        "- Max file size: {} KB\n\n",
        config.max_file_size_kb
    ));

    doc.push_str("## Directory Structure\n\n");
    doc.push_str("```\n");
    doc.push_str(&render_tree(paths));
    doc.push_str("```\n\n");

    doc.push_str("## Files\n\n");
    if paths.is_empty() {
        doc.push_str("_No files matched the current configuration._\n");
    }

    // Content pushed inside fences is token-counted as it is inlined; the
    // surrounding structural text is estimated once at the end.
    let mut inlined_content_len: usize = 0;

    for relative in paths {
        let absolute = project_root.join(relative);
        doc.push_str(&format!("### {}\n\n", relative.display()));

        let size_bytes = match fs::metadata(&absolute) {
            Ok(meta) => meta.len(),
            Err(e) => {
                log::warn!("Could not stat {}: {}", absolute.display(), e);
                doc.push_str(&format!("_[Error reading file: {}]_\n\n", e));
                stats.skipped_by_error += 1;
                continue;
            }
        };

        if size_bytes > max_size_bytes {
            log::debug!(
                "Skipping oversized file {} ({} bytes).",
                relative.display(),
                size_bytes
            );
            doc.push_str(&format!(
                "_[Skipped: file size {:.1} KB exceeds the configured limit of {} KB]_\n\n",
                size_bytes as f64 / 1024.0,
                config.max_file_size_kb
            ));
            stats.skipped_by_size += 1;
            continue;
        }

        let content = match fs::read_to_string(&absolute) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Could not read {}: {}", absolute.display(), e);
                doc.push_str(&format!("_[Error reading file: {}]_\n\n", e));
                stats.skipped_by_error += 1;
                continue;
            }
        };

        if content.is_empty() {
            doc.push_str("_[Empty file]_\n\n");
            stats.files_included += 1;
            continue;
        }

        doc.push_str(&format!("```{}\n", language_tag(relative)));
        doc.push_str(&content);
        if !content.ends_with('\n') {
            doc.push('\n');
        }
        doc.push_str("```\n\n");

        stats.files_included += 1;
        stats.estimated_tokens += estimate_tokens(&content);
        stats.total_content_bytes += size_bytes;
        inlined_content_len += content.len();
    }

    // Tree, headers and placeholders also consume context budget.
    let structural_len = doc.len().saturating_sub(inlined_content_len);
    stats.estimated_tokens += structural_len.div_ceil(CHARS_PER_TOKEN);

    log::info!(
        "Document assembled: {} included, {} skipped by size, {} skipped by error, ~{} tokens.",
        stats.files_included,
        stats.skipped_by_size,
        stats.skipped_by_error,
        stats.estimated_tokens
    );
    Ok((doc, stats))
}

/// Writes the assembled document, overwriting any previous output.
pub fn write_document(output_path: &Path, document: &str) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| AppError::FileWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    fs::write(output_path, document).map_err(|e| AppError::FileWrite {
        path: output_path.to_path_buf(),
        source: e,
    })?;
    log::info!("Document written to: {}", output_path.display());
    Ok(())
}
