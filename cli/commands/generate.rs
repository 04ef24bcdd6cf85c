use anyhow::{Context, Result};
use log;
use std::path::PathBuf;

use crate::cli_args::GenerateArgs;
use crate::commands::{delta_from_adjustments, load_config, resolve_project};
use crate::output;
use ctxgen_core::{
    Config, assemble_document, discover_files, filter_by_extension, write_document,
};

pub fn handle_generate_command(args: &GenerateArgs, quiet: bool) -> Result<()> {
    let (project_root, config_path) = resolve_project(&args.project_config)?;
    log::info!("Project root: {}", project_root.display());

    let mut config = load_config(config_path.as_deref());

    let delta = delta_from_adjustments(&args.adjustments);
    let changed = config.apply_delta(&delta);

    // Adjustments are persisted before generation so the next plain run
    // reproduces this one. A write failure degrades the run to ephemeral.
    if changed {
        if let Some(path) = &config_path {
            match config.persist(path) {
                Ok(()) => output::print_config_persisted(path, quiet),
                Err(e) => log::warn!(
                    "Could not persist config to {}: {}. Continuing with in-memory config.",
                    path.display(),
                    e
                ),
            }
        }
    }

    let candidates = discover_files(&project_root, &config, config_path.as_deref())
        .with_context(|| format!("Failed to scan {}", project_root.display()))?;
    let files_found = candidates.len();
    let selected = filter_by_extension(candidates, &config.include_extensions);

    let project_name = Config::effective_project_name(&project_root);
    let (document, stats) = assemble_document(
        &project_root,
        &config,
        &project_name,
        files_found,
        &selected,
    )
    .context("Failed to assemble the context document")?;

    let output_path = {
        let raw = PathBuf::from(&config.output_file);
        if raw.is_absolute() {
            raw
        } else {
            project_root.join(raw)
        }
    };
    write_document(&output_path, &document)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    output::print_save_confirmation(&output_path, quiet);
    output::print_generation_summary(&stats, quiet);
    Ok(())
}
