pub mod completion;
pub mod config;
pub mod generate;
pub mod presets;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli_args::{AdjustmentOpts, ProjectConfigOpts};
use ctxgen_core::{Config, ConfigDelta};

/// Resolves the project root and, unless `--no-config-file` is set, the
/// config path for a command. Returns `(root, Some(config_path))` or
/// `(root, None)` when persistence is disabled for this run.
pub fn resolve_project(opts: &ProjectConfigOpts) -> Result<(PathBuf, Option<PathBuf>)> {
    let project_root = Config::determine_project_root(opts.project_root.as_ref())
        .context("Failed to determine project root")?;
    let config_path = if opts.no_config_file {
        None
    } else {
        Some(Config::resolve_config_path(
            &project_root,
            opts.config_file.as_ref(),
        ))
    };
    Ok((project_root, config_path))
}

/// Loads the config for a command, printing (not failing on) a corrupt-file
/// warning the way the load layer reports it.
pub fn load_config(config_path: Option<&Path>) -> Config {
    match config_path {
        Some(path) => {
            let (config, warning) = Config::load_or_default(path);
            if let Some(warning) = warning {
                crate::output::print_config_warning(&warning);
            }
            config
        }
        None => Config::default(),
    }
}

/// Maps the shared adjustment flags onto a core delta. Used by `generate`
/// and `config` so both commands compute the same effective configuration.
pub fn delta_from_adjustments(opts: &AdjustmentOpts) -> ConfigDelta {
    ConfigDelta {
        reset: opts.reset_config,
        presets: opts.preset.clone(),
        add_excludes: opts.exclude.clone(),
        remove_excludes: opts.remove_exclude.clone(),
        add_extensions: opts.include_ext.clone(),
        remove_extensions: opts.remove_ext.clone(),
        add_include_paths: opts.include_path.clone(),
        output_file: opts.output.clone(),
        max_file_size_kb: opts.max_size,
        use_gitignore: match (opts.use_gitignore, opts.no_gitignore) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_run_produces_an_empty_delta() {
        let delta = delta_from_adjustments(&AdjustmentOpts::default());
        assert!(delta.is_empty());
    }

    #[test]
    fn gitignore_flag_pair_maps_to_tristate() {
        let mut opts = AdjustmentOpts::default();
        assert_eq!(delta_from_adjustments(&opts).use_gitignore, None);
        opts.use_gitignore = true;
        assert_eq!(delta_from_adjustments(&opts).use_gitignore, Some(true));
        opts.use_gitignore = false;
        opts.no_gitignore = true;
        assert_eq!(delta_from_adjustments(&opts).use_gitignore, Some(false));
    }
}
