use anyhow::{Context, Result};
use log;

use crate::cli_args::ConfigArgs;
use crate::commands::{delta_from_adjustments, load_config, resolve_project};
use crate::output;
use ctxgen_core::AppError;

/// Shows the configuration the next `generate` would run with: the persisted
/// config plus this invocation's adjustments. Nothing is written unless
/// `--save` is given.
pub fn handle_config_command(args: &ConfigArgs, quiet: bool) -> Result<()> {
    let (project_root, config_path) = resolve_project(&args.project_config)?;
    log::info!("Project root: {}", project_root.display());

    let mut config = load_config(config_path.as_deref());

    let delta = delta_from_adjustments(&args.adjustments);
    if config.apply_delta(&delta) {
        log::debug!("Showing configuration with this invocation's adjustments applied.");
    }

    let rendered =
        serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?;
    println!("{}", rendered);

    if args.save {
        match &config_path {
            Some(path) => {
                config
                    .persist(path)
                    .with_context(|| format!("Failed to persist config to {}", path.display()))?;
                output::print_config_persisted(path, quiet);
            }
            None => {
                anyhow::bail!(AppError::InvalidArgument(
                    "--save cannot be combined with --no-config-file.".to_string()
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli_args::{Cli, Commands};
    use crate::commands::delta_from_adjustments;
    use clap::Parser;
    use ctxgen_core::Config;

    fn parse_config_args(argv: &[&str]) -> crate::cli_args::ConfigArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Some(Commands::Config(args)) => args,
            other => panic!("expected the config subcommand, got {:?}", other),
        }
    }

    #[test]
    fn config_command_accepts_adjustment_flags() {
        let args = parse_config_args(&[
            "ctxgen", "config", "--preset", "node", "--exclude", "fixtures/",
        ]);
        let delta = delta_from_adjustments(&args.adjustments);
        assert_eq!(delta.presets, vec!["node".to_string()]);
        assert_eq!(delta.add_excludes, vec!["fixtures/".to_string()]);
        assert!(!args.save);
    }

    #[test]
    fn shown_config_reflects_adjustments() {
        let args = parse_config_args(&["ctxgen", "config", "--include-ext", "SVG"]);
        let mut config = Config::default();
        let changed = config.apply_delta(&delta_from_adjustments(&args.adjustments));
        assert!(changed);
        assert!(config.include_extensions.contains(".svg"));
    }
}
