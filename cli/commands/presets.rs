use anyhow::Result;
use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use crate::cli_args::PresetsArgs;
use crate::commands::{load_config, resolve_project};
use ctxgen_core::preset_catalog;

pub fn handle_presets_command(args: &PresetsArgs) -> Result<()> {
    let (_project_root, config_path) = resolve_project(&args.project_config)?;
    let config = load_config(config_path.as_deref());

    println!();
    println!("{}", " Available Presets ".green().bold().underline());
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::Green),
        Cell::new("Description").fg(Color::Green),
        Cell::new("Excludes").fg(Color::Green),
        Cell::new("Extensions").fg(Color::Green),
        Cell::new("Applied").fg(Color::Green),
    ]);
    for (name, preset) in preset_catalog() {
        let applied = config.presets.contains(name);
        table.add_row(vec![
            Cell::new(name).fg(Color::Cyan),
            Cell::new(&preset.description),
            Cell::new(preset.exclude_paths.len())
                .set_alignment(comfy_table::CellAlignment::Right),
            Cell::new(preset.include_extensions.len())
                .set_alignment(comfy_table::CellAlignment::Right),
            Cell::new(if applied { "yes" } else { "" }).fg(Color::Yellow),
        ]);
    }
    println!("{table}");
    println!(
        "Apply with: {}",
        "ctxgen generate --preset <NAME>".cyan()
    );
    println!();
    Ok(())
}
