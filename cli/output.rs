use byte_unit::{Byte, UnitType};
use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use std::path::Path;

use ctxgen_core::GenerationStats;

pub fn print_config_warning(warning: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), warning);
}

pub fn print_save_confirmation(output_path: &Path, quiet: bool) {
    if !quiet {
        println!(
            "{} Context saved to: {}",
            "✅".green(),
            output_path.display().to_string().blue()
        );
    }
}

pub fn print_config_persisted(config_path: &Path, quiet: bool) {
    if !quiet {
        println!(
            "{} Config updated: {}",
            "💾".blue(),
            config_path.display().to_string().dimmed()
        );
    }
}

pub fn print_generation_summary(stats: &GenerationStats, quiet: bool) {
    if quiet {
        return;
    }

    let total_byte = Byte::from_u128(stats.total_content_bytes as u128).unwrap_or_default();
    let total_size_readable = total_byte
        .get_appropriate_unit(UnitType::Binary)
        .to_string();

    println!();
    println!("{}", " Generation Summary ".green().bold().underline());
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Metric").fg(Color::Green),
        Cell::new("Value").fg(Color::Green),
    ]);
    let right = comfy_table::CellAlignment::Right;
    table.add_row(vec![
        Cell::new("Files found"),
        Cell::new(stats.files_found).set_alignment(right),
    ]);
    table.add_row(vec![
        Cell::new("Files processed"),
        Cell::new(stats.files_processed).set_alignment(right),
    ]);
    table.add_row(vec![
        Cell::new("Files included"),
        Cell::new(stats.files_included).set_alignment(right),
    ]);
    table.add_row(vec![
        Cell::new("Skipped (size)"),
        Cell::new(stats.skipped_by_size).set_alignment(right),
    ]);
    table.add_row(vec![
        Cell::new("Skipped (errors)"),
        Cell::new(stats.skipped_by_error).set_alignment(right),
    ]);
    table.add_row(vec![
        Cell::new("Content size"),
        Cell::new(&total_size_readable)
            .set_alignment(right)
            .fg(Color::DarkGrey),
    ]);
    table.add_row(vec![
        Cell::new("Est. tokens"),
        Cell::new(stats.estimated_tokens)
            .set_alignment(right)
            .fg(Color::Cyan),
    ]);
    println!("{table}");
    println!();
}
