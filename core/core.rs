pub mod assemble;
pub mod config;
pub mod discover;
pub mod error;
pub mod extensions;
pub mod presets;
pub mod tree;

pub use assemble::{GenerationStats, assemble_document, write_document};
pub use config::{Config, ConfigDelta, DEFAULT_CONFIG_FILENAME};
pub use discover::discover_files;
pub use error::{AppError, Result};
pub use extensions::{filter_by_extension, normalize_extension};
pub use presets::{Preset, get_preset, preset_catalog};
pub use tree::render_tree;
