use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Deserialize;

/// A named, additive bundle of exclusion patterns and extension defaults for
/// a technology stack. Presets are pure data: merging one into a [`crate::Config`]
/// unions its entries and never removes or replaces anything.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Preset {
    pub description: String,
    #[serde(default)]
    pub exclude_paths: Vec<String>,
    #[serde(default)]
    pub include_extensions: Vec<String>,
}

static PRESET_CATALOG: Lazy<IndexMap<String, Preset>> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../data/presets.yaml"));
    serde_yml::from_str(yaml_content).expect("Failed to parse embedded data/presets.yaml")
});

/// The built-in catalog, in declaration order. Fixed at build time; extending
/// it means editing `data/presets.yaml`, never touching merge logic.
pub fn preset_catalog() -> &'static IndexMap<String, Preset> {
    &PRESET_CATALOG
}

pub fn get_preset(name: &str) -> Option<&'static Preset> {
    PRESET_CATALOG.get(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_parses_and_has_expected_entries() {
        let catalog = preset_catalog();
        assert!(catalog.contains_key("node"));
        assert!(catalog.contains_key("rust"));
        assert!(catalog.contains_key("ci"));
        for (name, preset) in catalog {
            assert!(!preset.description.is_empty(), "preset {} lacks description", name);
        }
    }

    #[test]
    fn extensions_in_catalog_are_dotted() {
        for preset in preset_catalog().values() {
            for ext in &preset.include_extensions {
                assert!(ext.starts_with('.'), "catalog extension not dotted: {}", ext);
            }
        }
    }

    #[test]
    fn unknown_preset_is_absent() {
        assert!(get_preset("cobol").is_none());
    }
}
