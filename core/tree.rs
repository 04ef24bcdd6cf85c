use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Default)]
struct DirNode {
    dirs: BTreeMap<String, DirNode>,
    files: BTreeSet<String>,
}

impl DirNode {
    fn insert(&mut self, segments: &[String]) {
        match segments {
            [] => {}
            [file] => {
                self.files.insert(file.clone());
            }
            [dir, rest @ ..] => {
                self.dirs.entry(dir.clone()).or_default().insert(rest);
            }
        }
    }

    fn render_into(&self, prefix: &str, out: &mut String) {
        let total = self.dirs.len() + self.files.len();
        let mut index = 0;

        // Subdirectories before files, both in lexicographic order; the
        // BTree containers provide the ordering.
        for (name, child) in &self.dirs {
            index += 1;
            let last = index == total;
            out.push_str(prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push_str(name);
            out.push('\n');
            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            child.render_into(&child_prefix, out);
        }
        for name in &self.files {
            index += 1;
            let last = index == total;
            out.push_str(prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push_str(name);
            out.push('\n');
        }
    }
}

/// Renders a textual directory tree from a flat list of relative file paths.
/// Pure and total: identical input always yields identical output, with no
/// filesystem access.
pub fn render_tree(paths: &[PathBuf]) -> String {
    let mut root = DirNode::default();
    for path in paths {
        let segments: Vec<String> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        root.insert(&segments);
    }

    let mut out = String::new();
    root.render_into("", &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_tree_strs<S: AsRef<Path>>(paths: &[S]) -> String {
        let owned: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        render_tree(&owned)
    }

    #[test]
    fn renders_dirs_before_files_with_branch_glyphs() {
        let rendered = render_tree_strs(&["src/main.rs", "src/lib.rs", "Cargo.toml"]);
        let expected = "\
├── src
│   ├── lib.rs
│   └── main.rs
└── Cargo.toml
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn nested_last_entries_use_terminal_glyph() {
        let rendered = render_tree_strs(&[".github/workflows/ci.yml", "src/a.js"]);
        let expected = "\
├── .github
│   └── workflows
│       └── ci.yml
└── src
    └── a.js
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn identical_input_renders_identically() {
        let paths = ["b/x.rs", "a/y.rs", "a/b/z.rs"];
        assert_eq!(render_tree_strs(&paths), render_tree_strs(&paths));
    }

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(render_tree(&[]), "");
    }

    #[test]
    fn duplicate_paths_collapse() {
        let rendered = render_tree_strs(&["src/a.js", "src/a.js"]);
        assert_eq!(rendered, "└── src\n    └── a.js\n");
    }
}
