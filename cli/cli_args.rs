use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        long,
        help = "Specify the target project directory (default: current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify path/filename of the JSON config file (default: ctxgen.json).",
        value_name = "CONFIG_FILE",
        conflicts_with = "no_config_file",
        help_heading = "Project Setup"
    )]
    pub config_file: Option<String>,

    #[arg(
        long,
        help = "Ignore any persisted config file; start from built-in defaults.",
        conflicts_with = "config_file",
        help_heading = "Project Setup"
    )]
    pub no_config_file: bool,
}

/// Per-invocation configuration adjustments, shared by the `generate` and
/// `config` subcommands so both see the same effective configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct AdjustmentOpts {
    #[arg(
        long,
        help = "Discard the persisted config and start from built-in defaults before applying other flags.",
        help_heading = "Configuration Adjustments"
    )]
    pub reset_config: bool,

    #[arg(
        long,
        value_name = "NAME",
        help = "Merge a named preset into the config (repeatable).",
        help_heading = "Configuration Adjustments"
    )]
    pub preset: Vec<String>,

    #[arg(
        long,
        value_name = "PATTERN",
        help = "Add an exclusion entry: a name, a 'dir/' rule, or a '*' glob (repeatable).",
        help_heading = "Configuration Adjustments"
    )]
    pub exclude: Vec<String>,

    #[arg(
        long,
        value_name = "PATTERN",
        help = "Remove an exclusion entry from the config (repeatable).",
        help_heading = "Configuration Adjustments"
    )]
    pub remove_exclude: Vec<String>,

    #[arg(
        long,
        value_name = "EXT",
        help = "Add a file extension to the allow-list, with or without the dot (repeatable).",
        help_heading = "Configuration Adjustments"
    )]
    pub include_ext: Vec<String>,

    #[arg(
        long,
        value_name = "EXT",
        help = "Remove a file extension from the allow-list (repeatable).",
        help_heading = "Configuration Adjustments"
    )]
    pub remove_ext: Vec<String>,

    #[arg(
        long,
        value_name = "PATH",
        help = "Force-include a path, bypassing hidden/exclusion/gitignore rules (repeatable).",
        help_heading = "Configuration Adjustments"
    )]
    pub include_path: Vec<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Set the output file name.",
        help_heading = "Configuration Adjustments"
    )]
    pub output: Option<String>,

    #[arg(
        long,
        value_name = "KB",
        help = "Set the per-file size ceiling in kilobytes.",
        help_heading = "Configuration Adjustments"
    )]
    pub max_size: Option<u64>,

    #[arg(
        long,
        help = "Honor .gitignore entries when selecting files [default].",
        overrides_with = "no_gitignore",
        help_heading = "Configuration Adjustments"
    )]
    pub use_gitignore: bool,

    #[arg(
        long,
        help = "Ignore .gitignore entries when selecting files.",
        overrides_with = "use_gitignore",
        help_heading = "Configuration Adjustments"
    )]
    pub no_gitignore: bool,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate a markdown snapshot of a project for AI context windows.",
    long_about = "ctxgen scans a project directory, selects files through a persisted, \nadditively-composable configuration (presets plus per-run adjustments), and \nemits a single markdown document with the directory tree, file contents, and \nsize/token statistics.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  ctxgen generate --preset node --exclude 'fixtures/'\n  ctxgen g --include-path .github --include-ext yml\n  ctxgen config --preset rust\n  ctxgen presets",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "g",
        visible_alias = "gen",
        about = "Generate the context document (applying and persisting any adjustments)."
    )]
    Generate(GenerateArgs),

    #[command(
        visible_alias = "c",
        about = "Show the effective configuration (after adjustments) as JSON."
    )]
    Config(ConfigArgs),

    #[command(visible_alias = "p", about = "List the available presets.")]
    Presets(PresetsArgs),

    #[command(about = "Generate or save shell completion scripts.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,

    #[clap(flatten)]
    pub adjustments: AdjustmentOpts,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,

    #[clap(flatten)]
    pub adjustments: AdjustmentOpts,

    #[arg(
        short = 's',
        long,
        help = "Persist the shown configuration to the config file."
    )]
    pub save: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PresetsArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionShell {
    Fish,
    Bash,
    Zsh,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        value_enum,
        value_name = "SHELL",
        help = "Target shell [default: fish]."
    )]
    pub shell: Option<CompletionShell>,

    #[arg(
        short = 's',
        long,
        help = "Save the script to the shell's standard completion directory instead of stdout."
    )]
    pub save: bool,
}
