use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use colored::*;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cli_args::{Cli, CompletionArgs, CompletionShell};

impl CompletionShell {
    fn as_clap_shell(self) -> Shell {
        match self {
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
        }
    }

    /// Conventional per-user completion directory, when the platform
    /// exposes one.
    fn script_dir(self) -> Option<PathBuf> {
        match self {
            CompletionShell::Fish => {
                dirs::config_dir().map(|d| d.join("fish").join("completions"))
            }
            CompletionShell::Bash => dirs::config_dir().map(|d| d.join("bash_completion.d")),
            CompletionShell::Zsh => {
                dirs::data_local_dir().map(|d| d.join("zsh").join("site-functions"))
            }
        }
    }

    /// Naming convention per shell: zsh expects `_<bin>`, the others take
    /// the shell name as an extension.
    fn script_file_name(self, bin_name: &str) -> String {
        match self {
            CompletionShell::Fish => format!("{bin_name}.fish"),
            CompletionShell::Bash => format!("{bin_name}.bash"),
            CompletionShell::Zsh => format!("_{bin_name}"),
        }
    }
}

pub fn handle_completion_command(args: &CompletionArgs, quiet: bool) -> Result<()> {
    let shell = args.shell.unwrap_or(CompletionShell::Fish);
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    if !args.save {
        generate(shell.as_clap_shell(), &mut command, bin_name, &mut io::stdout());
        return Ok(());
    }

    let script_dir = shell
        .script_dir()
        .ok_or_else(|| anyhow::anyhow!("No standard completion directory known on this system."))?;
    let script_path = script_dir.join(shell.script_file_name(&bin_name));

    if script_path.exists() && !confirm_overwrite(&script_path, quiet)? {
        println!("Save cancelled.");
        return Ok(());
    }

    fs::create_dir_all(&script_dir)
        .with_context(|| format!("Failed to create directory {}", script_dir.display()))?;
    let mut file = File::create(&script_path)
        .with_context(|| format!("Failed to create file {}", script_path.display()))?;
    generate(shell.as_clap_shell(), &mut command, bin_name, &mut file);

    if !quiet {
        println!(
            "{} Completions saved to: {}",
            "✅".green(),
            script_path.display().to_string().blue()
        );
    }
    Ok(())
}

/// Prompts before clobbering an existing script. In quiet mode there is
/// nobody to ask, so an existing file is an error rather than a prompt.
fn confirm_overwrite(path: &Path, quiet: bool) -> Result<bool> {
    if quiet {
        anyhow::bail!(
            "Target file '{}' exists. Overwrite prevented in quiet mode.",
            path.display()
        );
    }
    print!(
        "{} '{}' already exists. Overwrite? [{}/{}] ",
        "⚠️".yellow(),
        path.display().to_string().cyan(),
        "y".green(),
        "N".red()
    );
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .context("Failed to read user input")?;
    Ok(response.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_names_follow_shell_conventions() {
        assert_eq!(CompletionShell::Fish.script_file_name("ctxgen"), "ctxgen.fish");
        assert_eq!(CompletionShell::Bash.script_file_name("ctxgen"), "ctxgen.bash");
        assert_eq!(CompletionShell::Zsh.script_file_name("ctxgen"), "_ctxgen");
    }
}
