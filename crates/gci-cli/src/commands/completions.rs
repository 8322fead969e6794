use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap_complete::{generate, Shell};

use gci_cli::cli::build_cli_command;

/// Completion script for `shell`, named after the binary `gci` is built as.
pub fn render(shell: Shell, sink: &mut dyn Write) {
    let mut cmd = build_cli_command();
    let bin = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin, sink);
}

pub fn handle(shell: Shell, out: Option<&Path>) -> Result<()> {
    let Some(path) = out else {
        render(shell, &mut io::stdout().lock());
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    render(shell, &mut file);
    file.flush()?;
    println!("Wrote {shell} completions to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zsh_script_names_subcommands() {
        let mut buf = Vec::new();
        render(Shell::Zsh, &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("#compdef gci"));
        assert!(script.contains("estimate"));
    }
}
