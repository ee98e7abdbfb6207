use anyhow::{Context, Result, bail};
use ratatui::crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::io::{Write, stdout};
use std::path::Path;
use std::process::Command;

const FALLBACK_EDITOR: &str = "nano";

/// Picks the editor command: `VISUAL`, then `EDITOR`, then the configured
/// one, then nano.
pub fn resolve_editor(configured: Option<&str>) -> String {
    resolve_editor_from(
        std::env::var("VISUAL").ok(),
        std::env::var("EDITOR").ok(),
        configured,
    )
}

fn resolve_editor_from(visual: Option<String>, editor: Option<String>, configured: Option<&str>) -> String {
    [visual, editor, configured.map(str::to_string)]
        .into_iter()
        .flatten()
        .map(|e| e.trim().to_string())
        .find(|e| !e.is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

/// Builds the editor process. Editor strings may carry arguments, e.g.
/// `code --wait`.
fn editor_command(editor: &str, file: &Path) -> Result<Command> {
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("no editor configured");
    };
    let mut command = Command::new(program);
    command.args(parts).arg(file);
    Ok(command)
}

/// Hands the terminal to the editor and takes it back afterwards.
///
/// Raw mode and the alternate screen are restored even when the editor
/// cannot be started.
pub fn open_in_editor(editor: &str, file: &Path) -> Result<()> {
    let mut command = editor_command(editor, file)?;
    tracing::info!(editor, file = %file.display(), "launching external editor");

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    stdout().flush()?;

    let status = command
        .status()
        .with_context(|| format!("failed to launch editor '{}'", editor));

    execute!(stdout(), EnterAlternateScreen)?;
    enable_raw_mode()?;

    let status = status?;
    if !status.success() {
        tracing::warn!(%status, "editor exited unsuccessfully");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_order() {
        let some = |s: &str| Some(s.to_string());
        assert_eq!(resolve_editor_from(some("code -w"), some("vim"), Some("hx")), "code -w");
        assert_eq!(resolve_editor_from(None, some("vim"), Some("hx")), "vim");
        assert_eq!(resolve_editor_from(some("  "), None, Some("hx")), "hx");
        assert_eq!(resolve_editor_from(None, None, None), "nano");
    }

    #[test]
    fn command_keeps_editor_arguments() {
        let command = editor_command("code --wait", Path::new("/tmp/a.json")).unwrap();
        assert_eq!(command.get_program(), "code");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec!["--wait", "/tmp/a.json"]);

        assert!(editor_command("   ", Path::new("x")).is_err());
    }
}
