//! Editor and pager discovery, editor launch.

use crate::display::split_command;
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use std::process::Command;

const FALLBACK_EDITORS: [&str; 3] = ["editor", "nano", "vim"];
const FALLBACK_PAGERS: [&str; 3] = ["pager", "less", "more"];

/// Picks an editor when the config leaves it empty.
///
/// Order: `$VISUAL`, `$EDITOR`, then the first fallback found on `$PATH`
/// (`notepad` on Windows).
pub fn discover_editor() -> Option<String> {
    pick_editor(
        std::env::var("VISUAL").ok(),
        std::env::var("EDITOR").ok(),
        |program| which::which(program).ok(),
    )
}

fn pick_editor<F>(visual: Option<String>, editor: Option<String>, find: F) -> Option<String>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    if let Some(command) = [visual, editor]
        .into_iter()
        .flatten()
        .find(|command| !command.trim().is_empty())
    {
        return Some(command);
    }
    if cfg!(windows) {
        return Some("notepad".to_string());
    }
    FALLBACK_EDITORS
        .into_iter()
        .find_map(|program| find(program))
        .map(|path| path.display().to_string())
}

/// Picks a pager for a freshly written config.
///
/// Order: `$PAGER`, then the first fallback found on `$PATH` (`more` on
/// Windows). `None` leaves output on stdout.
pub fn discover_pager() -> Option<String> {
    pick_pager(std::env::var("PAGER").ok(), |program| which::which(program).ok())
}

fn pick_pager<F>(env_pager: Option<String>, find: F) -> Option<String>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    if let Some(command) = env_pager.filter(|command| !command.trim().is_empty()) {
        return Some(command);
    }
    if cfg!(windows) {
        return Some("more".to_string());
    }
    FALLBACK_PAGERS
        .into_iter()
        .find_map(|program| find(program))
        .map(|path| path.display().to_string())
}

/// Runs `editor` on `path` and waits for it to exit.
pub fn open(editor: &str, path: &Path) -> anyhow::Result<()> {
    let mut command = editor_command(editor, path, |program| which::which(program).ok())?;
    let status = command
        .status()
        .with_context(|| format!("failed to start editor `{editor}`"))?;
    if !status.success() {
        bail!("editor `{editor}` exited with {status}");
    }
    Ok(())
}

fn editor_command<F>(editor: &str, path: &Path, find: F) -> anyhow::Result<Command>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    let argv = split_command(editor).with_context(|| format!("invalid editor command `{editor}`"))?;
    let (program, args) = argv
        .split_first()
        .with_context(|| format!("invalid editor command `{editor}`"))?;
    let resolved = find(program).with_context(|| format!("editor `{program}` not found"))?;

    let mut command = Command::new(resolved);
    command.args(args).arg(path);
    Ok(command)
}
