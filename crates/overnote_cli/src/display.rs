//! Output formatting and pager plumbing.

use anyhow::{bail, Context};
use owo_colors::OwoColorize;
use std::io::Write;
use std::process::{Command, Stdio};

/// Dims `text` when `colorize` is set.
pub fn faint(text: &str, colorize: bool) -> String {
    if colorize {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

/// Trims `text` and prefixes every line with a tab.
pub fn indent(text: &str) -> String {
    text.trim()
        .split('\n')
        .map(|line| format!("\t{line}\n"))
        .collect()
}

/// Left-aligns cells into columns separated by one space.
///
/// The last cell of each row is never padded.
pub fn columns(rows: &[Vec<String>]) -> String {
    let mut widths = Vec::<usize>::new();
    for row in rows {
        for (index, cell) in row.iter().enumerate().take(row.len().saturating_sub(1)) {
            let width = cell.chars().count();
            match widths.get_mut(index) {
                Some(current) => *current = (*current).max(width),
                None => widths.push(width),
            }
        }
    }

    let mut out = String::new();
    for row in rows {
        let last = row.len().saturating_sub(1);
        for (index, cell) in row.iter().enumerate() {
            out.push_str(cell);
            if index < last {
                let pad = widths[index] - cell.chars().count() + 1;
                out.extend(std::iter::repeat(' ').take(pad));
            }
        }
        out.push('\n');
    }
    out
}

/// Writes `out` to stdout, or pipes it through `pager` when one is set.
pub fn write_output(out: &str, pager: &str) -> anyhow::Result<()> {
    if pager.trim().is_empty() {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(out.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    let argv = split_command(pager).context("invalid pager command")?;
    let (program, args) = argv
        .split_first()
        .context("pager command is empty")?;
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to start pager `{program}`"))?;

    if let Some(mut stdin) = child.stdin.take() {
        // Pager may quit before reading everything.
        if let Err(err) = stdin.write_all(out.as_bytes()) {
            if err.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(err).context("failed to write to pager");
            }
        }
    }

    let status = child.wait().context("failed to wait for pager")?;
    if !status.success() {
        bail!("pager `{program}` exited with {status}");
    }
    Ok(())
}

/// Splits a configured command line into program and arguments.
pub fn split_command(command: &str) -> Option<Vec<String>> {
    shlex::split(command).filter(|argv| !argv.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{columns, faint, indent, split_command};

    #[test]
    fn faint_only_when_colorizing() {
        assert_eq!(faint("foo", true), "\x1b[2mfoo\x1b[0m");
        assert_eq!(faint("foo", false), "foo");
    }

    #[test]
    fn indent_prefixes_each_line() {
        assert_eq!(indent("foo\nbar\nbaz"), "\tfoo\n\tbar\n\tbaz\n");
        assert_eq!(indent("\n  foo\n\n"), "\tfoo\n");
    }

    #[test]
    fn columns_align_all_but_last_cell() {
        let rows = vec![
            vec!["name:".to_string(), "file:".to_string(), "tags:".to_string()],
            vec!["tar".to_string(), "/n/tar".to_string(), "a,b".to_string()],
            vec!["docker/run".to_string(), "/n/d".to_string(), String::new()],
        ];
        assert_eq!(
            columns(&rows),
            "name:      file:  tags:\ntar        /n/tar a,b\ndocker/run /n/d   \n"
        );
    }

    #[test]
    fn split_command_honours_quotes() {
        assert_eq!(
            split_command("less -FRX").expect("plain words split"),
            vec!["less".to_string(), "-FRX".to_string()]
        );
        assert_eq!(
            split_command("'/opt/my editor/bin' --wait").expect("quoted words split"),
            vec!["/opt/my editor/bin".to_string(), "--wait".to_string()]
        );
        assert!(split_command("   ").is_none());
        assert!(split_command("\"unterminated").is_none());
    }
}
