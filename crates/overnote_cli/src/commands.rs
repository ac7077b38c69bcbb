//! Subcommand implementations.
//!
//! Commands load the config, build an [`EntryService`] and hand rendered
//! text to [`display::write_output`]. Bodies are highlighted only when
//! colorizing.

use crate::display::{self, columns, faint, indent};
use crate::editor;
use crate::highlight::SyntaxHighlighter;
use anyhow::{bail, Context};
use log::info;
use overnote_core::config::{self, LoadOptions};
use overnote_core::{
    default_log_level, init_logging, Config, EditOrigin, Entry, EntryService, SearchPattern,
};
use std::collections::HashMap;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const NOTHING_LISTED: u8 = 2;

/// Options shared by every subcommand.
pub struct GlobalOptions {
    pub notebook: Option<String>,
    pub config: Option<PathBuf>,
}

struct Session {
    config: Config,
    service: EntryService,
    colorize: bool,
    highlighter: Option<SyntaxHighlighter>,
}

/// Starts file logging under the platform state directory.
pub fn init_cli_logging(level: Option<&str>) {
    let Some(log_dir) = log_dir() else {
        eprintln!("note: no state directory available; logging disabled");
        return;
    };
    let level = level.unwrap_or_else(|| default_log_level());
    if let Err(err) = init_logging(level, &log_dir) {
        eprintln!("note: logging disabled: {err}");
    }
}

fn log_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("overnote").join("logs"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}

fn config_candidates(options: &GlobalOptions, home: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if let Some(explicit) = options.config.as_deref() {
        return Ok(vec![config::expand_home(explicit, home)]);
    }
    let env = std::env::vars().collect::<HashMap<_, _>>();
    Ok(config::config_paths(std::env::consts::OS, home, &env)?)
}

fn load_session(options: &GlobalOptions) -> anyhow::Result<Session> {
    let home = home_dir()?;
    let path = config::locate(&config_candidates(options, &home)?)
        .context("run `note init` to create a config file")?;
    let load_options = LoadOptions {
        home,
        cwd: std::env::current_dir().ok(),
        resolve_symlinks: true,
    };

    let mut config = Config::load(&path, &load_options)?;
    if config.editor.trim().is_empty() {
        config.editor = editor::discover_editor().unwrap_or_default();
    }
    config.validate()?;

    let mut registry = config.registry()?;
    if let Some(name) = options.notebook.as_deref() {
        registry = registry.scoped_to(name)?;
    }

    let colorize = config.colorize && std::io::stdout().is_terminal();
    let highlighter = if colorize {
        Some(SyntaxHighlighter::new(&config.style)?)
    } else {
        None
    };
    Ok(Session {
        config,
        service: EntryService::new(registry),
        colorize,
        highlighter,
    })
}

impl Session {
    fn write(&self, out: &str) -> anyhow::Result<()> {
        display::write_output(out, &self.config.pager)
    }

    fn notebook_label(&self, notebook: &str) -> String {
        faint(&format!("({notebook})"), self.colorize)
    }

    /// `text` from `entry`, highlighted by its syntax hint when colorizing.
    fn render(&self, entry: &Entry, text: &str) -> anyhow::Result<String> {
        match &self.highlighter {
            Some(highlighter) => highlighter.highlight(&entry.syntax, text),
            None => Ok(text.to_string()),
        }
    }
}

pub fn view(
    options: &GlobalOptions,
    name: &str,
    all: bool,
    tags: &[String],
) -> anyhow::Result<ExitCode> {
    let session = load_session(options)?;

    if !all {
        let entry = session.service.view(name, tags)?;
        session.write(&session.render(&entry, &entry.body)?)?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut out = String::new();
    for entry in session.service.view_all(name, tags)? {
        out.push_str(&format!(
            "{} {}\n{}\n",
            entry.name,
            session.notebook_label(&entry.notebook),
            indent(&session.render(&entry, &entry.body)?)
        ));
    }
    session.write(out.trim_end_matches('\n'))?;
    Ok(ExitCode::SUCCESS)
}

pub fn list(
    options: &GlobalOptions,
    filter: Option<&str>,
    tags: &[String],
) -> anyhow::Result<ExitCode> {
    let session = load_session(options)?;
    let entries = session.service.list(filter, tags)?;
    if entries.is_empty() {
        return Ok(ExitCode::from(NOTHING_LISTED));
    }

    let mut rows = vec![vec![
        "name:".to_string(),
        "file:".to_string(),
        "tags:".to_string(),
    ]];
    rows.extend(entries.iter().map(|entry| {
        vec![
            entry.name.clone(),
            entry.path.display().to_string(),
            entry.tags.join(","),
        ]
    }));
    session.write(&columns(&rows))?;
    Ok(ExitCode::SUCCESS)
}

pub fn search(
    options: &GlobalOptions,
    phrase: &str,
    only_entry: Option<&str>,
    regex: bool,
    tags: &[String],
) -> anyhow::Result<ExitCode> {
    let session = load_session(options)?;
    let pattern = SearchPattern::compile(phrase, regex)?;

    let mut out = String::new();
    for hit in session.service.search(&pattern, only_entry, tags)? {
        out.push_str(&format!(
            "{} {}\n{}\n",
            hit.entry.name,
            session.notebook_label(&hit.entry.notebook),
            indent(&session.render(&hit.entry, &hit.excerpt)?)
        ));
    }
    session.write(out.trim())?;
    Ok(ExitCode::SUCCESS)
}

pub fn edit(options: &GlobalOptions, name: &str, tags: &[String]) -> anyhow::Result<ExitCode> {
    let session = load_session(options)?;
    let target = session.service.resolve_edit(name, tags)?;
    if let EditOrigin::CopiedFrom(source) = &target.origin {
        info!(
            "event=cli_edit module=cli status=ok copied_from={}",
            source.display()
        );
    }

    editor::open(&session.config.editor, &target.path)?;
    Ok(ExitCode::SUCCESS)
}

pub fn remove(options: &GlobalOptions, name: &str, tags: &[String]) -> anyhow::Result<ExitCode> {
    let session = load_session(options)?;
    session.service.remove(name, tags)?;
    Ok(ExitCode::SUCCESS)
}

pub fn tags(options: &GlobalOptions) -> anyhow::Result<ExitCode> {
    let session = load_session(options)?;
    let out = session
        .service
        .tags()?
        .into_iter()
        .map(|tag| format!("{tag}\n"))
        .collect::<String>();
    session.write(&out)?;
    Ok(ExitCode::SUCCESS)
}

pub fn notebooks(options: &GlobalOptions) -> anyhow::Result<ExitCode> {
    let session = load_session(options)?;
    let rows = session
        .service
        .registry()
        .iter()
        .map(|notebook| {
            let access = if notebook.read_only { "ro" } else { "rw" };
            vec![
                format!("{}:", notebook.name),
                notebook.path.display().to_string(),
                access.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    session.write(&columns(&rows))?;
    Ok(ExitCode::SUCCESS)
}

/// Writes the default config and creates its notebook directories.
///
/// The editor and pager found on this machine are written into the file.
pub fn init(options: &GlobalOptions) -> anyhow::Result<ExitCode> {
    let home = home_dir()?;
    let candidates = config_candidates(options, &home)?;
    if let Ok(existing) = config::locate(&candidates) {
        bail!("config file already exists at `{}`", existing.display());
    }
    let Some(path) = candidates.first() else {
        bail!("no config location available");
    };
    let config_dir = path
        .parent()
        .context("config path has no parent directory")?;

    let editor = editor::discover_editor().unwrap_or_default();
    let pager = editor::discover_pager().unwrap_or_default();
    let contents = config::default_config(config_dir, &editor, &pager);
    config::write_config(path, &contents)?;

    let parsed = Config::from_yaml(&contents, path)?;
    for notebook in &parsed.notebooks {
        fs::create_dir_all(&notebook.path).with_context(|| {
            format!("failed to create notebook `{}`", notebook.path.display())
        })?;
    }
    info!(
        "event=cli_init module=cli status=ok notebooks={}",
        parsed.notebooks.len()
    );

    println!("created config file at {}", path.display());
    Ok(ExitCode::SUCCESS)
}

pub fn version() -> anyhow::Result<ExitCode> {
    println!(
        "note {} (core {})",
        env!("CARGO_PKG_VERSION"),
        overnote_core::core_version()
    );
    Ok(ExitCode::SUCCESS)
}
