//! YAML configuration loading.
//!
//! # Responsibility
//! - Locate the config file for the current platform and environment.
//! - Deserialize editor/pager/colorize/style settings and the notebook list.
//! - Resolve notebook roots (`~`, symlinks, working-directory notebook).
//! - Render the default config written by `init`.
//!
//! # Invariants
//! - `OVERNOTE_CONFIG_PATH` overrides every other candidate location.
//! - The working-directory notebook, when present, is always last (most
//!   local) and writable.
//! - Loading never touches entry files; only notebook roots are resolved.

use crate::model::notebook::Notebook;
use crate::registry::{NotebookRegistry, RegistryError};
use log::{info, warn};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "OVERNOTE_CONFIG_PATH";
/// Directory under the working directory treated as a local notebook.
pub const LOCAL_NOTEBOOK_DIR: &str = ".overnote";
/// Registry name of the working-directory notebook.
pub const LOCAL_NOTEBOOK_NAME: &str = "cwd";
/// Highlighting styles `style` may name. The first is the default.
pub const STYLES: [&str; 2] = ["bw", "color"];

const APP_DIR: &str = "overnote";
const CONFIG_FILE_NAME: &str = "conf.yml";
const COMMUNITY_PLACEHOLDER: &str = "COMMUNITY_PATH";
const PERSONAL_PLACEHOLDER: &str = "PERSONAL_PATH";
const EDITOR_PLACEHOLDER: &str = "EDITOR_PATH";
const PAGER_PLACEHOLDER: &str = "PAGER_PATH";

const CONFIG_TEMPLATE: &str = r#"---
# Editor used by `note edit`. Falls back to $VISUAL, $EDITOR, then
# `editor`, `nano` or `vim` found on $PATH.
editor: EDITOR_PATH

# Highlight entry bodies and dim notebook labels when writing to a terminal.
colorize: true

# Highlighting style: `bw` (bold and dim only) or `color`.
style: bw

# Pager that output is piped through. Leave empty to write to stdout.
# `less -FRX` works well on Unix systems.
pager: PAGER_PATH

# Notebooks are directory trees of entries. They are listed from most
# global to most local: when two notebooks hold an entry with the same
# name, the one listed later wins.
#
# A read-only notebook never receives new entries. Editing an entry that
# lives in a read-only notebook first copies it into the most local
# writable notebook, leaving the original untouched.
#
# Tags listed on a notebook are applied to every entry it holds, so
# `note ls -t community` lists everything from the community notebook.
#
# A `.overnote` directory in the working directory is appended
# automatically as the most local, writable notebook named `cwd`.
notebooks:
  - name: community
    path: COMMUNITY_PATH
    tags: [ community ]
    readonly: true

  - name: personal
    path: PERSONAL_PATH
    tags: [ personal ]
    readonly: false
"#;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    /// No candidate config file exists.
    NotFound(Vec<PathBuf>),
    UnsupportedOs(String),
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, message: String },
    /// Notebook root could not be resolved to a real directory.
    ResolvePath { path: PathBuf, source: io::Error },
    Write { path: PathBuf, source: io::Error },
    Invalid(String),
    Registry(RegistryError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(candidates) => {
                let listed = candidates
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "could not locate config file (looked in: {listed})")
            }
            Self::UnsupportedOs(os) => write!(f, "unsupported os: {os}"),
            Self::Read { path, source } => {
                write!(f, "could not read config file `{}`: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "could not parse config file `{}`: {message}", path.display())
            }
            Self::ResolvePath { path, source } => {
                write!(f, "failed to resolve notebook path `{}`: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "config error: {message}"),
            Self::Registry(err) => write!(f, "config error: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. }
            | Self::ResolvePath { source, .. }
            | Self::Write { source, .. } => Some(source),
            Self::Registry(err) => Some(err),
            Self::NotFound(_) | Self::UnsupportedOs(_) | Self::Parse { .. } | Self::Invalid(_) => {
                None
            }
        }
    }
}

impl From<RegistryError> for ConfigError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

/// Inputs that vary per process rather than per config file.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub home: PathBuf,
    /// Working directory probed for a local notebook; `None` skips it.
    pub cwd: Option<PathBuf>,
    /// Canonicalize notebook roots. Requires the roots to exist.
    pub resolve_symlinks: bool,
}

/// Parsed configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default, deserialize_with = "null_as_default")]
    pub editor: String,
    #[serde(default)]
    pub colorize: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pager: String,
    /// One of [`STYLES`]; empty means the first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub style: String,
    #[serde(default)]
    pub notebooks: Vec<Notebook>,
    /// File this config was read from.
    #[serde(skip)]
    pub path: PathBuf,
}

impl Config {
    /// Reads and resolves the config at `path`.
    ///
    /// # Errors
    /// - [`ConfigError::Read`] / [`ConfigError::Parse`] for unreadable files.
    /// - [`ConfigError::ResolvePath`] when symlink resolution fails.
    pub fn load(path: &Path, options: &LoadOptions) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&raw, path)?;

        if let Some(cwd) = options.cwd.as_deref() {
            let local = cwd.join(LOCAL_NOTEBOOK_DIR);
            if local.is_dir() {
                config
                    .notebooks
                    .push(Notebook::new(LOCAL_NOTEBOOK_NAME, local, false));
            }
        }

        for notebook in &mut config.notebooks {
            let expanded = expand_home(&notebook.path, &options.home);
            notebook.path = if options.resolve_symlinks {
                fs::canonicalize(&expanded).map_err(|source| ConfigError::ResolvePath {
                    path: expanded.clone(),
                    source,
                })?
            } else {
                expanded
            };
        }
        config.pager = config.pager.trim().to_string();

        info!(
            "event=config_load module=config status=ok notebooks={}",
            config.notebooks.len()
        );
        Ok(config)
    }

    /// Parses config text without resolving anything on disk.
    pub fn from_yaml(raw: &str, path: &Path) -> ConfigResult<Self> {
        let mut config: Self = if raw.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(raw).map_err(|err| ConfigError::Parse {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?
        };
        config.style = config.style.trim().to_string();
        if config.style.is_empty() {
            config.style = STYLES[0].to_string();
        }
        config.path = path.to_path_buf();
        Ok(config)
    }

    /// Validates editor, style and notebook settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.editor.trim().is_empty() {
            return Err(ConfigError::Invalid("editor unspecified".to_string()));
        }
        if !STYLES.contains(&self.style.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown style `{}`, expected one of: {}",
                self.style,
                STYLES.join(", ")
            )));
        }
        if self.notebooks.is_empty() {
            return Err(ConfigError::Invalid("no notebooks specified".to_string()));
        }

        let mut names = BTreeSet::new();
        let mut paths = BTreeSet::new();
        for notebook in &self.notebooks {
            notebook
                .validate()
                .map_err(|err| ConfigError::Invalid(err.to_string()))?;
            if !names.insert(notebook.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "notebook name is not unique: {}",
                    notebook.name
                )));
            }
            if !paths.insert(notebook.path.as_path()) {
                return Err(ConfigError::Invalid(format!(
                    "notebook path is not unique: {}",
                    notebook.path.display()
                )));
            }
        }
        Ok(())
    }

    /// Builds the ordered registry from the configured notebooks.
    pub fn registry(&self) -> ConfigResult<NotebookRegistry> {
        Ok(NotebookRegistry::new(self.notebooks.clone())?)
    }
}

/// Candidate config file locations for `os`, most preferred first.
///
/// `os` uses `std::env::consts::OS` naming.
pub fn config_paths(
    os: &str,
    home: &Path,
    env: &HashMap<String, String>,
) -> ConfigResult<Vec<PathBuf>> {
    if let Some(explicit) = env.get(CONFIG_PATH_ENV) {
        return Ok(vec![expand_home(Path::new(explicit), home)]);
    }

    match os {
        "linux" | "macos" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" | "solaris"
        | "illumos" | "android" | "ios" | "aix" => {
            let mut paths = Vec::new();
            if let Some(xdg) = env.get("XDG_CONFIG_HOME") {
                paths.push(Path::new(xdg).join(APP_DIR).join(CONFIG_FILE_NAME));
            }
            paths.push(home.join(".config").join(APP_DIR).join(CONFIG_FILE_NAME));
            paths.push(home.join(format!(".{APP_DIR}")).join(CONFIG_FILE_NAME));
            paths.push(Path::new("/etc").join(APP_DIR).join(CONFIG_FILE_NAME));
            Ok(paths)
        }
        "windows" => {
            let app_data = env.get("APPDATA").cloned().unwrap_or_default();
            let program_data = env.get("PROGRAMDATA").cloned().unwrap_or_default();
            Ok(vec![
                Path::new(&app_data).join(APP_DIR).join(CONFIG_FILE_NAME),
                Path::new(&program_data).join(APP_DIR).join(CONFIG_FILE_NAME),
            ])
        }
        other => Err(ConfigError::UnsupportedOs(other.to_string())),
    }
}

/// First candidate that exists on disk.
pub fn locate(candidates: &[PathBuf]) -> ConfigResult<PathBuf> {
    candidates
        .iter()
        .find(|candidate| candidate.exists())
        .cloned()
        .ok_or_else(|| ConfigError::NotFound(candidates.to_vec()))
}

/// Expands a leading `~` to `home`. Other paths are returned unchanged.
pub fn expand_home(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Default config text with notebook roots placed under `config_dir`.
///
/// `editor` and `pager` are the discovered commands; empty strings leave
/// the keys unset.
pub fn default_config(config_dir: &Path, editor: &str, pager: &str) -> String {
    let notebooks = config_dir.join("notebooks");
    CONFIG_TEMPLATE
        .replace(EDITOR_PLACEHOLDER, &yaml_scalar(editor))
        .replace(PAGER_PLACEHOLDER, &yaml_scalar(pager))
        .replace(
            COMMUNITY_PLACEHOLDER,
            &notebooks.join("community").display().to_string(),
        )
        .replace(
            PERSONAL_PLACEHOLDER,
            &notebooks.join("personal").display().to_string(),
        )
}

/// Writes `contents` to `path`, creating parent directories.
///
/// Refuses to overwrite an existing file.
pub fn write_config(path: &Path, contents: &str) -> ConfigResult<()> {
    let write_err = |source: io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    if path.exists() {
        warn!("event=config_init module=config status=error error_code=already_exists");
        return Err(write_err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "config file already exists",
        )));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, contents).map_err(write_err)?;
    info!("event=config_init module=config status=ok");
    Ok(())
}

fn yaml_scalar(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    format!("'{}'", value.replace('\'', "''"))
}

fn null_as_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{config_paths, default_config, expand_home, Config, ConfigError, CONFIG_PATH_ENV};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn parse(raw: &str) -> Config {
        Config::from_yaml(raw, Path::new("/tmp/conf.yml")).expect("config should parse")
    }

    #[test]
    fn expand_home_only_touches_leading_tilde() {
        let home = Path::new("/home/me");
        assert_eq!(expand_home(Path::new("~/notes"), home), PathBuf::from("/home/me/notes"));
        assert_eq!(expand_home(Path::new("~"), home), PathBuf::from("/home/me"));
        assert_eq!(expand_home(Path::new("/abs/~x"), home), PathBuf::from("/abs/~x"));
    }

    #[test]
    fn explicit_env_path_wins() {
        let env = HashMap::from([(CONFIG_PATH_ENV.to_string(), "~/custom.yml".to_string())]);
        let paths = config_paths("linux", Path::new("/home/me"), &env).expect("linux is supported");
        assert_eq!(paths, vec![PathBuf::from("/home/me/custom.yml")]);
    }

    #[test]
    fn unix_paths_include_xdg_only_when_set() {
        let home = Path::new("/home/me");
        let without = config_paths("linux", home, &HashMap::new()).expect("linux is supported");
        assert_eq!(without.len(), 3);
        assert_eq!(without[0], PathBuf::from("/home/me/.config/overnote/conf.yml"));

        let env = HashMap::from([("XDG_CONFIG_HOME".to_string(), "/xdg".to_string())]);
        let with = config_paths("linux", home, &env).expect("linux is supported");
        assert_eq!(with.len(), 4);
        assert_eq!(with[0], PathBuf::from("/xdg/overnote/conf.yml"));
    }

    #[test]
    fn unsupported_os_is_rejected() {
        let err = config_paths("plan10", Path::new("/"), &HashMap::new())
            .expect_err("plan10 has no config location");
        assert!(matches!(err, ConfigError::UnsupportedOs(_)));
    }

    #[test]
    fn validate_requires_editor_and_unique_notebooks() {
        let config = parse("notebooks:\n  - name: a\n    path: /a\n");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = parse(
            "editor: vim\nnotebooks:\n  - name: a\n    path: /a\n  - name: a\n    path: /b\n",
        );
        let err = config.validate().expect_err("duplicate name");
        assert!(err.to_string().contains("name is not unique"));

        let config = parse(
            "editor: vim\nnotebooks:\n  - name: a\n    path: /a\n  - name: b\n    path: /a\n",
        );
        let err = config.validate().expect_err("duplicate path");
        assert!(err.to_string().contains("path is not unique"));
    }

    #[test]
    fn validate_rejects_empty_notebook_list() {
        let config = parse("editor: vim\n");
        assert!(config.validate().is_err());
    }

    #[test]
    fn null_editor_and_pager_become_empty() {
        let config = parse("editor:\npager:\n");
        assert_eq!(config.editor, "");
        assert_eq!(config.pager, "");
    }

    #[test]
    fn style_defaults_to_bw_and_must_be_known() {
        let config = parse("editor: vim\nnotebooks:\n  - name: a\n    path: /a\n");
        assert_eq!(config.style, "bw");
        config.validate().expect("default style is valid");

        let config = parse("editor: vim\nstyle: color\nnotebooks:\n  - name: a\n    path: /a\n");
        assert_eq!(config.style, "color");
        config.validate().expect("color style is valid");

        let config = parse("editor: vim\nstyle: neon\nnotebooks:\n  - name: a\n    path: /a\n");
        let err = config.validate().expect_err("neon is not a style");
        assert!(err.to_string().contains("unknown style `neon`"));
    }

    #[test]
    fn default_config_fills_discovered_commands() {
        let raw = default_config(Path::new("/cfg"), "code --wait", "less -FRX");
        let config = parse(&raw);
        assert_eq!(config.editor, "code --wait");
        assert_eq!(config.pager, "less -FRX");

        let raw = default_config(Path::new("/cfg"), "/opt/it's/vim", "");
        let config = parse(&raw);
        assert_eq!(config.editor, "/opt/it's/vim");
        assert_eq!(config.pager, "");
    }
}
