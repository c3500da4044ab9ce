use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::process::ProcessOptions;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub columns: Option<u16>,
    pub rows: Option<u16>,
    pub scratch_capacity: Option<usize>,
    pub perf: bool,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            columns: other.columns.or(self.columns),
            rows: other.rows.or(self.rows),
            scratch_capacity: other.scratch_capacity.or(self.scratch_capacity),
            perf: self.perf || other.perf,
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }

    /// Resolve process options, taking unset geometry from `terminal`
    /// (columns, rows).
    pub fn process_options(&self, terminal: Option<(u16, u16)>) -> ProcessOptions {
        let defaults = ProcessOptions::default();
        let (term_columns, term_rows) = terminal.unwrap_or((defaults.columns, defaults.rows));
        ProcessOptions {
            columns: self.columns.unwrap_or(term_columns),
            rows: self.rows.unwrap_or(term_rows),
            scratch_capacity: self.scratch_capacity.unwrap_or(defaults.scratch_capacity),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("nexvi").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("nexvi")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("nexvi").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("nexvi").join("config");
        }
    }

    PathBuf::from(".nexvirc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".nexvirc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# nexvi defaults (saved with --save)".to_string());
    if let Some(columns) = flags.columns {
        lines.push(format!("--columns {columns}"));
    }
    if let Some(rows) = flags.rows {
        lines.push(format!("--rows {rows}"));
    }
    if let Some(bytes) = flags.scratch_capacity {
        lines.push(format!("--scratch-capacity {bytes}"));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of a token list, ignoring everything else.
///
/// Values that fail to parse leave the option unset.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (key, inline) = match token.split_once('=') {
            Some((key, value)) if key.starts_with("--") => (key, Some(value)),
            _ => (token, None),
        };
        let takes_value = matches!(
            key,
            "--columns" | "--rows" | "--scratch-capacity" | "--debug-log"
        );
        let value = if !takes_value {
            None
        } else if inline.is_some() {
            inline
        } else {
            i += 1;
            tokens.get(i).map(String::as_str)
        };

        match (key, value) {
            ("--perf", _) => flags.perf = true,
            ("--columns", Some(v)) => flags.columns = v.parse().ok(),
            ("--rows", Some(v)) => flags.rows = v.parse().ok(),
            ("--scratch-capacity", Some(v)) => flags.scratch_capacity = v.parse().ok(),
            ("--debug-log", Some(v)) => flags.debug_log = Some(PathBuf::from(v)),
            _ => {}
        }
        i += 1;
    }
    flags
}
