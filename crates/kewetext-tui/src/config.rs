//! rc file loading.
//!
//! The rc file is a list of `KEY=VALUE` lines. Blank lines and lines starting with `#` are
//! skipped; keys this editor does not know are ignored.

use kewetext_core::EditorConfig;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Environment variable that overrides the rc file location.
pub const RC_ENV: &str = "KEWETEXT_RC";

/// rc file looked up in the working directory when [`RC_ENV`] is unset.
pub const DEFAULT_RC_FILE: &str = ".kewetextrc";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: expected KEY=VALUE, got {text:?}")]
    InvalidLine { line: usize, text: String },
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}

pub fn rc_path() -> PathBuf {
    env::var_os(RC_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RC_FILE))
}

/// Read the rc file at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<EditorConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => parse_rc(&text),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::debug!("no rc file at {}, using defaults", path.display());
            Ok(EditorConfig::default())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_number(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

pub fn parse_rc(text: &str) -> Result<EditorConfig, ConfigError> {
    let mut config = EditorConfig::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::InvalidLine {
                line: idx + 1,
                text: raw.to_string(),
            });
        };
        let (key, value) = (key.trim(), value.trim());

        match key {
            "TAB_STOP" => config = config.with_tab_stop(parse_number(key, value)?),
            "QUIT_TIMES" => config = config.with_quit_times(parse_number(key, value)?),
            "AUTO_INDENT" => config = config.with_auto_indent(parse_flag(key, value)?),
            other => log::debug!("ignoring rc key {other}"),
        }
    }

    Ok(config)
}
