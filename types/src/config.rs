//! Checker configuration.
//!
//! Raw deserialization stays private; the public [`CheckerConfig`] only
//! exists in validated form, so downstream code never checks for an empty
//! command or a blank language entry. Every field has a default and the
//! defaults reproduce the stock mypy integration, which makes the empty
//! config document valid.

use serde::Deserialize;

#[derive(Debug, Clone, thiserror::Error)]
pub enum CheckerConfigError {
    #[error("checker command must not be empty")]
    EmptyCommand,
    #[error("language entries must not be empty")]
    EmptyLanguage,
}

fn default_command() -> String {
    "mypy".to_string()
}

fn default_languages() -> Vec<String> {
    vec!["python".to_string()]
}

fn default_root_markers() -> Vec<String> {
    vec![
        "pyproject.toml".to_string(),
        "setup.cfg".to_string(),
        "mypy.ini".to_string(),
        ".mypy.ini".to_string(),
    ]
}

fn default_exit_grace_ms() -> u64 {
    500
}

#[derive(Deserialize)]
struct RawCheckerConfig {
    #[serde(default = "default_command")]
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default = "default_languages")]
    languages: Vec<String>,
    #[serde(default = "default_root_markers")]
    root_markers: Vec<String>,
    #[serde(default = "default_exit_grace_ms")]
    exit_grace_ms: u64,
}

/// Validated checker configuration.
///
/// Invariant: `command` is non-empty and no `languages` entry is blank
/// (a blank prefix would match every buffer). Enforced via
/// `#[serde(try_from)]` at the deserialization boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawCheckerConfig")]
pub struct CheckerConfig {
    command: String,
    args: Vec<String>,
    languages: Vec<String>,
    root_markers: Vec<String>,
    exit_grace_ms: u64,
}

impl TryFrom<RawCheckerConfig> for CheckerConfig {
    type Error = CheckerConfigError;

    fn try_from(raw: RawCheckerConfig) -> Result<Self, Self::Error> {
        if raw.command.trim().is_empty() {
            return Err(CheckerConfigError::EmptyCommand);
        }
        if raw.languages.iter().any(|lang| lang.trim().is_empty()) {
            return Err(CheckerConfigError::EmptyLanguage);
        }
        Ok(Self {
            command: raw.command,
            args: raw.args,
            languages: raw.languages,
            root_markers: raw.root_markers,
            exit_grace_ms: raw.exit_grace_ms,
        })
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: Vec::new(),
            languages: default_languages(),
            root_markers: default_root_markers(),
            exit_grace_ms: default_exit_grace_ms(),
        }
    }
}

impl CheckerConfig {
    /// A config with a custom checker command and stock defaults for
    /// everything else. Typical for hosts pointing at a virtualenv binary.
    pub fn with_command(command: impl Into<String>) -> Result<Self, CheckerConfigError> {
        let command = command.into();
        if command.trim().is_empty() {
            return Err(CheckerConfigError::EmptyCommand);
        }
        Ok(Self {
            command,
            ..Self::default()
        })
    }

    /// Executable name or path, resolved against `PATH` at spawn time.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Extra arguments inserted between the fixed flags and the file path.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Language-id prefixes that make a buffer checkable.
    #[must_use]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Filenames that mark a project root when walking up from the file.
    #[must_use]
    pub fn root_markers(&self) -> &[String] {
        &self.root_markers
    }

    /// Grace period for one exit-status poll after the checker closes its
    /// stdout.
    #[must_use]
    pub fn exit_grace_ms(&self) -> u64 {
        self.exit_grace_ms
    }

    /// Whether a host-reported language id makes the buffer checkable.
    ///
    /// Prefix match, so `python3` is accepted by the default `python`
    /// entry. A buffer with no language never matches.
    #[must_use]
    pub fn matches_language(&self, language_id: Option<&str>) -> bool {
        match language_id {
            Some(id) => self
                .languages
                .iter()
                .any(|prefix| id.starts_with(prefix.as_str())),
            None => false,
        }
    }
}
