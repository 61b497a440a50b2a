use super::text::DEFAULT_LINE_WIDTH;
use super::version::VersionBump;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// name of the optional configuration file in the project root
pub const CONFIG_FILE_NAME: &str = "changelog-tool.toml";

/// configuration for the changelog tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogToolConfig {
    /// name of the changelog file (default: "changelog.md")
    pub file_name: String,

    /// column at which rendered text is wrapped
    pub line_width: usize,

    /// version bump used when `add` has to start a new version
    pub default_bump: VersionBump,

    /// refuse to release from a git work tree with uncommitted changes
    pub require_clean_work_tree: bool,
}

impl Default for ChangelogToolConfig {
    fn default() -> Self {
        Self {
            file_name: "changelog.md".to_string(),
            line_width: DEFAULT_LINE_WIDTH,
            default_bump: VersionBump::Patch,
            require_clean_work_tree: true,
        }
    }
}

impl ChangelogToolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    pub fn line_width(mut self, width: usize) -> Self {
        self.line_width = width;
        self
    }

    pub fn default_bump(mut self, bump: VersionBump) -> Self {
        self.default_bump = bump;
        self
    }

    pub fn require_clean_work_tree(mut self, required: bool) -> Self {
        self.require_clean_work_tree = required;
        self
    }

    /// load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::error::Error::FileReadError {
                path: path.to_path_buf(),
                source: e,
            })?;

        let config: ChangelogToolConfig =
            toml::from_str(&contents).map_err(|e| crate::error::Error::TomlParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(config)
    }

    /// find and load the configuration file in the project directory
    ///
    /// returns the default config if the file is missing; an unreadable
    /// file is logged and also falls back to the default
    pub fn load_or_default<P: AsRef<Path>>(project_path: P) -> Self {
        match Self::find_config_file(&project_path) {
            Some(config_path) => Self::load_from_file(&config_path).unwrap_or_else(|e| {
                warn!(error = %e, "ignoring configuration file");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// looks for `changelog-tool.toml` in the project directory
    pub fn find_config_file<P: AsRef<Path>>(project_path: P) -> Option<PathBuf> {
        let config_path = project_path.as_ref().join(CONFIG_FILE_NAME);

        if config_path.is_file() {
            Some(config_path)
        } else {
            None
        }
    }

    /// path of the changelog file inside `project_path`
    pub fn changelog_path<P: AsRef<Path>>(&self, project_path: P) -> PathBuf {
        project_path.as_ref().join(&self.file_name)
    }
}
