//! `sweep.toml` manifest parsing and toolchain configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mpsweep_driver::{StageCommands, ToolchainConfig};

/// File name searched for when no `--manifest` is given.
pub const MANIFEST_NAME: &str = "sweep.toml";

/// The top-level manifest structure. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SweepManifest {
    #[serde(default)]
    pub project: ProjectSection,
    #[serde(default)]
    pub paths: PathsSection,
    /// Stage commands; stages left out keep the Quartus defaults.
    #[serde(default)]
    pub stages: StageCommands,
    #[serde(default)]
    pub janitor: JanitorSection,
}

/// Project naming section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectSection {
    /// Project/config name passed to every stage.
    #[serde(default)]
    pub name: Option<String>,
    /// Generated configuration artifact.
    #[serde(default)]
    pub config_file: Option<PathBuf>,
    /// Static project settings naming the device.
    #[serde(default)]
    pub settings_file: Option<PathBuf>,
}

/// Output locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PathsSection {
    #[serde(default)]
    pub report_dir: Option<PathBuf>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub result_file: Option<PathBuf>,
}

/// End-of-sweep cleanup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JanitorSection {
    #[serde(default)]
    pub purge_dirs: Option<Vec<PathBuf>>,
    #[serde(default)]
    pub purge_files: Option<Vec<PathBuf>>,
}

impl SweepManifest {
    /// Search upward from `start_dir` for a `sweep.toml` file, parse and return
    /// it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_NAME);
            if candidate.is_file() {
                return Ok(Some((Self::load(&candidate)?, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing sweep.toml")
    }

    /// Toolchain configuration rooted at `workdir`, defaults filled in.
    pub fn into_config(self, workdir: &Path) -> ToolchainConfig {
        let mut config = ToolchainConfig::new(workdir);
        let SweepManifest {
            project,
            paths,
            stages,
            janitor,
        } = self;

        if let Some(name) = project.name {
            config.project = name;
        }
        if let Some(file) = project.config_file {
            config.config_file = file;
        }
        if let Some(file) = project.settings_file {
            config.settings_file = file;
        }
        if let Some(dir) = paths.report_dir {
            config.report_dir = dir;
        }
        if let Some(dir) = paths.log_dir {
            config.log_dir = dir;
        }
        if let Some(file) = paths.result_file {
            config.result_file = file;
        }
        if let Some(dirs) = janitor.purge_dirs {
            config.purge_dirs = dirs;
        }
        if let Some(files) = janitor.purge_files {
            config.purge_files = files;
        }
        config.stages = stages;
        config
    }
}
