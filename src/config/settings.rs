use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::command::DEFAULT_FILETYPE;
use crate::process::runner::{DEFAULT_TIMEOUT, RunnerConfig, default_executable};

/// `settings.yaml`: ツール全体の設定。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// zint executable. Defaults to `$ZINT_PATH`, then `zint` on `PATH`.
    pub zint_path: PathBuf,
    /// Arguments placed before the compiled flags.
    pub launcher_args: Vec<String>,
    pub timeout_secs: u64,
    /// `None` = current directory.
    pub working_dir: Option<PathBuf>,
    pub filetype: String,
    pub direct: bool,
    /// 0 = one worker per job.
    pub parallel_workers: usize,
}

impl Default for ToolSettings {
    fn default() -> Self {
        ToolSettings {
            zint_path: default_executable(),
            launcher_args: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            working_dir: None,
            filetype: DEFAULT_FILETYPE.to_string(),
            direct: false,
            parallel_workers: 0,
        }
    }
}

impl ToolSettings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yml::from_str(yaml).map_err(|e| {
            crate::error::ZintError::config(format!("Failed to parse settings YAML: {e}"))
        })
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Runner configuration with the given timeout.
    pub fn runner_config(&self, timeout_secs: u64) -> RunnerConfig {
        RunnerConfig {
            executable: self.zint_path.clone(),
            launcher_args: self.launcher_args.clone(),
            timeout: Duration::from_secs(timeout_secs),
            working_dir: self.working_dir.clone(),
        }
    }
}
