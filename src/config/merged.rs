use super::job::Job;
use super::settings::ToolSettings;
use crate::process::generate::OutputMode;
use crate::process::runner::RunnerConfig;

#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub direct: bool,
    pub filetype: String,
    pub timeout_secs: u64,
    pub runner: RunnerConfig,
}

impl MergedConfig {
    /// JobのOption値がSomeならJobの値を、NoneならSettingsの値を使用する。
    pub fn new(settings: &ToolSettings, job: &Job) -> Self {
        let timeout_secs = job.timeout_secs.unwrap_or(settings.timeout_secs);
        MergedConfig {
            direct: job.direct.unwrap_or(settings.direct),
            filetype: job
                .filetype
                .clone()
                .unwrap_or_else(|| settings.filetype.clone()),
            timeout_secs,
            runner: settings.runner_config(timeout_secs),
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.direct {
            OutputMode::direct(self.filetype.clone())
        } else {
            OutputMode::file(self.filetype.clone())
        }
    }
}
