// ジョブ単位: 設定検証 → コマンド生成 → zint 実行 → 出力書き込み

use std::path::PathBuf;

use tracing::info;

use crate::barcode::options::BarcodeOptions;
use crate::barcode::settings::BarcodeSettings;
use crate::config::merged::MergedConfig;
use crate::process::generate::{OutputMode, render};
use crate::process::runner::{OutputSender, RunnerConfig, ZintRunner};

/// Configuration for a single job.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Label used in reports, e.g. `jobs.yaml#2`.
    pub label: String,
    pub options: BarcodeOptions,
    pub mode: OutputMode,
    pub runner: RunnerConfig,
}

impl JobConfig {
    pub fn new(label: impl Into<String>, options: BarcodeOptions, merged: &MergedConfig) -> Self {
        JobConfig {
            label: label.into(),
            options,
            mode: merged.output_mode(),
            runner: merged.runner.clone(),
        }
    }

    /// `output_path` when set and non-blank.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.options
            .output_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }
}

/// Result of a single job.
#[derive(Debug, Clone)]
pub struct JobResult {
    pub label: String,
    /// File the image ended up in, if any.
    pub output_path: Option<PathBuf>,
    pub bytes: usize,
}

/// Run one job to completion.
///
/// In direct mode the captured bytes are written to `output_path` when one is
/// given; in file mode zint has already written it.
pub async fn run_job(
    config: &JobConfig,
    events: Option<&OutputSender>,
) -> crate::error::Result<JobResult> {
    let settings = BarcodeSettings::new(config.options.clone());
    let runner = ZintRunner::with_config(config.runner.clone());

    let image = render(&settings, &runner, &config.mode, events).await?;

    let output_path = config.output_path().map(|path| match &config.runner.working_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    });
    if let (OutputMode::Direct { .. }, Some(path)) = (&config.mode, &output_path) {
        std::fs::write(path, &image)?;
    }

    info!(job = %config.label, bytes = image.len(), "job finished");
    Ok(JobResult {
        label: config.label.clone(),
        output_path,
        bytes: image.len(),
    })
}
