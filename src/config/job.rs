use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::barcode::options::BarcodeOptions;

#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    pub jobs: Vec<Job>,
}

/// 1ジョブ = バーコード設定 + 実行方法の上書き。
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    #[serde(flatten)]
    pub options: BarcodeOptions,
    pub direct: Option<bool>,
    pub filetype: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Keys matching neither a barcode option nor an override.
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_yml::Value>,
}

impl JobFile {
    /// 未知のキー（綴り間違いなど）を含むジョブはエラーにする。
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        let job_file: JobFile = serde_yml::from_str(yaml).map_err(|e| {
            crate::error::ZintError::config(format!("Failed to parse job YAML: {e}"))
        })?;
        for (i, job) in job_file.jobs.iter().enumerate() {
            if !job.unknown.is_empty() {
                let keys: Vec<&str> = job.unknown.keys().map(String::as_str).collect();
                return Err(crate::error::ZintError::config(format!(
                    "Unknown key(s) in job {}: {}",
                    i + 1,
                    keys.join(", ")
                )));
            }
        }
        Ok(job_file)
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}

impl Job {
    /// 相対パスの input_path / output_path をジョブファイルのディレクトリ基準に直す。
    pub fn resolve_paths(&mut self, job_dir: &Path) {
        for path in [&mut self.options.input_path, &mut self.options.output_path] {
            if let Some(p) = path.as_mut() {
                if !p.trim().is_empty() && !Path::new(p.as_str()).is_absolute() {
                    *p = job_dir.join(p.as_str()).to_string_lossy().into_owned();
                }
            }
        }
    }
}
