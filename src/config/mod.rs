pub mod job;
pub mod merged;
pub mod settings;

use settings::ToolSettings;
use std::path::Path;

/// Tool-level settings file looked up beside each job file.
pub const SETTINGS_FILE_NAME: &str = "settings.yaml";

/// ジョブファイルに対応する zint の実行設定（パス・タイムアウト・出力形式）を返す。
///
/// Settings are per job-file directory, so jobs in different directories may
/// use different zint binaries or timeouts. Missing file → `ToolSettings::default()`.
pub fn load_settings_for_job(job_file_path: &Path) -> crate::error::Result<ToolSettings> {
    let dir = job_file_path
        .parent()
        .ok_or_else(|| crate::error::ZintError::config("Cannot determine job file directory"))?;

    let settings_path = dir.join(SETTINGS_FILE_NAME);

    if settings_path.exists() {
        ToolSettings::from_file(&settings_path)
    } else {
        Ok(ToolSettings::default())
    }
}
