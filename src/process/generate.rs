// 設定 → 画像バイト列 (呼び出し側向けの生成操作)
//
// File mode: the tool writes to `output_path`, or to a synthesized temporary
// file that this invocation owns and removes on every exit path.
// Direct mode: the image bytes are taken from stdout.

use std::path::PathBuf;

use tempfile::TempPath;
use tracing::{debug, info};

use crate::barcode::settings::BarcodeSettings;
use crate::command::compiler::{self, DEFAULT_FILETYPE, Destination};
use crate::error::ZintError;
use crate::process::runner::{OutputSender, ZintRunner, resolve_against};

/// How the image is retrieved from the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Read the output file after the tool exits. `filetype` is the extension
    /// of a synthesized temporary file; a caller-chosen `output_path` keeps
    /// its own extension.
    File { filetype: String },
    /// Capture stdout (`--direct --filetype=<ext>`).
    Direct { filetype: String },
}

impl Default for OutputMode {
    fn default() -> Self {
        OutputMode::file(DEFAULT_FILETYPE)
    }
}

impl OutputMode {
    pub fn file(filetype: impl Into<String>) -> Self {
        OutputMode::File {
            filetype: filetype.into(),
        }
    }

    pub fn direct(filetype: impl Into<String>) -> Self {
        OutputMode::Direct {
            filetype: filetype.into(),
        }
    }
}

/// 出力先。一時ファイルの場合は drop で削除される。
enum OutputTarget {
    Permanent(PathBuf),
    Temporary(TempPath),
    Stdout(String),
}

impl OutputTarget {
    fn destination(&self) -> Destination {
        match self {
            OutputTarget::Permanent(path) => Destination::file(path),
            OutputTarget::Temporary(path) => Destination::file(path),
            OutputTarget::Stdout(filetype) => Destination::stdout(filetype),
        }
    }
}

fn synthesize_temp_path(filetype: &str) -> crate::error::Result<TempPath> {
    // zint picks the format from the extension.
    let extension = filetype.trim().trim_start_matches('.');
    let extension = if extension.is_empty() {
        DEFAULT_FILETYPE
    } else {
        extension
    };
    let file = tempfile::Builder::new()
        .prefix("zint-")
        .suffix(&format!(".{extension}"))
        .tempfile()?;
    Ok(file.into_temp_path())
}

fn output_target(
    settings: &BarcodeSettings,
    runner: &ZintRunner,
    mode: &OutputMode,
) -> crate::error::Result<OutputTarget> {
    let filetype = match mode {
        OutputMode::Direct { filetype } => return Ok(OutputTarget::Stdout(filetype.clone())),
        OutputMode::File { filetype } => filetype,
    };
    match settings
        .options()
        .output_path
        .as_deref()
        .filter(|p| !p.trim().is_empty())
    {
        Some(path) => Ok(OutputTarget::Permanent(resolve_against(
            &runner.working_dir()?,
            path.as_ref(),
        ))),
        None => Ok(OutputTarget::Temporary(synthesize_temp_path(filetype)?)),
    }
}

/// 設定を検証・コンパイルし、zint を実行して画像バイト列を返す。
///
/// The settings are only read. Invalid settings are refused before anything
/// is launched. Any stderr output, a timeout or a launch failure is returned
/// as the matching [`ZintError`]; a temporary output file never outlives this
/// call.
pub async fn render(
    settings: &BarcodeSettings,
    runner: &ZintRunner,
    mode: &OutputMode,
    events: Option<&OutputSender>,
) -> crate::error::Result<Vec<u8>> {
    settings.ensure_valid()?;

    let target = output_target(settings, runner, mode)?;
    let command = compiler::compile(settings, &target.destination())?;
    debug!(command = %command, "compiled zint command");

    let stdout = runner.execute(&command, events).await.into_result()?;

    let image = match &target {
        OutputTarget::Stdout(_) => stdout,
        OutputTarget::Permanent(path) => read_output(path)?,
        OutputTarget::Temporary(path) => read_output(path)?,
    };

    if let OutputTarget::Temporary(path) = target {
        path.close()?;
    }

    if image.is_empty() {
        return Err(ZintError::ToolError {
            stderr: "zint produced no image data".to_string(),
            exit_code: None,
        });
    }

    info!(bytes = image.len(), symbology = %settings.options().symbology, "barcode generated");
    Ok(image)
}

fn read_output(path: &std::path::Path) -> crate::error::Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| ZintError::ToolError {
        stderr: format!("failed to read output file {}: {e}", path.display()),
        exit_code: None,
    })
}

/// 生成し、成功したら設定に画像を記録する。
///
/// A previous image is cleared first, so after a failure
/// `generated_image()` is `None`.
pub async fn generate(
    settings: &mut BarcodeSettings,
    runner: &ZintRunner,
    mode: &OutputMode,
    events: Option<&OutputSender>,
) -> crate::error::Result<()> {
    settings.clear_generated_image();
    let image = render(settings, runner, mode, events).await?;
    settings.set_generated_image(image);
    Ok(())
}
