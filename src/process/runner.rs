// zint プロセス実行エンジン
//
// Idle → Launched → Running (stdout + stderr drained concurrently)
//      → Completed(exit code) | TimedOut | LaunchFailed
//
// Any non-empty stderr line marks the run as failed, whatever the exit code.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::command::CompiledCommand;
use crate::error::ZintError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_EXECUTABLE: &str = "zint";
/// Environment variable overriding the default executable.
pub const EXECUTABLE_ENV: &str = "ZINT_PATH";

/// Configuration for the zint runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path or bare name (looked up on `PATH`) of the zint executable.
    pub executable: PathBuf,
    /// Arguments placed before the compiled flags (for wrapper launchers).
    pub launcher_args: Vec<String>,
    /// Wall-clock limit for one invocation.
    pub timeout: Duration,
    /// Working directory for zint. `None` = current directory.
    pub working_dir: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            launcher_args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            working_dir: None,
        }
    }
}

/// `ZINT_PATH` があればそれを、なければ `zint` を使う。
pub fn default_executable() -> PathBuf {
    std::env::var_os(EXECUTABLE_ENV)
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE), PathBuf::from)
}

/// One line of tool output, delivered to subscribers as it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub text: String,
    pub is_error: bool,
}

/// Subscriber side of the advisory output notifications.
pub type OutputSender = UnboundedSender<OutputLine>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Launched,
    Running,
    Completed,
    TimedOut,
    LaunchFailed,
}

/// 1回の実行結果。
#[derive(Debug)]
pub enum ExecutionOutcome {
    Completed {
        /// Informational only; `success` is decided by stderr.
        exit_code: Option<i32>,
        /// No stderr line was observed.
        success: bool,
        /// Raw stdout bytes (the image in direct mode).
        stdout: Vec<u8>,
        /// Non-empty stderr lines in arrival order.
        stderr: Vec<String>,
    },
    TimedOut {
        timeout: Duration,
    },
    LaunchFailed {
        reason: String,
    },
}

impl ExecutionOutcome {
    pub fn state(&self) -> RunState {
        match self {
            ExecutionOutcome::Completed { .. } => RunState::Completed,
            ExecutionOutcome::TimedOut { .. } => RunState::TimedOut,
            ExecutionOutcome::LaunchFailed { .. } => RunState::LaunchFailed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Completed { success: true, .. })
    }

    /// 成功なら stdout のバイト列、失敗なら対応する ZintError。
    pub fn into_result(self) -> crate::error::Result<Vec<u8>> {
        match self {
            ExecutionOutcome::Completed {
                success: true,
                stdout,
                ..
            } => Ok(stdout),
            ExecutionOutcome::Completed {
                exit_code, stderr, ..
            } => Err(ZintError::ToolError {
                stderr: stderr.join("\n"),
                exit_code,
            }),
            ExecutionOutcome::TimedOut { timeout } => Err(ZintError::Timeout {
                timeout_ms: timeout.as_millis(),
            }),
            ExecutionOutcome::LaunchFailed { reason } => Err(ZintError::launch(reason)),
        }
    }
}

/// Runner for the zint command-line tool.
#[derive(Debug, Clone, Default)]
pub struct ZintRunner {
    config: RunnerConfig,
}

impl ZintRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// 実行ファイルのパスを解決する。
    ///
    /// A bare name is looked up on `PATH`; anything with a directory part must
    /// exist and is made absolute so it does not depend on the working directory.
    pub fn resolve_executable(&self) -> crate::error::Result<PathBuf> {
        let exe = &self.config.executable;
        if exe.as_os_str().is_empty() {
            return Err(ZintError::launch("zint executable path is empty"));
        }
        if exe.components().count() > 1 || exe.is_absolute() {
            std::fs::canonicalize(exe)
                .ok()
                .filter(|p| p.is_file())
                .ok_or_else(|| {
                    ZintError::launch(format!("zint executable not found at {}", exe.display()))
                })
        } else {
            which::which(exe).map_err(|e| {
                ZintError::launch(format!("'{}' not found on PATH: {e}", exe.display()))
            })
        }
    }

    /// Working directory the tool runs in.
    pub fn working_dir(&self) -> crate::error::Result<PathBuf> {
        match &self.config.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    /// zint を起動し、終了・タイムアウト・起動失敗のいずれかまで待つ。
    ///
    /// Both pipes are drained on their own tasks so neither can fill up and
    /// stall the child. On timeout the child's whole process group is killed
    /// before returning (unix); elsewhere only the child itself.
    pub async fn execute(
        &self,
        command: &CompiledCommand,
        events: Option<&OutputSender>,
    ) -> ExecutionOutcome {
        debug!(state = ?RunState::Idle, command = %command, "preparing zint invocation");

        let (executable, working_dir) = match self
            .resolve_executable()
            .and_then(|exe| Ok((exe, self.working_dir()?)))
        {
            Ok(v) => v,
            Err(e) => return launch_failed(e.to_string()),
        };

        let mut cmd = Command::new(&executable);
        cmd.args(&self.config.launcher_args)
            .args(command.argv())
            .current_dir(&working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a timeout also reaches anything zint (or a
        // launcher wrapper) started.
        #[cfg(unix)]
        cmd.process_group(0);
        #[cfg(windows)]
        cmd.creation_flags(0x0800_0000); // CREATE_NO_WINDOW

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return launch_failed(format!(
                    "failed to start '{}': {e}",
                    executable.display()
                ));
            }
        };
        let pid = child.id();
        debug!(state = ?RunState::Launched, pid, "zint started");

        let direct = command.is_direct();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_events = events.cloned();
        let stderr_events = events.cloned();

        let mut stdout_task = tokio::spawn(async move {
            match stdout {
                Some(out) if direct => read_all(out).await,
                Some(out) => drain_lines(out, false, stdout_events.as_ref())
                    .await
                    .map(|(raw, _)| raw),
                None => Ok(Vec::new()),
            }
        });
        let mut stderr_task = tokio::spawn(async move {
            match stderr {
                Some(err) => drain_lines(err, true, stderr_events.as_ref())
                    .await
                    .map(|(_, lines)| lines),
                None => Ok(Vec::new()),
            }
        });

        debug!(state = ?RunState::Running, "draining zint output");
        let start = Instant::now();
        let waited = tokio::time::timeout(self.config.timeout, async {
            let status = child.wait().await;
            let out = (&mut stdout_task).await;
            let err = (&mut stderr_task).await;
            (status, out, err)
        })
        .await;

        let (status, out, err) = match waited {
            Ok(results) => results,
            Err(_) => {
                warn!(
                    timeout_ms = self.config.timeout.as_millis(),
                    "zint timed out, killing process"
                );
                kill_process_group(pid);
                if let Err(e) = child.kill().await {
                    warn!("failed to kill zint: {e}");
                }
                stdout_task.abort();
                stderr_task.abort();
                debug!(state = ?RunState::TimedOut, "zint invocation finished");
                return ExecutionOutcome::TimedOut {
                    timeout: self.config.timeout,
                };
            }
        };

        // 読み取り・待機そのものの失敗もエラー行として扱い、成功にはしない
        let mut stderr_lines = match err {
            Ok(Ok(lines)) => lines,
            Ok(Err(e)) => vec![format!("failed to read zint stderr: {e}")],
            Err(e) => vec![format!("stderr reader failed: {e}")],
        };
        let stdout_bytes = match out {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                stderr_lines.push(format!("failed to read zint stdout: {e}"));
                Vec::new()
            }
            Err(e) => {
                stderr_lines.push(format!("stdout reader failed: {e}"));
                Vec::new()
            }
        };
        let exit_code = match status {
            Ok(status) => status.code(),
            Err(e) => {
                stderr_lines.push(format!("failed to wait for zint: {e}"));
                None
            }
        };

        let success = stderr_lines.is_empty();
        debug!(
            state = ?RunState::Completed,
            exit_code,
            success,
            elapsed_ms = start.elapsed().as_millis(),
            "zint invocation finished"
        );

        ExecutionOutcome::Completed {
            exit_code,
            success,
            stdout: stdout_bytes,
            stderr: stderr_lines,
        }
    }
}

/// Sends SIGKILL to the whole process group led by `pid`.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    let Some(pgid) = pid.and_then(|p| libc::pid_t::try_from(p).ok()) else {
        return;
    };
    // SAFETY: kill(2) with a negative pid only signals that process group.
    let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if rc != 0 {
        debug!(
            pgid,
            "process group already gone: {}",
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

fn launch_failed(reason: String) -> ExecutionOutcome {
    warn!(state = ?RunState::LaunchFailed, "{reason}");
    ExecutionOutcome::LaunchFailed { reason }
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(buf)
}

/// 1行ずつ読み、空でない行を通知する。戻り値は (生バイト列, 空でない行)。
async fn drain_lines<R: AsyncRead + Unpin>(
    reader: R,
    is_error: bool,
    events: Option<&OutputSender>,
) -> std::io::Result<(Vec<u8>, Vec<String>)> {
    let mut reader = BufReader::new(reader);
    let mut raw = Vec::new();
    let mut lines = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        raw.extend_from_slice(&buf);

        let text = String::from_utf8_lossy(&buf)
            .trim_end_matches(['\r', '\n'])
            .to_string();
        // Whitespace-only stderr still counts as an error line.
        let blank = if is_error {
            text.is_empty()
        } else {
            text.trim().is_empty()
        };
        if blank {
            continue;
        }

        if is_error {
            warn!(target: "zint", "{text}");
        } else {
            debug!(target: "zint", "{text}");
        }
        if let Some(tx) = events {
            // Notifications are advisory; a dropped receiver is fine.
            let _ = tx.send(OutputLine {
                text: text.clone(),
                is_error,
            });
        }
        lines.push(text);
    }

    Ok((raw, lines))
}

/// Resolves `path` against `base` unless it is already absolute.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
