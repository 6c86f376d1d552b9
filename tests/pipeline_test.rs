// Phase 5: ジョブ実行パイプラインテスト

#![cfg(unix)]

use std::path::PathBuf;
use std::time::Duration;

use zint_cli::barcode::options::BarcodeOptions;
use zint_cli::error::ZintError;
use zint_cli::pipeline::job_runner::{JobConfig, run_job};
use zint_cli::pipeline::orchestrator::run_all_jobs;
use zint_cli::process::generate::OutputMode;
use zint_cli::process::runner::RunnerConfig;

fn job(label: &str, data: &str, script: &str, mode: OutputMode) -> JobConfig {
    JobConfig {
        label: label.to_string(),
        options: BarcodeOptions {
            data: data.to_string(),
            ..Default::default()
        },
        mode,
        runner: RunnerConfig {
            executable: PathBuf::from("/bin/sh"),
            launcher_args: vec!["-c".to_string(), script.to_string(), "zint".to_string()],
            timeout: Duration::from_secs(10),
            working_dir: None,
        },
    }
}

// ============================================================
// 1. 単一ジョブ
// ============================================================

#[tokio::test]
async fn test_run_job_direct_writes_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("code.svg");
    let mut config = job("j1", "abc", "printf '<svg/>'", OutputMode::direct("svg"));
    config.options.output_path = Some(output.to_string_lossy().into_owned());

    let result = run_job(&config, None).await.expect("job should succeed");

    assert_eq!(result.label, "j1");
    assert_eq!(result.bytes, 6);
    assert_eq!(result.output_path.as_deref(), Some(output.as_path()));
    assert_eq!(std::fs::read(&output).unwrap(), b"<svg/>");
}

#[tokio::test]
async fn test_run_job_invalid_settings() {
    let config = job("bad", "", "printf 'x'", OutputMode::direct("png"));
    let result = run_job(&config, None).await;
    assert!(matches!(result, Err(ZintError::ValidationError(_))));
}

// ============================================================
// 2. 複数ジョブ
// ============================================================

#[tokio::test]
async fn test_run_all_jobs_keeps_order_and_isolates_failures() {
    let jobs = vec![
        job("a", "1", "printf 'A'", OutputMode::direct("png")),
        job("b", "2", "echo 'Error 1' >&2", OutputMode::direct("png")),
        job("c", "3", "printf 'CCC'", OutputMode::direct("png")),
    ];

    let results = run_all_jobs(jobs, 2).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().expect("a succeeds").bytes, 1);
    assert!(matches!(results[1], Err(ZintError::ToolError { .. })));
    assert_eq!(results[2].as_ref().expect("c succeeds").label, "c");
}

#[tokio::test]
async fn test_run_all_jobs_bounded_concurrency() {
    // Each job sleeps 300 ms; with one worker they must run back to back.
    let jobs: Vec<JobConfig> = (0..3)
        .map(|i| {
            job(
                &format!("j{i}"),
                "x",
                "sleep 0.3; printf 'X'",
                OutputMode::direct("png"),
            )
        })
        .collect();

    let start = std::time::Instant::now();
    let results = run_all_jobs(jobs, 1).await;

    assert!(results.iter().all(Result::is_ok));
    assert!(start.elapsed() >= Duration::from_millis(900));
}

#[tokio::test]
async fn test_run_all_jobs_empty() {
    assert!(run_all_jobs(Vec::new(), 0).await.is_empty());
}
