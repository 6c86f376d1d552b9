// Phase 4: 設定ファイル解析テスト

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use zint_cli::barcode::ColorRgb;
use zint_cli::barcode::symbology::Symbology;
use zint_cli::config::job::JobFile;
use zint_cli::config::load_settings_for_job;
use zint_cli::config::merged::MergedConfig;
use zint_cli::config::settings::ToolSettings;
use zint_cli::error::ZintError;
use zint_cli::process::generate::OutputMode;

// ============================================================
// 1. settings.yaml
// ============================================================

#[test]
fn test_settings_defaults() {
    let settings = ToolSettings::from_yaml("{}").expect("empty mapping is valid");
    assert_eq!(settings.timeout_secs, 10);
    assert_eq!(settings.filetype, "png");
    assert!(!settings.direct);
    assert_eq!(settings.parallel_workers, 0);
    assert!(settings.launcher_args.is_empty());
    assert!(settings.working_dir.is_none());
}

#[test]
fn test_settings_full() {
    let yaml = r#"
zint_path: /opt/zint/bin/zint
launcher_args: ["--"]
timeout_secs: 3
working_dir: /tmp
filetype: svg
direct: true
parallel_workers: 4
"#;
    let settings = ToolSettings::from_yaml(yaml).expect("should parse");
    assert_eq!(settings.zint_path, Path::new("/opt/zint/bin/zint"));
    assert_eq!(settings.launcher_args, vec!["--"]);
    assert_eq!(settings.filetype, "svg");
    assert!(settings.direct);
    assert_eq!(settings.parallel_workers, 4);

    let runner = settings.runner_config(settings.timeout_secs);
    assert_eq!(runner.timeout, Duration::from_secs(3));
    assert_eq!(runner.working_dir.as_deref(), Some(Path::new("/tmp")));
}

#[test]
fn test_settings_invalid_yaml() {
    let result = ToolSettings::from_yaml("timeout_secs: [1, 2");
    assert!(result.is_err());
}

#[test]
fn test_load_settings_for_job_autodetect() {
    let dir = tempfile::tempdir().unwrap();
    let job_path = dir.path().join("jobs.yaml");
    std::fs::write(&job_path, "jobs: []").unwrap();

    // No settings.yaml → defaults.
    let settings = load_settings_for_job(&job_path).expect("defaults");
    assert_eq!(settings.timeout_secs, 10);

    let mut f = std::fs::File::create(dir.path().join("settings.yaml")).unwrap();
    writeln!(f, "timeout_secs: 42").unwrap();
    let settings = load_settings_for_job(&job_path).expect("settings.yaml");
    assert_eq!(settings.timeout_secs, 42);
}

// ============================================================
// 2. ジョブファイル
// ============================================================

#[test]
fn test_job_file_flattened_options() {
    let yaml = r##"
jobs:
  - symbology: QRCODE
    data: "https://example.com"
    scale: 2
    rotation_angle: 90
    foreground_color: "#112233"
    quiet_zones: false
    output_path: qr.png
  - symbology: 20
    data: "ABC-123"
    direct: true
    filetype: svg
    timeout_secs: 5
"##;
    let job_file = JobFile::from_yaml(yaml).expect("should parse");
    assert_eq!(job_file.jobs.len(), 2);

    let qr = &job_file.jobs[0].options;
    assert_eq!(qr.symbology, Symbology::QrCode);
    assert_eq!(qr.data, "https://example.com");
    assert_eq!(qr.scale, Some(2.0));
    assert_eq!(qr.rotation_angle, Some(90));
    assert_eq!(qr.foreground_color, Some(ColorRgb::new(0x11, 0x22, 0x33)));
    assert_eq!(qr.quiet_zones, Some(false));

    let code128 = &job_file.jobs[1];
    assert_eq!(code128.options.symbology, Symbology::Code128);
    assert_eq!(code128.direct, Some(true));
    assert_eq!(code128.filetype.as_deref(), Some("svg"));
    assert_eq!(code128.timeout_secs, Some(5));
}

#[test]
fn test_job_file_unknown_symbology() {
    let yaml = "jobs:\n  - symbology: NOPE\n    data: x\n";
    assert!(JobFile::from_yaml(yaml).is_err());
}

#[test]
fn test_job_file_bad_color() {
    let yaml = "jobs:\n  - data: x\n    foreground_color: \"12345\"\n";
    assert!(JobFile::from_yaml(yaml).is_err());
}

#[test]
fn test_job_file_misspelled_key_rejected() {
    let yaml = "jobs:\n  - data: x\n  - data: y\n    scael: 2\n";
    match JobFile::from_yaml(yaml) {
        Err(ZintError::ConfigError(msg)) => {
            assert!(msg.contains("job 2"), "got: {msg}");
            assert!(msg.contains("scael"), "got: {msg}");
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_resolve_paths_against_job_dir() {
    let yaml = r#"
jobs:
  - input_path: data/in.txt
    output_path: /abs/out.png
"#;
    let mut job = JobFile::from_yaml(yaml).unwrap().jobs.remove(0);
    job.resolve_paths(Path::new("/jobs"));

    assert_eq!(
        job.options.input_path.as_deref().map(Path::new),
        Some(Path::new("/jobs/data/in.txt"))
    );
    assert_eq!(job.options.output_path.as_deref(), Some("/abs/out.png"));
}

// ============================================================
// 3. マージ
// ============================================================

#[test]
fn test_merged_job_overrides_settings() {
    let settings = ToolSettings::from_yaml("timeout_secs: 7\nfiletype: png\n").unwrap();
    let yaml = "jobs:\n  - data: x\n    direct: true\n    filetype: eps\n  - data: y\n";
    let jobs = JobFile::from_yaml(yaml).unwrap().jobs;

    let overridden = MergedConfig::new(&settings, &jobs[0]);
    assert_eq!(overridden.output_mode(), OutputMode::direct("eps"));
    assert_eq!(overridden.runner.timeout, Duration::from_secs(7));

    let inherited = MergedConfig::new(&settings, &jobs[1]);
    assert_eq!(inherited.output_mode(), OutputMode::file("png"));
    assert_eq!(inherited.filetype, "png");
}
