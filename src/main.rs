use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use zint_cli::barcode::field::{Field, FieldValue};
use zint_cli::barcode::options::BarcodeOptions;
use zint_cli::barcode::settings::BarcodeSettings;
use zint_cli::command::compiler::{Destination, compile};
use zint_cli::config::job::JobFile;
use zint_cli::config::merged::MergedConfig;
use zint_cli::config::{self};
use zint_cli::pipeline::job_runner::JobConfig;
use zint_cli::pipeline::orchestrator::run_all_jobs;
use zint_cli::process::generate::OutputMode;

const USAGE: &str = "Usage: zint_cli [--dry-run] [--set <field>=<value>]... <jobs.yaml>...";

/// Parsed command line.
struct CliArgs {
    dry_run: bool,
    overrides: Vec<(Field, FieldValue)>,
    job_files: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs {
        dry_run: false,
        overrides: Vec::new(),
        job_files: Vec::new(),
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--dry-run" {
            cli.dry_run = true;
        } else if arg == "--set" || arg.starts_with("--set=") {
            let assignment = match arg.strip_prefix("--set=") {
                Some(a) => a.to_string(),
                None => iter
                    .next()
                    .cloned()
                    .ok_or_else(|| "--set requires <field>=<value>".to_string())?,
            };
            let (name, raw) = assignment
                .split_once('=')
                .ok_or_else(|| format!("--set expects <field>=<value>, got '{assignment}'"))?;
            let field: Field = name.trim().parse().map_err(|e| format!("{e}"))?;
            let value = FieldValue::parse(field, raw).map_err(|e| format!("{e}"))?;
            cli.overrides.push((field, value));
        } else if arg.starts_with("--") {
            return Err(format!("unknown option '{arg}'"));
        } else {
            cli.job_files.push(arg.clone());
        }
    }
    if cli.job_files.is_empty() {
        return Err("no job files given".to_string());
    }
    Ok(cli)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("{USAGE}");
        eprintln!("  Generate barcodes with zint according to job specifications.");
        eprintln!("  --dry-run              validate and print the zint command lines only");
        eprintln!("  --set <field>=<value>  override a barcode field in every job");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("zint_cli {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("ERROR: {e}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let mut job_configs: Vec<JobConfig> = Vec::new();
    let mut parallel_workers = 0;
    let mut has_error = false;

    for job_file_arg in &cli.job_files {
        let job_file_path = Path::new(job_file_arg);

        // Load settings from the same directory as the job file.
        let settings = match config::load_settings_for_job(job_file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("ERROR: Failed to load settings for {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };
        parallel_workers = parallel_workers.max(settings.parallel_workers);

        let job_file = match JobFile::from_file(job_file_path) {
            Ok(jf) => jf,
            Err(e) => {
                eprintln!("ERROR: Failed to load job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        // Resolve job file directory for relative paths.
        let job_dir = job_file_path.parent().unwrap_or_else(|| Path::new("."));

        for (i, mut job) in job_file.jobs.into_iter().enumerate() {
            let label = format!("{job_file_arg}#{}", i + 1);
            job.resolve_paths(job_dir);
            let merged = MergedConfig::new(&settings, &job);

            let settings = match apply_overrides(job.options.clone(), &cli.overrides) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("ERROR: {label}: {e}");
                    has_error = true;
                    continue;
                }
            };
            if !settings.is_valid() {
                report_invalid(&label, &settings);
                has_error = true;
                continue;
            }

            let job_config = JobConfig::new(label, settings.options().clone(), &merged);
            if cli.dry_run {
                match compile(&settings, &dry_run_destination(&job_config)) {
                    Ok(command) => println!("{command}"),
                    Err(e) => {
                        eprintln!("ERROR: {}: {e}", job_config.label);
                        has_error = true;
                    }
                }
            } else {
                job_configs.push(job_config);
            }
        }
    }

    if !cli.dry_run {
        let results = run_all_jobs(job_configs.clone(), parallel_workers).await;
        for (job, result) in job_configs.iter().zip(results) {
            match result {
                Ok(job_result) => match &job_result.output_path {
                    Some(path) => eprintln!(
                        "OK: {} -> {} ({} bytes)",
                        job_result.label,
                        path.display(),
                        job_result.bytes
                    ),
                    None => eprintln!("OK: {} ({} bytes)", job_result.label, job_result.bytes),
                },
                Err(e) => {
                    eprintln!("ERROR: {}: {e}", job.label);
                    has_error = true;
                }
            }
        }
    }

    if has_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// `--set` の上書きを順に適用し、検証済みの設定を返す。
fn apply_overrides(
    options: BarcodeOptions,
    overrides: &[(Field, FieldValue)],
) -> zint_cli::error::Result<BarcodeSettings> {
    let mut settings = BarcodeSettings::new(options);
    for (field, value) in overrides {
        settings.set_field(*field, value.clone())?;
    }
    Ok(settings)
}

fn report_invalid(label: &str, settings: &BarcodeSettings) {
    eprintln!("ERROR: {label}: invalid barcode settings");
    match serde_json::to_string_pretty(&settings.report()) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("ERROR: Failed to serialize validation report: {e}"),
    }
}

fn dry_run_destination(job: &JobConfig) -> Destination {
    match (&job.mode, job.output_path()) {
        (OutputMode::Direct { filetype }, _) => Destination::stdout(filetype),
        (OutputMode::File { .. }, Some(path)) => Destination::file(path),
        (OutputMode::File { filetype }, None) => Destination::file(format!("zint-output.{filetype}")),
    }
}
