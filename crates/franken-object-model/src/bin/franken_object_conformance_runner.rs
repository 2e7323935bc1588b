use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use frankenengine_object_model::object_builtins::SemanticsProfile;
use frankenengine_object_model::{
    ConformanceEvidenceCollector, ConformanceRunnerConfig, HostCapabilities, RealmConfig,
    run_object_conformance,
};

const USAGE: &str = "usage: franken_object_conformance_runner [--profile <es5|es2015>] \
[--host-config <path>] [--runner-config <path>] [--output-root <path>] [--no-gate]";

#[derive(Debug, Clone)]
struct CliArgs {
    profile: Option<SemanticsProfile>,
    host_config: Option<PathBuf>,
    runner_config: Option<PathBuf>,
    output_root: PathBuf,
    enforce_gate: bool,
}

fn default_output_root() -> PathBuf {
    PathBuf::from("artifacts/object_conformance")
}

/// `Ok(None)` means `--help` was requested.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<CliArgs>> {
    let mut profile = None;
    let mut host_config = None;
    let mut runner_config = None;
    let mut output_root = default_output_root();
    let mut enforce_gate = true;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--profile" => {
                let value = args.next().context("--profile requires a value")?;
                let parsed = value
                    .parse::<SemanticsProfile>()
                    .map_err(anyhow::Error::msg)?;
                profile = Some(parsed);
            }
            "--host-config" => {
                let value = args.next().context("--host-config requires a value")?;
                host_config = Some(PathBuf::from(value));
            }
            "--runner-config" => {
                let value = args.next().context("--runner-config requires a value")?;
                runner_config = Some(PathBuf::from(value));
            }
            "--output-root" => {
                let value = args.next().context("--output-root requires a value")?;
                output_root = PathBuf::from(value);
            }
            "--no-gate" => enforce_gate = false,
            "--help" | "-h" => return Ok(None),
            other => bail!("unknown argument: {other}\n{USAGE}"),
        }
    }

    Ok(Some(CliArgs {
        profile,
        host_config,
        runner_config,
        output_root,
        enforce_gate,
    }))
}

/// Host config file first, then `--profile` swaps in the preset semantics
/// while keeping any omitted operations from the file.
fn resolve_host(args: &CliArgs) -> Result<RealmConfig> {
    let mut host = match &args.host_config {
        Some(path) => RealmConfig::load(path)
            .with_context(|| format!("failed to load host config {}", path.display()))?,
        None => RealmConfig::default(),
    };
    if let Some(profile) = args.profile {
        let preset = match profile {
            SemanticsProfile::Es5 => RealmConfig::es5(),
            SemanticsProfile::Es2015 => RealmConfig::es2015(),
        };
        host = RealmConfig {
            omitted_operations: host.omitted_operations,
            ..preset
        };
    }
    Ok(host)
}

/// Comma-separated method names, or `none`.
fn missing_operations_line(host: &RealmConfig) -> String {
    let missing = HostCapabilities::detect(host).missing_operations();
    if missing.is_empty() {
        return "none".to_string();
    }
    missing
        .iter()
        .map(|op| op.method_name())
        .collect::<Vec<_>>()
        .join(",")
}

fn main() -> Result<()> {
    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let host = resolve_host(&args)?;
    let config = match &args.runner_config {
        Some(path) => ConformanceRunnerConfig::load(path)
            .with_context(|| format!("failed to load runner config {}", path.display()))?,
        None => ConformanceRunnerConfig::default(),
    };

    let run = run_object_conformance(&host, &config)?;
    let collector = ConformanceEvidenceCollector::new(&args.output_root)?;
    let artifacts = collector.collect(&run)?;

    println!("host_id={}", host.host_id());
    println!("missing_operations={}", missing_operations_line(&host));
    println!("run_id={}", run.run_id);
    println!("total_cases={}", run.summary.total_cases);
    println!("passed={}", run.summary.passed);
    println!("failed={}", run.summary.failed);
    println!("skipped={}", run.summary.skipped);
    println!("errored={}", run.summary.errored);
    println!("env_fingerprint={}", run.summary.env_fingerprint);
    println!("run_manifest={}", artifacts.run_manifest_path.display());
    println!(
        "conformance_evidence={}",
        artifacts.conformance_evidence_path.display()
    );
    for event in run.logs.iter().filter(|e| e.outcome == "fail" || e.outcome == "error") {
        println!(
            "{}: {} ({})",
            event.outcome,
            event.case_id,
            event.error_detail.as_deref().unwrap_or("no detail")
        );
    }

    if args.enforce_gate {
        run.enforce_ci_gate()?;
    }
    Ok(())
}
